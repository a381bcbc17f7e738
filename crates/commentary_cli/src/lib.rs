//! Commentary CLI support
//!
//! Track output with a JSON run manifest (SHA-256 of the WAV bytes, RFC 3339
//! creation time, per-event selection log) and checksum verification.

use anyhow::{Context, Result};
use commentary_core::audio::wav_bytes;
use commentary_core::{ClipCatalog, Commentary, CommentaryConfig, EventLog};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Run manifest written next to the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub window_start: f64,
    pub window_end: f64,
    /// Length of the written track (seconds)
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// Seed the run used, if fixed
    pub seed: Option<u64>,
    /// SHA256 of the WAV file (hex)
    pub checksum: String,
    /// RFC3339 creation time
    pub created_at: String,
    pub placed: usize,
    pub dropped: usize,
    pub events: Vec<EventLog>,
}

/// `<events-stem>-<start>-<end>.wav`
pub fn default_output_path(events: &Path, start: f64, end: f64) -> PathBuf {
    let stem = events.file_stem().and_then(|s| s.to_str()).unwrap_or("commentary");
    PathBuf::from(format!("{stem}-{start}-{end}.wav"))
}

/// File catalog, or the sample catalog when none is given
pub fn load_catalog(path: Option<&Path>) -> Result<ClipCatalog> {
    match path {
        Some(path) => {
            ClipCatalog::load(path).with_context(|| format!("Failed to load catalog: {}", path.display()))
        }
        None => ClipCatalog::embedded().context("Failed to load embedded sample catalog"),
    }
}

/// Explicit config file, else `COMMENTARY_CONFIG_PATH`, else defaults
pub fn load_config(path: Option<&Path>) -> Result<CommentaryConfig> {
    match path {
        Some(path) => {
            CommentaryConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => CommentaryConfig::from_env_or_default().context("Failed to load config from environment"),
    }
}

pub fn checksum_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Write the track as WAV and describe it
pub fn write_track(commentary: &Commentary, out: &Path, seed: Option<u64>) -> Result<RunManifest> {
    let audio = &commentary.track.audio;
    let bytes = wav_bytes(audio).context("Failed to encode WAV")?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(out, &bytes).with_context(|| format!("Failed to write output file: {}", out.display()))?;
    log::info!("Wrote {} bytes to {}", bytes.len(), out.display());

    let format = audio.format();
    Ok(RunManifest {
        window_start: commentary.window.start(),
        window_end: commentary.window.end(),
        duration_secs: audio.duration_secs(),
        sample_rate: format.sample_rate,
        channels: format.channels,
        seed,
        checksum: checksum_hex(&bytes),
        created_at: chrono::Utc::now().to_rfc3339(),
        placed: commentary.track.placed(),
        dropped: commentary.track.dropped(),
        events: commentary.events.clone(),
    })
}

/// Compare a track file against an expected checksum
pub fn verify_track(track: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(track).with_context(|| format!("Failed to read track: {}", track.display()))?;
    Ok(checksum_hex(&bytes) == expected_checksum)
}

pub fn save_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json).with_context(|| format!("Failed to write manifest: {}", path.display()))?;
    Ok(())
}

pub fn load_manifest(path: &Path) -> Result<RunManifest> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read manifest: {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse manifest")
}
