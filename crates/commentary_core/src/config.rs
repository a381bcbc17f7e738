//! Run configuration
//!
//! Loaded from a YAML or JSON file. Every field has a default, so a partial
//! file only overrides what it names:
//!
//! ```yaml
//! seed: 42
//! audio: { sample_rate: 44100, channels: 1 }
//! anchor: start
//! overrun: truncate
//! clip_pattern: "chunk-{id}.wav"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::audio::AudioFormat;
use crate::error::{CommentaryError, Result};
use crate::event::Event;
use crate::store::{CLIP_ID_PLACEHOLDER, DEFAULT_CLIP_PATTERN};
use crate::timeline::OverrunPolicy;

/// Environment variable naming a config file to use instead of the defaults
pub const CONFIG_PATH_ENV: &str = "COMMENTARY_CONFIG_PATH";

/// Which event time a clip is placed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPoint {
    #[default]
    Start,
    /// Start plus duration; clips follow the action instead of leading it
    End,
}

impl AnchorPoint {
    pub fn time_of(&self, event: &Event) -> f64 {
        match self {
            AnchorPoint::Start => event.start_time(),
            AnchorPoint::End => event.end_time(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    /// Fixed RNG seed; fresh entropy when absent
    pub seed: Option<u64>,
    pub audio: AudioFormat,
    pub anchor: AnchorPoint,
    pub overrun: OverrunPolicy,
    pub clip_pattern: String,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            seed: None,
            audio: AudioFormat::default(),
            anchor: AnchorPoint::default(),
            overrun: OverrunPolicy::default(),
            clip_pattern: DEFAULT_CLIP_PATTERN.to_string(),
        }
    }
}

impl CommentaryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load by file extension (`.yaml`, `.yml` or `.json`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(CommentaryError::Config(format!(
                    "unsupported config file extension: {}",
                    other.unwrap_or("<none>")
                )))
            }
        };
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the file named by `COMMENTARY_CONFIG_PATH`, or fall back to defaults
    pub fn from_env_or_default() -> Result<Self> {
        Self::from_override(env::var(CONFIG_PATH_ENV).ok())
    }

    fn from_override(path: Option<String>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }
        Self::load(path).map_err(|e| CommentaryError::Config(format!("{CONFIG_PATH_ENV}='{path}': {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.audio.is_valid() {
            return Err(CommentaryError::Config(format!("unusable audio format {}", self.audio)));
        }
        if !self.clip_pattern.contains(CLIP_ID_PLACEHOLDER) {
            return Err(CommentaryError::Config(format!(
                "clip_pattern '{}' has no {} placeholder",
                self.clip_pattern, CLIP_ID_PLACEHOLDER
            )));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_audio(mut self, audio: AudioFormat) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorPoint) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_overrun(mut self, overrun: OverrunPolicy) -> Self {
        self.overrun = overrun;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CommentaryConfig::from_yaml_str("seed: 7\noverrun: truncate\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.overrun, OverrunPolicy::Truncate);
        assert_eq!(config.anchor, AnchorPoint::Start);
        assert_eq!(config.audio, AudioFormat::new(44_100, 1));
        assert_eq!(config.clip_pattern, "chunk-{id}.wav");
    }

    #[test]
    fn test_json_config() {
        let config = CommentaryConfig::from_json_str(
            r#"{"audio": {"sample_rate": 22050, "channels": 2}, "anchor": "end", "clip_pattern": "{id}.wav"}"#,
        )
        .unwrap();
        assert_eq!(config.audio, AudioFormat::new(22_050, 2));
        assert_eq!(config.anchor, AnchorPoint::End);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            CommentaryConfig::from_yaml_str("clip_pattern: clip.wav"),
            Err(CommentaryError::Config(_))
        ));
        assert!(matches!(
            CommentaryConfig::from_yaml_str("audio: { sample_rate: 0, channels: 1 }"),
            Err(CommentaryError::Config(_))
        ));
        assert!(CommentaryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("run.yaml");
        fs::write(&yaml, "seed: 3\n").unwrap();
        assert_eq!(CommentaryConfig::load(&yaml).unwrap().seed, Some(3));

        let toml = dir.path().join("run.toml");
        fs::write(&toml, "seed = 3\n").unwrap();
        assert!(matches!(CommentaryConfig::load(&toml), Err(CommentaryError::Config(_))));
    }

    #[test]
    fn test_override_path() {
        assert_eq!(CommentaryConfig::from_override(None).unwrap(), CommentaryConfig::default());
        assert_eq!(CommentaryConfig::from_override(Some("  ".into())).unwrap(), CommentaryConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.json");
        fs::write(&path, r#"{"seed": 11}"#).unwrap();
        let loaded = CommentaryConfig::from_override(Some(path.display().to_string())).unwrap();
        assert_eq!(loaded.seed, Some(11));

        let missing = CommentaryConfig::from_override(Some("/nonexistent/commentary.yaml".into()));
        match missing {
            Err(CommentaryError::Config(msg)) => assert!(msg.contains(CONFIG_PATH_ENV)),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_anchor_point_time() {
        let event = Event::at(EventType::Pass, 30).with_duration(1.5);
        assert_eq!(AnchorPoint::Start.time_of(&event), 30.0);
        assert_eq!(AnchorPoint::End.time_of(&event), 31.5);
    }
}
