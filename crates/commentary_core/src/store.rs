//! Clip stores: resolve a clip id to audio

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::{read_wav, AudioFormat, AudioSegment};
use crate::catalog::ClipId;

/// Placeholder for the clip id in file name patterns
pub const CLIP_ID_PLACEHOLDER: &str = "{id}";

/// Default clip file name pattern
pub const DEFAULT_CLIP_PATTERN: &str = "chunk-{id}.wav";

/// Why a clip could not be resolved
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClipUnavailable {
    #[error("clip {0} not found")]
    NotFound(ClipId),

    #[error("clip {id} unreadable: {reason}")]
    Unreadable { id: ClipId, reason: String },

    #[error("clip {id} is {found}, expected {expected}")]
    FormatMismatch { id: ClipId, expected: AudioFormat, found: AudioFormat },
}

/// Source of clip audio
pub trait ClipStore {
    fn fetch(&self, id: ClipId) -> Result<AudioSegment, ClipUnavailable>;
}

impl<S: ClipStore + ?Sized> ClipStore for &S {
    fn fetch(&self, id: ClipId) -> Result<AudioSegment, ClipUnavailable> {
        (**self).fetch(id)
    }
}

/// Clips held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryClipStore {
    clips: HashMap<ClipId, AudioSegment>,
}

impl MemoryClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ClipId, audio: AudioSegment) {
        self.clips.insert(id, audio);
    }

    pub fn with_clip(mut self, id: u32, audio: AudioSegment) -> Self {
        self.insert(ClipId(id), audio);
        self
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl ClipStore for MemoryClipStore {
    fn fetch(&self, id: ClipId) -> Result<AudioSegment, ClipUnavailable> {
        self.clips.get(&id).cloned().ok_or(ClipUnavailable::NotFound(id))
    }
}

/// WAV clips in a directory, one file per id
///
/// Files whose format differs from the expected output format are reported
/// unavailable, so everything handed downstream shares one format.
#[derive(Debug, Clone)]
pub struct WavDirectoryStore {
    dir: PathBuf,
    pattern: String,
    format: AudioFormat,
}

impl WavDirectoryStore {
    pub fn new<P: AsRef<Path>>(dir: P, format: AudioFormat) -> Self {
        Self { dir: dir.as_ref().to_path_buf(), pattern: DEFAULT_CLIP_PATTERN.to_string(), format }
    }

    /// File name pattern; `{id}` is replaced by the clip id
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    pub fn path_for(&self, id: ClipId) -> PathBuf {
        self.dir.join(self.pattern.replace(CLIP_ID_PLACEHOLDER, &id.to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ClipStore for WavDirectoryStore {
    fn fetch(&self, id: ClipId) -> Result<AudioSegment, ClipUnavailable> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(ClipUnavailable::NotFound(id));
        }
        let audio = read_wav(&path).map_err(|e| ClipUnavailable::Unreadable { id, reason: e.to_string() })?;
        if audio.format() != self.format {
            return Err(ClipUnavailable::FormatMismatch { id, expected: self.format, found: audio.format() });
        }
        log::trace!("Loaded clip {} ({:.2}s) from {}", id, audio.duration_secs(), path.display());
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::write_wav;

    const FMT: AudioFormat = AudioFormat::new(8_000, 1);

    #[test]
    fn test_memory_store() {
        let store = MemoryClipStore::new().with_clip(3, AudioSegment::silent(FMT, 0.5));
        assert_eq!(store.fetch(ClipId(3)).unwrap().frames(), 4_000);
        assert_eq!(store.fetch(ClipId(4)), Err(ClipUnavailable::NotFound(ClipId(4))));
    }

    #[test]
    fn test_directory_store_reads_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let clip = AudioSegment::from_samples(FMT, vec![10, -10, 20, -20]);
        write_wav(&clip, dir.path().join("chunk-12.wav")).unwrap();
        write_wav(&clip, dir.path().join("take_12.wav")).unwrap();

        let store = WavDirectoryStore::new(dir.path(), FMT);
        assert_eq!(store.fetch(ClipId(12)).unwrap(), clip);
        assert_eq!(store.fetch(ClipId(13)), Err(ClipUnavailable::NotFound(ClipId(13))));

        let custom = WavDirectoryStore::new(dir.path(), FMT).with_pattern("take_{id}.wav");
        assert_eq!(custom.fetch(ClipId(12)).unwrap(), clip);
    }

    #[test]
    fn test_directory_store_rejects_other_format() {
        let dir = tempfile::tempdir().unwrap();
        write_wav(&AudioSegment::silent(AudioFormat::new(44_100, 2), 0.1), dir.path().join("chunk-1.wav")).unwrap();

        let store = WavDirectoryStore::new(dir.path(), FMT);
        assert!(matches!(store.fetch(ClipId(1)), Err(ClipUnavailable::FormatMismatch { .. })));
    }

    #[test]
    fn test_directory_store_reports_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("chunk-2.wav"), b"not a wav").unwrap();

        let store = WavDirectoryStore::new(dir.path(), FMT);
        assert!(matches!(store.fetch(ClipId(2)), Err(ClipUnavailable::Unreadable { .. })));
    }
}
