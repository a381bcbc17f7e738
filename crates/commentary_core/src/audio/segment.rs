use serde::{Deserialize, Serialize};
use std::fmt;

/// Sample rate and channel layout of a PCM buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self { sample_rate, channels }
    }

    /// Frame count for `seconds`, rounded to the nearest frame; negative is 0
    pub fn frames_for(&self, seconds: f64) -> usize {
        if seconds <= 0.0 || !seconds.is_finite() {
            return 0;
        }
        (seconds * f64::from(self.sample_rate)).round() as usize
    }

    /// Signed frame offset of `seconds` relative to time zero
    pub fn frame_offset(&self, seconds: f64) -> i64 {
        (seconds * f64::from(self.sample_rate)).round() as i64
    }

    pub fn seconds_for(&self, frames: usize) -> f64 {
        frames as f64 / f64::from(self.sample_rate)
    }

    pub fn is_valid(&self) -> bool {
        self.sample_rate > 0 && self.channels > 0
    }
}

impl Default for AudioFormat {
    /// Mono 44.1 kHz, the format the clip library is recorded in
    fn default() -> Self {
        Self::new(44_100, 1)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} Hz / {} ch", self.sample_rate, self.channels)
    }
}

/// Interleaved 16-bit PCM audio
///
/// Duration is derived from the frame count, never stored separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSegment {
    format: AudioFormat,
    samples: Vec<i16>,
}

impl AudioSegment {
    /// Wrap interleaved samples; a trailing partial frame is dropped
    pub fn from_samples(format: AudioFormat, mut samples: Vec<i16>) -> Self {
        let channels = usize::from(format.channels.max(1));
        samples.truncate(samples.len() - samples.len() % channels);
        Self { format, samples }
    }

    pub fn empty(format: AudioFormat) -> Self {
        Self { format, samples: Vec::new() }
    }

    pub fn silent_frames(format: AudioFormat, frames: usize) -> Self {
        Self { format, samples: vec![0; frames * usize::from(format.channels)] }
    }

    pub fn silent(format: AudioFormat, seconds: f64) -> Self {
        Self::silent_frames(format, format.frames_for(seconds))
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.format.channels.max(1))
    }

    pub fn duration_secs(&self) -> f64 {
        self.format.seconds_for(self.frames())
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append another segment of the same format
    pub fn append(&mut self, other: AudioSegment) {
        debug_assert_eq!(self.format, other.format, "appending audio of a different format");
        if self.samples.is_empty() {
            self.samples = other.samples;
        } else {
            self.samples.extend_from_slice(&other.samples);
        }
    }

    pub fn append_silence(&mut self, frames: usize) {
        let len = self.samples.len() + frames * usize::from(self.format.channels);
        self.samples.resize(len, 0);
    }

    pub fn prepend_silence(&mut self, frames: usize) {
        if frames == 0 {
            return;
        }
        let pad = frames * usize::from(self.format.channels);
        self.samples.splice(0..0, std::iter::repeat(0).take(pad));
    }

    /// Drop frames outside `[start, start + len)`
    pub fn trim_frames(&mut self, start: usize, len: usize) {
        let channels = usize::from(self.format.channels);
        let begin = (start * channels).min(self.samples.len());
        let end = ((start + len) * channels).min(self.samples.len());
        self.samples.truncate(end);
        self.samples.drain(..begin);
    }

    /// Peak absolute sample value
    pub fn peak(&self) -> u16 {
        self.samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }
}
