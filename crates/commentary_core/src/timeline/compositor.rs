//! Timeline compositor
//!
//! Folds clips placed at anchor times into one continuous track:
//!
//! ```text
//! anchors:  a1        a2   a3          a4
//! clips:    [==c1==]  [==c2==]         [=c4=]
//!                          [=c3=]  <- starts before c2 ends: dropped
//! track:    [==c1==]..[==c2==]........[=c4=]
//! ```
//!
//! - Underlap (anchor after the running end): silence fills the gap, then the
//!   clip is appended and the running end moves to anchor + clip length.
//! - Overlap (anchor at or before the running end, exact alignment included):
//!   the clip is discarded whole and the running end is unchanged.
//!
//! The result is then padded with silence to the requested window. All
//! arithmetic happens on the output sample clock (frames relative to the
//! window start), so the padded track is exactly as long as the window.

use serde::{Deserialize, Serialize};

use super::window::Window;
use crate::audio::{AudioFormat, AudioSegment};
use crate::catalog::ClipId;
use crate::error::CommentaryError;

/// What to do when composed audio spills outside the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// Keep the extra audio; the track is longer than the window
    #[default]
    Allow,
    /// Cut the track to the window
    Truncate,
    /// Fail the composition
    Reject,
}

/// One clip to be placed on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Time in match seconds the clip starts at
    pub anchor: f64,
    pub clip_id: Option<ClipId>,
    pub audio: AudioSegment,
}

impl Placement {
    pub fn new(anchor: f64, audio: AudioSegment) -> Self {
        Self { anchor, clip_id: None, audio }
    }

    pub fn with_clip_id(mut self, id: ClipId) -> Self {
        self.clip_id = Some(id);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Placed,
    /// Discarded because it started before the previous clip ended
    Dropped,
    /// Discarded because its audio format differs from the track's
    FormatMismatch,
}

/// Per-placement record of the fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub clip_id: Option<ClipId>,
    pub anchor: f64,
    pub duration: f64,
    pub status: EntryStatus,
    /// Anchor minus running end before this placement; absent for the first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

/// Audio outside the window, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrun {
    pub leading: f64,
    pub trailing: f64,
}

impl Overrun {
    pub fn is_none(&self) -> bool {
        self.leading <= 0.0 && self.trailing <= 0.0
    }
}

/// Output of the compositor
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedTrack {
    pub audio: AudioSegment,
    pub entries: Vec<TrackEntry>,
    pub leading_silence: f64,
    pub trailing_silence: f64,
    pub overrun: Overrun,
}

impl ComposedTrack {
    pub fn duration_secs(&self) -> f64 {
        self.audio.duration_secs()
    }

    pub fn placed(&self) -> usize {
        self.entries.iter().filter(|e| e.status == EntryStatus::Placed).count()
    }

    /// Entries that did not make it onto the track, for any reason
    pub fn dropped(&self) -> usize {
        self.entries.iter().filter(|e| e.status != EntryStatus::Placed).count()
    }
}

/// Running accumulator of the fold, in frames relative to the window start
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionState {
    audio: AudioSegment,
    first_anchor: i64,
    end: i64,
}

impl CompositionState {
    /// Seed from the first placement
    pub fn seed(anchor: i64, audio: AudioSegment) -> Self {
        let end = anchor + audio.frames() as i64;
        Self { audio, first_anchor: anchor, end }
    }

    /// Fold one placement in; returns the gap in frames and whether it was kept
    pub fn absorb(&mut self, anchor: i64, audio: AudioSegment) -> (i64, EntryStatus) {
        let gap = anchor - self.end;
        if gap <= 0 {
            return (gap, EntryStatus::Dropped);
        }
        let frames = audio.frames() as i64;
        self.audio.append_silence(gap as usize);
        self.audio.append(audio);
        self.end = anchor + frames;
        (gap, EntryStatus::Placed)
    }

    pub fn first_anchor(&self) -> i64 {
        self.first_anchor
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn audio(&self) -> &AudioSegment {
        &self.audio
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compositor {
    format: AudioFormat,
    policy: OverrunPolicy,
}

impl Compositor {
    pub fn new(format: AudioFormat) -> Self {
        Self { format, policy: OverrunPolicy::default() }
    }

    pub fn with_policy(mut self, policy: OverrunPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn policy(&self) -> OverrunPolicy {
        self.policy
    }

    /// Compose placements (non-decreasing anchors) into a track filling `window`
    ///
    /// Only [`OverrunPolicy::Reject`] can fail, and only after the fold.
    pub fn compose<I>(&self, placements: I, window: &Window) -> Result<ComposedTrack, CommentaryError>
    where
        I: IntoIterator<Item = Placement>,
    {
        let mut entries = Vec::new();
        let mut state: Option<CompositionState> = None;

        for placement in placements {
            let anchor = self.format.frame_offset(placement.anchor - window.start());
            let duration = placement.audio.duration_secs();
            if placement.audio.format() != self.format {
                log::warn!(
                    "Skipped clip {:?} at {:.2}s: format {} does not match track format {}",
                    placement.clip_id,
                    placement.anchor,
                    placement.audio.format(),
                    self.format
                );
                entries.push(TrackEntry {
                    clip_id: placement.clip_id,
                    anchor: placement.anchor,
                    duration,
                    status: EntryStatus::FormatMismatch,
                    gap: None,
                });
                continue;
            }
            let (gap, status) = match state.as_mut() {
                None => {
                    state = Some(CompositionState::seed(anchor, placement.audio));
                    (None, EntryStatus::Placed)
                }
                Some(s) => {
                    let (gap, status) = s.absorb(anchor, placement.audio);
                    (Some(self.seconds(gap)), status)
                }
            };
            if status == EntryStatus::Dropped {
                log::debug!(
                    "Dropped clip {:?} at {:.2}s: overlaps previous clip by {:.2}s",
                    placement.clip_id,
                    placement.anchor,
                    -gap.unwrap_or_default()
                );
            }
            entries.push(TrackEntry { clip_id: placement.clip_id, anchor: placement.anchor, duration, status, gap });
        }

        let window_frames = self.format.frames_for(window.duration()) as i64;
        let Some(state) = state else {
            return Ok(ComposedTrack {
                audio: AudioSegment::silent_frames(self.format, window_frames as usize),
                entries,
                leading_silence: 0.0,
                trailing_silence: self.seconds(window_frames),
                overrun: Overrun::default(),
            });
        };

        let leading = state.first_anchor.max(0);
        let trailing = (window_frames - state.end).max(0);
        let lead_overrun = (-state.first_anchor).max(0);
        let trail_overrun = (state.end - window_frames).max(0);
        let overrun = Overrun { leading: self.seconds(lead_overrun), trailing: self.seconds(trail_overrun) };

        let mut audio = state.audio;
        audio.prepend_silence(leading as usize);
        audio.append_silence(trailing as usize);

        if !overrun.is_none() {
            match self.policy {
                OverrunPolicy::Allow => {
                    log::warn!(
                        "Track overruns window by {:.2}s before and {:.2}s after",
                        overrun.leading,
                        overrun.trailing
                    );
                }
                OverrunPolicy::Truncate => {
                    audio.trim_frames(lead_overrun as usize, window_frames as usize);
                }
                OverrunPolicy::Reject => {
                    return Err(CommentaryError::Overrun { leading: overrun.leading, trailing: overrun.trailing });
                }
            }
        }

        Ok(ComposedTrack {
            audio,
            entries,
            leading_silence: self.seconds(leading),
            trailing_silence: self.seconds(trailing),
            overrun,
        })
    }

    fn seconds(&self, frames: i64) -> f64 {
        frames as f64 / f64::from(self.format.sample_rate)
    }
}
