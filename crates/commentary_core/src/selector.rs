//! Per-event clip selection
//!
//! 1. Match the event against the catalog to get the candidate set.
//! 2. Draw one candidate uniformly (repeated ids weigh more).
//! 3. Resolve it through the clip store. An unavailable id is removed from the
//!    candidate set, every occurrence, and the draw repeats. The loop ends
//!    after at most one attempt per distinct id.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::audio::AudioSegment;
use crate::catalog::{ClipCatalog, ClipId, MatchFault};
use crate::event::Event;
use crate::store::ClipStore;

/// Outcome of selecting a clip for one event
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Chosen { clip_id: ClipId, audio: AudioSegment },
    /// No rule matched
    NoCandidate,
    /// Rules matched but no candidate could be resolved
    Exhausted { tried: Vec<ClipId> },
}

impl Selection {
    pub fn clip_id(&self) -> Option<ClipId> {
        match self {
            Selection::Chosen { clip_id, .. } => Some(*clip_id),
            _ => None,
        }
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Selection::Chosen { .. } => SelectionKind::Chosen,
            Selection::NoCandidate => SelectionKind::NoCandidate,
            Selection::Exhausted { .. } => SelectionKind::Exhausted,
        }
    }

    pub fn into_audio(self) -> Option<AudioSegment> {
        match self {
            Selection::Chosen { audio, .. } => Some(audio),
            _ => None,
        }
    }

    pub fn into_clip(self) -> Option<(ClipId, AudioSegment)> {
        match self {
            Selection::Chosen { clip_id, audio } => Some((clip_id, audio)),
            _ => None,
        }
    }
}

/// Audio-free summary of a [`Selection`] for logs and manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Chosen,
    NoCandidate,
    Exhausted,
}

/// Pick a clip for `event`
///
/// Every rule fault is logged; the first one is returned as the error.
pub fn select_clip<S, R>(
    event: &Event,
    catalog: &ClipCatalog,
    store: &S,
    rng: &mut R,
) -> Result<Selection, MatchFault>
where
    S: ClipStore + ?Sized,
    R: Rng + ?Sized,
{
    let candidates = catalog.candidates(event, rng);
    if let Some(first) = candidates.faults.first() {
        for fault in &candidates.faults {
            log::error!("{} at {:.1}s: {}", event.event_type, event.start_time(), fault);
        }
        return Err(first.clone());
    }

    Ok(pick_available(candidates.ids, store, rng))
}

/// Draw from `remaining` until the store resolves one
pub fn pick_available<S, R>(mut remaining: Vec<ClipId>, store: &S, rng: &mut R) -> Selection
where
    S: ClipStore + ?Sized,
    R: Rng + ?Sized,
{
    if remaining.is_empty() {
        return Selection::NoCandidate;
    }

    let mut tried = Vec::new();
    while !remaining.is_empty() {
        let clip_id = remaining[rng.gen_range(0..remaining.len())];
        match store.fetch(clip_id) {
            Ok(audio) => return Selection::Chosen { clip_id, audio },
            Err(reason) => {
                log::warn!("Skipping clip {}: {}", clip_id, reason);
                remaining.retain(|id| *id != clip_id);
                tried.push(clip_id);
            }
        }
    }

    Selection::Exhausted { tried }
}
