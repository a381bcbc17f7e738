//! End-to-end commentary generation
//!
//! window check → event filter/sort → clip selection per event → anchoring →
//! composition. One engine owns its RNG, so repeated runs with the same seed
//! produce the same track.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{ClipCatalog, ClipId};
use crate::config::CommentaryConfig;
use crate::error::Result;
use crate::event::{Event, EventType};
use crate::selector::{select_clip, SelectionKind};
use crate::store::ClipStore;
use crate::timeline::{ComposedTrack, Compositor, Placement, Window};

/// What happened to one event of the window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub event_type: EventType,
    pub start_time: f64,
    pub clip_id: Option<ClipId>,
    pub outcome: SelectionKind,
}

/// Result of one run
#[derive(Debug, Clone)]
pub struct Commentary {
    pub window: Window,
    pub track: ComposedTrack,
    pub events: Vec<EventLog>,
}

impl Commentary {
    pub fn duration_secs(&self) -> f64 {
        self.track.duration_secs()
    }
}

pub struct CommentaryEngine<S: ClipStore> {
    catalog: ClipCatalog,
    store: S,
    config: CommentaryConfig,
    compositor: Compositor,
    rng: ChaCha8Rng,
}

impl<S: ClipStore> CommentaryEngine<S> {
    pub fn new(catalog: ClipCatalog, store: S, config: CommentaryConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let compositor = Compositor::new(config.audio).with_policy(config.overrun);
        Ok(Self { catalog, store, config, compositor, rng })
    }

    pub fn config(&self) -> &CommentaryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ClipCatalog {
        &self.catalog
    }

    /// Commentary for the events of `[start, end)`
    pub fn generate(&mut self, events: &[Event], start: f64, end: f64) -> Result<Commentary> {
        let window = Window::new(start, end)?;
        self.generate_window(events, window)
    }

    pub fn generate_window(&mut self, events: &[Event], window: Window) -> Result<Commentary> {
        let selected = window.select_events(events);
        log::info!(
            "Generating commentary for [{:.1}, {:.1}): {} of {} events in window",
            window.start(),
            window.end(),
            selected.len(),
            events.len()
        );

        let mut logs = Vec::with_capacity(selected.len());
        let mut placements = Vec::new();
        for event in selected {
            let selection = select_clip(event, &self.catalog, &self.store, &mut self.rng)?;
            let log = EventLog {
                event_type: event.event_type.clone(),
                start_time: event.start_time(),
                clip_id: selection.clip_id(),
                outcome: selection.kind(),
            };
            log::debug!("{:>8.1}s {:<20} {:?} {:?}", log.start_time, log.event_type.name(), log.outcome, log.clip_id);
            logs.push(log);

            if let Some((clip_id, audio)) = selection.into_clip() {
                placements.push(Placement::new(self.config.anchor.time_of(event), audio).with_clip_id(clip_id));
            }
        }

        // End anchors follow durations, which can reorder clips
        placements.sort_by(|a, b| a.anchor.total_cmp(&b.anchor));

        let track = self.compositor.compose(placements, &window)?;
        log::info!(
            "Composed {:.2}s track: {} clips placed, {} dropped",
            track.duration_secs(),
            track.placed(),
            track.dropped()
        );
        Ok(Commentary { window, track, events: logs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{wav_bytes, AudioFormat, AudioSegment};
    use crate::catalog::ClipRule;
    use crate::config::AnchorPoint;
    use crate::error::CommentaryError;
    use crate::predicate::{NameField, Predicate};
    use crate::store::MemoryClipStore;
    use crate::timeline::OverrunPolicy;

    const FMT: AudioFormat = AudioFormat::new(1_000, 1);

    fn tone(seconds: f64, level: i16) -> AudioSegment {
        AudioSegment::from_samples(FMT, vec![level; FMT.frames_for(seconds)])
    }

    fn catalog() -> ClipCatalog {
        ClipCatalog::new(vec![
            ClipRule::new(1, vec![Predicate::type_is(EventType::Pass)]),
            ClipRule::new(2, vec![Predicate::type_is(EventType::Pass)]),
            ClipRule::new(3, vec![Predicate::type_is(EventType::Shot)]),
        ])
        .unwrap()
    }

    fn store() -> MemoryClipStore {
        MemoryClipStore::new().with_clip(1, tone(1.0, 1)).with_clip(2, tone(1.0, 2)).with_clip(3, tone(2.0, 3))
    }

    fn config() -> CommentaryConfig {
        CommentaryConfig::default().with_audio(FMT).with_seed(42)
    }

    fn events() -> Vec<Event> {
        vec![
            Event::at(EventType::Pass, 12),
            Event::at(EventType::Shot, 15).with_duration(0.5),
            Event::at(EventType::Pass, 3),
            Event::at(EventType::Pressure, 8),
            Event::at(EventType::Pass, 25),
        ]
    }

    #[test]
    fn test_generate_fills_window() {
        let mut engine = CommentaryEngine::new(catalog(), store(), config()).unwrap();
        let out = engine.generate(&events(), 0.0, 20.0).unwrap();

        assert_eq!(out.duration_secs(), 20.0);
        let times: Vec<f64> = out.events.iter().map(|e| e.start_time).collect();
        assert_eq!(times, vec![3.0, 8.0, 12.0, 15.0]);
        assert_eq!(out.events[1].outcome, SelectionKind::NoCandidate);
        assert_eq!(out.events[3].clip_id, Some(ClipId(3)));
        assert_eq!(out.track.placed(), 3);

        // Shot clip sits at 15s for 2s
        let samples = out.track.audio.samples();
        assert!(samples[15_000..17_000].iter().all(|&s| s == 3));
        assert!(samples[17_000..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let run = || {
            let mut engine = CommentaryEngine::new(catalog(), store(), config()).unwrap();
            let out = engine.generate(&events(), 0.0, 30.0).unwrap();
            (wav_bytes(&out.track.audio).unwrap(), out.events)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_window_rejected_first() {
        let faulty = ClipCatalog::new(vec![ClipRule::new(
            9,
            vec![Predicate::type_is(EventType::Pass), Predicate::name_is(NameField::PassOutcome, "Out")],
        )])
        .unwrap();
        let mut engine = CommentaryEngine::new(faulty, store(), config()).unwrap();
        assert!(matches!(engine.generate(&events(), 20.0, 10.0), Err(CommentaryError::InvalidWindow { .. })));
    }

    #[test]
    fn test_match_fault_aborts_run() {
        let faulty = ClipCatalog::new(vec![ClipRule::new(
            9,
            vec![Predicate::type_is(EventType::Pass), Predicate::name_is(NameField::PassOutcome, "Out")],
        )])
        .unwrap();
        let mut engine = CommentaryEngine::new(faulty, store(), config()).unwrap();
        match engine.generate(&events(), 0.0, 20.0) {
            Err(CommentaryError::Match(fault)) => assert_eq!(fault.clip_id, ClipId(9)),
            other => panic!("expected match fault, got {:?}", other.map(|c| c.events)),
        }
    }

    #[test]
    fn test_empty_window_is_silence() {
        let mut engine = CommentaryEngine::new(catalog(), store(), config()).unwrap();
        let out = engine.generate(&events(), 100.0, 110.0).unwrap();
        assert!(out.events.is_empty());
        assert_eq!(out.track.audio.frames(), 10_000);
        assert_eq!(out.track.audio.peak(), 0);
    }

    #[test]
    fn test_end_anchor_places_after_event() {
        let config = config().with_anchor(AnchorPoint::End);
        let mut engine = CommentaryEngine::new(catalog(), store(), config).unwrap();
        let out = engine.generate(&[Event::at(EventType::Shot, 4).with_duration(1.0)], 0.0, 10.0).unwrap();
        let samples = out.track.audio.samples();
        assert!(samples[..5_000].iter().all(|&s| s == 0));
        assert!(samples[5_000..7_000].iter().all(|&s| s == 3));
    }

    #[test]
    fn test_overrun_policy_from_config() {
        let config = config().with_overrun(OverrunPolicy::Reject);
        let mut engine = CommentaryEngine::new(catalog(), store(), config).unwrap();
        // 2s shot clip at 15s in a window ending at 16.5s
        let result = engine.generate(&[Event::at(EventType::Shot, 15)], 0.0, 16.5);
        assert!(matches!(result, Err(CommentaryError::Overrun { .. })));
    }

    #[test]
    fn test_clip_in_other_format_keeps_track_format() {
        let stereo = AudioSegment::from_samples(AudioFormat::new(1_000, 2), vec![5; 2_000]);
        let store = MemoryClipStore::new().with_clip(3, stereo);
        let mut engine = CommentaryEngine::new(catalog(), store, config()).unwrap();
        let out = engine.generate(&[Event::at(EventType::Shot, 2), Event::at(EventType::Shot, 6)], 0.0, 10.0).unwrap();

        assert_eq!(out.track.audio.format(), FMT);
        assert_eq!(out.track.audio.frames(), 10_000);
        assert_eq!(out.track.audio.peak(), 0);
        assert_eq!((out.track.placed(), out.track.dropped()), (0, 2));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = CommentaryConfig { audio: AudioFormat::new(0, 1), ..CommentaryConfig::default() };
        assert!(CommentaryEngine::new(catalog(), store(), bad).is_err());
    }
}
