//! # commentary_core - Rule-Driven Football Commentary Tracks
//!
//! Turns a list of football match events into a single commentary audio
//! track for a time window.
//!
//! ## Features
//! - Data-driven clip catalog: each clip carries a conjunction of predicates
//! - Seedable randomness (same seed = same track)
//! - Gap-filling compositor that never overlaps two clips
//! - WAV clip directories via `hound`

#![allow(clippy::new_without_default)]

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod predicate;
pub mod selector;
pub mod store;
pub mod timeline;

pub use audio::{AudioFormat, AudioSegment};
pub use catalog::{CatalogError, ClipCatalog, ClipId, ClipRule, MatchFault};
pub use config::{AnchorPoint, CommentaryConfig};
pub use error::{CommentaryError, Result};
pub use event::{Event, EventType};
pub use pipeline::{Commentary, CommentaryEngine, EventLog};
pub use predicate::{Predicate, PredicateFault, Test, Zone};
pub use selector::{select_clip, Selection, SelectionKind};
pub use store::{ClipStore, ClipUnavailable, MemoryClipStore, WavDirectoryStore};
pub use timeline::{ComposedTrack, Compositor, OverrunPolicy, Placement, Window};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
