//! Window selection and timeline composition

pub mod compositor;
pub mod window;

pub use compositor::{
    ComposedTrack, CompositionState, Compositor, EntryStatus, Overrun, OverrunPolicy, Placement, TrackEntry,
};
pub use window::Window;
