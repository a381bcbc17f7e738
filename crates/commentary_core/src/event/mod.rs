//! Match events (StatsBomb open-data shape)

pub mod io;
pub mod types;

pub use io::*;
pub use types::*;
