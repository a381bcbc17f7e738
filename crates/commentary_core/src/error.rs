use crate::catalog::{CatalogError, MatchFault};

#[derive(thiserror::Error, Debug)]
pub enum CommentaryError {
    #[error("invalid window [{start}, {end}): start must be before end and both finite")]
    InvalidWindow { start: f64, end: f64 },

    #[error(transparent)]
    Match(#[from] MatchFault),

    #[error("track overruns window by {leading:.3}s before and {trailing:.3}s after")]
    Overrun { leading: f64, trailing: f64 },

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

pub type Result<T> = std::result::Result<T, CommentaryError>;
