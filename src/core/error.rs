//! Error types for Arbor

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("a degree {degree} curve cannot have {count} control points")]
    InvalidControlCount { degree: u32, count: usize },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
