//! Error types for diff computation.
//!
//! Every failure is permanent for the inputs that produced it: the
//! computations are pure, so retrying with the same arguments fails the
//! same way.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a side-by-side diff.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Cannot diff a {old} input against a {new} input")]
    InputTypeMismatch {
        old: &'static str,
        new: &'static str,
    },

    #[error("Unknown compare mode: {0}")]
    UnknownCompareMode(String),

    #[error("Invalid line id `{0}`, expected L-<number> or R-<number>")]
    InvalidLineId(String),

    #[error("Failed to serialize structured input: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to load diff options from {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Reasons an options file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DiffError>;
