//! Errors at the configuration boundary
//!
//! The simulation itself never fails; only loading tuning files and level
//! tables can.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },

    #[error("level table is empty")]
    NoLevels,

    #[error("level `{level}`: {reason}")]
    InvalidLevel { level: String, reason: String },
}
