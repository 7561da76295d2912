//! Error types for the NWP data-access core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using NwpError.
pub type NwpResult<T> = Result<T, NwpError>;

/// Primary error type for indexing and cache operations.
#[derive(Debug, Error)]
pub enum NwpError {
    // === Source Errors ===
    #[error("Data source unavailable at {path:?}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("Malformed filename '{name}': {reason}")]
    MalformedFilename { name: String, reason: String },

    #[error("Lead time of {0} hours is outside 0..=999")]
    LeadTimeOutOfRange(i64),

    // === Cache Errors ===
    #[error("Cache record {path:?} is corrupt: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Cache store unavailable at {path:?}: {reason}")]
    CacheUnavailable { path: PathBuf, reason: String },

    // === Infrastructure Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NwpError {
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        NwpError::MalformedFilename {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
