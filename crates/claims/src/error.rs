use std::path::PathBuf;
use thiserror::Error;

/// Result type for claim model operations
pub type Result<T> = std::result::Result<T, ClaimsError>;

/// Errors raised while reading, writing or parsing claim artifacts
#[derive(Error, Debug)]
pub enum ClaimsError {
    /// Filesystem error with the offending path
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact was written by an incompatible version
    #[error("Unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    /// Scope string does not decode into frames
    #[error("Invalid scope path '{path}': {reason}")]
    InvalidScope { path: String, reason: String },
}

impl ClaimsError {
    /// Attach a path to an IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid scope error
    pub fn invalid_scope(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScope {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
