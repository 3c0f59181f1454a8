use std::path::PathBuf;
use thiserror::Error;

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors raised around a merge; the merge itself never fails on content
#[derive(Error, Debug)]
pub enum MergeError {
    /// Input artifact could not be read
    #[error("missing {artifact} claims artifact at {path}: {source}")]
    MissingInput {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input artifact is not a claim batch of the expected origin
    #[error("malformed {artifact} claims artifact at {path}: {reason}")]
    MalformedInput {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// Output could not be written
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MergeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(
        artifact: &'static str,
        path: impl Into<PathBuf>,
        reason: impl ToString,
    ) -> Self {
        Self::MalformedInput {
            artifact,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
