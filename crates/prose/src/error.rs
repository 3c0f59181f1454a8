use std::path::PathBuf;
use thiserror::Error;

/// Result type for prose extraction
pub type Result<T> = std::result::Result<T, ProseError>;

/// Errors that can occur during prose extraction
#[derive(Error, Debug)]
pub enum ProseError {
    /// Document could not be read
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid UTF-8
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {offset})")]
    Encoding { path: PathBuf, offset: usize },

    /// Input root does not exist
    #[error("Prose root not found: {0}")]
    MissingRoot(PathBuf),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ProseError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
