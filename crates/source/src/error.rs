use std::path::PathBuf;
use thiserror::Error;

/// Result type for source extraction
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors that can occur during source extraction
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source file could not be read
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file is not valid UTF-8
    #[error("{path} is not valid UTF-8 (first invalid byte at offset {offset})")]
    Encoding { path: PathBuf, offset: usize },

    /// Source does not parse as Python
    #[error("syntax error at line {line}: {detail}")]
    Syntax { line: usize, detail: String },

    /// Tree-sitter setup or parse failure
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// Parse cache could not be written
    #[error("Parse cache error at {path}: {reason}")]
    Cache { path: PathBuf, reason: String },

    /// Input root does not exist
    #[error("Source root not found: {0}")]
    MissingRoot(PathBuf),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn syntax(line: usize, detail: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            detail: detail.into(),
        }
    }

    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }

    pub fn cache(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Cache {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
