use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for source extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File extensions treated as Python sources
    pub extensions: Vec<String>,

    /// Directory for cached syntax trees (None = no cache)
    pub cache_dir: Option<PathBuf>,

    /// Parallel file workers (None = adaptive default)
    pub concurrency: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string(), "pyi".to_string()],
            cache_dir: None,
            concurrency: None,
        }
    }
}

impl SourceConfig {
    /// Default settings with a parse cache rooted at `dir`
    pub fn cached(dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("extensions must list at least one file type".to_string());
        }
        if self.concurrency == Some(0) {
            return Err("concurrency must be > 0 when set".to_string());
        }
        Ok(())
    }
}
