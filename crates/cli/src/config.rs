use anyhow::{Context as AnyhowContext, Result};
use claimscan_merge::MergeConfig;
use claimscan_prose::ProseConfig;
use claimscan_source::SourceConfig;
use serde::Deserialize;
use std::path::Path;

/// Optional TOML settings file with one table per stage
///
/// ```toml
/// [prose]
/// min_informal_words = 8
///
/// [source]
/// cache_dir = ".claimscan/parse-cache"
///
/// [merge]
/// similarity_threshold = 0.9
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub prose: ProseConfig,
    pub source: SourceConfig,
    pub merge: MergeConfig,
}

impl FileConfig {
    /// Defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
