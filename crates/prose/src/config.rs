use serde::{Deserialize, Serialize};

/// Configuration for prose extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProseConfig {
    /// File extensions treated as prose documents
    pub extensions: Vec<String>,

    /// Run the informal pass over paragraphs outside formal blocks
    pub informal_pass: bool,

    /// Minimum word count for an informal sentence to qualify
    pub min_informal_words: usize,

    /// Hard cap on statement body length in lines
    pub max_statement_lines: usize,

    /// Parallel document workers (None = adaptive default)
    pub concurrency: Option<usize>,
}

impl Default for ProseConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            informal_pass: true,
            min_informal_words: 6,
            max_statement_lines: 40,
            concurrency: None,
        }
    }
}

impl ProseConfig {
    /// Formal statements only, no informal heuristic pass
    pub fn formal_only() -> Self {
        Self {
            informal_pass: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extensions.is_empty() {
            return Err("extensions must list at least one file type".to_string());
        }
        if self.min_informal_words == 0 {
            return Err("min_informal_words must be > 0".to_string());
        }
        if self.max_statement_lines == 0 {
            return Err("max_statement_lines must be > 0".to_string());
        }
        if self.concurrency == Some(0) {
            return Err("concurrency must be > 0 when set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ProseConfig::default().validate().is_ok());
        assert!(ProseConfig::formal_only().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProseConfig::default();
        config.extensions.clear();
        assert!(config.validate().is_err());

        let config = ProseConfig {
            concurrency: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ProseConfig = toml::from_str("min_informal_words = 9").unwrap();
        assert_eq!(config.min_informal_words, 9);
        assert_eq!(config.extensions, vec!["md", "markdown"]);
    }
}
