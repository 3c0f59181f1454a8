use serde::{Deserialize, Serialize};

/// Configuration for claim deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Token-set similarity at or above which nearby claims are duplicates
    pub similarity_threshold: f64,

    /// Maximum line distance for near-duplicates within one file
    pub line_window: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.85,
            line_window: 3,
        }
    }
}

impl MergeConfig {
    /// Only identical comparison keys are duplicates
    pub fn exact_only() -> Self {
        Self {
            similarity_threshold: 1.0,
            line_window: 0,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}
