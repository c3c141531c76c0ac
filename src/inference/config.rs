//! Configuration for schema inference

use serde::{Deserialize, Serialize};

use super::rules::InferenceRules;

/// Configuration for schema inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Number of leading items per batch inspected for types and nullability.
    /// Every item still becomes a row.
    pub sample_size: usize,

    /// Attach foreign keys to `<word>_id` columns naming another table
    pub infer_foreign_keys: bool,

    /// Table name used when a path yields no usable segment
    pub default_resource: String,

    /// Heuristic rule tables
    pub rules: InferenceRules,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 10,
            infer_foreign_keys: false,
            default_resource: "records".to_string(),
            rules: InferenceRules::default(),
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }

    /// Sample size with the lower bound applied, for configs built by hand
    /// or deserialized
    pub fn effective_sample_size(&self) -> usize {
        self.sample_size.max(1)
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the number of sampled items per batch (at least 1)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size.max(1);
        self
    }

    /// Enable or disable naming-heuristic foreign keys
    pub fn infer_foreign_keys(mut self, infer: bool) -> Self {
        self.config.infer_foreign_keys = infer;
        self
    }

    /// Set the fallback table name
    pub fn default_resource(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.config.default_resource = name.trim().to_lowercase();
        }
        self
    }

    /// Replace the heuristic rule tables
    pub fn rules(mut self, rules: InferenceRules) -> Self {
        self.config.rules = rules;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
