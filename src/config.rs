//! Configuration System
//!
//! Layered configuration for search budgets, seeding and logging. Sources in
//! increasing precedence: built-in defaults, the global config file, the
//! workspace `trialseq.toml`, then `TRIALSEQ__*` environment variables.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialseqConfig {
    /// Randomization search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Randomization search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Attempt budget for a single sequence
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Attempt budget for each block, shared by run and boundary rejects
    #[serde(default = "default_max_iterations")]
    pub max_iterations_per_block: usize,

    /// Generator seed; fresh entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_iterations() -> usize {
    1000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_iterations_per_block: default_max_iterations(),
            seed: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Search(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Search(msg) => write!(f, "search: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1".to_string());
        }
        if self.max_iterations_per_block == 0 {
            return Err("max_iterations_per_block must be at least 1".to_string());
        }
        Ok(())
    }
}

impl TrialseqConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.search.validate() {
            errors.push(ValidationError::Search(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
