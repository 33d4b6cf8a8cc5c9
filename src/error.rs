//! Error types for the trial sequencing engine.

use crate::types::{Label, Sequence};
use thiserror::Error;

/// Structure Builder errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignError {
    #[error("Invalid design: count pair must have exactly 2 elements, got {0}")]
    PairLength(usize),

    #[error("Invalid design: expected a count pair or a label-to-count mapping, got {0}")]
    Shape(String),

    #[error("Invalid design: count for {label} must be a non-negative integer, got {value}")]
    Count { label: String, value: String },

    #[error("Invalid design: label {0} declared more than once")]
    DuplicateLabel(Label),

    #[error("Invalid design: block count must be at least 1")]
    ZeroBlocks,

    #[error("Invalid design: {0} exceeds the number of trials that can be held in memory")]
    TooLarge(String),
}

/// Constraint Model errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("Invalid constraint: max run for {label} must be positive, got {value}")]
    NonPositive { label: Label, value: i64 },

    #[error("Invalid constraint: default max run must be positive")]
    ZeroDefault,

    #[error("Invalid constraint: expected LABEL=N, got '{0}'")]
    Malformed(String),
}

/// Randomization search errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("{}", budget_message(*attempts, *block))]
    IterationBudgetExceeded {
        attempts: usize,
        block: Option<usize>,
        /// Candidate whose scan got furthest before rejection, for diagnostics.
        best: Option<Sequence>,
    },
}

fn budget_message(attempts: usize, block: Option<usize>) -> String {
    match block {
        Some(index) => format!(
            "No valid order for block {} after {} attempts. Relax constraints, raise the iteration budget, or both.",
            index, attempts
        ),
        None => format!(
            "No valid order after {} attempts. Relax constraints, raise the iteration budget, or both.",
            attempts
        ),
    }
}

impl SearchError {
    /// Number of candidates drawn before giving up.
    pub fn attempts(&self) -> usize {
        match self {
            SearchError::IterationBudgetExceeded { attempts, .. } => *attempts,
        }
    }

    /// Attach the failing block index.
    pub fn in_block(self, index: usize) -> Self {
        match self {
            SearchError::IterationBudgetExceeded { attempts, best, .. } => {
                SearchError::IterationBudgetExceeded {
                    attempts,
                    block: Some(index),
                    best,
                }
            }
        }
    }
}

/// Top-level errors surfaced by the facade, config loader and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Output(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Output(err.to_string())
    }
}
