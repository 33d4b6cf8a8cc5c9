//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SearchError};
use crate::types::Label;

/// Map domain/service errors to a string for CLI output.
///
/// Budget failures also show the most nearly valid candidate, which usually
/// points at the label whose constraint is too tight.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Search(SearchError::IterationBudgetExceeded {
            best: Some(best), ..
        }) => {
            let nearest: Vec<String> = best.iter().map(Label::to_string).collect();
            format!("{}\nNearest candidate: {}", e, nearest.join(" "))
        }
        _ => e.to_string(),
    }
}
