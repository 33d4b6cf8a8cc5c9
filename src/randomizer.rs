//! Sequence Randomizer
//!
//! Rejection sampling over permutations of a label multiset. Each attempt draws
//! an unbiased shuffle of the input and scans it left to right; the first
//! candidate whose runs all stay within their caps is accepted. The search is
//! bounded by an explicit attempt budget and never touches the caller's input.

use crate::constraint::RunConstraint;
use crate::error::SearchError;
use crate::types::{Label, Sequence};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Accepted candidate together with the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub sequence: Sequence,
    pub attempts: usize,
}

/// Position of the first run-length violation in `sequence`, if any.
///
/// The run counter is reset whenever a label differs from its predecessor, so
/// the length checked at position `i` is the run ending at `i`.
pub fn first_violation(sequence: &[Label], constraints: &RunConstraint) -> Option<usize> {
    let mut run_length = 0usize;
    for (i, label) in sequence.iter().enumerate() {
        if i > 0 && sequence[i - 1] == *label {
            run_length += 1;
        } else {
            run_length = 1;
        }
        if let Some(cap) = constraints.cap(label) {
            if run_length > cap {
                return Some(i);
            }
        }
    }
    None
}

/// Whether every run in `sequence` stays within its label's cap.
pub fn satisfies(sequence: &[Label], constraints: &RunConstraint) -> bool {
    first_violation(sequence, constraints).is_none()
}

/// Longest consecutive run per label, in first-appearance order.
pub fn longest_runs(sequence: &[Label]) -> Vec<(Label, usize)> {
    let mut order: Vec<Label> = Vec::new();
    let mut longest: HashMap<&Label, usize> = HashMap::new();
    let mut run_length = 0usize;
    for (i, label) in sequence.iter().enumerate() {
        if i > 0 && sequence[i - 1] == *label {
            run_length += 1;
        } else {
            run_length = 1;
        }
        let entry = longest.entry(label).or_insert_with(|| {
            order.push(label.clone());
            0
        });
        *entry = (*entry).max(run_length);
    }
    order
        .into_iter()
        .map(|label| {
            let run = longest.get(&label).copied().unwrap_or(0);
            (label, run)
        })
        .collect()
}

/// Unconstrained shuffle: a new, uniformly permuted copy of `sequence`.
pub fn shuffle<R: Rng + ?Sized>(sequence: &[Label], rng: &mut R) -> Sequence {
    let mut candidate = sequence.to_vec();
    candidate.shuffle(rng);
    candidate
}

/// Find a permutation of `sequence` satisfying `constraints`.
///
/// Fails with [`SearchError::IterationBudgetExceeded`] after `max_iterations`
/// rejected candidates. A zero budget fails without drawing.
pub fn randomize<R: Rng + ?Sized>(
    sequence: &[Label],
    constraints: &RunConstraint,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Sequence, SearchError> {
    randomize_with_report(sequence, constraints, max_iterations, rng).map(|a| a.sequence)
}

/// As [`randomize`], also reporting how many candidates were drawn.
pub fn randomize_with_report<R: Rng + ?Sized>(
    sequence: &[Label],
    constraints: &RunConstraint,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Accepted, SearchError> {
    let mut candidate = sequence.to_vec();
    let mut best: Option<(usize, Sequence)> = None;

    for attempt in 1..=max_iterations {
        candidate.shuffle(rng);

        match first_violation(&candidate, constraints) {
            None => {
                debug!(attempts = attempt, trials = candidate.len(), "Found valid order");
                return Ok(Accepted {
                    sequence: candidate,
                    attempts: attempt,
                });
            }
            Some(position) => {
                trace!(attempt, position, "Rejected candidate");
                if best.as_ref().map_or(true, |(reached, _)| position > *reached) {
                    best = Some((position, candidate.clone()));
                }
            }
        }
    }

    debug!(
        attempts = max_iterations,
        trials = sequence.len(),
        "Iteration budget exhausted"
    );
    Err(SearchError::IterationBudgetExceeded {
        attempts: max_iterations,
        block: None,
        best: best.map(|(_, candidate)| candidate),
    })
}
