//! Block Orchestrator
//!
//! Randomizes each block independently under the shared run-length constraints
//! and additionally enforces boundary rules on every block's first and last trial.
//! A boundary reject retries only the failing block; accepted blocks are kept and
//! the output preserves input block order.
//!
//! Every candidate drawn for a block, whether rejected for a run or for a
//! boundary, consumes one unit of that block's attempt budget.

use crate::constraint::{BoundaryConstraint, RunConstraint};
use crate::error::SearchError;
use crate::randomizer::randomize_with_report;
use crate::types::{Blocks, Label, Sequence};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

/// Randomize every block in order, drawing from one shared generator.
#[instrument(skip_all, fields(blocks = blocks.len(), budget = max_iterations_per_block))]
pub fn randomize_blocks<R: Rng + ?Sized>(
    blocks: &[Sequence],
    constraints: &RunConstraint,
    boundary: &BoundaryConstraint,
    max_iterations_per_block: usize,
    rng: &mut R,
) -> Result<Blocks, SearchError> {
    let mut randomized = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.iter().enumerate() {
        let accepted = randomize_block(block, constraints, boundary, max_iterations_per_block, rng)
            .map_err(|e| {
                warn!(block = index, attempts = e.attempts(), "Block randomization failed");
                e.in_block(index)
            })?;
        randomized.push(accepted);
    }
    info!(blocks = randomized.len(), "All blocks randomized");
    Ok(randomized)
}

/// Randomize every block with its own generator derived from `seed`.
///
/// Block `i` draws only from [`block_rng`]`(seed, i)`, so each block's result is
/// independent of the others and of the order in which blocks are processed.
#[instrument(skip_all, fields(blocks = blocks.len(), seed = seed))]
pub fn randomize_blocks_seeded(
    blocks: &[Sequence],
    constraints: &RunConstraint,
    boundary: &BoundaryConstraint,
    max_iterations_per_block: usize,
    seed: u64,
) -> Result<Blocks, SearchError> {
    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| {
            let mut rng = block_rng(seed, index);
            randomize_block(block, constraints, boundary, max_iterations_per_block, &mut rng)
                .map_err(|e| e.in_block(index))
        })
        .collect()
}

/// Independent generator for block `index`: same seed, stream = block index.
pub fn block_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

fn randomize_block<R: Rng + ?Sized>(
    block: &[Label],
    constraints: &RunConstraint,
    boundary: &BoundaryConstraint,
    budget: usize,
    rng: &mut R,
) -> Result<Sequence, SearchError> {
    let mut used = 0usize;
    let mut best: Option<Sequence> = None;

    while used < budget {
        match randomize_with_report(block, constraints, budget - used, rng) {
            Ok(accepted) => {
                used += accepted.attempts;
                if boundary.permits(&accepted.sequence) {
                    debug!(attempts = used, "Block accepted");
                    return Ok(accepted.sequence);
                }
                best = Some(accepted.sequence);
            }
            Err(SearchError::IterationBudgetExceeded {
                attempts,
                best: nearest,
                ..
            }) => {
                used += attempts;
                // A run-valid candidate that only broke a boundary beats a run violation.
                if best.is_none() {
                    best = nearest;
                }
                break;
            }
        }
    }

    Err(SearchError::IterationBudgetExceeded {
        attempts: used,
        block: None,
        best,
    })
}
