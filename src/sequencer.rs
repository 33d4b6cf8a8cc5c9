//! Sequencer facade: build a design's structure and randomize it in one call.

use crate::config::SearchConfig;
use crate::constraint::{BoundaryConstraint, RunConstraint};
use crate::error::ApiError;
use crate::orchestrator::randomize_blocks;
use crate::randomizer::randomize;
use crate::structure::{build_structure, Design, Structure};
use crate::types::{Label, Sequence};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

/// Randomized trial plan and the seed that reproduces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub seed: u64,
    pub structure: Structure,
}

/// Owns the search settings and a seeded generator.
///
/// Successive calls advance the same generator, so a sequencer built with a
/// fixed seed replays the same series of results.
pub struct Sequencer {
    config: SearchConfig,
    seed: u64,
    rng: ChaCha8Rng,
}

impl Sequencer {
    /// Create a sequencer. Without a configured seed one is drawn from entropy
    /// and logged so the run can be reproduced.
    pub fn new(config: SearchConfig) -> Self {
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!(seed, "No seed configured; drew one from entropy");
                seed
            }
        };
        Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Randomize one sequence under the configured single-sequence budget.
    pub fn randomize(
        &mut self,
        sequence: &[Label],
        constraints: &RunConstraint,
    ) -> Result<Sequence, ApiError> {
        Ok(randomize(
            sequence,
            constraints,
            self.config.max_iterations,
            &mut self.rng,
        )?)
    }

    /// Build `design` into `block_count` blocks and randomize each block.
    ///
    /// The result keeps the builder's shape: flat for one block, blocked otherwise.
    pub fn plan(
        &mut self,
        design: &Design,
        block_count: usize,
        constraints: &RunConstraint,
        boundary: &BoundaryConstraint,
    ) -> Result<Plan, ApiError> {
        let structure = build_structure(design, block_count)?;
        let flat = matches!(structure, Structure::Flat(_));
        let blocks = structure.into_blocks();

        let randomized = randomize_blocks(
            &blocks,
            constraints,
            boundary,
            self.config.max_iterations_per_block,
            &mut self.rng,
        )?;

        info!(
            seed = self.seed,
            blocks = randomized.len(),
            trials = randomized.iter().map(Vec::len).sum::<usize>(),
            "Trial plan ready"
        );
        Ok(Plan {
            seed: self.seed,
            structure: Structure::from_blocks(randomized, flat),
        })
    }
}
