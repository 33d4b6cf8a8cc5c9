//! Property-based tests for multiset, run-length and boundary invariants

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use trialseq::randomizer::{longest_runs, randomize_with_report, satisfies};
use trialseq::structure::truncations;
use trialseq::{
    build_structure, randomize_blocks, validate_constraints, BoundaryConstraint, Design, Label,
    RunConstraint, SearchError, Sequence,
};

fn tally(seq: &[Label]) -> HashMap<Label, usize> {
    let mut counts = HashMap::new();
    for label in seq {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    counts
}

/// Small label alphabets keep collisions (and therefore runs) frequent.
fn sequence_strategy() -> impl Strategy<Value = Sequence> {
    prop::collection::vec(0u64..4, 0..24).prop_map(|v| v.into_iter().map(Label::Index).collect())
}

fn caps_strategy() -> impl Strategy<Value = Vec<(u64, i64)>> {
    prop::collection::vec((0u64..4, 1i64..4), 0..4)
}

proptest! {
    /// Every built block holds floor(count / blocks) of each label
    #[test]
    fn prop_structure_conserves_floored_counts(
        counts in prop::collection::vec(0usize..40, 1..5),
        blocks in 1usize..6,
    ) {
        let design = Design::counts(
            counts.iter().enumerate().map(|(i, c)| (Label::Index(i as u64), *c)),
        ).unwrap();
        let structure = build_structure(&design, blocks).unwrap();
        let built = structure.clone().into_blocks();
        prop_assert_eq!(built.len(), blocks);

        for block in &built {
            let t = tally(block);
            for (i, count) in counts.iter().enumerate() {
                let per_block = count / blocks;
                prop_assert_eq!(t.get(&Label::Index(i as u64)).copied().unwrap_or(0), per_block);
            }
        }

        let dropped: usize = truncations(&design, blocks).unwrap().iter().map(|t| t.dropped).sum();
        prop_assert_eq!(structure.len() + dropped, design.total().unwrap());
    }

    /// Accepted results are permutations whose runs respect every cap
    #[test]
    fn prop_accepted_results_hold_invariants(
        input in sequence_strategy(),
        caps in caps_strategy(),
        seed in any::<u64>(),
    ) {
        let constraints = validate_constraints(caps.iter().map(|(l, c)| (Label::Index(*l), *c))).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        match randomize_with_report(&input, &constraints, 200, &mut rng) {
            Ok(accepted) => {
                prop_assert_eq!(tally(&accepted.sequence), tally(&input));
                prop_assert!(satisfies(&accepted.sequence, &constraints));
                for (label, run) in longest_runs(&accepted.sequence) {
                    if let Some(cap) = constraints.cap(&label) {
                        prop_assert!(run <= cap);
                    }
                }
                prop_assert!(accepted.attempts >= 1 && accepted.attempts <= 200);
            }
            Err(SearchError::IterationBudgetExceeded { attempts, best, .. }) => {
                prop_assert_eq!(attempts, 200);
                if let Some(best) = best {
                    prop_assert_eq!(tally(&best), tally(&input));
                }
            }
        }
    }

    /// Accepted blocks respect boundaries and come back in input order
    #[test]
    fn prop_blocks_respect_boundaries(
        blocks in prop::collection::vec(sequence_strategy(), 1..4),
        seed in any::<u64>(),
    ) {
        let boundary = BoundaryConstraint::new([Label::Index(0)], [Label::Index(1)]);
        let constraints = RunConstraint::unconstrained();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        if let Ok(result) = randomize_blocks(&blocks, &constraints, &boundary, 300, &mut rng) {
            prop_assert_eq!(result.len(), blocks.len());
            for (input, output) in blocks.iter().zip(&result) {
                prop_assert_eq!(tally(input), tally(output));
                prop_assert!(boundary.permits(output));
            }
        }
    }
}
