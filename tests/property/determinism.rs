//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trialseq::config::SearchConfig;
use trialseq::{
    randomize, randomize_blocks, randomize_blocks_seeded, BoundaryConstraint, Design, Label,
    RunConstraint, Sequencer,
};

/// Same seed and inputs give the same randomize result
#[test]
fn test_randomize_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0u64..3, 1..30), any::<u64>()),
            |(raw, seed)| {
                let input: Vec<Label> = raw.into_iter().map(Label::Index).collect();
                let constraints = RunConstraint::uniform(3).unwrap();

                let mut rng1 = ChaCha8Rng::seed_from_u64(seed);
                let mut rng2 = ChaCha8Rng::seed_from_u64(seed);
                let a = randomize(&input, &constraints, 100, &mut rng1);
                let b = randomize(&input, &constraints, 100, &mut rng2);

                // Same seed should produce the same outcome, success or failure
                assert_eq!(a, b);
                Ok(())
            },
        )
        .unwrap();
}

/// Same seed gives the same blocks from both the shared and per-block generators
#[test]
fn test_block_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(prop::collection::vec(0u64..3, 1..12), 1..4),
                any::<u64>(),
            ),
            |(raw, seed)| {
                let blocks: Vec<Vec<Label>> = raw
                    .into_iter()
                    .map(|b| b.into_iter().map(Label::Index).collect())
                    .collect();
                let constraints = RunConstraint::unconstrained();
                let boundary = BoundaryConstraint::none();

                let mut rng1 = ChaCha8Rng::seed_from_u64(seed);
                let mut rng2 = ChaCha8Rng::seed_from_u64(seed);
                assert_eq!(
                    randomize_blocks(&blocks, &constraints, &boundary, 10, &mut rng1),
                    randomize_blocks(&blocks, &constraints, &boundary, 10, &mut rng2)
                );
                assert_eq!(
                    randomize_blocks_seeded(&blocks, &constraints, &boundary, 10, seed),
                    randomize_blocks_seeded(&blocks, &constraints, &boundary, 10, seed)
                );
                Ok(())
            },
        )
        .unwrap();
}

/// Two sequencers with the same seed replay the same series of plans
#[test]
fn test_sequencer_replays_series() {
    let config = SearchConfig {
        seed: Some(314),
        ..SearchConfig::default()
    };
    let design = Design::from_pair(&[3, 8]).unwrap();
    let constraints = RunConstraint::uniform(2).unwrap();
    let boundary = BoundaryConstraint::none();

    let mut first = Sequencer::new(config.clone());
    let mut second = Sequencer::new(config);
    for _ in 0..3 {
        assert_eq!(
            first.plan(&design, 2, &constraints, &boundary).unwrap(),
            second.plan(&design, 2, &constraints, &boundary).unwrap()
        );
    }
}
