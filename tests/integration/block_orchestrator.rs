//! Integration tests for per-block randomization with boundary rules

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trialseq::randomizer::satisfies;
use trialseq::{
    build_structure, randomize_blocks, randomize_blocks_seeded, validate_constraints,
    BoundaryConstraint, Design, Label, RunConstraint, SearchError,
};

fn oddball_design() -> Design {
    Design::counts([("standard", 20), ("oddball", 2), ("distracter", 2)]).unwrap()
}

/// Blocks never start with oddball/standard and never end with standard
#[test]
fn test_boundary_rules_hold_for_every_block() {
    let blocks = build_structure(&oddball_design(), 2).unwrap().into_blocks();
    let boundary = BoundaryConstraint::new(["oddball", "standard"], ["standard"]);
    let constraints = RunConstraint::unconstrained();

    for seed in 0..5 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = randomize_blocks(&blocks, &constraints, &boundary, 20_000, &mut rng).unwrap();
        assert_eq!(result.len(), 2);
        for block in &result {
            assert_eq!(block.first(), Some(&Label::from("distracter")));
            assert_eq!(block.last(), Some(&Label::from("oddball")));
            assert_eq!(block.len(), 12);
        }
    }
}

/// Run-length and boundary rules together
#[test]
fn test_runs_and_boundaries_combined() {
    let design = Design::from_pair(&[4, 12]).unwrap();
    let blocks = build_structure(&design, 3).unwrap().into_blocks();
    let constraints = RunConstraint::uniform(2).unwrap();
    let boundary = BoundaryConstraint::new([0u32], [3u32]);

    let mut rng = ChaCha8Rng::seed_from_u64(64);
    let result = randomize_blocks(&blocks, &constraints, &boundary, 5000, &mut rng).unwrap();

    for (input, output) in blocks.iter().zip(&result) {
        let mut a = input.iter().map(Label::to_string).collect::<Vec<_>>();
        let mut b = output.iter().map(Label::to_string).collect::<Vec<_>>();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert!(satisfies(output, &constraints));
        assert!(boundary.permits(output));
    }
}

/// The same seed replays the same blocks
#[test]
fn test_blocks_deterministic_for_seed() {
    let blocks = build_structure(&oddball_design(), 2).unwrap().into_blocks();
    let constraints = validate_constraints([("oddball", 1), ("distracter", 1)])
        .unwrap()
        .with_default_cap(4)
        .unwrap();
    let boundary = BoundaryConstraint::new(["oddball"], Vec::<Label>::new());

    let run = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        randomize_blocks(&blocks, &constraints, &boundary, 10_000, &mut rng).unwrap()
    };
    assert_eq!(run(17), run(17));
    assert_eq!(
        randomize_blocks_seeded(&blocks, &constraints, &boundary, 10_000, 17).unwrap(),
        randomize_blocks_seeded(&blocks, &constraints, &boundary, 10_000, 17).unwrap()
    );
}

/// An infeasible block fails with its index; earlier blocks do not matter
#[test]
fn test_infeasible_block_reports_index() {
    let blocks = vec![
        vec![Label::from("a"), Label::from("b")],
        vec![Label::from("b"), Label::from("a")],
        vec![Label::from("a"); 3],
    ];
    let constraints = validate_constraints([("a", 2)]).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = randomize_blocks(
        &blocks,
        &constraints,
        &BoundaryConstraint::none(),
        30,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SearchError::IterationBudgetExceeded {
            attempts: 30,
            block: Some(2),
            best: Some(vec![Label::from("a"); 3]),
        }
    );
}
