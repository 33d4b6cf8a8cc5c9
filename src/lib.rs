//! trialseq: Constrained Trial Sequencing
//!
//! Designs trial orders for behavioral experiments. A design (condition counts)
//! is expanded into blocks, and each block is pseudorandomized so that no
//! condition repeats more often in a row than its cap allows and no block starts
//! or ends with a forbidden condition. All randomness comes from a caller-owned
//! generator, so a fixed seed always reproduces the same sequence.

pub mod cli;
pub mod config;
pub mod constraint;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod randomizer;
pub mod sequencer;
pub mod structure;
pub mod types;

pub use constraint::{validate_constraints, BoundaryConstraint, RunConstraint};
pub use error::{ApiError, ConstraintError, DesignError, SearchError};
pub use orchestrator::{randomize_blocks, randomize_blocks_seeded};
pub use randomizer::{randomize, shuffle};
pub use sequencer::{Plan, Sequencer};
pub use structure::{build_structure, Design, Structure};
pub use types::{Blocks, Label, Sequence};
