//! CLI parse: clap types for trialseq. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// trialseq CLI - constrained pseudorandom trial sequencing
#[derive(Parser)]
#[command(name = "trialseq")]
#[command(about = "Design pseudorandomized trial sequences for behavioral experiments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory searched for trialseq.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand a design into its grouped (unshuffled) trial structure
    Build {
        /// Design: NxM, label=count,... or a JSON literal
        #[arg(long)]
        design: String,

        /// Number of blocks to split the design into
        #[arg(long, default_value_t = 1)]
        blocks: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Build a design and randomize it under run-length and boundary constraints
    Randomize {
        /// Design: NxM, label=count,... or a JSON literal
        #[arg(long)]
        design: String,

        /// Number of blocks to split the design into
        #[arg(long, default_value_t = 1)]
        blocks: usize,

        /// Maximum consecutive repeats for one label (LABEL=N, repeatable)
        #[arg(long = "constraint", value_name = "LABEL=N")]
        constraints: Vec<String>,

        /// Maximum consecutive repeats for every label without an explicit constraint
        #[arg(long)]
        max_run: Option<usize>,

        /// Labels that may not start a block
        #[arg(long, value_delimiter = ',')]
        never_start: Vec<String>,

        /// Labels that may not end a block
        #[arg(long, value_delimiter = ',')]
        never_end: Vec<String>,

        /// Generator seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Attempt budget per block (overrides config)
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}
