//! CLI route: single route table and run context. Dispatches to the library and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_plan, format_structure};
use crate::config::{ConfigLoader, SearchConfig, TrialseqConfig};
use crate::constraint::{parse_constraint, validate_constraints, BoundaryConstraint};
use crate::error::ApiError;
use crate::sequencer::Sequencer;
use crate::structure::{build_structure, truncations, Design};
use crate::types::Label;
use std::path::PathBuf;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: TrialseqConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self {
            workspace_root,
            config,
        })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(workspace = %self.workspace_root.display(), "Executing command");
        match command {
            Commands::Build {
                design,
                blocks,
                format,
            } => {
                let design: Design = design.parse()?;
                let truncated = truncations(&design, *blocks)?;
                let structure = build_structure(&design, *blocks)?;
                format_structure(&structure, &truncated, *format)
            }
            Commands::Randomize {
                design,
                blocks,
                constraints,
                max_run,
                never_start,
                never_end,
                seed,
                max_iterations,
                format,
            } => {
                let design: Design = design.parse()?;

                let pairs = constraints
                    .iter()
                    .map(|c| parse_constraint(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut run_constraint = validate_constraints(pairs)?;
                if let Some(cap) = max_run {
                    run_constraint = run_constraint.with_default_cap(*cap)?;
                }
                debug!(
                    explicit_caps = constraints.len(),
                    default_cap = ?run_constraint.default_cap(),
                    "Run constraints validated"
                );

                let boundary = BoundaryConstraint::new(
                    never_start.iter().map(|l| Label::parse(l)),
                    never_end.iter().map(|l| Label::parse(l)),
                );

                let search = self.search_config(*seed, *max_iterations)?;
                let mut sequencer = Sequencer::new(search);
                let plan = sequencer.plan(&design, *blocks, &run_constraint, &boundary)?;
                info!(seed = plan.seed, "Randomized design");
                format_plan(&plan, *format)
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::Output(e.to_string())),
        }
    }

    /// Configured search settings with command-line overrides applied.
    fn search_config(
        &self,
        seed: Option<u64>,
        max_iterations: Option<usize>,
    ) -> Result<SearchConfig, ApiError> {
        let mut search = self.config.search.clone();
        if seed.is_some() {
            search.seed = seed;
        }
        if let Some(budget) = max_iterations {
            search.max_iterations = budget;
            search.max_iterations_per_block = budget;
        }
        search.validate().map_err(ApiError::ConfigError)?;
        Ok(search)
    }
}
