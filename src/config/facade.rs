//! Config loader: assembles sources in precedence order and validates the result.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::TrialseqConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`TrialseqConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace files, env.
    pub fn load(workspace_root: &Path) -> Result<TrialseqConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config: TrialseqConfig = builder
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()?;

        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Self::validated(config)
    }

    /// Load configuration from one explicit file (plus defaults and env).
    pub fn load_from_file(path: &Path) -> Result<TrialseqConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config: TrialseqConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .add_source(merge_policy::environment())
            .build()?
            .try_deserialize()?;

        debug!(config_path = %path.display(), "Configuration loaded from file");
        Self::validated(config)
    }

    /// Global config file location, if one can be determined.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn validated(config: TrialseqConfig) -> Result<TrialseqConfig, ApiError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
