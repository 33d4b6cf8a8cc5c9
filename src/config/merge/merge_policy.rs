//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("search.max_iterations", 1000_i64)?
        .set_default("search.max_iterations_per_block", 1000_i64)?
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

/// Environment overrides, highest precedence: TRIALSEQ__SEARCH__MAX_ITERATIONS=5000
pub fn environment() -> Environment {
    Environment::with_prefix("TRIALSEQ")
        .separator("__")
        .try_parsing(true)
}
