//! Shared test utilities for integration tests
//!
//! Serializes access to the process environment so config-loading tests can point
//! HOME and XDG_CONFIG_HOME at a temp dir without racing each other.

use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const TRACKED: [&str; 5] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "TRIALSEQ_ENV",
    "TRIALSEQ__SEARCH__MAX_ITERATIONS",
    "TRIALSEQ__SEARCH__SEED",
];

/// Environment variable state to restore after test
struct EnvState {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            saved: TRACKED
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.saved {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME inside `temp_dir` and no TRIALSEQ overrides.
///
/// Passes the isolated config home (`<temp>/config`) to the closure; the global
/// config file lives at `<config home>/trialseq/config.toml`.
pub fn with_isolated_config<F, R>(temp_dir: &TempDir, f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let state = EnvState::capture();

    let home = temp_dir.path().join("home");
    let config_home = temp_dir.path().join("config");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&config_home).unwrap();

    for name in TRACKED.iter().skip(2) {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&config_home)));
    state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
