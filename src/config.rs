//! Store location and search limits.

use std::{env, path::PathBuf, time::Duration};

/// Directory used when none is configured.
pub const DEFAULT_GRAPHS_DIR: &str = "graphs";

pub const GRAPHS_DIR_VAR: &str = "GRAPHSTORE_DIR";
pub const HAMILTONIAN_TIMEOUT_VAR: &str = "GRAPHSTORE_HAMILTONIAN_TIMEOUT_MS";
pub const COMPACT_JSON_VAR: &str = "GRAPHSTORE_COMPACT_JSON";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding one `<name>.json` file per graph.
    pub graphs_dir: PathBuf,
    /// Time after which a Hamiltonian search gives up.  `None` searches
    /// until the search space is exhausted.
    pub hamiltonian_timeout: Option<Duration>,
    /// Whether records are written as indented JSON.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphs_dir: PathBuf::from(DEFAULT_GRAPHS_DIR),
            hamiltonian_timeout: None,
            pretty: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the environment, falling back to the
    /// defaults for unset variables.  A timeout that is not a whole number of
    /// milliseconds is ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(dir) = lookup(GRAPHS_DIR_VAR).filter(|dir| !dir.is_empty()) {
            config.graphs_dir = PathBuf::from(dir);
        }
        if let Some(millis) = lookup(HAMILTONIAN_TIMEOUT_VAR) {
            match millis.trim().parse::<u64>() {
                Ok(millis) => config.hamiltonian_timeout = Some(Duration::from_millis(millis)),
                Err(err) => tracing::warn!(value = %millis, %err, "ignoring invalid {HAMILTONIAN_TIMEOUT_VAR}"),
            }
        }
        if let Some(compact) = lookup(COMPACT_JSON_VAR) {
            config.pretty = !matches!(compact.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }

    pub fn with_graphs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.graphs_dir = dir.into();
        self
    }

    pub fn with_hamiltonian_timeout(mut self, timeout: Duration) -> Self {
        self.hamiltonian_timeout = Some(timeout);
        self
    }
}
