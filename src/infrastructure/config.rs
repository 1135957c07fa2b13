//! Sources of the process-wide solver choice.
//!
//! The global solver name is resolved once, on first use, from (in order):
//!
//! 1. a value already set through [`GlobalSolverSetting::set`]
//! 2. the `LPDISPATCH_SOLVER` environment variable
//! 3. the `solver` entry of `$HOME/.lpdispatch/config.properties`
//! 4. [`FALLBACK_SOLVER`]
//!
//! After that the cached value only changes through [`GlobalSolverSetting::set`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::solver::registry::FALLBACK_SOLVER;

/// Environment variable naming the solver
pub const SOLVER_ENV: &str = "LPDISPATCH_SOLVER";

/// User config file, relative to the home directory
pub const CONFIG_FILE: &str = ".lpdispatch/config.properties";

/// Key read from the user config file
pub const CONFIG_KEY: &str = "solver";

static GLOBAL_SETTING: LazyLock<GlobalSolverSetting> = LazyLock::new(GlobalSolverSetting::new);

/// Snapshot of the external places a solver name can come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingSources {
    /// Value of the environment setting, if set
    pub environment: Option<String>,
    /// User config file to consult, if any
    pub config_file: Option<PathBuf>,
}

impl SettingSources {
    /// Read the real environment and locate the user config file under the home directory
    pub fn from_process() -> Self {
        Self {
            environment: std::env::var(SOLVER_ENV).ok(),
            config_file: dirs::home_dir().map(|home| home.join(CONFIG_FILE)),
        }
    }

    /// First non-empty name from the environment, then the config file, then the fallback
    pub fn resolve(&self) -> String {
        if let Some(name) = non_empty(self.environment.as_deref()) {
            tracing::debug!(solver = %name, source = SOLVER_ENV, "global solver from environment");
            return name;
        }

        if let Some(path) = &self.config_file {
            if let Some(name) = read_solver_entry(path) {
                tracing::debug!(solver = %name, path = %path.display(), "global solver from config file");
                return name;
            }
        }

        tracing::debug!(solver = FALLBACK_SOLVER, "global solver falls back to default");
        FALLBACK_SOLVER.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read the `solver` entry of a properties file; unreadable files count as absent
pub fn read_solver_entry(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_property(&content, CONFIG_KEY),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "ignoring unreadable config file");
            None
        }
    }
}

/// Look up `key` in properties-style text
///
/// Lines starting with `#` or `!` are comments; `=` or `:` separate key and value.
/// The last occurrence of a key wins. Empty values count as absent.
pub fn parse_property(content: &str, key: &str) -> Option<String> {
    let mut found = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(|c| c == '=' || c == ':') else {
            continue;
        };
        if line[..split].trim() == key {
            found = non_empty(Some(&line[split + 1..]));
        }
    }
    found
}

/// Lazily resolved, process-wide solver name
///
/// The first [`GlobalSolverSetting::get`] resolves the name from its sources and caches
/// it; concurrent first callers are serialized so the sources are read at most once.
pub struct GlobalSolverSetting {
    cached: RwLock<Option<String>>,
    sources: Option<SettingSources>,
}

impl GlobalSolverSetting {
    /// Setting that reads the real process environment on first use
    pub fn new() -> Self {
        Self {
            cached: RwLock::new(None),
            sources: None,
        }
    }

    /// Setting that resolves from a fixed snapshot instead of the process environment
    pub fn with_sources(sources: SettingSources) -> Self {
        Self {
            cached: RwLock::new(None),
            sources: Some(sources),
        }
    }

    /// The process-wide setting
    pub fn global() -> &'static GlobalSolverSetting {
        &GLOBAL_SETTING
    }

    pub fn get(&self) -> String {
        if let Some(name) = self.cached.read().as_ref() {
            return name.clone();
        }

        let mut cached = self.cached.write();
        if let Some(name) = cached.as_ref() {
            return name.clone();
        }
        let name = match &self.sources {
            Some(sources) => sources.resolve(),
            None => SettingSources::from_process().resolve(),
        };
        *cached = Some(name.clone());
        name
    }

    /// Replace the cached name; takes priority over every external source
    pub fn set(&self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(solver = %name, "global solver set explicitly");
        *self.cached.write() = Some(name);
    }
}

impl Default for GlobalSolverSetting {
    fn default() -> Self {
        Self::new()
    }
}

/// Set the process-wide solver name
pub fn set_global_solver(name: impl Into<String>) {
    GlobalSolverSetting::global().set(name);
}

/// The process-wide solver name, resolving it on first use
pub fn global_solver() -> String {
    GlobalSolverSetting::global().get()
}
