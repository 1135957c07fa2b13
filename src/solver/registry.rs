use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::domain::solver_service::{LpError, Result, SolverAdapter};
use crate::solver::MicrolpSolver;

#[cfg(feature = "highs")]
use crate::solver::HighsSolver;

/// Canonical name of the pure-Rust microlp backend
pub const MICROLP: &str = "microlp";

/// Canonical name of the HiGHS backend
pub const HIGHS: &str = "highs";

/// Backend used when nothing else is configured or the configured name is unknown
pub const FALLBACK_SOLVER: &str = MICROLP;

/// Zero-argument constructor producing a fresh adapter
pub type SolverConstructor = Arc<dyn Fn() -> Box<dyn SolverAdapter> + Send + Sync>;

static GLOBAL_REGISTRY: LazyLock<SolverRegistry> = LazyLock::new(SolverRegistry::with_builtins);

/// Name → constructor table for solver backends
///
/// Names are trimmed and compared case-insensitively. Registration overwrites silently
/// and there is no removal. The table is safe to register into and look up from
/// several threads at once.
pub struct SolverRegistry {
    constructors: RwLock<BTreeMap<String, SolverConstructor>>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl SolverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            constructors: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a registry holding the compiled-in backends and their aliases
    pub fn with_builtins() -> Self {
        let registry = Self::new();

        registry.register(MICROLP, || Box::new(MicrolpSolver::new()));
        #[cfg(feature = "highs")]
        registry.register(HIGHS, || Box::new(HighsSolver::new()));

        // Aliases always point at registered names, so these cannot fail
        let aliases: &[(&str, &str)] = &[
            ("simplex", MICROLP),
            ("minilp", MICROLP),
            #[cfg(feature = "highs")]
            ("hi", HIGHS),
        ];
        for (alias, canonical) in aliases {
            if let Err(e) = registry.register_alias(alias, canonical) {
                tracing::warn!(error = %e, "failed to register built-in alias");
            }
        }

        registry
    }

    /// The process-wide registry, created with the built-in backends on first use
    pub fn global() -> &'static SolverRegistry {
        &GLOBAL_REGISTRY
    }

    pub fn register<F>(&self, name: &str, constructor: F)
    where
        F: Fn() -> Box<dyn SolverAdapter> + Send + Sync + 'static,
    {
        let key = normalize(name);
        tracing::debug!(solver = %key, "registering solver");
        self.constructors.write().insert(key, Arc::new(constructor));
    }

    /// Make `alias` create the same backend as the already registered `canonical`
    pub fn register_alias(&self, alias: &str, canonical: &str) -> Result<()> {
        let mut constructors = self.constructors.write();
        let constructor = constructors
            .get(&normalize(canonical))
            .cloned()
            .ok_or_else(|| LpError::UnknownBackend {
                name: canonical.to_string(),
                known: constructors.keys().cloned().collect(),
            })?;
        constructors.insert(normalize(alias), constructor);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        let key = normalize(name);
        !key.is_empty() && self.constructors.read().contains_key(&key)
    }

    /// Create a fresh adapter for `name`
    pub fn create(&self, name: &str) -> Result<Box<dyn SolverAdapter>> {
        let constructors = self.constructors.read();
        let constructor = constructors
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| LpError::UnknownBackend {
                name: name.to_string(),
                known: constructors.keys().cloned().collect(),
            })?;
        drop(constructors);
        Ok(constructor())
    }

    /// Registered names, aliases included
    pub fn names(&self) -> BTreeSet<String> {
        self.constructors.read().keys().cloned().collect()
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
