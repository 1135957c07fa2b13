// Backend resolution: picks the adapter for a solve call
// explicit override > model preference > global setting > fallback

use std::fmt;

use crate::domain::{
    models::LpModel,
    solver_service::{Result, SolverAdapter},
};
use crate::infrastructure::config::GlobalSolverSetting;
use crate::solver::registry::{SolverRegistry, FALLBACK_SOLVER};

/// Where a resolved solver name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    ExplicitOverride,
    ModelPreference,
    GlobalSetting,
    Fallback,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::ExplicitOverride => write!(f, "explicit override"),
            ResolutionSource::ModelPreference => write!(f, "model preference"),
            ResolutionSource::GlobalSetting => write!(f, "global setting"),
            ResolutionSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Resolves solver adapters against a registry and a global setting
#[derive(Clone, Copy)]
pub struct SolverResolver<'a> {
    registry: &'a SolverRegistry,
    global: &'a GlobalSolverSetting,
}

impl<'a> SolverResolver<'a> {
    pub fn new(registry: &'a SolverRegistry, global: &'a GlobalSolverSetting) -> Self {
        Self { registry, global }
    }

    /// Resolver over the process-wide registry and setting
    pub fn process() -> SolverResolver<'static> {
        SolverResolver::new(SolverRegistry::global(), GlobalSolverSetting::global())
    }

    /// Pick the solver name and the source that supplied it
    ///
    /// An explicit override or model preference is returned as given, registered or not;
    /// only the global setting is replaced by the fallback when it names an unknown backend.
    pub fn resolve_name(
        &self,
        model: Option<&LpModel>,
        explicit_override: Option<&str>,
    ) -> (String, ResolutionSource) {
        if let Some(name) = explicit_override.map(str::trim).filter(|n| !n.is_empty()) {
            return (name.to_string(), ResolutionSource::ExplicitOverride);
        }

        if let Some(name) = model
            .and_then(LpModel::preferred_solver)
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            return (name.to_string(), ResolutionSource::ModelPreference);
        }

        let global = self.global.get();
        if self.registry.has(&global) {
            return (global, ResolutionSource::GlobalSetting);
        }

        tracing::warn!(
            solver = %global,
            fallback = FALLBACK_SOLVER,
            "global solver is not registered, using fallback"
        );
        (FALLBACK_SOLVER.to_string(), ResolutionSource::Fallback)
    }

    /// Create the adapter for a solve call
    ///
    /// Fails with `UnknownBackend` when an explicit override or model preference names an
    /// unregistered backend, or when even the fallback is missing from the registry.
    pub fn resolve(
        &self,
        model: Option<&LpModel>,
        explicit_override: Option<&str>,
    ) -> Result<Box<dyn SolverAdapter>> {
        let (name, source) = self.resolve_name(model, explicit_override);
        tracing::debug!(solver = %name, %source, "resolved solver");
        self.registry.create(&name)
    }
}

/// Resolve an adapter using the process-wide registry and global setting
pub fn resolve(
    model: Option<&LpModel>,
    explicit_override: Option<&str>,
) -> Result<Box<dyn SolverAdapter>> {
    SolverResolver::process().resolve(model, explicit_override)
}
