// Domain service interface for solving linear programs
// Defines the contract every backend adapter follows, plus the crate-wide error type

use super::models::LpModel;
use super::solution::Solution;
use super::value_objects::EntityKind;

/// Error types for model construction, validation and backend selection
///
/// Numeric solve failures (infeasible, unbounded, iteration limit) are not errors:
/// they come back as a [`Solution`] with `feasible == false`.
#[derive(Debug, thiserror::Error)]
pub enum LpError {
    #[error("{kind} name already exists: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown solver: '{name}' (known: {})", known.join(", "))]
    UnknownBackend { name: String, known: Vec<String> },
}

pub type Result<T> = std::result::Result<T, LpError>;

/// Contract implemented by every solver backend
///
/// Adapters are created fresh by the registry and hold no state between calls, so a
/// single instance may be shared across threads.
pub trait SolverAdapter: Send + Sync {
    /// Solve `model`, building it first if it is not built yet
    ///
    /// Fails only on contract violations (see [`SolverAdapter::validate`]); any failure of
    /// the underlying numeric solve is reported as an infeasible [`Solution`].
    fn solve(&self, model: &mut LpModel) -> Result<Solution>;

    /// Check that every name referenced by the constraints and the objective is a model variable
    fn validate(&self, model: &LpModel) -> Result<()> {
        let mut errors = Vec::new();

        for constraint in model.constraints() {
            for name in constraint.coefficients().keys() {
                if !model.has_variable(name) {
                    errors.push(format!(
                        "constraint '{}' references unknown variable '{}'",
                        constraint.name(),
                        name
                    ));
                }
            }
        }

        for name in model.objective_coefficients().keys() {
            if !model.has_variable(name) {
                errors.push(format!("objective references unknown variable '{}'", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LpError::InvalidModel(errors.join("; ")))
        }
    }

    /// Canonical registry name of this backend
    fn name(&self) -> &str;
}
