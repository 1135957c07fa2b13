// Solver adapters: concrete implementations of SolverAdapter plus the backend registry

pub mod lowering;
pub mod microlp_solver;
pub mod registry;

#[cfg(feature = "highs")]
pub mod highs_solver;

#[cfg(feature = "highs")]
pub use highs_solver::HighsSolver;
pub use microlp_solver::MicrolpSolver;
pub use registry::{SolverConstructor, SolverRegistry};

use std::time::Instant;

use crate::domain::{
    models::LpModel,
    solution::{SolveStatistics, Solution},
    solver_service::Result,
};
use lowering::{BackendCapabilities, LoweredProblem};

/// Iteration ceiling handed to backends that accept one; exceeding it counts as infeasible
pub const MAX_ITERATIONS: u32 = 10_000;

/// Raw result of running a backend on a lowered problem
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    /// Point in column order, plus the objective the backend reported, if any
    Solved {
        values: Vec<f64>,
        reported_objective: Option<f64>,
    },
    /// Infeasible, unbounded, iteration limit or any other backend failure
    Failed { reason: String },
}

/// Shared adapter pipeline: build, lower, run the backend, raise
///
/// Degenerate models never reach the backend: a violated constant constraint is
/// infeasible and a model without variables is feasible with objective zero.
pub(crate) fn solve_with<F>(
    backend: &str,
    capabilities: BackendCapabilities,
    model: &mut LpModel,
    run: F,
) -> Result<Solution>
where
    F: FnOnce(&LoweredProblem) -> BackendOutcome,
{
    model.build();

    let start_time = Instant::now();
    let lowered = lowering::lower(model, capabilities)?;
    tracing::debug!(
        backend,
        columns = lowered.num_columns(),
        rows = lowered.rows.len(),
        "lowered model"
    );

    let solution = if lowered.trivially_infeasible {
        Solution::infeasible(model)
    } else if lowered.num_columns() == 0 {
        Solution::optimal(model, &[], 0.0)
    } else {
        match run(&lowered) {
            BackendOutcome::Solved {
                values,
                reported_objective,
            } => lowered.raise(model, &values, reported_objective),
            BackendOutcome::Failed { reason } => {
                tracing::debug!(backend, %reason, "no solution");
                Solution::infeasible(model)
            }
        }
    };

    let statistics = SolveStatistics {
        backend: backend.to_string(),
        num_variables: model.num_variables(),
        num_constraints: model.num_constraints(),
        num_rows: lowered.rows.len(),
        solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
    };
    tracing::debug!(
        backend,
        feasible = solution.is_feasible(),
        objective = solution.objective_value(),
        "solve finished"
    );

    Ok(solution.with_statistics(statistics))
}
