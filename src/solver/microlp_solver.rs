// microlp Solver Adapter (via good_lp)
// Drives the backend through its most primitive form: free columns, bounds as explicit
// rows, equalities as two inequalities, and minimisation only.

use crate::domain::{
    models::LpModel,
    solution::Solution,
    solver_service::{Result, SolverAdapter},
    value_objects::Relation,
};
use crate::solver::{
    lowering::{BackendCapabilities, LoweredProblem, Sense},
    registry::MICROLP,
    solve_with, BackendOutcome,
};
use good_lp::{
    solvers::microlp::microlp, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolverModel, Variable as GoodLpVariable,
};

const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    native_bounds: false,
    native_equality: false,
    native_maximize: false,
};

pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicrolpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for MicrolpSolver {
    fn solve(&self, model: &mut LpModel) -> Result<Solution> {
        // Validate first
        self.validate(model)?;
        solve_with(self.name(), CAPABILITIES, model, run_microlp)
    }

    fn name(&self) -> &str {
        MICROLP
    }
}

fn run_microlp(lowered: &LoweredProblem) -> BackendOutcome {
    // Columns are declared free; finite bounds arrive as rows
    let mut vars = variables!();
    let columns: Vec<GoodLpVariable> = lowered
        .bounds
        .iter()
        .map(|_| vars.add(variable()))
        .collect();

    let objective: Expression = lowered
        .objective
        .iter()
        .zip(&columns)
        .filter(|(coeff, _)| **coeff != 0.0)
        .map(|(&coeff, &var)| coeff * var)
        .sum();

    let unsolved = match lowered.sense {
        Sense::Minimise => vars.minimise(objective),
        Sense::Maximise => vars.maximise(objective),
    };
    let mut lp_model = unsolved.using(microlp);

    for row in &lowered.rows {
        let lhs: Expression = row
            .terms
            .iter()
            .map(|&(column, coeff)| coeff * columns[column])
            .sum();

        let constraint = match row.relation {
            Relation::Leq => lhs.leq(row.rhs),
            Relation::Geq => lhs.geq(row.rhs),
            Relation::Eq => lhs.eq(row.rhs),
        };
        lp_model.add_constraint(constraint);
    }

    match lp_model.solve() {
        Ok(sol) => BackendOutcome::Solved {
            values: columns.iter().map(|&var| sol.value(var)).collect(),
            reported_objective: None,
        },
        Err(ResolutionError::Infeasible) => BackendOutcome::Failed {
            reason: "infeasible".to_string(),
        },
        Err(ResolutionError::Unbounded) => BackendOutcome::Failed {
            reason: "unbounded".to_string(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "microlp failed");
            BackendOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
