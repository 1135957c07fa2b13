// HiGHS Solver Adapter
// Native column bounds, ranged rows (equalities as level rows) and native sense

use crate::domain::{
    models::LpModel,
    solution::Solution,
    solver_service::{Result, SolverAdapter},
    value_objects::Relation,
};
use crate::solver::{
    lowering::{BackendCapabilities, LoweredProblem, Sense},
    registry::HIGHS,
    solve_with, BackendOutcome, MAX_ITERATIONS,
};
use highs::{HighsModelStatus, RowProblem, Sense as HighsSense};

const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    native_bounds: true,
    native_equality: true,
    native_maximize: true,
};

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for HighsSolver {
    fn solve(&self, model: &mut LpModel) -> Result<Solution> {
        // Validate first
        self.validate(model)?;
        solve_with(self.name(), CAPABILITIES, model, run_highs)
    }

    fn name(&self) -> &str {
        HIGHS
    }
}

fn run_highs(lowered: &LoweredProblem) -> BackendOutcome {
    // Use HiGHS RowProblem (add columns first, then rows)
    let mut pb = RowProblem::default();

    let cols: Vec<_> = lowered
        .objective
        .iter()
        .zip(&lowered.bounds)
        .map(|(&coeff, &(lower, upper))| pb.add_column(coeff, lower..=upper))
        .collect();

    for row in &lowered.rows {
        let (lower, upper) = match row.relation {
            Relation::Leq => (f64::NEG_INFINITY, row.rhs),
            Relation::Geq => (row.rhs, f64::INFINITY),
            Relation::Eq => (row.rhs, row.rhs),
        };
        let factors: Vec<_> = row
            .terms
            .iter()
            .map(|&(column, coeff)| (cols[column], coeff))
            .collect();
        pb.add_row(lower..=upper, &factors);
    }

    let sense = match lowered.sense {
        Sense::Minimise => HighsSense::Minimise,
        Sense::Maximise => HighsSense::Maximise,
    };

    let mut model = pb.optimise(sense);
    model.make_quiet();
    model.set_option("simplex_iteration_limit", MAX_ITERATIONS as i32);
    model.set_option("ipm_iteration_limit", MAX_ITERATIONS as i32);

    let solved = match model.try_solve() {
        Ok(solved) => solved,
        Err(status) => {
            tracing::warn!(?status, "HiGHS rejected the model");
            return BackendOutcome::Failed {
                reason: format!("HiGHS returned status: {:?}", status),
            };
        }
    };

    match solved.status() {
        HighsModelStatus::Optimal => BackendOutcome::Solved {
            values: solved.get_solution().columns().to_vec(),
            reported_objective: Some(solved.objective_value()),
        },
        status => BackendOutcome::Failed {
            reason: format!("HiGHS model status: {:?}", status),
        },
    }
}
