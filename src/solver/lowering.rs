// Lowering: LpModel -> the primitive objective, bounds and rows a backend consumes
// Raising: the backend's raw point -> a Solution keyed by variable name

use crate::domain::{
    models::LpModel,
    solution::Solution,
    solver_service::{LpError, Result},
    value_objects::{OptimizationDirection, Relation},
};

/// Tolerance used to evaluate constant rows and to compare reported objective values
pub const FEASIBILITY_TOLERANCE: f64 = 1e-9;

const OBJECTIVE_MISMATCH_TOLERANCE: f64 = 1e-6;

/// What a backend can express natively; everything else is rewritten during lowering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Column bounds; otherwise columns are free and finite bounds become rows
    pub native_bounds: bool,
    /// Equality rows; otherwise each equality becomes a `<=` and a `>=` row
    pub native_equality: bool,
    /// Maximization; otherwise a maximized objective is negated and minimized
    pub native_maximize: bool,
}

/// Sense the backend is asked to optimise in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimise,
    Maximise,
}

/// Where a lowered row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Model constraint at this index
    Constraint(usize),
    /// Lower bound of the variable at this index
    LowerBound(usize),
    /// Upper bound of the variable at this index
    UpperBound(usize),
}

/// One primitive row: `Σ coefficient * column  relation  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredRow {
    /// `(column, coefficient)` pairs, zero coefficients omitted
    pub terms: Vec<(usize, f64)>,
    pub relation: Relation,
    pub rhs: f64,
    pub origin: RowOrigin,
}

/// A model translated into column/row form for one backend
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredProblem {
    /// Dense objective handed to the backend (negated when `objective_negated`)
    pub objective: Vec<f64>,
    /// Dense objective as declared on the model, used for raising
    pub declared_objective: Vec<f64>,
    pub sense: Sense,
    pub objective_negated: bool,
    /// Native `(lower, upper)` bounds per column
    pub bounds: Vec<(f64, f64)>,
    pub rows: Vec<LoweredRow>,
    /// A constraint without terms whose constant `0 relation rhs` does not hold
    pub trivially_infeasible: bool,
}

/// Translate `model` for a backend with the given capabilities
///
/// Every name referenced by a constraint or by the objective must be a model variable.
pub fn lower(model: &LpModel, capabilities: BackendCapabilities) -> Result<LoweredProblem> {
    let num_columns = model.num_variables();

    let mut declared_objective = vec![0.0; num_columns];
    for (name, &coeff) in model.objective_coefficients() {
        let column = model.variable_index(name).map_err(|_| {
            LpError::InvalidModel(format!("objective references unknown variable '{}'", name))
        })?;
        declared_objective[column] = coeff;
    }

    let (objective, sense, objective_negated) = match model.direction() {
        OptimizationDirection::Minimize => (declared_objective.clone(), Sense::Minimise, false),
        OptimizationDirection::Maximize if capabilities.native_maximize => {
            (declared_objective.clone(), Sense::Maximise, false)
        }
        OptimizationDirection::Maximize => (
            declared_objective.iter().map(|c| -c).collect(),
            Sense::Minimise,
            true,
        ),
    };

    let mut rows = Vec::new();
    let mut trivially_infeasible = false;

    for (index, constraint) in model.constraints().enumerate() {
        let mut terms = Vec::with_capacity(constraint.coefficients().len());
        for (name, &coeff) in constraint.coefficients() {
            let column = model.variable_index(name).map_err(|_| {
                LpError::InvalidModel(format!(
                    "constraint '{}' references unknown variable '{}'",
                    constraint.name(),
                    name
                ))
            })?;
            if coeff != 0.0 {
                terms.push((column, coeff));
            }
        }

        if terms.is_empty() {
            if !constraint
                .relation()
                .holds(0.0, constraint.rhs(), FEASIBILITY_TOLERANCE)
            {
                tracing::debug!(
                    constraint = constraint.name(),
                    "constant constraint cannot hold"
                );
                trivially_infeasible = true;
            }
            continue;
        }

        let origin = RowOrigin::Constraint(index);
        match constraint.relation() {
            Relation::Eq if !capabilities.native_equality => {
                rows.push(LoweredRow {
                    terms: terms.clone(),
                    relation: Relation::Leq,
                    rhs: constraint.rhs(),
                    origin,
                });
                rows.push(LoweredRow {
                    terms,
                    relation: Relation::Geq,
                    rhs: constraint.rhs(),
                    origin,
                });
            }
            relation => rows.push(LoweredRow {
                terms,
                relation,
                rhs: constraint.rhs(),
                origin,
            }),
        }
    }

    let mut bounds = Vec::with_capacity(num_columns);
    for (column, variable) in model.variables().enumerate() {
        if capabilities.native_bounds {
            bounds.push((variable.lower_bound(), variable.upper_bound()));
            continue;
        }

        bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        if variable.lower_bound().is_finite() {
            rows.push(LoweredRow {
                terms: vec![(column, 1.0)],
                relation: Relation::Geq,
                rhs: variable.lower_bound(),
                origin: RowOrigin::LowerBound(column),
            });
        }
        if variable.upper_bound().is_finite() {
            rows.push(LoweredRow {
                terms: vec![(column, 1.0)],
                relation: Relation::Leq,
                rhs: variable.upper_bound(),
                origin: RowOrigin::UpperBound(column),
            });
        }
    }

    Ok(LoweredProblem {
        objective,
        declared_objective,
        sense,
        objective_negated,
        bounds,
        rows,
        trivially_infeasible,
    })
}

impl LoweredProblem {
    pub fn num_columns(&self) -> usize {
        self.declared_objective.len()
    }

    /// Objective value of `values` under the model's declared objective and direction
    pub fn objective_at(&self, values: &[f64]) -> f64 {
        self.declared_objective
            .iter()
            .enumerate()
            .map(|(i, c)| c * values.get(i).copied().unwrap_or(0.0))
            .sum()
    }

    /// Turn a backend point into a named solution
    ///
    /// Missing trailing values are zero. The objective is always recomputed from the
    /// declared objective; `reported_objective` (in the backend's own sign convention)
    /// is only compared against it. A point with non-finite entries is infeasible.
    pub fn raise(
        &self,
        model: &LpModel,
        values: &[f64],
        reported_objective: Option<f64>,
    ) -> Solution {
        let mut point = values.to_vec();
        point.resize(self.num_columns(), 0.0);

        if point.iter().any(|v| !v.is_finite()) {
            tracing::debug!("backend returned a non-finite point");
            return Solution::infeasible(model);
        }

        let objective = self.objective_at(&point);
        if let Some(reported) = reported_objective {
            let reported = if self.objective_negated {
                -reported
            } else {
                reported
            };
            if (reported - objective).abs() > OBJECTIVE_MISMATCH_TOLERANCE * objective.abs().max(1.0)
            {
                tracing::debug!(
                    reported,
                    recomputed = objective,
                    "backend objective differs from recomputed value"
                );
            }
        }

        Solution::optimal(model, &point, objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::ModelBuilder;

    const PRIMITIVE: BackendCapabilities = BackendCapabilities {
        native_bounds: false,
        native_equality: false,
        native_maximize: false,
    };

    const NATIVE: BackendCapabilities = BackendCapabilities {
        native_bounds: true,
        native_equality: true,
        native_maximize: true,
    };

    fn sample() -> LpModel {
        ModelBuilder::new()
            .maximize()
            .var("x", 0.0, f64::INFINITY)
            .var("y", -2.0, 5.0)
            .obj("y", 5.0)
            .obj("x", 3.0)
            .leq("c1", [("x", 2.0), ("y", 1.0)], 6.0)
            .eq("c2", [("y", 1.0), ("x", 0.0)], 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_objective_is_dense_in_declared_order() {
        let lowered = lower(&sample(), NATIVE).unwrap();
        assert_eq!(lowered.declared_objective, vec![3.0, 5.0]);
        assert_eq!(lowered.objective, vec![3.0, 5.0]);
        assert_eq!(lowered.sense, Sense::Maximise);
        assert!(!lowered.objective_negated);
    }

    #[test]
    fn test_maximize_is_negated_for_minimise_only_backends() {
        let lowered = lower(&sample(), PRIMITIVE).unwrap();
        assert_eq!(lowered.objective, vec![-3.0, -5.0]);
        assert_eq!(lowered.declared_objective, vec![3.0, 5.0]);
        assert_eq!(lowered.sense, Sense::Minimise);
        assert!(lowered.objective_negated);
    }

    #[test]
    fn test_native_lowering_keeps_bounds_and_equalities() {
        let lowered = lower(&sample(), NATIVE).unwrap();
        assert_eq!(lowered.bounds, vec![(0.0, f64::INFINITY), (-2.0, 5.0)]);
        assert_eq!(lowered.rows.len(), 2);
        assert_eq!(lowered.rows[1].relation, Relation::Eq);
        // zero coefficient dropped
        assert_eq!(lowered.rows[1].terms, vec![(1, 1.0)]);
    }

    #[test]
    fn test_primitive_lowering_splits_equalities_and_emits_bound_rows() {
        let lowered = lower(&sample(), PRIMITIVE).unwrap();
        assert!(lowered
            .bounds
            .iter()
            .all(|&(lo, hi)| lo == f64::NEG_INFINITY && hi == f64::INFINITY));

        let summary: Vec<(RowOrigin, Relation, f64)> = lowered
            .rows
            .iter()
            .map(|r| (r.origin, r.relation, r.rhs))
            .collect();
        assert_eq!(
            summary,
            vec![
                (RowOrigin::Constraint(0), Relation::Leq, 6.0),
                (RowOrigin::Constraint(1), Relation::Leq, 1.0),
                (RowOrigin::Constraint(1), Relation::Geq, 1.0),
                (RowOrigin::LowerBound(0), Relation::Geq, 0.0),
                (RowOrigin::LowerBound(1), Relation::Geq, -2.0),
                (RowOrigin::UpperBound(1), Relation::Leq, 5.0),
            ]
        );
        assert_eq!(lowered.rows[1].terms, lowered.rows[2].terms);
    }

    #[test]
    fn test_unknown_variable_is_invalid_model() {
        let mut model = sample();
        model
            .add_constraint("bad", [("ghost", 1.0)], Relation::Leq, 1.0)
            .unwrap();
        let err = lower(&model, NATIVE).unwrap_err();
        assert!(matches!(err, LpError::InvalidModel(ref m) if m.contains("ghost")));

        let mut model = sample();
        model.set_objective([("ghost", 1.0)], OptimizationDirection::Minimize);
        assert!(matches!(lower(&model, PRIMITIVE), Err(LpError::InvalidModel(_))));
    }

    #[test]
    fn test_empty_constraint_degenerates_to_constant() {
        let mut model = sample();
        model
            .add_constraint("ok", Vec::<(String, f64)>::new(), Relation::Leq, 1.0)
            .unwrap();
        let lowered = lower(&model, NATIVE).unwrap();
        assert!(!lowered.trivially_infeasible);
        assert_eq!(lowered.rows.len(), 2);

        model
            .add_constraint("bad", Vec::<(String, f64)>::new(), Relation::Geq, 1.0)
            .unwrap();
        assert!(lower(&model, NATIVE).unwrap().trivially_infeasible);
    }

    #[test]
    fn test_raise_recomputes_objective_and_pads() {
        let model = sample();
        let lowered = lower(&model, PRIMITIVE).unwrap();

        let solution = lowered.raise(&model, &[2.0], Some(-6.0));
        assert!(solution.is_feasible());
        assert_eq!(solution.value("x"), Some(2.0));
        assert_eq!(solution.value("y"), Some(0.0));
        assert!((solution.objective_value() - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_raise_rejects_non_finite_points() {
        let model = sample();
        let lowered = lower(&model, NATIVE).unwrap();
        let solution = lowered.raise(&model, &[f64::INFINITY, 1.0], None);
        assert!(!solution.is_feasible());
        assert!(solution.objective_value().is_nan());
        assert_eq!(solution.value("x"), Some(0.0));
    }
}
