use indexmap::IndexMap;

use super::models::LpModel;

/// Statistics about one solve call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveStatistics {
    pub backend: String,
    pub num_variables: usize,
    pub num_constraints: usize,
    /// Rows handed to the backend after lowering (split equalities and bound rows included)
    pub num_rows: usize,
    pub solve_time_ms: f64,
}

/// Result of solving an [`LpModel`], keyed by variable name
///
/// `values` always holds one entry per model variable in declaration order. When
/// `feasible` is false the objective value is NaN.
#[derive(Debug, Clone)]
pub struct Solution {
    values: IndexMap<String, f64>,
    objective_value: f64,
    feasible: bool,
    statistics: SolveStatistics,
}

impl Solution {
    /// Feasible solution; `values` must follow the model's variable order
    pub fn optimal(model: &LpModel, values: &[f64], objective_value: f64) -> Self {
        Self {
            values: named_values(model, values),
            objective_value,
            feasible: true,
            statistics: SolveStatistics::default(),
        }
    }

    /// Failed solve: every variable at 0.0 and a NaN objective
    pub fn infeasible(model: &LpModel) -> Self {
        Self::infeasible_with_values(model, &[])
    }

    /// Failed solve that still reports the best point the backend produced
    pub fn infeasible_with_values(model: &LpModel, values: &[f64]) -> Self {
        Self {
            values: named_values(model, values),
            objective_value: f64::NAN,
            feasible: false,
            statistics: SolveStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: SolveStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn values(&self) -> &IndexMap<String, f64> {
        &self.values
    }

    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }
}

/// Pair values with variable names, padding missing trailing entries with 0.0
fn named_values(model: &LpModel, values: &[f64]) -> IndexMap<String, f64> {
    model
        .variables()
        .enumerate()
        .map(|(i, var)| (var.name().to_string(), values.get(i).copied().unwrap_or(0.0)))
        .collect()
}
