use indexmap::IndexMap;

use super::models::LpModel;
use super::solver_service::Result;
use super::value_objects::{OptimizationDirection, Relation};

#[derive(Debug, Clone)]
struct PendingConstraint {
    name: String,
    terms: Vec<(String, f64)>,
    relation: Relation,
    rhs: f64,
}

/// Fluent construction of an [`LpModel`]
///
/// Calls are recorded and replayed on the model in [`ModelBuilder::build`], which is
/// where duplicate names surface. Objective terms accumulate; repeating a variable
/// overwrites its coefficient.
///
/// ```
/// use lpdispatch::ModelBuilder;
///
/// let model = ModelBuilder::new()
///     .maximize()
///     .var("x", 0.0, 10.0)
///     .obj("x", 1.0)
///     .var("y", 0.0, 10.0)
///     .obj("y", 2.0)
///     .leq("c1", [("x", 1.0), ("y", 1.0)], 8.0)
///     .build()
///     .unwrap();
/// assert!(model.is_built());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    variables: Vec<(String, f64, f64)>,
    constraints: Vec<PendingConstraint>,
    objective: IndexMap<String, f64>,
    direction: OptimizationDirection,
    preferred_solver: Option<String>,
    debug: bool,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: OptimizationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn maximize(self) -> Self {
        self.direction(OptimizationDirection::Maximize)
    }

    pub fn minimize(self) -> Self {
        self.direction(OptimizationDirection::Minimize)
    }

    pub fn var(mut self, name: impl Into<String>, lower: f64, upper: f64) -> Self {
        self.variables.push((name.into(), lower, upper));
        self
    }

    /// Set one objective coefficient
    pub fn obj(mut self, name: impl Into<String>, coefficient: f64) -> Self {
        self.objective.insert(name.into(), coefficient);
        self
    }

    pub fn constraint<I, N>(
        mut self,
        name: impl Into<String>,
        terms: I,
        relation: Relation,
        rhs: f64,
    ) -> Self
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        self.constraints.push(PendingConstraint {
            name: name.into(),
            terms: terms.into_iter().map(|(n, c)| (n.into(), c)).collect(),
            relation,
            rhs,
        });
        self
    }

    pub fn leq<I, N>(self, name: impl Into<String>, terms: I, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        self.constraint(name, terms, Relation::Leq, rhs)
    }

    pub fn geq<I, N>(self, name: impl Into<String>, terms: I, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        self.constraint(name, terms, Relation::Geq, rhs)
    }

    pub fn eq<I, N>(self, name: impl Into<String>, terms: I, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        self.constraint(name, terms, Relation::Eq, rhs)
    }

    pub fn prefer_solver(mut self, name: impl Into<String>) -> Self {
        self.preferred_solver = Some(name.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replay the recorded calls on a fresh model and return it built
    pub fn build(self) -> Result<LpModel> {
        let mut model = LpModel::new();
        model.set_debug(self.debug);
        model.set_preferred_solver(self.preferred_solver);

        for (name, lower, upper) in self.variables {
            model.add_variable(name, lower, upper)?;
        }
        for pending in self.constraints {
            model.add_constraint(pending.name, pending.terms, pending.relation, pending.rhs)?;
        }
        model.set_objective(self.objective, self.direction);

        model.build();
        Ok(model)
    }
}
