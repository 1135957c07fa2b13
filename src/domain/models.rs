use std::fmt;

use indexmap::IndexMap;

use super::solver_service::{LpError, Result};
use super::value_objects::{EntityKind, OptimizationDirection, Relation};

/// Named, bounded decision variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    lower_bound: f64,
    upper_bound: f64,
}

impl Variable {
    /// Bounds may be infinite; `lower <= upper` is not checked.
    pub fn new(name: impl Into<String>, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            name: name.into(),
            lower_bound,
            upper_bound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Variable{{name='{}', [{}, {}]}}",
            self.name, self.lower_bound, self.upper_bound
        )
    }
}

/// Named linear constraint `Σ coefficient * variable  relation  rhs`
///
/// Variables missing from `coefficients` have coefficient zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    coefficients: IndexMap<String, f64>,
    relation: Relation,
    rhs: f64,
}

impl Constraint {
    pub fn new<I, N>(name: impl Into<String>, coefficients: I, relation: Relation, rhs: f64) -> Self
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        Self {
            name: name.into(),
            coefficients: coefficients
                .into_iter()
                .map(|(var, coeff)| (var.into(), coeff))
                .collect(),
            relation,
            rhs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficients(&self) -> &IndexMap<String, f64> {
        &self.coefficients
    }

    /// Coefficient of `variable`, zero when the constraint does not mention it
    pub fn coefficient(&self, variable: &str) -> f64 {
        self.coefficients.get(variable).copied().unwrap_or(0.0)
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint{{name='{}', ", self.name)?;
        if self.coefficients.is_empty() {
            write!(f, "0")?;
        }
        for (i, (var, coeff)) in self.coefficients.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*{}", coeff, var)?;
        }
        write!(f, " {} {}}}", self.relation, self.rhs)
    }
}

/// Linear programming model, independent of any solver backend
///
/// Variables and constraints keep their insertion order; a variable's position is the
/// column index every backend uses. The model starts unbuilt; [`LpModel::build`] marks it
/// built and any later structural change marks it unbuilt again, so a model can be edited
/// and re-solved indefinitely.
#[derive(Debug, Clone, Default)]
pub struct LpModel {
    variables: IndexMap<String, Variable>,
    constraints: IndexMap<String, Constraint>,
    objective: IndexMap<String, f64>,
    direction: OptimizationDirection,
    built: bool,
    preferred_solver: Option<String>,
    debug: bool,
}

impl LpModel {
    /// Create an empty maximization model
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable per-model logging of mutations and builds (off by default)
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn before_change(&mut self) {
        if self.built {
            self.built = false;
            if self.debug {
                tracing::warn!(
                    "model changed after build(); built status reset, build again before solving"
                );
            }
        }
    }

    /// Append a variable and return its column index
    pub fn add_variable(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> Result<usize> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            if self.debug {
                tracing::warn!(variable = %name, "duplicate variable name");
            }
            return Err(LpError::DuplicateName {
                kind: EntityKind::Variable,
                name,
            });
        }

        self.before_change();
        if self.debug {
            tracing::info!(variable = %name, lower, upper, "added variable");
        }
        let variable = Variable::new(name.clone(), lower, upper);
        let (index, _) = self.variables.insert_full(name, variable);
        Ok(index)
    }

    /// Append a constraint
    ///
    /// The coefficients are copied into the model, so later changes to the caller's
    /// collection do not affect the stored constraint.
    pub fn add_constraint<I, N>(
        &mut self,
        name: impl Into<String>,
        coefficients: I,
        relation: Relation,
        rhs: f64,
    ) -> Result<&Constraint>
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        let name = name.into();
        if self.constraints.contains_key(&name) {
            if self.debug {
                tracing::warn!(constraint = %name, "duplicate constraint name");
            }
            return Err(LpError::DuplicateName {
                kind: EntityKind::Constraint,
                name,
            });
        }

        self.before_change();
        let constraint = Constraint::new(name.clone(), coefficients, relation, rhs);
        if self.debug {
            tracing::info!(
                constraint = %name,
                %relation,
                rhs,
                terms = constraint.coefficients().len(),
                "added constraint"
            );
        }
        let (index, _) = self.constraints.insert_full(name, constraint);
        Ok(&self.constraints[index])
    }

    /// Replace the whole objective and its direction
    pub fn set_objective<I, N>(&mut self, coefficients: I, direction: OptimizationDirection)
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        self.before_change();
        self.objective = coefficients
            .into_iter()
            .map(|(var, coeff)| (var.into(), coeff))
            .collect();
        self.direction = direction;
    }

    /// Change only the optimization direction
    pub fn set_direction(&mut self, direction: OptimizationDirection) {
        self.before_change();
        self.direction = direction;
    }

    /// Finalize the model; a no-op when it is already built
    pub fn build(&mut self) {
        if self.built {
            return;
        }
        if self.debug {
            tracing::info!(
                variables = self.variables.len(),
                constraints = self.constraints.len(),
                "building model"
            );
        }
        self.built = true;
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn variable_index(&self, name: &str) -> Result<usize> {
        self.variables
            .get_index_of(name)
            .ok_or_else(|| LpError::NotFound {
                kind: EntityKind::Variable,
                name: name.to_string(),
            })
    }

    pub fn constraint_index(&self, name: &str) -> Result<usize> {
        self.constraints
            .get_index_of(name)
            .ok_or_else(|| LpError::NotFound {
                kind: EntityKind::Constraint,
                name: name.to_string(),
            })
    }

    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.variables.get(name).ok_or_else(|| LpError::NotFound {
            kind: EntityKind::Variable,
            name: name.to_string(),
        })
    }

    pub fn constraint(&self, name: &str) -> Result<&Constraint> {
        self.constraints.get(name).ok_or_else(|| LpError::NotFound {
            kind: EntityKind::Constraint,
            name: name.to_string(),
        })
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variables in declaration (column) order
    pub fn variables(&self) -> impl ExactSizeIterator<Item = &Variable> + '_ {
        self.variables.values()
    }

    /// Constraints in declaration order
    pub fn constraints(&self) -> impl ExactSizeIterator<Item = &Constraint> + '_ {
        self.constraints.values()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn objective_coefficients(&self) -> &IndexMap<String, f64> {
        &self.objective
    }

    /// Objective coefficient of `variable`, zero when the objective does not mention it
    pub fn objective_coefficient(&self, variable: &str) -> f64 {
        self.objective.get(variable).copied().unwrap_or(0.0)
    }

    pub fn direction(&self) -> OptimizationDirection {
        self.direction
    }

    pub fn is_maximize(&self) -> bool {
        self.direction.is_maximize()
    }

    /// Backend name this model asks for when no explicit override is given
    pub fn preferred_solver(&self) -> Option<&str> {
        self.preferred_solver.as_deref()
    }

    /// Set or clear the preferred backend; this does not affect the built status
    pub fn set_preferred_solver(&mut self, name: Option<impl Into<String>>) {
        self.preferred_solver = name.map(Into::into);
    }
}

impl fmt::Display for LpModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LpModel:")?;
        writeln!(f, "Variables:")?;
        for variable in self.variables.values() {
            writeln!(f, "  {}", variable)?;
        }
        writeln!(f, "Constraints:")?;
        for constraint in self.constraints.values() {
            writeln!(f, "  {}", constraint)?;
        }
        write!(f, "Objective: {} ", self.direction)?;
        if self.objective.is_empty() {
            write!(f, "0")?;
        }
        for (i, (var, coeff)) in self.objective.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}*{}", coeff, var)?;
        }
        writeln!(f)
    }
}
