// Domain value objects shared by the model, the adapters and the errors

use std::fmt;

/// Relation between a constraint's left-hand side and its right-hand side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Less than or equal (≤)
    Leq,
    /// Greater than or equal (≥)
    Geq,
    /// Equal (=)
    Eq,
}

impl Relation {
    /// Check whether `lhs relation rhs` holds within `tolerance`
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Leq => lhs <= rhs + tolerance,
            Relation::Geq => lhs >= rhs - tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Leq => write!(f, "<="),
            Relation::Geq => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptimizationDirection {
    /// Maximize the objective function
    #[default]
    Maximize,
    /// Minimize the objective function
    Minimize,
}

impl OptimizationDirection {
    pub fn is_maximize(self) -> bool {
        self == OptimizationDirection::Maximize
    }
}

impl fmt::Display for OptimizationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationDirection::Maximize => write!(f, "maximize"),
            OptimizationDirection::Minimize => write!(f, "minimize"),
        }
    }
}

/// Kind of named entity held by a model, used in error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Variable,
    Constraint,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Variable => write!(f, "Variable"),
            EntityKind::Constraint => write!(f, "Constraint"),
        }
    }
}
