//! Declarative linear programs with interchangeable solver backends.
//!
//! Build an [`LpModel`] (directly or through [`ModelBuilder`]), pick a backend with
//! [`resolve`] or from the [`SolverRegistry`], and call [`SolverAdapter::solve`]. Failed
//! solves (infeasible, unbounded, iteration limit) come back as a [`Solution`] with
//! `is_feasible() == false` and a NaN objective rather than as errors.
//!
//! ```
//! use lpdispatch::{resolve, ModelBuilder};
//!
//! let mut model = ModelBuilder::new()
//!     .maximize()
//!     .var("x", 0.0, f64::INFINITY)
//!     .var("y", 0.0, f64::INFINITY)
//!     .obj("x", 3.0)
//!     .obj("y", 5.0)
//!     .leq("c1", [("x", 2.0), ("y", 1.0)], 6.0)
//!     .leq("c2", [("x", 1.0), ("y", 1.0)], 4.0)
//!     .build()?;
//!
//! let solver = resolve(Some(&model), Some("microlp"))?;
//! let solution = solver.solve(&mut model)?;
//! assert!(solution.is_feasible());
//! assert!((solution.objective_value() - 20.0).abs() < 1e-6);
//! # Ok::<(), lpdispatch::LpError>(())
//! ```

// Domain layer: model, solution and solver contract
pub mod domain;

// Application layer: backend resolution
pub mod application;

// Infrastructure layer: configuration sources
pub mod infrastructure;

// Solver adapters: concrete implementations of SolverAdapter
pub mod solver;

// Re-export commonly used types
pub use domain::{
    Constraint, EntityKind, LpError, LpModel, ModelBuilder, OptimizationDirection, Relation,
    Result, SolveStatistics, Solution, SolverAdapter, Variable,
};

pub use application::{resolve, ResolutionSource, SolverResolver};

pub use infrastructure::{global_solver, set_global_solver, GlobalSolverSetting, SettingSources};

#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::{MicrolpSolver, SolverRegistry};
