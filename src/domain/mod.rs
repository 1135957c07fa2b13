// Domain module: the LP model, its solutions and the solver contract

pub mod builder;
pub mod models;
pub mod solution;
pub mod solver_service;
pub mod value_objects;

pub use builder::*;
pub use models::*;
pub use solution::*;
pub use solver_service::*;
pub use value_objects::*;
