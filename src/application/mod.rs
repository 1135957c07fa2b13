// Application module: backend selection for solve calls

pub mod resolution;

pub use resolution::{resolve, ResolutionSource, SolverResolver};
