// Infrastructure module: external configuration sources

pub mod config;

pub use config::{global_solver, set_global_solver, GlobalSolverSetting, SettingSources};
