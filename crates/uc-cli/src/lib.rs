pub mod cli;
pub mod demo;

pub use cli::{Cli, Commands, SolverArgs};
