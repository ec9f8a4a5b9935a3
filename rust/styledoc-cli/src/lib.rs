mod cli;
mod compile;
mod serve;
mod specs;

pub mod errors;
pub mod logging;

pub use cli::{Cli, Command};
