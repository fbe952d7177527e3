pub mod command;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod runner;

pub use outcome::{Outcome, OutputFormat};
pub use runner::{RunOptions, RunSummary, run};
