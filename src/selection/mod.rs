//! # Best-Run Selection
//!
//! Finds the run of an experiment folder whose trajectory ends lowest. The
//! same selector serves TSP distance histories (one value per iteration) and
//! function-optimization population files (one value per individual per
//! generation); `TerminalPolicy` says how the last step is read.
pub mod best_run;

pub use best_run::{BestRun, BestRunSelector, TerminalPolicy};
pub use crate::records::results::best_result;
