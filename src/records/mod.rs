//! # Typed Records
//!
//! Every table the optimizers write is read into one of the typed records of
//! this module at the parse boundary. Rows that fail validation are dropped
//! and counted rather than coerced into placeholder values.
//!
//! - [`RunResult`]: one row of a `Run,BestFitness,Time(s)` or
//!   `Run,BestDistance,Time(s)` table.
//! - [`RunHistory`]: the `(step, value)` trajectory of one run.
//! - [`Tour`]: an implicitly closed sequence of 2-D points.
//! - [`PopulationSnapshot`]: the individuals of one generation.
pub mod history;
pub mod population;
pub mod results;
pub mod route;

/// Identifier of one run inside an experiment folder.
pub type RunId = u32;

/// Records that survived validation, plus the number of rows that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// Rows that parsed, in file order.
    pub records: Vec<T>,
    /// Rows that were dropped as malformed.
    pub skipped: usize,
}

impl<T> Parsed<T> {
    pub fn new(records: Vec<T>, skipped: usize) -> Self {
        Self { records, skipped }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub use history::{HistoryLayout, RunHistory, Sample};
pub use population::PopulationSnapshot;
pub use results::RunResult;
pub use route::{Point, RouteRow, Tour};
