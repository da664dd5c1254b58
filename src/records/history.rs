//! # Run Histories
//!
//! A `RunHistory` is the trajectory of one run: a distance per iteration for
//! the TSP solver, or one fitness row per individual per generation for the
//! function optimizers. Both are read through a `HistoryLayout` that says
//! where the step and value columns are.
//!
//! ## Example
//!
//! ```rust
//! use runsummary::records::{HistoryLayout, RunHistory};
//!
//! let data = "0,120.5\n1,110.0\n2,101.25\n";
//! let history = RunHistory::read(3, data.as_bytes(), &HistoryLayout::distance_history(), "run 3").unwrap();
//! assert_eq!(history.samples().len(), 3);
//! assert_eq!(history.last_step(), Some(2));
//! assert_eq!(history.terminal_values(), vec![101.25]);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use super::RunId;
use crate::error::{AnalysisError, Result};

/// One `(step, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub step: u64,
    pub value: f64,
}

impl Sample {
    pub fn new(step: u64, value: f64) -> Self {
        Self { step, value }
    }
}

/// Where a column lives in a history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Zero-based position, for headerless files.
    Index(usize),
    /// Header name.
    Named(String),
}

/// Column layout of a history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLayout {
    step: ColumnRef,
    value: ColumnRef,
    has_headers: bool,
}

impl HistoryLayout {
    pub fn new(step: ColumnRef, value: ColumnRef, has_headers: bool) -> Self {
        Self {
            step,
            value,
            has_headers,
        }
    }

    /// Headerless `iteration,distance` rows written by the TSP solver.
    pub fn distance_history() -> Self {
        Self::new(ColumnRef::Index(0), ColumnRef::Index(1), false)
    }

    /// `Generation,Fitness,x1,x2,...` rows written by the function optimizers.
    pub fn population() -> Self {
        Self::new(
            ColumnRef::Named("Generation".to_string()),
            ColumnRef::Named("Fitness".to_string()),
            true,
        )
    }

    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    fn resolve(&self, column: &ColumnRef, headers: Option<&csv::StringRecord>, origin: &str) -> Result<usize> {
        match (column, headers) {
            (ColumnRef::Index(i), _) => Ok(*i),
            (ColumnRef::Named(name), Some(headers)) => headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    AnalysisError::Parse(format!("{}: missing column {:?}", origin, name))
                }),
            (ColumnRef::Named(name), None) => Err(AnalysisError::Parse(format!(
                "{}: column {:?} referenced by name in a headerless layout",
                origin, name
            ))),
        }
    }
}

/// The trajectory of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunHistory {
    pub run: RunId,
    samples: Vec<Sample>,
    skipped: usize,
    last_step: Option<u64>,
}

impl RunHistory {
    /// Creates an empty history for `run`.
    pub fn new(run: RunId) -> Self {
        Self {
            run,
            samples: Vec::new(),
            skipped: 0,
            last_step: None,
        }
    }

    /// Creates a history from already validated samples.
    pub fn from_samples(run: RunId, samples: Vec<Sample>) -> Self {
        let last_step = samples.iter().map(|s| s.step).max();
        Self {
            run,
            samples,
            skipped: 0,
            last_step,
        }
    }

    /// Records a valid sample.
    pub fn push(&mut self, sample: Sample) {
        self.note_step(sample.step);
        self.samples.push(sample);
    }

    /// Records a dropped row. `step` is the row's step if that field parsed.
    pub fn reject(&mut self, step: Option<u64>) {
        self.skipped += 1;
        if let Some(step) = step {
            self.note_step(step);
        }
    }

    fn note_step(&mut self, step: u64) {
        self.last_step = Some(self.last_step.map_or(step, |last| last.max(step)));
    }

    /// Valid samples in file order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of rows dropped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Largest step index on any row whose step parsed, valid value or not.
    pub fn last_step(&self) -> Option<u64> {
        self.last_step
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Valid values recorded at the last step, in file order.
    ///
    /// Empty when the history is empty or when every row at the last step was malformed.
    pub fn terminal_values(&self) -> Vec<f64> {
        match self.last_step {
            Some(last) => self
                .samples
                .iter()
                .filter(|s| s.step == last)
                .map(|s| s.value)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Reads the history of `run` from `reader` using `layout`.
    ///
    /// Rows whose step is not a non-negative integer, or whose value is not a
    /// number, are dropped and counted.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Parse` if a named column is missing and
    /// `AnalysisError::Csv` on reader failure.
    pub fn read<R: Read>(run: RunId, reader: R, layout: &HistoryLayout, origin: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(layout.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = if layout.has_headers {
            Some(rdr.headers()?.clone())
        } else {
            None
        };
        let step_idx = layout.resolve(&layout.step, headers.as_ref(), origin)?;
        let value_idx = layout.resolve(&layout.value, headers.as_ref(), origin)?;

        let mut history = Self::new(run);
        for row in rdr.records() {
            let row = row?;
            let step = row.get(step_idx).and_then(|s| s.parse::<u64>().ok());
            let value = row
                .get(value_idx)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| !v.is_nan());

            match (step, value) {
                (Some(step), Some(value)) => history.push(Sample::new(step, value)),
                (step, _) => {
                    trace!(origin, line = row.position().map(|p| p.line()), "dropping malformed history row");
                    history.reject(step);
                }
            }
        }

        debug!(
            origin,
            run,
            samples = history.samples.len(),
            skipped = history.skipped,
            "read run history"
        );
        Ok(history)
    }

    /// Opens and reads the history file at `path`.
    pub fn load(run: RunId, path: &Path, layout: &HistoryLayout) -> Result<Self> {
        let file = File::open(path)?;
        Self::read(run, file, layout, &path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_distance_history() {
        let data = "0,50.0\n1,42.5\n2,40.0\n";
        let history =
            RunHistory::read(1, data.as_bytes(), &HistoryLayout::distance_history(), "t").unwrap();
        assert_eq!(
            history.samples(),
            &[
                Sample::new(0, 50.0),
                Sample::new(1, 42.5),
                Sample::new(2, 40.0)
            ]
        );
        assert_eq!(history.skipped(), 0);
        assert_eq!(history.terminal_values(), vec![40.0]);
    }

    #[test]
    fn test_malformed_value_at_last_step_leaves_no_terminal() {
        let data = "0,50.0\n1,42.5\n2,abc\n";
        let history =
            RunHistory::read(1, data.as_bytes(), &HistoryLayout::distance_history(), "t").unwrap();
        assert_eq!(history.samples().len(), 2);
        assert_eq!(history.skipped(), 1);
        assert_eq!(history.last_step(), Some(2));
        assert!(history.terminal_values().is_empty());
    }

    #[test]
    fn test_malformed_step_is_dropped_without_moving_last_step() {
        let data = "0,50.0\nx,1.0\n1,45.0\n";
        let history =
            RunHistory::read(1, data.as_bytes(), &HistoryLayout::distance_history(), "t").unwrap();
        assert_eq!(history.skipped(), 1);
        assert_eq!(history.last_step(), Some(1));
        assert_eq!(history.terminal_values(), vec![45.0]);
    }

    #[test]
    fn test_read_population_layout() {
        let data = "Generation,Fitness,x1,x2\n0,9.0,1.0,2.0\n0,7.5,0.5,0.5\n1,3.0,0.1,0.2\n1,NaN,0.0,0.0\n1,4.0,0.3,0.3\n";
        let history =
            RunHistory::read(2, data.as_bytes(), &HistoryLayout::population(), "t").unwrap();
        assert_eq!(history.samples().len(), 4);
        assert_eq!(history.skipped(), 1);
        assert_eq!(history.terminal_values(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_population_layout_requires_columns() {
        let data = "Gen,Fit\n0,1.0\n";
        let result = RunHistory::read(2, data.as_bytes(), &HistoryLayout::population(), "pop.csv");
        assert!(matches!(result, Err(AnalysisError::Parse(_))));
    }

    #[test]
    fn test_from_samples_tracks_last_step() {
        let history = RunHistory::from_samples(0, vec![Sample::new(3, 1.0), Sample::new(1, 2.0)]);
        assert_eq!(history.last_step(), Some(3));
        assert!(RunHistory::new(0).terminal_values().is_empty());
    }
}
