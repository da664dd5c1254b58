//! # Error Types
//!
//! This module defines the error type shared by every loader, selector and
//! aggregator in the crate. Each variant corresponds to one way an experiment
//! folder can fail to produce a summary.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use runsummary::error::{AnalysisError, Result};
//! use runsummary::stats::AggregateStat;
//!
//! fn mean_of(samples: &[f64]) -> Result<f64> {
//!     Ok(AggregateStat::from_samples(samples)?.mean)
//! }
//!
//! assert!(matches!(mean_of(&[]), Err(AnalysisError::EmptyInput)));
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use runsummary::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_results(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open results table")?;
//!     Ok(())
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use runsummary::error::{AnalysisError, OptionExt};
//!
//! fn first_time(times: &[f64]) -> runsummary::error::Result<f64> {
//!     times.first().copied().ok_or_else_analysis(|| AnalysisError::EmptyInput)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

use crate::records::RunId;

/// Represents errors that can occur while summarizing experiment results.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A folder name, column or numeric token could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Statistics were requested over an empty sample set.
    #[error("Empty input error: cannot summarize an empty sample set")]
    EmptyInput,

    /// Every run in a folder was discarded as malformed.
    #[error("No valid runs: {0}")]
    NoValidRuns(String),

    /// A serialized route had an odd token count or a non-numeric token.
    #[error("Malformed route: {0}")]
    MalformedRoute(String),

    /// More than one distinct value was recorded at a run's last step.
    #[error("Ambiguous terminal state in run {run}: step {step} has values {values:?}")]
    AmbiguousTerminalState {
        /// Run whose last step is ambiguous.
        run: RunId,
        /// The maximum step index of the run.
        step: u64,
        /// The distinct values found at that step, in file order.
        values: Vec<f64>,
    },

    /// A route table does not contain the requested run.
    #[error("Run {0} not found in route table")]
    MissingRun(RunId),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised by the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use runsummary::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> runsummary::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error, converting it into `AnalysisError::Other`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| AnalysisError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an Option to a Result using a closure to generate the error.
    fn ok_or_else_analysis<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> AnalysisError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_analysis<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> AnalysisError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Builds a `Parse` error naming the offending token and what it should have been.
pub(crate) fn parse_error(token: &str, expected: &str, origin: impl fmt::Display) -> AnalysisError {
    AnalysisError::Parse(format!(
        "{}: cannot parse {:?} as {}",
        origin, token, expected
    ))
}
