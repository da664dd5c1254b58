//! # Aggregation Pipelines
//!
//! Both pipelines have the same shape: discover experiment folders, load the
//! tables of each folder into typed records, reduce them to summary statistics
//! and collect one row per folder into a [`Rollup`]. A folder that fails is
//! reported in `Rollup::failures`; the others still produce rows.
//!
//! - [`function`]: per-dimension and per-algorithm summaries of the function
//!   optimizers, and their mean convergence curves.
//! - [`tsp`]: per-parameter-set summaries of the TSP solver, its optimal
//!   route, and the best run's distance history and route snapshots.
pub mod function;
pub mod options;
pub mod rollup;
pub mod tsp;

use std::path::Path;

use serde::Serialize;

use crate::discovery::{discover_series, SeriesFile, SeriesPattern};
use crate::error::{parse_error, AnalysisError, OptionExt, Result};
use crate::records::results::{best_result, objectives, times};
use crate::records::{HistoryLayout, Parsed, RunHistory, RunId, RunResult};
use crate::stats::AggregateStat;

pub use options::{AnalysisOptions, AnalysisOptionsBuilder};
pub use rollup::Rollup;

/// Objective and time statistics of one results table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultsSummary {
    /// Rows that parsed.
    pub runs: usize,
    /// Rows dropped as malformed.
    pub skipped: usize,
    pub objective: AggregateStat,
    pub time: AggregateStat,
    /// Lowest objective, first row on ties.
    pub best: RunResult,
}

impl ResultsSummary {
    /// Summarizes a parsed results table. `origin` names it in errors.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NoValidRuns` if no row survived parsing.
    pub fn from_parsed(parsed: &Parsed<RunResult>, origin: &str) -> Result<Self> {
        if parsed.is_empty() {
            return Err(AnalysisError::NoValidRuns(format!(
                "{}: no valid rows ({} skipped)",
                origin, parsed.skipped
            )));
        }
        let best = *best_result(&parsed.records)
            .ok_or_else_analysis(|| AnalysisError::NoValidRuns(origin.to_string()))?;

        Ok(Self {
            runs: parsed.records.len(),
            skipped: parsed.skipped,
            objective: AggregateStat::from_samples(&objectives(&parsed.records))?,
            time: AggregateStat::from_samples(&times(&parsed.records))?,
            best,
        })
    }
}

/// Run id encoded in a series file's key, e.g. `3` in `distance_history_run_3.csv`.
pub(crate) fn run_id(file: &SeriesFile) -> Result<RunId> {
    file.key
        .parse::<RunId>()
        .map_err(|_| parse_error(&file.key, "a run id", file.path.display()))
}

/// Loads every history in `dir` matching `pattern`, in natural file order,
/// along with the file key each run came from.
pub(crate) fn load_histories(
    dir: &Path,
    pattern: &SeriesPattern,
    layout: &HistoryLayout,
) -> Result<Vec<(String, RunHistory)>> {
    discover_series(dir, pattern)?
        .into_iter()
        .map(|file| {
            let run = run_id(&file)?;
            let history = RunHistory::load(run, &file.path, layout)?;
            Ok((file.key, history))
        })
        .collect()
}
