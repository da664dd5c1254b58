//! # Function-Optimization Aggregator
//!
//! The function optimizers (GA, PSO, DE, SA, ...) write, per run directory:
//!
//! - `<algorithm>_results.csv`: `Run,BestFitness,Time(s)`, one row per run;
//! - `<algorithm>_data/population_run_<k>.csv`: every individual of every
//!   generation of run `k`.
//!
//! Experiments over several dimensionalities put each run directory in a
//! `<N>D` folder.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info_span, instrument};

use super::{load_histories, AnalysisOptions, ResultsSummary, Rollup};
use crate::convergence::{best_per_step, mean_curve};
use crate::discovery::{
    discover_folders, discover_series, DimensionNaming, FolderFailure, SuffixNaming,
};
use crate::error::{AnalysisError, Result};
use crate::records::population::load_population;
use crate::records::results::load_results;
use crate::records::{HistoryLayout, PopulationSnapshot, RunId};
use crate::selection::{BestRun, BestRunSelector, TerminalPolicy};
use crate::stats::AggregateStat;

/// Mean fitness and time of one algorithm at one dimensionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionRow {
    pub dimension: u32,
    pub algorithm: String,
    pub mean_fitness: f64,
    pub mean_time: f64,
    pub runs: usize,
}

/// Fitness and time statistics of one algorithm across its runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmSummary {
    pub algorithm: String,
    #[serde(flatten)]
    pub results: ResultsSummary,
}

impl AlgorithmSummary {
    pub fn fitness(&self) -> &AggregateStat {
        &self.results.objective
    }

    pub fn time(&self) -> &AggregateStat {
        &self.results.time
    }
}

/// Mean best-fitness-per-generation curve of one algorithm, and its best run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvergenceSummary {
    pub algorithm: String,
    pub runs: usize,
    /// Mean over runs of each run's best fitness per generation.
    pub mean_curve: Vec<Option<f64>>,
    /// Run with the best fitness in its last generation.
    pub best: BestRun,
    /// Individuals of the best run, per generation.
    pub snapshots: Vec<PopulationSnapshot>,
}

struct AlgorithmFile {
    label: String,
    algorithm: String,
    path: PathBuf,
}

fn summarize_file(file: &AlgorithmFile) -> Result<AlgorithmSummary> {
    let _span = info_span!("results_table", file = %file.label).entered();
    let parsed = load_results(&file.path)?;
    Ok(AlgorithmSummary {
        algorithm: file.algorithm.clone(),
        results: ResultsSummary::from_parsed(&parsed, &file.label)?,
    })
}

fn algorithm_files(
    dir: &Path,
    prefix: &str,
    options: &AnalysisOptions,
) -> Result<Vec<AlgorithmFile>> {
    Ok(discover_series(dir, &options.results_pattern())?
        .into_iter()
        .map(|file| AlgorithmFile {
            label: format!("{}{}{}", prefix, file.key, options.get_results_suffix()),
            algorithm: file.key,
            path: file.path,
        })
        .collect())
}

/// Per-algorithm statistics for every `<algorithm>_results.csv` directly in `dir`.
///
/// A table that fails to load or has no valid rows is reported as a failure
/// under its file name; the other tables are still summarized.
///
/// # Errors
///
/// Returns `AnalysisError::Io` only if `dir` itself cannot be listed.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn summarize_algorithms(dir: &Path, options: &AnalysisOptions) -> Result<Rollup<AlgorithmSummary>> {
    let files = algorithm_files(dir, "", options)?;
    Ok(Rollup::collect(
        &files,
        options.get_parallel_threshold(),
        |f| f.label.clone(),
        summarize_file,
    ))
}

/// Mean fitness and mean time per algorithm per `<N>D` folder under `root`,
/// sorted by dimension ascending. Within a dimension, algorithms keep natural file order.
///
/// # Errors
///
/// Returns `AnalysisError::Io` only if `root` cannot be listed. Unreadable
/// dimension folders and bad tables are collected as failures.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn summarize_dimensions(root: &Path, options: &AnalysisOptions) -> Result<Rollup<DimensionRow>> {
    let discovery = discover_folders(root, &DimensionNaming)?;

    let mut files = Vec::new();
    let mut listing_failures = discovery.failures;
    for folder in &discovery.folders {
        let prefix = format!("{}/", folder.name);
        match algorithm_files(&folder.path, &prefix, options) {
            Ok(found) => files.extend(found.into_iter().map(|file| (folder.params, file))),
            Err(error) => listing_failures.push(FolderFailure::new(folder.name.clone(), error)),
        }
    }

    let summarized = Rollup::collect(
        &files,
        options.get_parallel_threshold(),
        |(_, f)| f.label.clone(),
        |(dimension, f)| {
            let summary = summarize_file(f)?;
            Ok(DimensionRow {
                dimension: *dimension,
                algorithm: summary.algorithm,
                mean_fitness: summary.results.objective.mean,
                mean_time: summary.results.time.mean,
                runs: summary.results.runs,
            })
        },
    );

    let mut rollup = summarized.with_failures(listing_failures);
    rollup.rows.sort_by_key(|row| row.dimension);
    Ok(rollup)
}

/// Convergence summary for every `<algorithm>_data` folder under `root`.
///
/// Each population file is one run; a run's fitness at a generation is the
/// best individual of that generation. A folder fails if a run's generation
/// index is beyond the rows of its file.
///
/// # Errors
///
/// Returns `AnalysisError::Io` only if `root` cannot be listed.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn summarize_convergence(root: &Path, options: &AnalysisOptions) -> Result<Rollup<ConvergenceSummary>> {
    let naming = SuffixNaming::new(options.get_data_suffix());
    let discovery = discover_folders(root, &naming)?;
    let selector = BestRunSelector::new(TerminalPolicy::BestOfLast);
    let layout = HistoryLayout::population();

    let rollup = Rollup::collect(
        &discovery.folders,
        options.get_parallel_threshold(),
        |folder| folder.name.clone(),
        |folder| {
            let pattern = options.population_pattern();
            let histories = load_histories(&folder.path, &pattern, &layout)?;
            let curves = histories
                .iter()
                .map(|(_, h)| best_per_step(h))
                .collect::<Result<Vec<_>>>()?;
            let keys: Vec<(RunId, String)> = histories
                .iter()
                .map(|(key, history)| (history.run, key.clone()))
                .collect();
            let runs = histories.len();

            let best = selector.select(histories.into_iter().map(|(_, h)| h))?;
            let key = keys
                .iter()
                .find(|(run, _)| *run == best.run)
                .map(|(_, key)| key.as_str())
                .ok_or(AnalysisError::MissingRun(best.run))?;
            let snapshots = load_population(&folder.path.join(pattern.file_name(key)))?;

            Ok(ConvergenceSummary {
                algorithm: folder.params.clone(),
                runs,
                mean_curve: mean_curve(&curves),
                best,
                snapshots,
            })
        },
    );
    Ok(rollup.with_failures(discovery.failures))
}
