//! # AnalysisOptions
//!
//! The `AnalysisOptions` struct holds the file and folder naming conventions
//! the pipelines look for, and the folder count above which folders are
//! processed in parallel. The defaults match what the optimizer binaries write.
//!
//! ## Example
//!
//! ```rust
//! use runsummary::pipeline::AnalysisOptions;
//!
//! // Defaults: `results_` TSP folders, `_results.csv` algorithm tables, ...
//! let options = AnalysisOptions::default();
//! assert_eq!(options.get_tsp_prefix(), "results_");
//!
//! // Custom conventions through the builder
//! let options = AnalysisOptions::builder()
//!     .tsp_prefix("tsp_")
//!     .parallel_threshold(2)
//!     .build();
//! assert_eq!(options.get_parallel_threshold(), 2);
//! ```
//!
//! ## Fields
//!
//! - `results_suffix`: suffix of per-algorithm results tables (`GA_results.csv`).
//! - `data_suffix`: suffix of per-algorithm population folders (`GA_data`).
//! - `population_prefix`: prefix of population files (`population_run_1.csv`).
//! - `tsp_prefix`: prefix of TSP experiment folders (`results_...`).
//! - `tsp_results_file`, `tsp_routes_file`: tables inside a TSP folder.
//! - `tsp_data_dir`: subfolder of a TSP folder holding per-run histories.
//! - `distance_history_prefix`, `route_history_prefix`: per-run history files.
//! - `parallel_threshold`: minimum number of folders to process in parallel.

use crate::discovery::SeriesPattern;

const CSV: &str = ".csv";

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    results_suffix: String,
    data_suffix: String,
    population_prefix: String,
    tsp_prefix: String,
    tsp_results_file: String,
    tsp_routes_file: String,
    tsp_data_dir: String,
    distance_history_prefix: String,
    route_history_prefix: String,
    /// Minimum number of folders to process in parallel
    parallel_threshold: usize,
}

impl AnalysisOptions {
    pub fn get_results_suffix(&self) -> &str {
        &self.results_suffix
    }

    pub fn get_data_suffix(&self) -> &str {
        &self.data_suffix
    }

    pub fn get_population_prefix(&self) -> &str {
        &self.population_prefix
    }

    pub fn get_tsp_prefix(&self) -> &str {
        &self.tsp_prefix
    }

    pub fn get_tsp_results_file(&self) -> &str {
        &self.tsp_results_file
    }

    pub fn get_tsp_routes_file(&self) -> &str {
        &self.tsp_routes_file
    }

    pub fn get_tsp_data_dir(&self) -> &str {
        &self.tsp_data_dir
    }

    pub fn get_distance_history_prefix(&self) -> &str {
        &self.distance_history_prefix
    }

    pub fn get_route_history_prefix(&self) -> &str {
        &self.route_history_prefix
    }

    /// Returns the minimum number of folders to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Sets the minimum number of folders to process in parallel.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    /// Sets the TSP folder prefix.
    pub fn set_tsp_prefix(&mut self, prefix: impl Into<String>) {
        self.tsp_prefix = prefix.into();
    }

    /// `<algorithm>_results.csv`
    pub fn results_pattern(&self) -> SeriesPattern {
        SeriesPattern::new("", self.get_results_suffix())
    }

    /// `population_run_<k>.csv`
    pub fn population_pattern(&self) -> SeriesPattern {
        SeriesPattern::new(self.get_population_prefix(), CSV)
    }

    /// `distance_history_run_<k>.csv`
    pub fn distance_history_pattern(&self) -> SeriesPattern {
        SeriesPattern::new(self.get_distance_history_prefix(), CSV)
    }

    /// `route_history_run_<k>.csv`
    pub fn route_history_pattern(&self) -> SeriesPattern {
        SeriesPattern::new(self.get_route_history_prefix(), CSV)
    }

    /// Returns a builder for creating an `AnalysisOptions` instance.
    pub fn builder() -> AnalysisOptionsBuilder {
        AnalysisOptionsBuilder::default()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptionsBuilder::default().build()
    }
}

/// Builder for `AnalysisOptions`.
///
/// Provides a fluent interface for constructing `AnalysisOptions` instances.
/// Anything left unset keeps the default convention.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptionsBuilder {
    results_suffix: Option<String>,
    data_suffix: Option<String>,
    population_prefix: Option<String>,
    tsp_prefix: Option<String>,
    tsp_results_file: Option<String>,
    tsp_routes_file: Option<String>,
    tsp_data_dir: Option<String>,
    distance_history_prefix: Option<String>,
    route_history_prefix: Option<String>,
    parallel_threshold: Option<usize>,
}

impl AnalysisOptionsBuilder {
    pub fn results_suffix(mut self, value: impl Into<String>) -> Self {
        self.results_suffix = Some(value.into());
        self
    }

    pub fn data_suffix(mut self, value: impl Into<String>) -> Self {
        self.data_suffix = Some(value.into());
        self
    }

    pub fn population_prefix(mut self, value: impl Into<String>) -> Self {
        self.population_prefix = Some(value.into());
        self
    }

    pub fn tsp_prefix(mut self, value: impl Into<String>) -> Self {
        self.tsp_prefix = Some(value.into());
        self
    }

    pub fn tsp_results_file(mut self, value: impl Into<String>) -> Self {
        self.tsp_results_file = Some(value.into());
        self
    }

    pub fn tsp_routes_file(mut self, value: impl Into<String>) -> Self {
        self.tsp_routes_file = Some(value.into());
        self
    }

    pub fn tsp_data_dir(mut self, value: impl Into<String>) -> Self {
        self.tsp_data_dir = Some(value.into());
        self
    }

    pub fn distance_history_prefix(mut self, value: impl Into<String>) -> Self {
        self.distance_history_prefix = Some(value.into());
        self
    }

    pub fn route_history_prefix(mut self, value: impl Into<String>) -> Self {
        self.route_history_prefix = Some(value.into());
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds the `AnalysisOptions` instance.
    pub fn build(self) -> AnalysisOptions {
        AnalysisOptions {
            results_suffix: self.results_suffix.unwrap_or_else(|| "_results.csv".to_string()),
            data_suffix: self.data_suffix.unwrap_or_else(|| "_data".to_string()),
            population_prefix: self
                .population_prefix
                .unwrap_or_else(|| "population_run_".to_string()),
            tsp_prefix: self.tsp_prefix.unwrap_or_else(|| "results_".to_string()),
            tsp_results_file: self
                .tsp_results_file
                .unwrap_or_else(|| "results.csv".to_string()),
            tsp_routes_file: self
                .tsp_routes_file
                .unwrap_or_else(|| "best_routes.csv".to_string()),
            tsp_data_dir: self.tsp_data_dir.unwrap_or_else(|| "data".to_string()),
            distance_history_prefix: self
                .distance_history_prefix
                .unwrap_or_else(|| "distance_history_run_".to_string()),
            route_history_prefix: self
                .route_history_prefix
                .unwrap_or_else(|| "route_history_run_".to_string()),
            parallel_threshold: self.parallel_threshold.unwrap_or(8),
        }
    }
}
