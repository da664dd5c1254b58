//! # TSP Aggregator
//!
//! The TSP solver writes one `results_<pop>_<gens>_<cr>_<mr>_<t0>_<cool>_<cities>`
//! folder per parameter set:
//!
//! ```text
//! results_50_500_0.8_0.1_1000_0.99_50/
//!     results.csv                         Run,BestDistance,Time(s)
//!     best_routes.csv                     Run,Route
//!     data/distance_history_run_<k>.csv   iteration,distance
//!     data/route_history_run_<k>.csv      x y,x y,...  (one line per iteration)
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::{debug, instrument};

use super::{load_histories, AnalysisOptions, ResultsSummary, Rollup};
use crate::discovery::{discover_folders, ExperimentFolder, TspNaming, TspParams};
use crate::error::{AnalysisError, Result};
use crate::records::results::load_results;
use crate::records::route::{extract_route, load_route_history, load_route_table};
use crate::records::{HistoryLayout, RunId, Tour};
use crate::selection::{BestRun, BestRunSelector, TerminalPolicy};

/// Distance and time statistics of one parameter set, and its optimal route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TspSummary {
    pub folder: String,
    pub params: TspParams,
    #[serde(flatten)]
    pub results: ResultsSummary,
    /// Tour of the run with the lowest `BestDistance`.
    pub route: Tour,
}

/// The best run of one parameter set by final distance, with its route snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TspProcess {
    pub folder: String,
    pub params: TspParams,
    pub best: BestRun,
    /// Tour at each recorded iteration of the best run.
    pub snapshots: Vec<Tour>,
}

fn summarize_folder(folder: &ExperimentFolder<TspParams>, options: &AnalysisOptions) -> Result<TspSummary> {
    let results_path = folder.path.join(options.get_tsp_results_file());
    let parsed = load_results(&results_path)?;
    let results = ResultsSummary::from_parsed(&parsed, &results_path.display().to_string())?;

    let routes = load_route_table(&folder.path.join(options.get_tsp_routes_file()))?;
    let route = extract_route(&routes.records, results.best.run)?;

    debug!(
        folder = %folder.name,
        run = results.best.run,
        distance = results.best.objective,
        cities = route.len(),
        "extracted optimal route"
    );
    Ok(TspSummary {
        folder: folder.name.clone(),
        params: folder.params,
        results,
        route,
    })
}

fn process_folder(
    folder: &ExperimentFolder<TspParams>,
    selector: &BestRunSelector,
    options: &AnalysisOptions,
) -> Result<TspProcess> {
    let data_dir = folder.path.join(options.get_tsp_data_dir());
    let histories = load_histories(
        &data_dir,
        &options.distance_history_pattern(),
        &HistoryLayout::distance_history(),
    )?;
    let keys: Vec<(RunId, String)> = histories
        .iter()
        .map(|(key, history)| (history.run, key.clone()))
        .collect();

    let best = selector.select(histories.into_iter().map(|(_, history)| history))?;

    // Route snapshots live under the same key as the winning distance history.
    let key = keys
        .iter()
        .find(|(run, _)| *run == best.run)
        .map(|(_, key)| key.as_str())
        .ok_or(AnalysisError::MissingRun(best.run))?;
    let route_path = data_dir.join(options.route_history_pattern().file_name(key));
    let snapshots = load_route_history(&route_path)?;

    Ok(TspProcess {
        folder: folder.name.clone(),
        params: folder.params,
        best,
        snapshots,
    })
}

/// Summary of every TSP folder under `root`, in natural folder order.
///
/// # Errors
///
/// Returns `AnalysisError::Io` only if `root` cannot be listed. Folders whose
/// name does not decode, whose tables are missing or malformed, or whose
/// optimal run has no route are reported in `Rollup::failures`.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn summarize_tsp(root: &Path, options: &AnalysisOptions) -> Result<Rollup<TspSummary>> {
    let discovery = discover_folders(root, &TspNaming::new(options.get_tsp_prefix()))?;
    let rollup = Rollup::collect(
        &discovery.folders,
        options.get_parallel_threshold(),
        |folder| folder.name.clone(),
        |folder| summarize_folder(folder, options),
    );
    Ok(rollup.with_failures(discovery.failures))
}

/// Best run by final distance of every TSP folder under `root` that has a data subfolder.
///
/// Folders without the data subfolder are not candidates and are skipped silently.
///
/// # Errors
///
/// Returns `AnalysisError::Io` only if `root` cannot be listed.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn summarize_tsp_processes(root: &Path, options: &AnalysisOptions) -> Result<Rollup<TspProcess>> {
    let discovery = discover_folders(root, &TspNaming::new(options.get_tsp_prefix()))?;
    let folders: Vec<ExperimentFolder<TspParams>> = discovery
        .folders
        .into_iter()
        .filter(|folder| folder.path.join(options.get_tsp_data_dir()).is_dir())
        .collect();
    let selector = BestRunSelector::new(TerminalPolicy::RequireUnique);

    let rollup = Rollup::collect(
        &folders,
        options.get_parallel_threshold(),
        |folder| folder.name.clone(),
        |folder| process_folder(folder, &selector, options),
    );
    Ok(rollup.with_failures(discovery.failures))
}

/// Labels each parameter set by the parameters that vary across `params`,
/// e.g. `Pop:50 Gens:200`. Empty labels if nothing varies.
pub fn parameter_labels(params: &[TspParams]) -> Vec<String> {
    let fields: [(&str, fn(&TspParams) -> String); 7] = [
        ("Pop", |p| p.pop_size.to_string()),
        ("Gens", |p| p.generations.to_string()),
        ("CR", |p| p.cross_rate.to_string()),
        ("MR", |p| p.mutation_rate.to_string()),
        ("InitT", |p| p.initial_temp.to_string()),
        ("CoolingR", |p| p.cooling_rate.to_string()),
        ("Cities", |p| p.cities.to_string()),
    ];

    let varying: Vec<&(&str, fn(&TspParams) -> String)> = fields
        .iter()
        .filter(|(_, value)| {
            let mut values = params.iter().map(value);
            match values.next() {
                Some(first) => values.any(|v| v != first),
                None => false,
            }
        })
        .collect();

    params
        .iter()
        .map(|p| {
            varying
                .iter()
                .map(|(name, value)| format!("{}:{}", name, value(p)))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Point;
    use std::fs;

    const FOLDER: &str = "results_50_500_0.8_0.1_1000_0.99_3";

    fn write_folder(root: &Path, name: &str) -> std::path::PathBuf {
        let folder = root.join(name);
        fs::create_dir_all(folder.join("data")).unwrap();
        fs::write(
            folder.join("results.csv"),
            "Run,BestDistance,Time(s)\n0,14.0,1.0\n1,12.0,2.0\n2,12.0,3.0\n",
        )
        .unwrap();
        fs::write(
            folder.join("best_routes.csv"),
            "Run,Route\n0,0 0 4 0 4 3 \n1,0 0 3 0 3 4 \n2,3 4 3 0 0 0 \n",
        )
        .unwrap();
        folder
    }

    #[test]
    fn test_summarize_tsp_picks_first_best_route() {
        let root = tempfile::tempdir().unwrap();
        write_folder(root.path(), FOLDER);

        let rollup = summarize_tsp(root.path(), &AnalysisOptions::default()).unwrap();
        assert!(rollup.is_complete());
        let summary = &rollup.rows[0];
        assert_eq!(summary.folder, FOLDER);
        assert_eq!(summary.params.cities, 3);
        assert_eq!(summary.results.objective.min, 12.0);
        assert_eq!(summary.results.objective.max, 14.0);
        assert_eq!(summary.results.time.mean, 2.0);
        assert_eq!(summary.results.best.run, 1);
        assert_eq!(
            summary.route.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(3.0, 4.0)
            ]
        );
        assert!((summary.route.length() - summary.results.best.objective).abs() < 1e-9);
    }

    #[test]
    fn test_process_selects_best_history_and_loads_its_snapshots() {
        let root = tempfile::tempdir().unwrap();
        let data = write_folder(root.path(), FOLDER).join("data");
        fs::write(data.join("distance_history_run_0.csv"), "0,20.0\n1,14.0\n").unwrap();
        fs::write(data.join("distance_history_run_1.csv"), "0,18.0\n1,12.0\n").unwrap();
        fs::write(data.join("route_history_run_1.csv"), "0 0,3 4,3 0,\n0 0,3 0,3 4,\n").unwrap();

        let rollup = summarize_tsp_processes(root.path(), &AnalysisOptions::default()).unwrap();
        assert!(rollup.is_complete());
        let process = &rollup.rows[0];
        assert_eq!(process.best.run, 1);
        assert_eq!(process.best.final_value, 12.0);
        assert_eq!(process.snapshots.len(), 2);
        assert_eq!(process.snapshots[1].points()[1], Point::new(3.0, 0.0));
    }

    #[test]
    fn test_process_missing_snapshots_is_folder_failure() {
        let root = tempfile::tempdir().unwrap();
        let data = write_folder(root.path(), FOLDER).join("data");
        fs::write(data.join("distance_history_run_0.csv"), "0,20.0\n1,14.0\n").unwrap();

        let rollup = summarize_tsp_processes(root.path(), &AnalysisOptions::default()).unwrap();
        assert!(rollup.rows.is_empty());
        assert_eq!(rollup.failures.len(), 1);
        assert!(matches!(rollup.failures[0].error, AnalysisError::Io(_)));
    }

    #[test]
    fn test_parameter_labels_only_varying() {
        let base = TspParams::parse("50_500_0.8_0.1_1000_0.99_50").unwrap();
        let more_pop = TspParams {
            pop_size: 100,
            ..base
        };
        let more_gens = TspParams {
            generations: 1000,
            ..base
        };
        let labels = parameter_labels(&[base, more_pop, more_gens]);
        assert_eq!(
            labels,
            vec!["Pop:50 Gens:500", "Pop:100 Gens:500", "Pop:50 Gens:1000"]
        );

        assert_eq!(parameter_labels(&[base, base]), vec!["", ""]);
        assert!(parameter_labels(&[]).is_empty());
    }
}
