//! Results tables: one row per run with its best objective value and elapsed time.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Parsed, RunId};
use crate::error::{AnalysisError, Result};

const RUN_COLUMN: &str = "Run";
const OBJECTIVE_COLUMNS: [&str; 2] = ["BestFitness", "BestDistance"];
const TIME_COLUMN: &str = "Time(s)";

/// One row of a results table.
///
/// Reads either `BestFitness` (function optimization) or `BestDistance` (TSP)
/// into `objective`; both are minimized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RunResult {
    #[serde(rename(deserialize = "Run"))]
    pub run: RunId,
    #[serde(rename(deserialize = "BestFitness"), alias = "BestDistance")]
    pub objective: f64,
    #[serde(rename(deserialize = "Time(s)"))]
    pub time_secs: f64,
}

impl RunResult {
    pub fn new(run: RunId, objective: f64, time_secs: f64) -> Self {
        Self {
            run,
            objective,
            time_secs,
        }
    }
}

/// Reads a results table from `reader`. `origin` names the source in errors and logs.
///
/// # Errors
///
/// Returns `AnalysisError::Parse` if a required column is missing, or
/// `AnalysisError::Csv` if the underlying reader fails. Rows with a
/// non-numeric field are skipped and counted.
pub fn read_results<R: Read>(reader: R, origin: &str) -> Result<Parsed<RunResult>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has = |name: &str| headers.iter().any(|h| h == name);
    if !has(RUN_COLUMN) || !has(TIME_COLUMN) || !OBJECTIVE_COLUMNS.iter().any(|c| has(c)) {
        return Err(AnalysisError::Parse(format!(
            "{}: expected columns {}, {} or {}, and {}; found {:?}",
            origin, RUN_COLUMN, OBJECTIVE_COLUMNS[0], OBJECTIVE_COLUMNS[1], TIME_COLUMN, headers
        )));
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in rdr.deserialize::<RunResult>() {
        match row {
            Ok(record) if record.objective.is_nan() || record.time_secs.is_nan() => {
                warn!(origin, run = record.run, "dropping row with NaN value");
                skipped += 1;
            }
            Ok(record) => records.push(record),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(origin, error = %e, "dropping malformed results row");
                skipped += 1;
            }
        }
    }

    debug!(origin, rows = records.len(), skipped, "read results table");
    Ok(Parsed::new(records, skipped))
}

/// Opens and reads the results table at `path`.
pub fn load_results(path: &Path) -> Result<Parsed<RunResult>> {
    let file = File::open(path)?;
    read_results(file, &path.display().to_string())
}

/// Best run of a results table: lowest objective, first row wins exact ties.
pub fn best_result(results: &[RunResult]) -> Option<&RunResult> {
    let mut best: Option<&RunResult> = None;
    for candidate in results {
        match best {
            Some(current) if candidate.objective < current.objective => best = Some(candidate),
            None => best = Some(candidate),
            Some(_) => {}
        }
    }
    best
}

/// Objective column of `results`, in row order.
pub fn objectives(results: &[RunResult]) -> Vec<f64> {
    results.iter().map(|r| r.objective).collect()
}

/// Time column of `results`, in row order.
pub fn times(results: &[RunResult]) -> Vec<f64> {
    results.iter().map(|r| r.time_secs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_fitness_table() {
        let data = "Run,BestFitness,Time(s)\n1,1.5,0.1\n2,0.5,0.2\n";
        let parsed = read_results(data.as_bytes(), "ga_results.csv").unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.records,
            vec![RunResult::new(1, 1.5, 0.1), RunResult::new(2, 0.5, 0.2)]
        );
    }

    #[test]
    fn test_read_distance_table() {
        let data = "Run,BestDistance,Time(s)\n0,812.4,3.2\n1,799.0,3.4\n";
        let parsed = read_results(data.as_bytes(), "results.csv").unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].objective, 799.0);
    }

    #[test]
    fn test_malformed_rows_are_counted() {
        let data = "Run,BestFitness,Time(s)\n1,abc,0.1\n2,0.5,0.2\n3,nan,0.3\n";
        let parsed = read_results(data.as_bytes(), "pso_results.csv").unwrap();
        assert_eq!(parsed.records, vec![RunResult::new(2, 0.5, 0.2)]);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let data = "Run,Fitness\n1,0.5\n";
        let result = read_results(data.as_bytes(), "de_results.csv");
        match result {
            Err(AnalysisError::Parse(msg)) => assert!(msg.contains("de_results.csv")),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_best_result_first_wins_ties() {
        let results = vec![
            RunResult::new(0, 4.0, 1.0),
            RunResult::new(1, 3.0, 1.0),
            RunResult::new(2, 3.0, 1.0),
        ];
        assert_eq!(best_result(&results).map(|r| r.run), Some(1));
        assert!(best_result(&[]).is_none());
    }
}
