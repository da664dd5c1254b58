//! Population snapshots: the coordinates of every individual, grouped by
//! generation, from a `Generation,Fitness,x1,x2,...` file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};

const GENERATION_COLUMN: &str = "Generation";

/// The individuals of one generation, each as its coordinate vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSnapshot {
    pub generation: u64,
    pub individuals: Vec<Vec<f64>>,
}

/// Coordinate columns in order: `x1`, `x2`, ... as far as they run consecutively.
fn coordinate_columns(headers: &csv::StringRecord) -> Vec<usize> {
    let mut columns = Vec::new();
    for n in 1.. {
        let name = format!("x{}", n);
        match headers.iter().position(|h| h == name) {
            Some(idx) => columns.push(idx),
            None => break,
        }
    }
    columns
}

/// Reads population snapshots in order of each generation's first row.
///
/// Rows whose generation or any coordinate is not a finite number are
/// dropped and logged.
///
/// # Errors
///
/// Returns `AnalysisError::Parse` if the `Generation` column or `x1` is
/// missing, and `AnalysisError::Csv` on reader failure.
pub fn read_population<R: Read>(reader: R, origin: &str) -> Result<Vec<PopulationSnapshot>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let generation_idx = headers
        .iter()
        .position(|h| h == GENERATION_COLUMN)
        .ok_or_else(|| {
            AnalysisError::Parse(format!("{}: missing column {:?}", origin, GENERATION_COLUMN))
        })?;
    let coordinates = coordinate_columns(&headers);
    if coordinates.is_empty() {
        return Err(AnalysisError::Parse(format!(
            "{}: no coordinate columns x1, x2, ...",
            origin
        )));
    }

    let mut snapshots: Vec<PopulationSnapshot> = Vec::new();
    let mut skipped = 0;
    for row in rdr.records() {
        let row = row?;
        let generation = row.get(generation_idx).and_then(|g| g.parse::<u64>().ok());
        let point: Option<Vec<f64>> = coordinates
            .iter()
            .map(|&idx| {
                row.get(idx)
                    .and_then(|v| v.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect();

        let (Some(generation), Some(point)) = (generation, point) else {
            skipped += 1;
            continue;
        };
        match snapshots.iter_mut().find(|s| s.generation == generation) {
            Some(snapshot) => snapshot.individuals.push(point),
            None => snapshots.push(PopulationSnapshot {
                generation,
                individuals: vec![point],
            }),
        }
    }

    if skipped > 0 {
        warn!(origin, skipped, "dropped malformed population rows");
    }
    debug!(origin, generations = snapshots.len(), "read population snapshots");
    Ok(snapshots)
}

/// Opens and reads the population file at `path`.
pub fn load_population(path: &Path) -> Result<Vec<PopulationSnapshot>> {
    let file = File::open(path)?;
    read_population(file, &path.display().to_string())
}
