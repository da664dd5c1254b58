//! # Routes
//!
//! Tours are serialized by the TSP solver as flat coordinate strings: either
//! `x y x y ...` in the `Route` column of `best_routes.csv`, or `x y,x y,...,`
//! per line in a route history file. Both go through [`parse_route`], which
//! keeps the point order since that order is the tour.
//!
//! ```rust
//! use runsummary::records::{route::parse_route, Point};
//!
//! let tour = parse_route("0 0,3 0,3 4").unwrap();
//! assert_eq!(tour.points(), &[Point::new(0.0, 0.0), Point::new(3.0, 0.0), Point::new(3.0, 4.0)]);
//! assert_eq!(tour.length(), 12.0);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Parsed, RunId};
use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An ordered, implicitly closed sequence of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tour {
    points: Vec<Point>,
}

impl Tour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs including the closing edge from the last point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (&self.points[i], &self.points[(i + 1) % n]))
    }

    /// Euclidean length of the closed tour.
    pub fn length(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Parses a whitespace- and/or comma-delimited coordinate string into a tour.
///
/// # Errors
///
/// Returns `AnalysisError::MalformedRoute` if a token is not a finite number
/// or the token count is odd.
pub fn parse_route(serialized: &str) -> Result<Tour> {
    let coords = serialized
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    AnalysisError::MalformedRoute(format!("non-numeric token {:?}", token))
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    if coords.len() % 2 != 0 {
        return Err(AnalysisError::MalformedRoute(format!(
            "odd number of coordinates ({})",
            coords.len()
        )));
    }

    Ok(Tour::new(
        coords
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect(),
    ))
}

/// One row of `best_routes.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteRow {
    #[serde(rename = "Run")]
    pub run: RunId,
    #[serde(rename = "Route")]
    pub route: String,
}

/// Reads a `Run,Route` table. Rows whose run id does not parse are skipped and counted.
pub fn read_route_table<R: Read>(reader: R, origin: &str) -> Result<Parsed<RouteRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0;
    for row in rdr.deserialize::<RouteRow>() {
        match row {
            Ok(row) => records.push(row),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(origin, error = %e, "dropping malformed route row");
                skipped += 1;
            }
        }
    }
    Ok(Parsed::new(records, skipped))
}

/// Opens and reads the route table at `path`.
pub fn load_route_table(path: &Path) -> Result<Parsed<RouteRow>> {
    let file = File::open(path)?;
    read_route_table(file, &path.display().to_string())
}

/// Parses the route recorded for `run`. The first matching row is used.
///
/// # Errors
///
/// Returns `AnalysisError::MissingRun` if no row carries `run`, or
/// `AnalysisError::MalformedRoute` if its route does not parse.
pub fn extract_route(rows: &[RouteRow], run: RunId) -> Result<Tour> {
    let row = rows
        .iter()
        .find(|row| row.run == run)
        .ok_or(AnalysisError::MissingRun(run))?;
    parse_route(&row.route)
}

/// Reads a route history: one snapshot per non-blank line, in iteration order.
pub fn read_route_history<R: Read>(reader: R, origin: &str) -> Result<Vec<Tour>> {
    let mut snapshots = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let tour = parse_route(&line).map_err(|e| {
            AnalysisError::MalformedRoute(format!("{} line {}: {}", origin, idx + 1, e))
        })?;
        snapshots.push(tour);
    }
    debug!(origin, snapshots = snapshots.len(), "read route history");
    Ok(snapshots)
}

/// Opens and reads the route history at `path`.
pub fn load_route_history(path: &Path) -> Result<Vec<Tour>> {
    let file = File::open(path)?;
    read_route_history(file, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_keeps_order() {
        let tour = parse_route("0 0,3 0,3 4").unwrap();
        assert_eq!(
            tour.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(3.0, 4.0)
            ]
        );
    }

    #[test]
    fn test_parse_route_odd_count() {
        assert!(matches!(
            parse_route("0 0,3"),
            Err(AnalysisError::MalformedRoute(_))
        ));
    }

    #[test]
    fn test_parse_route_non_numeric() {
        for route in ["0 0 x 1", "nan inf 1 2", "0 0 1 infinity", "-inf 0"] {
            assert!(
                matches!(parse_route(route), Err(AnalysisError::MalformedRoute(_))),
                "{:?} should be rejected",
                route
            );
        }
    }

    #[test]
    fn test_parse_route_flat_with_trailing_space() {
        let tour = parse_route("1.5 2.5 3 4 ").unwrap();
        assert_eq!(tour.len(), 2);
        assert_eq!(tour.points()[1], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_tour_length_is_closed() {
        let tour = Tour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ]);
        assert_eq!(tour.edges().count(), 3);
        assert!((tour.length() - 12.0).abs() < 1e-12);
        assert_eq!(Tour::default().length(), 0.0);
    }

    #[test]
    fn test_extract_route() {
        let data = "Run,Route\n0,0 0 1 1 \n1,5 5 6 6 7 7 \n";
        let parsed = read_route_table(data.as_bytes(), "best_routes.csv").unwrap();
        let tour = extract_route(&parsed.records, 1).unwrap();
        assert_eq!(tour.len(), 3);
        assert_eq!(tour.points()[0], Point::new(5.0, 5.0));
        assert!(matches!(
            extract_route(&parsed.records, 9),
            Err(AnalysisError::MissingRun(9))
        ));
    }

    #[test]
    fn test_read_route_history() {
        let data = "0 0,1 0,1 1,\n\n0 0,1 1,1 0,\n";
        let snapshots = read_route_history(data.as_bytes(), "route_history_run_0.csv").unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].points()[1], Point::new(1.0, 1.0));
    }
}
