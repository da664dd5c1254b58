use rayon::prelude::*;
use tracing::{info, warn};

use crate::discovery::{natural_cmp, FolderFailure};
use crate::error::Result;

/// Per-folder summaries in discovery order, and the folders that failed.
#[derive(Debug)]
pub struct Rollup<T> {
    pub rows: Vec<T>,
    pub failures: Vec<FolderFailure>,
}

impl<T> Default for Rollup<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Rollup<T> {
    /// True when no folder failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Runs `summarize` on every unit and splits the outcomes into rows and failures.
    ///
    /// Units are processed on the rayon pool once there are at least
    /// `parallel_threshold` of them. Rows keep the order of `units` either way.
    pub fn collect<U, L, F>(units: &[U], parallel_threshold: usize, label: L, summarize: F) -> Self
    where
        U: Sync,
        T: Send,
        L: Fn(&U) -> String + Sync,
        F: Fn(&U) -> Result<T> + Sync,
    {
        let outcomes: Vec<(String, Result<T>)> = if units.len() >= parallel_threshold {
            units
                .par_iter()
                .map(|unit| (label(unit), summarize(unit)))
                .collect()
        } else {
            units
                .iter()
                .map(|unit| (label(unit), summarize(unit)))
                .collect()
        };

        let mut rollup = Self::default();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(row) => {
                    info!(folder = %name, "summarized");
                    rollup.rows.push(row);
                }
                Err(error) => {
                    warn!(folder = %name, error = %error, "folder failed");
                    rollup.failures.push(FolderFailure::new(name, error));
                }
            }
        }
        rollup
    }

    /// Adds failures found before processing, e.g. folders whose names did not decode.
    pub fn with_failures(mut self, failures: Vec<FolderFailure>) -> Self {
        self.failures.extend(failures);
        self.failures
            .sort_by(|a, b| natural_cmp(&a.folder, &b.folder));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn halve(n: &u32) -> Result<u32> {
        if n % 2 == 0 {
            Ok(n / 2)
        } else {
            Err(AnalysisError::Other(format!("{} is odd", n)))
        }
    }

    #[test]
    fn test_failures_do_not_abort_siblings() {
        let rollup = Rollup::collect(&[2, 3, 8, 5, 10], 100, |n| format!("f{}", n), halve);
        assert_eq!(rollup.rows, vec![1, 4, 5]);
        let failed: Vec<&str> = rollup.failures.iter().map(|f| f.folder.as_str()).collect();
        assert_eq!(failed, vec!["f3", "f5"]);
        assert!(!rollup.is_complete());
    }

    #[test]
    fn test_parallel_keeps_order() {
        let units: Vec<u32> = (0..200).map(|n| n * 2).collect();
        let rollup = Rollup::collect(&units, 1, |n| n.to_string(), halve);
        assert_eq!(rollup.rows, (0..200).collect::<Vec<u32>>());
        assert!(rollup.is_complete());
    }

    #[test]
    fn test_with_failures_sorted_naturally() {
        let rollup = Rollup::collect(&[1u32], 100, |_| "results_10".to_string(), halve)
            .with_failures(vec![FolderFailure::new("results_2", AnalysisError::EmptyInput)]);
        let failed: Vec<&str> = rollup.failures.iter().map(|f| f.folder.as_str()).collect();
        assert_eq!(failed, vec!["results_2", "results_10"]);
    }
}
