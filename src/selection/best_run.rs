use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::records::{RunHistory, RunId};

/// How a run's final value is read from the rows at its last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalPolicy {
    /// One value per step (TSP iterations). Distinct values at the last step are an error.
    #[default]
    RequireUnique,
    /// One row per individual (function-optimization generations). The lowest value wins.
    BestOfLast,
}

/// The winning run of a folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestRun {
    pub run: RunId,
    pub history: RunHistory,
    pub final_value: f64,
    /// Runs that had a terminal value and took part in the comparison.
    pub considered: usize,
    /// Runs left out because no valid row remained at their last step.
    pub excluded: usize,
}

/// Picks the run with the lowest final value across a folder's histories.
///
/// Comparison is strictly less-than, so the first run encountered wins exact ties.
///
/// # Examples
///
/// ```
/// use runsummary::records::{RunHistory, Sample};
/// use runsummary::selection::{BestRunSelector, TerminalPolicy};
///
/// let runs = vec![
///     RunHistory::from_samples(0, vec![Sample::new(0, 9.0), Sample::new(1, 5.0)]),
///     RunHistory::from_samples(1, vec![Sample::new(0, 8.0), Sample::new(1, 3.2)]),
/// ];
/// let best = BestRunSelector::new(TerminalPolicy::RequireUnique).select(runs).unwrap();
/// assert_eq!(best.run, 1);
/// assert_eq!(best.final_value, 3.2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BestRunSelector {
    policy: TerminalPolicy,
}

impl BestRunSelector {
    pub fn new(policy: TerminalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TerminalPolicy {
        self.policy
    }

    /// Final value of `history` under this selector's policy.
    ///
    /// `Ok(None)` means the run has no valid row at its last step.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::AmbiguousTerminalState` under
    /// `TerminalPolicy::RequireUnique` when the last step carries more than
    /// one distinct value.
    pub fn terminal_value(&self, history: &RunHistory) -> Result<Option<f64>> {
        let values = history.terminal_values();
        if values.is_empty() {
            return Ok(None);
        }

        match self.policy {
            TerminalPolicy::RequireUnique => {
                let mut seen = HashSet::new();
                let distinct: Vec<f64> = values
                    .iter()
                    .copied()
                    .filter(|v| seen.insert(normalized_bits(*v)))
                    .collect();
                if distinct.len() > 1 {
                    return Err(AnalysisError::AmbiguousTerminalState {
                        run: history.run,
                        step: history.last_step().unwrap_or_default(),
                        values: distinct,
                    });
                }
                Ok(Some(distinct[0]))
            }
            TerminalPolicy::BestOfLast => Ok(values.into_iter().reduce(f64::min)),
        }
    }

    /// Selects the best of `runs`, visited in iteration order.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NoValidRuns` if no run has a terminal value,
    /// and propagates `AnalysisError::AmbiguousTerminalState`.
    pub fn select<I>(&self, runs: I) -> Result<BestRun>
    where
        I: IntoIterator<Item = RunHistory>,
    {
        let mut best: Option<(RunHistory, f64)> = None;
        let mut considered = 0;
        let mut excluded = 0;

        for history in runs {
            let Some(value) = self.terminal_value(&history)? else {
                warn!(
                    run = history.run,
                    skipped = history.skipped(),
                    "excluding run without a valid terminal value"
                );
                excluded += 1;
                continue;
            };
            considered += 1;

            let improves = match &best {
                Some((_, current)) => value < *current,
                None => true,
            };
            if improves {
                best = Some((history, value));
            }
        }

        let (history, final_value) = best.ok_or_else(|| {
            AnalysisError::NoValidRuns(format!(
                "none of {} runs has a valid terminal value",
                excluded
            ))
        })?;

        debug!(run = history.run, final_value, considered, excluded, "selected best run");
        Ok(BestRun {
            run: history.run,
            history,
            final_value,
            considered,
            excluded,
        })
    }
}

/// Bit pattern for set membership that treats `0.0` and `-0.0` as the same value.
fn normalized_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{HistoryLayout, Sample};

    fn run(id: RunId, values: &[f64]) -> RunHistory {
        RunHistory::from_samples(
            id,
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Sample::new(i as u64, *v))
                .collect(),
        )
    }

    #[test]
    fn test_lower_final_distance_wins() {
        let selector = BestRunSelector::default();
        let best = selector
            .select(vec![run(0, &[9.0, 5.0]), run(1, &[9.0, 3.2])])
            .unwrap();
        assert_eq!(best.run, 1);
        assert_eq!(best.final_value, 3.2);
        assert_eq!(best.considered, 2);
        assert_eq!(best.excluded, 0);
    }

    #[test]
    fn test_first_run_wins_ties() {
        let selector = BestRunSelector::default();
        let best = selector
            .select(vec![run(7, &[6.0, 4.0]), run(3, &[5.0, 4.0])])
            .unwrap();
        assert_eq!(best.run, 7);
    }

    #[test]
    fn test_final_value_is_last_step_not_minimum() {
        // Run 0 dips to 1.0 mid-way but ends at 6.0.
        let selector = BestRunSelector::default();
        let best = selector
            .select(vec![run(0, &[9.0, 1.0, 6.0]), run(1, &[9.0, 5.0, 5.0])])
            .unwrap();
        assert_eq!(best.run, 1);
    }

    #[test]
    fn test_last_step_is_max_step_not_last_row() {
        let history = RunHistory::from_samples(
            0,
            vec![Sample::new(2, 1.0), Sample::new(0, 9.0), Sample::new(1, 4.0)],
        );
        let value = BestRunSelector::default().terminal_value(&history).unwrap();
        assert_eq!(value, Some(1.0));
    }

    #[test]
    fn test_malformed_terminal_row_excludes_only_run() {
        let data = "0,10.0\n1,8.0\n2,abc\n";
        let history =
            RunHistory::read(0, data.as_bytes(), &HistoryLayout::distance_history(), "t").unwrap();
        let result = BestRunSelector::default().select(vec![history]);
        assert!(matches!(result, Err(AnalysisError::NoValidRuns(_))));
    }

    #[test]
    fn test_malformed_terminal_row_excludes_run_but_others_compete() {
        let data = "0,10.0\n1,1.0\n2,abc\n";
        let broken =
            RunHistory::read(0, data.as_bytes(), &HistoryLayout::distance_history(), "t").unwrap();
        let best = BestRunSelector::default()
            .select(vec![broken, run(1, &[10.0, 7.0, 6.0])])
            .unwrap();
        assert_eq!(best.run, 1);
        assert_eq!(best.excluded, 1);
        assert_eq!(best.considered, 1);
    }

    #[test]
    fn test_ambiguous_terminal_state() {
        let history = RunHistory::from_samples(
            4,
            vec![Sample::new(0, 9.0), Sample::new(1, 5.0), Sample::new(1, 6.0)],
        );
        match BestRunSelector::default().select(vec![history]) {
            Err(AnalysisError::AmbiguousTerminalState { run, step, values }) => {
                assert_eq!(run, 4);
                assert_eq!(step, 1);
                assert_eq!(values, vec![5.0, 6.0]);
            }
            other => panic!("Expected AmbiguousTerminalState, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_equal_terminal_rows_are_not_ambiguous() {
        let history = RunHistory::from_samples(
            0,
            vec![Sample::new(1, 5.0), Sample::new(1, 5.0)],
        );
        assert_eq!(
            BestRunSelector::default().terminal_value(&history).unwrap(),
            Some(5.0)
        );

        let signed_zero = RunHistory::from_samples(0, vec![Sample::new(3, 0.0), Sample::new(3, -0.0)]);
        assert_eq!(
            BestRunSelector::default().terminal_value(&signed_zero).unwrap(),
            Some(0.0)
        );
    }

    #[test]
    fn test_best_of_last_generation() {
        let history = RunHistory::from_samples(
            0,
            vec![
                Sample::new(0, 0.5),
                Sample::new(1, 3.0),
                Sample::new(1, 2.0),
                Sample::new(1, 4.0),
            ],
        );
        let selector = BestRunSelector::new(TerminalPolicy::BestOfLast);
        assert_eq!(selector.terminal_value(&history).unwrap(), Some(2.0));
    }

    #[test]
    fn test_empty_input_has_no_valid_runs() {
        let result = BestRunSelector::default().select(Vec::new());
        assert!(matches!(result, Err(AnalysisError::NoValidRuns(_))));
    }
}
