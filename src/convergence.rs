//! # Convergence Curves
//!
//! Best value per step for one run, and the mean of those curves across the
//! runs of one algorithm. Steps nobody recorded are `None` rather than a
//! placeholder number.
//!
//! ```rust
//! use runsummary::convergence::mean_curve;
//!
//! let curve = mean_curve(&[
//!     vec![Some(3.0), Some(2.0), Some(1.0)],
//!     vec![Some(5.0), Some(4.0)],
//! ]);
//! assert_eq!(curve, vec![Some(4.0), Some(3.0), Some(1.0)]);
//! ```

use crate::error::{AnalysisError, Result};
use crate::records::RunHistory;

/// Lowest value at each step `0..=last_step` of `history`.
///
/// The curve runs to the last step on any row whose step parsed, so a final
/// step with only malformed rows shows up as `None`.
///
/// # Errors
///
/// Returns `AnalysisError::Parse` if the last step is beyond the number of
/// rows read. Every step writes at least one row, so such an index is corrupt.
pub fn best_per_step(history: &RunHistory) -> Result<Vec<Option<f64>>> {
    let Some(last) = history.last_step() else {
        return Ok(Vec::new());
    };
    let rows = history.samples().len() + history.skipped();
    let len = usize::try_from(last)
        .ok()
        .and_then(|last| last.checked_add(1))
        .filter(|&len| len <= rows)
        .ok_or_else(|| {
            AnalysisError::Parse(format!(
                "run {}: step {} is beyond the {} rows read",
                history.run, last, rows
            ))
        })?;

    let mut curve: Vec<Option<f64>> = vec![None; len];
    for sample in history.samples() {
        // Bounded by `len` since every sample step is at most `last`.
        let slot = &mut curve[sample.step as usize];
        *slot = Some(slot.map_or(sample.value, |v| v.min(sample.value)));
    }
    Ok(curve)
}

/// Per-step mean over the curves that have a value at that step.
pub fn mean_curve(curves: &[Vec<Option<f64>>]) -> Vec<Option<f64>> {
    let len = curves.iter().map(Vec::len).max().unwrap_or(0);
    (0..len)
        .map(|step| {
            let (sum, count) = curves
                .iter()
                .filter_map(|c| c.get(step).copied().flatten())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (count > 0).then(|| sum / count as f64)
        })
        .collect()
}
