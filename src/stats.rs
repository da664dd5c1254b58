//! # Scalar Aggregation
//!
//! `AggregateStat` summarizes a series of samples (best fitness values, best
//! distances, elapsed times) with its mean, extremes and Bessel-corrected
//! sample variance.
//!
//! ## Example
//!
//! ```rust
//! use runsummary::stats::AggregateStat;
//!
//! let stat = AggregateStat::from_samples(&[1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(stat.mean, 2.0);
//! assert_eq!(stat.min, 1.0);
//! assert_eq!(stat.max, 3.0);
//! assert_eq!(stat.variance, 1.0);
//! ```

use serde::Serialize;

use crate::error::{AnalysisError, Result};

/// Descriptive statistics of a scalar series.
///
/// Always computed from the samples on demand; nothing holds on to a stale copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStat {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Sample variance with the n-1 divisor. NaN for a single sample.
    pub variance: f64,
}

impl AggregateStat {
    /// Summarizes `samples`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::EmptyInput` if `samples` is empty, or
    /// `AnalysisError::Parse` if a sample is NaN.
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        let (&first, rest) = samples.split_first().ok_or(AnalysisError::EmptyInput)?;
        if let Some(pos) = samples.iter().position(|x| x.is_nan()) {
            return Err(AnalysisError::Parse(format!("NaN sample at position {}", pos)));
        }

        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(min, max, sum), &x| {
                (min.min(x), max.max(x), sum + x)
            });

        let count = samples.len();
        let mean = sum / count as f64;

        let variance = if count < 2 {
            f64::NAN
        } else {
            let squares: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
            squares / (count - 1) as f64
        };

        Ok(Self {
            count,
            // Rounding can push a constant series' mean a ulp outside [min, max].
            mean: mean.clamp(min, max),
            min,
            max,
            variance,
        })
    }

    /// Sample standard deviation. NaN whenever the variance is.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Standard deviation for drawing error bars, with an undefined spread drawn as zero.
    pub fn error_bar(&self) -> f64 {
        let sd = self.std_dev();
        if sd.is_nan() {
            0.0
        } else {
            sd
        }
    }
}
