//! Whisker reach and outlier partition
//!
//! The whiskers of a box plot extend from the quartiles to the most extreme
//! sample values that still lie within `k * IQR` of the box. Values beyond
//! that window are outliers.

use serde::{Deserialize, Serialize};

use crate::error::{validate_sorted, StatsError, StatsResult};
use crate::quantile::quantile_unchecked;

/// Conventional whisker multiplier
pub const TUKEY_K: f64 = 1.5;

/// Indices of the outermost in-range values of a sorted sample
///
/// Values at indices below `low` or above `high` are outliers; values in
/// `low..=high` are covered by the whiskers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiskerReach {
    pub low: usize,
    pub high: usize,
}

impl WhiskerReach {
    /// Number of values covered by the whiskers
    pub fn covered(&self) -> usize {
        self.high - self.low + 1
    }

    /// Check if the value at `index` is an outlier
    pub fn is_outlier(&self, index: usize) -> bool {
        index < self.low || index > self.high
    }
}

/// Find the whisker reach of a sorted sample for multiplier `k`
///
/// Both scans are clamped to the sample bounds, so the result is always a
/// pair of valid indices with `low <= high`.
pub fn whisker_reach(sample: &[f64], k: f64) -> StatsResult<WhiskerReach> {
    validate_sorted(sample)?;
    check_multiplier(k)?;

    let q1 = quantile_unchecked(sample, 0.25);
    let q3 = quantile_unchecked(sample, 0.75);
    Ok(reach_between(sample, q1, q3, k))
}

fn check_multiplier(k: f64) -> StatsResult<()> {
    if !k.is_finite() || k < 0.0 {
        return Err(StatsError::InvalidMultiplier(k));
    }
    Ok(())
}

fn reach_between(sample: &[f64], q1: f64, q3: f64, k: f64) -> WhiskerReach {
    let reach = (q3 - q1) * k;
    let last = sample.len() - 1;

    let low = sample
        .iter()
        .position(|&v| v >= q1 - reach)
        .unwrap_or(last);
    let high = sample
        .iter()
        .rposition(|&v| v <= q3 + reach)
        .unwrap_or(0);

    // With k = 0 a two-value sample has no value inside [q1, q3] and the
    // scans cross; fall back to covering the span between them.
    WhiskerReach {
        low: low.min(high),
        high: high.max(low),
    }
}

/// Box-and-whisker statistics for one sorted sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Number of values in the sample
    pub count: usize,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Multiplier the reach was computed with
    pub k: f64,
    /// Whisker indices into the sample
    pub reach: WhiskerReach,
    /// Lowest in-range value
    pub whisker_low: f64,
    /// Highest in-range value
    pub whisker_high: f64,
    /// Values below the lower whisker, ascending
    pub low_outliers: Vec<f64>,
    /// Values above the upper whisker, ascending
    pub high_outliers: Vec<f64>,
}

impl BoxStats {
    /// Compute the statistics of a sorted sample
    pub fn from_sorted(sample: &[f64], k: f64) -> StatsResult<Self> {
        validate_sorted(sample)?;
        check_multiplier(k)?;

        let q1 = quantile_unchecked(sample, 0.25);
        let median = quantile_unchecked(sample, 0.5);
        let q3 = quantile_unchecked(sample, 0.75);
        let reach = reach_between(sample, q1, q3, k);

        Ok(Self {
            count: sample.len(),
            q1,
            median,
            q3,
            k,
            reach,
            whisker_low: sample[reach.low],
            whisker_high: sample[reach.high],
            low_outliers: sample[..reach.low].to_vec(),
            high_outliers: sample[reach.high + 1..].to_vec(),
        })
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// All outliers, low ones first
    pub fn outliers(&self) -> impl Iterator<Item = f64> + '_ {
        self.low_outliers
            .iter()
            .chain(self.high_outliers.iter())
            .copied()
    }

    /// Number of outliers on both sides
    pub fn outlier_count(&self) -> usize {
        self.low_outliers.len() + self.high_outliers.len()
    }
}
