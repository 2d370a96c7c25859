//! Errors raised when a sample violates the preconditions of the statistics

use thiserror::Error;

/// Errors that can occur while computing sample statistics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Sample is empty")]
    EmptySample,

    #[error("Sample contains a non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    #[error("Sample is not sorted ascending at index {index}")]
    Unsorted { index: usize },

    #[error("Whisker multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),

    #[error("Probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),
}

/// Result type for statistics operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Check that a sample is non-empty, finite and sorted ascending
pub fn validate_sorted(sample: &[f64]) -> StatsResult<()> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if let Some(index) = sample.iter().position(|x| !x.is_finite()) {
        return Err(StatsError::NonFiniteValue { index });
    }
    if let Some(index) = sample.windows(2).position(|w| w[0] > w[1]) {
        return Err(StatsError::Unsorted { index: index + 1 });
    }
    Ok(())
}
