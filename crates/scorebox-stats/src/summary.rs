//! Extents across collections of samples
//!
//! The vertical axis of the plot spans the smallest and largest value over
//! every player's sample, so extents are computed across many samples at once.

use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` covered by some values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Create an extent, ordering the bounds
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Width of the interval
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value lies inside the interval
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Grow the extent to include `x`
    pub fn include(&mut self, x: f64) {
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// As a `[min, max]` pair
    pub fn to_array(&self) -> [f64; 2] {
        [self.min, self.max]
    }
}

/// Extent of the finite values of one sample
pub fn extent(values: &[f64]) -> Option<Extent> {
    extent_of(std::iter::once(values))
}

/// Extent of the finite values across many samples
///
/// Returns `None` when no sample contributes a finite value.
pub fn extent_of<'a>(samples: impl IntoIterator<Item = &'a [f64]>) -> Option<Extent> {
    samples
        .into_iter()
        .flat_map(|s| s.iter().copied())
        .filter(|x| x.is_finite())
        .fold(None, |acc: Option<Extent>, x| match acc {
            Some(mut e) => {
                e.include(x);
                Some(e)
            }
            None => Some(Extent { min: x, max: x }),
        })
}
