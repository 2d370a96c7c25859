//! scorebox-stats - Box-and-whisker statistics for score distributions
//!
//! This crate provides the pure statistical kernel behind the box plot:
//!
//! - **Quantiles**: linear-interpolation quantile estimation over sorted samples
//! - **Whisker reach**: Tukey-style reach window and outlier partition
//! - **Summary**: extents across a collection of samples
//!
//! # Design Philosophy
//!
//! Every function takes an already sorted sample and never mutates it.
//! Results depend only on the input, so callers are free to recompute
//! statistics on every render pass instead of caching them.

pub mod error;
pub mod quantile;
pub mod summary;
pub mod whisker;

pub use error::*;
pub use quantile::*;
pub use summary::*;
pub use whisker::*;
