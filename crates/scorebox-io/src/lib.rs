//! scorebox-io - Tournament results I/O
//!
//! This crate reads the two inputs of the score box plot:
//!
//! - **Results**: one row per player with a bracketed list of raw scores
//! - **Cheaters**: a single `player` column naming the alternate-palette group
//!
//! # Design
//!
//! Rows are validated at parse time into typed [`PlayerRecord`]s. Scores are
//! normalised per game and sorted once on load, so downstream code only ever
//! sees finite, ascending samples. All sources implement the
//! [`ResultsSource`] trait for uniform access.

pub mod csv_reader;
pub mod reader;
pub mod record;

pub use csv_reader::*;
pub use reader::*;
pub use record::*;
