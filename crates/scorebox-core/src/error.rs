//! Error types for scorebox-core
//!
//! Provides error handling for:
//! - Dataset loading and statistics
//! - Scene updates
//! - Export failures
//! - Configuration

use scorebox_io::IoError;
use scorebox_stats::StatsError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scorebox operations
#[derive(Error, Debug)]
pub enum ScoreboxError {
    /// Dataset loading errors
    #[error("Failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),

    /// Scene errors
    #[error("Scene update failed: {0}")]
    Scene(#[from] SceneError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to dataset operations
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Reading or parsing the results failed
    #[error("{0}")]
    Read(#[from] IoError),

    /// A player's sample broke a statistics precondition
    #[error("Statistics for player '{player}' failed: {source}")]
    Statistics {
        player: String,
        #[source]
        source: StatsError,
    },
}

/// Errors related to scene updates
#[derive(Error, Debug)]
pub enum SceneError {
    /// View transform cannot be applied
    #[error("Invalid view transform: {message}")]
    InvalidTransform { message: String },

    /// Clock time is NaN or infinite
    #[error("Invalid clock time: {value}")]
    InvalidClock { value: f64 },
}

/// Errors related to export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Invalid dimensions
    #[error("Invalid dimensions: {width}x{height} (must be positive and within limits)")]
    InvalidDimensions { width: f64, height: f64 },

    /// Writing the output failed
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialisation failed
    #[error("JSON generation failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is out of range
    #[error("{0}")]
    Invalid(String),

    /// Palette name is not built in
    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    /// The file could not be parsed
    #[error("Cannot parse configuration: {0}")]
    Parse(String),

    /// The file could not be read
    #[error("Cannot read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for scorebox operations
pub type ScoreboxResult<T> = Result<T, ScoreboxError>;

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation utilities
pub mod validation {
    use super::*;

    const MAX_DIMENSION: f64 = 16384.0;

    /// Validate export dimensions
    pub fn validate_dimensions(width: f64, height: f64) -> ExportResult<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_DIMENSION;
        if !ok(width) || !ok(height) {
            return Err(ExportError::InvalidDimensions { width, height });
        }
        Ok(())
    }

    /// Validate that a band padding lies in [0, 1]
    pub fn validate_fraction(name: &str, value: f64) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Invalid(format!(
                "{} must be between 0.0 and 1.0, got {}",
                name, value
            )));
        }
        Ok(())
    }
}
