//! Results sources and I/O errors
//!
//! The `ResultsSource` trait provides a uniform interface for fetching a
//! named results dataset and the cheater list, whether they live in a
//! directory of CSV files or in memory.

use crate::csv_reader::{read_cheaters, read_cheaters_path, ResultsReader};
use crate::record::{CheaterSet, LoadOptions, ResultsDataset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File listing the alternate-palette players
pub const DEFAULT_CHEATERS_FILE: &str = "cheating_results.csv";

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid score '{value}' for player {player}")]
    InvalidScore { player: String, value: String },

    #[error("No scores for player {0}")]
    EmptyScores(String),

    #[error("Duplicate player: {0}")]
    DuplicatePlayer(String),

    #[error("Dataset {0} has no usable rows")]
    EmptyDataset(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for fetching results datasets by name
pub trait ResultsSource: Send + Sync {
    /// Load the dataset called `name`
    fn load_results(&self, name: &str, options: &LoadOptions) -> IoResult<ResultsDataset>;

    /// Load the cheater list
    fn load_cheaters(&self) -> IoResult<CheaterSet>;

    /// Get the directory backing this source (if applicable)
    fn location(&self) -> Option<&Path> {
        None
    }

    /// Get the source kind, for logging
    fn source_name(&self) -> &'static str;
}

/// A boxed source for dynamic dispatch
pub type BoxedSource = Box<dyn ResultsSource>;

impl<S: ResultsSource + ?Sized> ResultsSource for Box<S> {
    fn load_results(&self, name: &str, options: &LoadOptions) -> IoResult<ResultsDataset> {
        (**self).load_results(name, options)
    }

    fn load_cheaters(&self) -> IoResult<CheaterSet> {
        (**self).load_cheaters()
    }

    fn location(&self) -> Option<&Path> {
        (**self).location()
    }

    fn source_name(&self) -> &'static str {
        (**self).source_name()
    }
}

/// File name for a dataset, appending `.csv` when missing
pub fn dataset_file_name(name: &str) -> String {
    if name.to_lowercase().ends_with(".csv") {
        name.to_string()
    } else {
        format!("{}.csv", name)
    }
}

/// Datasets stored as CSV files in one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    cheaters_file: String,
}

impl DirectorySource {
    /// Open a directory of results files
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cheaters_file: DEFAULT_CHEATERS_FILE.to_string(),
        }
    }

    /// Use a different cheater list file name
    pub fn with_cheaters_file(mut self, file: impl Into<String>) -> Self {
        self.cheaters_file = file.into();
        self
    }

    /// Path of the file backing dataset `name`
    pub fn results_path(&self, name: &str) -> PathBuf {
        self.root.join(dataset_file_name(name))
    }

    /// Path of the cheater list
    pub fn cheaters_path(&self) -> PathBuf {
        self.root.join(&self.cheaters_file)
    }
}

impl ResultsSource for DirectorySource {
    fn load_results(&self, name: &str, options: &LoadOptions) -> IoResult<ResultsDataset> {
        ResultsReader::new(options.clone()).read_path(name, &self.results_path(name))
    }

    fn load_cheaters(&self) -> IoResult<CheaterSet> {
        read_cheaters_path(&self.cheaters_path())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn source_name(&self) -> &'static str {
        "directory"
    }
}

/// Datasets held in memory as CSV text
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    results: HashMap<String, String>,
    cheaters: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a results dataset
    pub fn with_results(mut self, name: impl Into<String>, csv: impl Into<String>) -> Self {
        self.results.insert(name.into(), csv.into());
        self
    }

    /// Set the cheater list
    pub fn with_cheaters(mut self, csv: impl Into<String>) -> Self {
        self.cheaters = Some(csv.into());
        self
    }
}

impl ResultsSource for MemorySource {
    fn load_results(&self, name: &str, options: &LoadOptions) -> IoResult<ResultsDataset> {
        let csv = self
            .results
            .get(name)
            .ok_or_else(|| IoError::FileNotFound(dataset_file_name(name)))?;
        ResultsReader::new(options.clone()).read(name, csv.as_bytes())
    }

    fn load_cheaters(&self) -> IoResult<CheaterSet> {
        match &self.cheaters {
            Some(csv) => read_cheaters(csv.as_bytes()),
            None => Err(IoError::FileNotFound(DEFAULT_CHEATERS_FILE.to_string())),
        }
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}
