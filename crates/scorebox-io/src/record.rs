//! Typed records for loaded tournament results

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw scores are per match of this many turns unless configured otherwise
pub const DEFAULT_TURNS: u32 = 200;

/// One player's normalised scores, sorted ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Player name, unique within a dataset
    pub identifier: String,

    /// Normalised scores in ascending order
    pub sample: Vec<f64>,
}

impl PlayerRecord {
    /// Create a record, sorting the sample
    pub fn new(identifier: impl Into<String>, mut sample: Vec<f64>) -> Self {
        sample.sort_by(|a, b| a.total_cmp(b));
        Self {
            identifier: identifier.into(),
            sample,
        }
    }

    /// Create a record from raw scores divided by `divisor`
    pub fn from_raw_scores(identifier: impl Into<String>, raw: &[f64], divisor: f64) -> Self {
        Self::new(identifier, raw.iter().map(|s| s / divisor).collect())
    }
}

/// A row that was rejected while loading a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// 1-based data row (the header is row 0)
    pub row: usize,

    /// Player name as found in the row
    pub player: String,

    /// Why the row was rejected
    pub reason: String,
}

/// A complete results file, as loaded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsDataset {
    /// Dataset name (file name without extension)
    pub name: String,

    /// Players in file order
    pub players: Vec<PlayerRecord>,

    /// Rows rejected in lenient mode
    pub skipped: Vec<SkippedRecord>,

    /// Divisor applied to every raw score
    pub divisor: f64,
}

impl ResultsDataset {
    /// Player names in file order
    pub fn identifiers(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.identifier.as_str()).collect()
    }

    /// Look up a player by name
    pub fn player(&self, identifier: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.identifier == identifier)
    }

    /// All samples in file order
    pub fn samples(&self) -> impl Iterator<Item = &[f64]> {
        self.players.iter().map(|p| p.sample.as_slice())
    }

    /// Number of players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player was loaded
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Players drawn with the alternate palette
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheaterSet {
    players: HashSet<String>,
}

impl CheaterSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a player is in the set
    pub fn contains(&self, identifier: &str) -> bool {
        self.players.contains(identifier)
    }

    /// Number of players in the set
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate over the names in the set
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|s| s.as_str())
    }
}

impl<S: Into<String>> FromIterator<S> for CheaterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options controlling how a results file is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Turns per match, part of the normalisation divisor
    pub turns: u32,

    /// Fail the whole load on the first bad row instead of skipping it
    pub strict: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            turns: DEFAULT_TURNS,
            strict: false,
        }
    }
}

impl LoadOptions {
    /// Reject the whole file on any bad row
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set the number of turns per match
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }
}
