//! CSV readers for tournament results and cheater lists

use crate::reader::{IoError, IoResult};
use crate::record::{CheaterSet, LoadOptions, PlayerRecord, ResultsDataset, SkippedRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Column holding the player name
pub const PLAYER_COLUMN: &str = "player";

/// Column holding the bracketed score list
pub const SCORES_COLUMN: &str = "scores";

/// Divisor turning a raw tournament score into a per-turn, per-opponent score
///
/// A file with a single player has no opponents; the divisor then falls back
/// to the number of turns.
pub fn normalisation_divisor(turns: u32, player_count: usize) -> f64 {
    let opponents = player_count.saturating_sub(1).max(1);
    turns as f64 * opponents as f64
}

/// Parse a score list such as `[12,45,9]`
///
/// Every entry must be a finite number; an empty list is rejected.
pub fn parse_score_list(player: &str, raw: &str) -> IoResult<Vec<f64>> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Err(IoError::EmptyScores(player.to_string()));
    }

    inner
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            entry
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| IoError::InvalidScore {
                    player: player.to_string(),
                    value: entry.to_string(),
                })
        })
        .collect()
}

/// Reader for results files
#[derive(Debug, Clone, Default)]
pub struct ResultsReader {
    options: LoadOptions,
}

impl ResultsReader {
    /// Create a reader with the given options
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load options in use
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Read a results file from disk
    pub fn read_path(&self, name: &str, path: &Path) -> IoResult<ResultsDataset> {
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        self.read(name, BufReader::new(file))
    }

    /// Read a results file from any reader
    pub fn read<R: Read>(&self, name: &str, reader: R) -> IoResult<ResultsDataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .clone();
        let player_col = column_index(&headers, PLAYER_COLUMN)?;
        let scores_col = column_index(&headers, SCORES_COLUMN)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            match result {
                Err(e) if e.is_io_error() => return Err(IoError::OpenFailed(e.to_string())),
                other => rows.push(other),
            }
        }

        // Every row counts as an opponent, even one rejected below
        let divisor = normalisation_divisor(self.options.turns, rows.len());

        let mut players = Vec::with_capacity(rows.len());
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for (i, row) in rows.iter().enumerate() {
            let (player, parsed) = match row {
                Ok(record) => {
                    let player = record.get(player_col).unwrap_or_default().trim();
                    let scores = record.get(scores_col).unwrap_or_default();
                    (player, parse_row(player, scores, &seen))
                }
                Err(e) => ("", Err(IoError::InvalidFormat(e.to_string()))),
            };

            match parsed {
                Ok(raw) => {
                    seen.insert(player.to_string());
                    players.push(PlayerRecord::from_raw_scores(player, &raw, divisor));
                }
                Err(e) if self.options.strict => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping row {} of {}: {}", i + 1, name, e);
                    skipped.push(SkippedRecord {
                        row: i + 1,
                        player: player.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if players.is_empty() {
            return Err(IoError::EmptyDataset(name.to_string()));
        }

        Ok(ResultsDataset {
            name: name.to_string(),
            players,
            skipped,
            divisor,
        })
    }
}

fn parse_row(player: &str, scores: &str, seen: &HashSet<String>) -> IoResult<Vec<f64>> {
    if player.is_empty() {
        return Err(IoError::InvalidFormat("missing player name".to_string()));
    }
    if seen.contains(player) {
        return Err(IoError::DuplicatePlayer(player.to_string()));
    }
    parse_score_list(player, scores)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> IoResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))
}

/// Read a cheater list from any reader
pub fn read_cheaters<R: Read>(reader: R) -> IoResult<CheaterSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| IoError::InvalidFormat(e.to_string()))?
        .clone();
    let player_col = column_index(&headers, PLAYER_COLUMN)?;

    let mut names = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
        if let Some(name) = record.get(player_col).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }

    Ok(names.into_iter().collect())
}

/// Read a cheater list from disk
pub fn read_cheaters_path(path: &Path) -> IoResult<CheaterSet> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    read_cheaters(BufReader::new(file))
}
