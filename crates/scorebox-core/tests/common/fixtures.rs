//! Results files written to temporary directories

use std::fs;
use std::path::Path;

use scorebox_core::{PlotConfig, PlotSession};
use scorebox_io::DirectorySource;
use tempfile::TempDir;

/// Three players whose scores normalise by 200 * (3 - 1) = 400
pub const ALL_RESULTS: &str = "player,scores\n\
A,\"[1,2,3,100]\"\n\
B,\"[5,6,7,8]\"\n\
C,\"[2,4,6,8]\"\n";

/// Keeps B, drops A and C, adds D
pub const SWITCHED: &str = "player,scores,rank\n\
B,\"[5,6,7,8]\",1\n\
D,\"[10,20,30,40]\",2\n";

/// One good row and one with a non-numeric score
pub const MESSY: &str = "player,scores\n\
A,\"[1,2,3]\"\n\
E,\"[1,x,3]\"\n";

pub const CHEATERS: &str = "player\nC\n";

/// Write a results file named `<name>.csv`
pub fn write_results(dir: &Path, name: &str, csv: &str) {
    fs::write(dir.join(format!("{}.csv", name)), csv)
        .unwrap_or_else(|e| panic!("Failed to write fixture {}: {}", name, e));
}

/// A directory holding every fixture dataset and the cheater list
pub fn results_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_results(dir.path(), "all_results", ALL_RESULTS);
    write_results(dir.path(), "switched", SWITCHED);
    write_results(dir.path(), "messy", MESSY);
    fs::write(dir.path().join("cheating_results.csv"), CHEATERS).expect("Failed to write cheaters");
    dir
}

/// A session over `dir` with default configuration
pub fn session(dir: &TempDir) -> PlotSession<DirectorySource> {
    session_with(dir, PlotConfig::default())
}

/// A session over `dir` with the given configuration
#[allow(dead_code)]
pub fn session_with(dir: &TempDir, config: PlotConfig) -> PlotSession<DirectorySource> {
    PlotSession::new(config, DirectorySource::new(dir.path())).expect("Failed to create session")
}
