//! High score persistence
//!
//! A single best score stored as plain decimal text. Anything
//! unreadable (missing file, garbage contents) loads as zero so a
//! damaged file never blocks startup.

use std::fs;
use std::io;
use std::path::PathBuf;

/// File-backed best score
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub const FILE_NAME: &'static str = "highscore.dat";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location in the working directory
    pub fn default_location() -> Self {
        Self::new(Self::FILE_NAME)
    }

    /// Read the stored score
    pub fn load(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Write the score. Saving an unchanged value rewrites the same bytes.
    pub fn save(&self, score: u32) -> io::Result<()> {
        fs::write(&self.path, score.to_string())
    }
}
