//! Best-score persistence
//!
//! Stored as a single integer in `high_score.toml` next to the settings file.
//! Storage trouble never reaches the game: reads fall back to 0 and failed
//! writes are dropped.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Somewhere to keep the best score
pub trait HighScoreStore {
    /// Stored best score, 0 when nothing is readable
    fn load(&self) -> u64;
    /// Persist a new best score
    fn store(&mut self, score: u64);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    #[serde(default)]
    tetris_high_score: u64,
}

/// TOML file in the platform config directory
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: Option<PathBuf>,
}

impl FileHighScore {
    /// Store in the default config location
    pub fn new() -> Self {
        let path = ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().join("high_score.toml"));
        Self { path }
    }

    /// Store at an explicit path
    #[cfg(test)]
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn read(&self) -> Result<u64, String> {
        let path = self.path.as_ref().ok_or("no config directory")?;
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let file: HighScoreFile = toml::from_str(&contents).map_err(|e| e.to_string())?;
        Ok(file.tetris_high_score)
    }

    fn write(&self, score: u64) -> Result<(), String> {
        let path = self.path.as_ref().ok_or("no config directory")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
        let contents = toml::to_string(&HighScoreFile {
            tetris_high_score: score,
        })
        .map_err(|e| format!("Failed to serialize: {}", e))?;
        fs::write(path, contents).map_err(|e| format!("Failed to write high score: {}", e))
    }
}

impl Default for FileHighScore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for FileHighScore {
    fn load(&self) -> u64 {
        self.read().unwrap_or_else(|e| {
            tracing::debug!("high score unavailable, using 0: {}", e);
            0
        })
    }

    fn store(&mut self, score: u64) {
        if let Err(e) = self.write(score) {
            tracing::debug!("high score not saved: {}", e);
        }
    }
}

/// In-memory store for driving a game without touching disk
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    best: u64,
}

#[cfg(test)]
impl MemoryHighScore {
    pub fn with_best(best: u64) -> Self {
        Self { best }
    }
}

#[cfg(test)]
impl HighScoreStore for MemoryHighScore {
    fn load(&self) -> u64 {
        self.best
    }

    fn store(&mut self, score: u64) {
        self.best = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("blockfall-test-{}-{}", name, std::process::id()))
            .join("high_score.toml")
    }

    #[test]
    fn test_memory_store_keeps_last_write() {
        let mut store = MemoryHighScore::with_best(300);
        assert_eq!(store.load(), 300);
        store.store(1200);
        assert_eq!(store.load(), 1200);
        assert_eq!(MemoryHighScore::default().load(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = scratch_path("round-trip");
        let mut store = FileHighScore::at(path.clone());
        store.store(1240);
        assert_eq!(store.load(), 1240);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let store = FileHighScore::at(scratch_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_garbage_reads_zero() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "tetris_high_score = \"lots\"").unwrap();
        assert_eq!(FileHighScore::at(path.clone()).load(), 0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_no_directory_is_tolerated() {
        let mut store = FileHighScore { path: None };
        store.store(10);
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_unwritable_path_is_tolerated() {
        // A directory where the file should be
        let path = scratch_path("unwritable");
        fs::create_dir_all(&path).unwrap();
        let mut store = FileHighScore::at(path.clone());
        store.store(99);
        assert_eq!(store.load(), 0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
