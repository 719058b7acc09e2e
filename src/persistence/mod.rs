//! Save/load for the high score and leaderboard
//!
//! Features:
//! - Plain-text, human-readable files
//! - Auto-creation with defaults (`0`, empty board) when absent
//! - Atomic rewrites (write tmp → rename over the save)
//! - Corrupt data recovered as defaults with a warning

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PersistError;
use crate::highscores::Leaderboard;

pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const LEADERBOARD_FILE: &str = "leaderboard.txt";

/// Backing store for score data
pub trait ScoreStorage {
    /// Stored high score; absent storage is created holding 0
    fn load_high_score(&mut self) -> Result<u64, PersistError>;
    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError>;
    /// Stored leaderboard; absent storage is created empty
    fn load_leaderboard(&mut self) -> Result<Leaderboard, PersistError>;
    fn save_leaderboard(&mut self, board: &Leaderboard) -> Result<(), PersistError>;
}

/// Files in a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn high_score_path(&self) -> PathBuf {
        self.dir.join(HIGH_SCORE_FILE)
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.dir.join(LEADERBOARD_FILE)
    }

    /// Read a file, creating it with `default` first if it does not exist
    fn read_or_create(&self, path: &Path, default: &str) -> Result<String, PersistError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                write_atomic(path, default)?;
                log::info!("Created {}", path.display());
                Ok(default.to_string())
            }
            Err(e) => Err(PersistError::io(path, e)),
        }
    }
}

impl ScoreStorage for FileStorage {
    fn load_high_score(&mut self) -> Result<u64, PersistError> {
        let path = self.high_score_path();
        let text = self.read_or_create(&path, "0")?;
        let value = text.trim();
        value.parse().map_err(|_| PersistError::InvalidScore {
            path,
            value: value.to_string(),
        })
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError> {
        write_atomic(&self.high_score_path(), &score.to_string())
    }

    fn load_leaderboard(&mut self) -> Result<Leaderboard, PersistError> {
        let path = self.leaderboard_path();
        let text = self.read_or_create(&path, "")?;
        let (board, errors) = Leaderboard::from_text(&text);
        for e in errors {
            log::warn!("{}: {e}", path.display());
        }
        Ok(board)
    }

    fn save_leaderboard(&mut self, board: &Leaderboard) -> Result<(), PersistError> {
        write_atomic(&self.leaderboard_path(), &board.to_text())
    }
}

/// In-memory store (tests, demo runs without a data directory)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub high_score: u64,
    pub leaderboard: Leaderboard,
}

impl ScoreStorage for MemoryStorage {
    fn load_high_score(&mut self) -> Result<u64, PersistError> {
        Ok(self.high_score)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError> {
        self.high_score = score;
        Ok(())
    }

    fn load_leaderboard(&mut self) -> Result<Leaderboard, PersistError> {
        Ok(self.leaderboard.clone())
    }

    fn save_leaderboard(&mut self, board: &Leaderboard) -> Result<(), PersistError> {
        self.leaderboard = board.clone();
        Ok(())
    }
}

/// Replace `path` in full: write a sibling tmp file, then rename over the target
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(|e| PersistError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| PersistError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::LeaderboardEntry;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("falling-fury-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_high_score_roundtrip() {
        let dir = scratch_dir("hs-roundtrip");
        let mut store = FileStorage::new(&dir);
        store.save_high_score(42).unwrap();

        let mut reopened = FileStorage::new(&dir);
        assert_eq!(reopened.load_high_score().unwrap(), 42);
        assert!(!dir.join("highscore.tmp").exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_files_are_created_with_defaults() {
        let dir = scratch_dir("defaults");
        let mut store = FileStorage::new(&dir);
        assert_eq!(store.load_high_score().unwrap(), 0);
        assert!(store.load_leaderboard().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.high_score_path()).unwrap(), "0");
        assert!(store.leaderboard_path().exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_high_score_is_reported() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(HIGH_SCORE_FILE), "lots").unwrap();
        let mut store = FileStorage::new(&dir);
        assert!(matches!(
            store.load_high_score(),
            Err(PersistError::InvalidScore { ref value, .. }) if value == "lots"
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_leaderboard_roundtrip() {
        let dir = scratch_dir("board");
        let mut store = FileStorage::new(&dir);
        let mut board = Leaderboard::new();
        board.insert(LeaderboardEntry::new("ann", 12, "2024-05-01"));
        board.insert(LeaderboardEntry::new("bo", 30, "2024-05-02"));
        store.save_leaderboard(&board).unwrap();

        assert_eq!(
            fs::read_to_string(store.leaderboard_path()).unwrap(),
            "bo 30 2024-05-02\nann 12 2024-05-01\n"
        );
        assert_eq!(store.load_leaderboard().unwrap(), board);
        let _ = fs::remove_dir_all(&dir);
    }
}
