//! Score, combo multiplier, high score and leaderboard service
//!
//! One tracker is built per program run and handed to whichever state needs it.
//! Disk writes happen only on explicit saves and leaderboard inserts.

use crate::consts::*;
use crate::error::PersistError;
use crate::highscores::{Leaderboard, LeaderboardEntry};
use crate::persistence::ScoreStorage;

pub struct ScoreTracker {
    current: u64,
    streak: u32,
    multiplier: f32,
    high_score: u64,
    /// High score on record when the current session began
    session_start_high_score: u64,
    leaderboard: Leaderboard,
    storage: Box<dyn ScoreStorage>,
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("current", &self.current)
            .field("streak", &self.streak)
            .field("multiplier", &self.multiplier)
            .field("high_score", &self.high_score)
            .field("leaderboard", &self.leaderboard.len())
            .finish()
    }
}

impl ScoreTracker {
    /// Load persisted data. Unreadable data is logged and replaced with defaults.
    pub fn new(mut storage: Box<dyn ScoreStorage>) -> Self {
        let high_score = match storage.load_high_score() {
            Ok(score) => {
                log::info!("Loaded high score: {}", score);
                score
            }
            Err(e) => {
                log::warn!("{e}; resetting high score to 0");
                0
            }
        };
        let leaderboard = match storage.load_leaderboard() {
            Ok(board) => {
                log::info!("Loaded {} leaderboard entries", board.len());
                board
            }
            Err(e) => {
                log::warn!("{e}; starting with an empty leaderboard");
                Leaderboard::new()
            }
        };

        Self {
            current: 0,
            streak: 0,
            multiplier: BASE_MULTIPLIER,
            high_score,
            session_start_high_score: high_score,
            leaderboard,
            storage,
        }
    }

    /// Start a new session. High score and leaderboard are kept.
    pub fn reset(&mut self) {
        self.current = 0;
        self.streak = 0;
        self.multiplier = BASE_MULTIPLIER;
        self.session_start_high_score = self.high_score;
    }

    /// Credit a hit. Returns the points actually added after the multiplier.
    pub fn add_points(&mut self, base: u32) -> u64 {
        self.streak += 1;
        if self.streak >= COMBO_THRESHOLD {
            self.multiplier = BASE_MULTIPLIER + (self.streak - COMBO_THRESHOLD) as f32 * MULTIPLIER_INCREMENT;
        }

        let credited = (base as f32 * self.multiplier).floor() as u64;
        self.current += credited;
        log::debug!("Added {} points (combo x{})", credited, self.multiplier);
        credited
    }

    /// A miss. Only called when an enemy gets past, not on empty clicks.
    pub fn break_combo(&mut self) {
        if self.streak > 0 {
            log::debug!("Combo broken! Was at {} hits", self.streak);
        }
        self.streak = 0;
        self.multiplier = BASE_MULTIPLIER;
    }

    /// Streak just reached the threshold, or another milestone step past it
    pub fn at_combo_milestone(&self) -> bool {
        self.streak >= COMBO_THRESHOLD && (self.streak - COMBO_THRESHOLD) % COMBO_MILESTONE_STEP == 0
    }

    pub fn qualifies_for_leaderboard(&self) -> bool {
        self.leaderboard.qualifies(self.current)
    }

    /// Insert, sort, trim and persist. Returns the rank if the entry stayed on the board.
    pub fn add_to_leaderboard(&mut self, name: &str, score: u64, date: &str) -> Result<Option<usize>, PersistError> {
        let rank = self.leaderboard.insert(LeaderboardEntry::new(name, score, date));
        self.storage.save_leaderboard(&self.leaderboard)?;
        log::info!("Leaderboard saved ({} entries)", self.leaderboard.len());
        Ok(rank)
    }

    /// Persist the current score if it beats the stored high score.
    /// Returns whether a new high score was written.
    pub fn save_high_score(&mut self) -> Result<bool, PersistError> {
        if self.current <= self.high_score {
            return Ok(false);
        }
        self.storage.save_high_score(self.current)?;
        self.high_score = self.current;
        log::info!("New high score saved: {}", self.high_score);
        Ok(true)
    }

    pub fn surpassed_high_score(&self) -> bool {
        self.current > self.high_score
    }

    /// True once this session beat the record it started against, even if the
    /// new record has already been saved
    pub fn beat_session_start_high_score(&self) -> bool {
        self.current > self.session_start_high_score
    }

    /// HUD label, empty below the threshold
    pub fn combo_label(&self) -> String {
        if self.streak < COMBO_THRESHOLD {
            return String::new();
        }
        format!("COMBO x{}", self.multiplier as u32)
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Best score on record, including the running session
    pub fn high_score(&self) -> u64 {
        self.high_score.max(self.current)
    }

    /// Best score as last persisted
    pub fn stored_high_score(&self) -> u64 {
        self.high_score
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileStorage, MemoryStorage};

    fn tracker() -> ScoreTracker {
        ScoreTracker::new(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn test_multiplier_stays_one_until_past_threshold() {
        let mut score = tracker();
        assert_eq!(score.add_points(10), 10);
        assert_eq!(score.multiplier(), 1.0);
        assert_eq!(score.add_points(10), 10);
        assert_eq!(score.multiplier(), 1.0);
        // streak == threshold: 1.0 + 0 * 0.5
        assert_eq!(score.add_points(10), 10);
        assert_eq!(score.multiplier(), 1.0);
        assert_eq!(score.streak(), 3);

        assert_eq!(score.add_points(10), 15);
        assert_eq!(score.multiplier(), 1.5);
        assert_eq!(score.add_points(10), 20);
        assert_eq!(score.current(), 65);

        score.break_combo();
        assert_eq!(score.streak(), 0);
        assert_eq!(score.multiplier(), 1.0);
        assert_eq!(score.add_points(10), 10);
    }

    #[test]
    fn test_credit_is_floored() {
        let mut score = tracker();
        for _ in 0..3 {
            score.add_points(1);
        }
        // multiplier 1.5 on 1 point
        assert_eq!(score.add_points(1), 1);
        // multiplier 2.0
        assert_eq!(score.add_points(3), 6);
    }

    #[test]
    fn test_combo_label_and_milestones() {
        let mut score = tracker();
        score.add_points(1);
        score.add_points(1);
        assert_eq!(score.combo_label(), "");
        assert!(!score.at_combo_milestone());
        score.add_points(1);
        assert_eq!(score.combo_label(), "COMBO x1");
        assert!(score.at_combo_milestone());
        for _ in 0..4 {
            score.add_points(1);
            assert!(!score.at_combo_milestone());
        }
        score.add_points(1);
        assert!(score.at_combo_milestone());
        assert_eq!(score.combo_label(), "COMBO x3");
    }

    #[test]
    fn test_high_score_only_increases() {
        let mut score = ScoreTracker::new(Box::new(MemoryStorage {
            high_score: 20,
            ..MemoryStorage::default()
        }));
        score.add_points(5);
        assert!(!score.surpassed_high_score());
        assert!(!score.save_high_score().unwrap());
        assert_eq!(score.stored_high_score(), 20);

        for _ in 0..10 {
            score.add_points(5);
        }
        assert!(score.surpassed_high_score());
        assert!(score.save_high_score().unwrap());
        assert_eq!(score.stored_high_score(), score.current());

        assert!(score.beat_session_start_high_score());
        assert!(!score.surpassed_high_score());

        score.reset();
        assert_eq!(score.current(), 0);
        assert!(score.stored_high_score() > 20);
        assert!(!score.beat_session_start_high_score());
    }

    #[test]
    fn test_leaderboard_full_rejects_low_score() {
        let mut score = tracker();
        for i in 1..=11u64 {
            score.add_to_leaderboard(&format!("p{i}"), i * 10, "2024-01-01").unwrap();
        }
        let kept: Vec<u64> = score.leaderboard().entries().iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![110, 100, 90, 80, 70, 60, 50, 40, 30, 20]);

        score.add_points(15);
        assert!(!score.qualifies_for_leaderboard());
        for _ in 0..5 {
            score.add_points(5);
        }
        assert!(score.qualifies_for_leaderboard());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_zero() {
        let dir = std::env::temp_dir().join(format!("falling-fury-score-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(crate::persistence::HIGH_SCORE_FILE), "not a number").unwrap();

        let score = ScoreTracker::new(Box::new(FileStorage::new(&dir)));
        assert_eq!(score.high_score(), 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_persisted_high_score_reloads() {
        let dir = std::env::temp_dir().join(format!("falling-fury-score-reload-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let mut score = ScoreTracker::new(Box::new(FileStorage::new(&dir)));
        for _ in 0..8 {
            score.add_points(6);
        }
        // 6*3 + 9 + 12 + 15 + 18 + 21
        assert_eq!(score.current(), 93);
        score.save_high_score().unwrap();

        let reloaded = ScoreTracker::new(Box::new(FileStorage::new(&dir)));
        assert_eq!(reloaded.high_score(), 93);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
