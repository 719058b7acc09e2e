//! High score leaderboard
//!
//! Top 10 runs, sorted by score descending. Stored one entry per line as
//! `name score date`, so names and dates are single whitespace-free tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEADERBOARD_ENTRIES;
use crate::error::PersistError;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
}

impl LeaderboardEntry {
    pub fn new(name: &str, score: u64, date: &str) -> Self {
        Self {
            name: token(name, "Player"),
            score,
            date: token(date, "-"),
        }
    }
}

/// Collapse whitespace so the value survives the line format
fn token(s: &str, fallback: &str) -> String {
    let joined = s.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() { fallback.to_string() } else { joined }
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.score, self.date)
    }
}

impl FromStr for LeaderboardEntry {
    type Err = ();

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(score), Some(date), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(());
        };
        let score = score.parse().map_err(|_| ())?;
        Ok(Self {
            name: name.to_string(),
            score,
            date: date.to_string(),
        })
    }
}

/// Bounded leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_LEADERBOARD_ENTRIES
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if !self.is_full() {
            return true;
        }
        // Full board: must beat the lowest entry
        self.lowest_score().is_none_or(|lowest| score > lowest)
    }

    /// Insert, keep sorted descending, trim to the maximum.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // Ties keep the earlier entry ahead
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);

        (pos < MAX_LEADERBOARD_ENTRIES).then_some(pos + 1)
    }

    pub fn lowest_score(&self) -> Option<u64> {
        self.entries.last().map(|e| e.score)
    }

    /// One `name score date` line per entry
    pub fn to_text(&self) -> String {
        self.entries.iter().map(|e| format!("{e}\n")).collect()
    }

    /// Parse the line format. Malformed lines are skipped and returned as errors
    /// alongside the entries that did parse.
    pub fn from_text(text: &str) -> (Self, Vec<PersistError>) {
        let mut board = Self::new();
        let mut errors = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<LeaderboardEntry>() {
                Ok(entry) => {
                    board.insert(entry);
                }
                Err(()) => errors.push(PersistError::InvalidEntry {
                    line: i + 1,
                    content: line.to_string(),
                }),
            }
        }
        (board, errors)
    }
}

/// Format seconds since the Unix epoch as a `YYYY-MM-DD` date (UTC)
pub fn format_date(unix_secs: u64) -> String {
    // Days-to-civil conversion (proleptic Gregorian)
    let z = (unix_secs / 86_400) as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

/// Today's date according to the system clock
pub fn today() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_date(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(scores: &[u64]) -> Leaderboard {
        let mut board = Leaderboard::new();
        for (i, &s) in scores.iter().enumerate() {
            board.insert(LeaderboardEntry::new(&format!("p{i}"), s, "2024-01-01"));
        }
        board
    }

    #[test]
    fn test_keeps_ten_highest_sorted() {
        let board = board_with(&[5, 80, 12, 33, 1, 99, 47, 60, 2, 71, 18]);
        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![99, 80, 71, 60, 47, 33, 18, 12, 5, 2]);
    }

    #[test]
    fn test_qualifies_once_full() {
        let board = board_with(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert!(board.is_full());
        assert!(!board.qualifies(5));
        assert!(!board.qualifies(10));
        assert!(board.qualifies(11));
    }

    #[test]
    fn test_qualifies_when_not_full() {
        let board = board_with(&[10]);
        assert!(board.qualifies(0));
    }

    #[test]
    fn test_insert_reports_rank() {
        let mut board = board_with(&[50, 30]);
        assert_eq!(board.insert(LeaderboardEntry::new("x", 40, "d")), Some(2));
        assert_eq!(board.insert(LeaderboardEntry::new("y", 30, "d")), Some(4));
        let mut full = board_with(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(full.insert(LeaderboardEntry::new("z", 1, "d")), None);
        assert_eq!(full.len(), 10);
    }

    #[test]
    fn test_names_are_tokenized() {
        let entry = LeaderboardEntry::new("Ada  Lovelace", 7, "");
        assert_eq!(entry.name, "Ada_Lovelace");
        assert_eq!(entry.date, "-");
        assert_eq!(entry.to_string(), "Ada_Lovelace 7 -");
    }

    #[test]
    fn test_text_format_skips_bad_lines() {
        let text = "alice 30 2024-02-02\nbroken line\n\nbob 45 2024-02-03\ncarol notanumber 2024-01-01\n";
        let (board, errors) = Leaderboard::from_text(text);
        assert_eq!(board.len(), 2);
        assert_eq!(board.entries()[0].score, 45);
        assert_eq!(errors.len(), 2);
        assert_eq!(board.to_text(), "bob 45 2024-02-03\nalice 30 2024-02-02\n");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "1970-01-01");
        assert_eq!(format_date(951_782_400), "2000-02-29");
        assert_eq!(format_date(1_700_000_000), "2023-11-14");
    }
}
