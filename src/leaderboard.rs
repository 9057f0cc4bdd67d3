//! Leaderboard: best score per player, top-N queries
//!
//! Upsert semantics: a player's stored entry is replaced only when the
//! new score is strictly higher; otherwise the existing entry is returned
//! unchanged. The store validates defensively at the boundary even though
//! the simulation never produces malformed payloads. Persistence is a
//! JSON file; a corrupt or missing file is logged and treated as empty.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Longest accepted player name
pub const MAX_NAME_LEN: usize = 32;

/// A stored leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub player_name: String,
    pub score: u64,
    pub distance: u32,
    pub coins: u32,
}

/// Validation and storage failures at the persistence boundary
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name is empty")]
    EmptyName,
    #[error("player name exceeds {MAX_NAME_LEN} characters")]
    NameTooLong,
    #[error("failed to access score store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode score store: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Submit a finished session's result.
    ///
    /// Creates an entry for a new player; replaces an existing player's
    /// entry only on a strictly higher score, otherwise returns the
    /// stored entry unchanged.
    pub fn submit(
        &mut self,
        player_name: &str,
        score: u64,
        distance: u32,
        coins: u32,
    ) -> Result<Entry, LeaderboardError> {
        let name = player_name.trim();
        if name.is_empty() {
            return Err(LeaderboardError::EmptyName);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(LeaderboardError::NameTooLong);
        }

        let entry = match self.entries.iter_mut().find(|e| e.player_name == name) {
            Some(existing) => {
                if score > existing.score {
                    existing.score = score;
                    existing.distance = distance;
                    existing.coins = coins;
                    log::info!("{name} improved to {score}");
                }
                existing.clone()
            }
            None => {
                self.next_id += 1;
                let entry = Entry {
                    id: self.next_id,
                    player_name: name.to_string(),
                    score,
                    distance,
                    coins,
                };
                self.entries.push(entry.clone());
                log::info!("new leaderboard entry: {name} at {score}");
                entry
            }
        };

        // Descending by score; ties broken by id so ordering is stable
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        Ok(entry)
    }

    /// The top `limit` entries, ordered descending by score
    pub fn top(&self, limit: usize) -> Vec<Entry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    /// A player's stored best, if any
    pub fn best_for(&self, player_name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.player_name == player_name.trim())
    }

    /// Load from a JSON file; missing or corrupt stores are logged and
    /// treated as empty
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Leaderboard>(&json) {
                Ok(board) => {
                    log::info!("loaded {} leaderboard entries", board.len());
                    board
                }
                Err(err) => {
                    log::warn!("corrupt score store {}: {err}", path.display());
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("score store saved ({} entries)", self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_creates_entry() {
        let mut board = Leaderboard::new();
        let entry = board.submit("ada", 1200, 100, 2).unwrap();
        assert_eq!(entry.player_name, "ada");
        assert_eq!(entry.score, 1200);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_lower_score_leaves_entry_unchanged() {
        let mut board = Leaderboard::new();
        board.submit("ada", 1200, 100, 2).unwrap();
        let entry = board.submit("ada", 800, 300, 9).unwrap();
        assert_eq!(entry.score, 1200);
        assert_eq!(entry.distance, 100);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_equal_score_is_not_a_replacement() {
        let mut board = Leaderboard::new();
        board.submit("ada", 1200, 100, 2).unwrap();
        let entry = board.submit("ada", 1200, 500, 0).unwrap();
        assert_eq!(entry.distance, 100, "strictly-higher rule");
    }

    #[test]
    fn test_higher_score_replaces_keeping_id() {
        let mut board = Leaderboard::new();
        let first = board.submit("ada", 1200, 100, 2).unwrap();
        let second = board.submit("ada", 4000, 380, 7).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.score, 4000);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_top_is_bounded_and_sorted() {
        let mut board = Leaderboard::new();
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            board.submit(name, (i as u64 + 1) * 100, 10, 0).unwrap();
        }
        let top = board.top(5);
        assert_eq!(top.len(), 5);
        assert!(top.windows(2).all(|p| p[0].score >= p[1].score));
        assert_eq!(top[0].score, 700);
    }

    #[test]
    fn test_validation_rejects_bad_names() {
        let mut board = Leaderboard::new();
        assert!(matches!(
            board.submit("   ", 100, 1, 0),
            Err(LeaderboardError::EmptyName)
        ));
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            board.submit(&long, 100, 1, 0),
            Err(LeaderboardError::NameTooLong)
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let mut board = Leaderboard::new();
        board.submit("ada", 1200, 100, 2).unwrap();
        board.submit("lin", 900, 80, 1).unwrap();

        let path = std::env::temp_dir().join(format!(
            "ravine_runner_scores_{}.json",
            std::process::id()
        ));
        board.save(&path).unwrap();
        let reloaded = Leaderboard::load_or_default(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.best_for("ada").unwrap().score, 1200);
    }

    #[test]
    fn test_corrupt_store_treated_as_empty() {
        let path = std::env::temp_dir().join(format!(
            "ravine_runner_corrupt_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{not json").unwrap();
        let board = Leaderboard::load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert!(board.is_empty());
    }
}
