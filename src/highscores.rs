//! Best score record
//!
//! Loaded from the store when a session ends, saved only when beaten.

use serde::Serialize;

use crate::persistence::HighScoreStore;

/// High score used when nothing was ever saved (or storage is unreadable)
pub const DEFAULT_HIGH_SCORE: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighScore {
    pub best: u64,
}

impl Default for HighScore {
    fn default() -> Self {
        Self {
            best: DEFAULT_HIGH_SCORE,
        }
    }
}

impl HighScore {
    /// Load from the store, falling back to the default
    pub fn load(store: &dyn HighScoreStore) -> Self {
        Self {
            best: store.load_high_score().unwrap_or(DEFAULT_HIGH_SCORE),
        }
    }

    /// Whether `score` beats the best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished session's score. Returns true on a new best.
    pub fn submit(&mut self, score: u64, store: &mut dyn HighScoreStore) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New high score {} (was {})", score, self.best);
        self.best = score;
        store.save_high_score(score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, NullStore};

    #[test]
    fn test_missing_score_uses_default() {
        assert_eq!(HighScore::load(&NullStore).best, DEFAULT_HIGH_SCORE);
    }

    #[test]
    fn test_only_better_scores_are_saved() {
        let mut store = MemoryStore::with_score(500);
        let mut high = HighScore::load(&store);
        assert!(!high.submit(500, &mut store));
        assert!(!high.submit(20, &mut store));
        assert_eq!(store.saves, 0);
        assert!(high.submit(501, &mut store));
        assert_eq!(store.value, Some(501));
        assert_eq!(high.best, 501);
    }
}
