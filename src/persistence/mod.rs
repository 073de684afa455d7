//! High score persistence
//!
//! The game only ever stores one number. Where it lives is up to the host:
//! - LocalStorage in the browser
//! - a small JSON file natively
//! - memory in tests
//!
//! Storage failures never reach the simulation: a store that can't read
//! reports "no previous score" and a failed write is logged and dropped.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::{FileStore, PersistError};

use crate::platform::storage::{load_from_storage, save_to_storage};

/// Persistence collaborator for the best score
pub trait HighScoreStore {
    /// Previously saved best, `None` when nothing (readable) was saved
    fn load_high_score(&self) -> Option<u64>;
    /// Fire-and-forget save
    fn save_high_score(&mut self, score: u64);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
    /// Number of saves performed
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score),
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Option<u64> {
        self.value
    }

    fn save_high_score(&mut self, score: u64) {
        self.value = Some(score);
        self.saves += 1;
    }
}

/// Storage that remembers nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl HighScoreStore for NullStore {
    fn load_high_score(&self) -> Option<u64> {
        None
    }

    fn save_high_score(&mut self, _score: u64) {}
}

/// LocalStorage-backed store (no-op outside the browser)
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    /// Key under the game namespace
    const STORAGE_KEY: &'static str = "highScore";
}

impl HighScoreStore for BrowserStore {
    fn load_high_score(&self) -> Option<u64> {
        let raw = load_from_storage(Self::STORAGE_KEY)?;
        match raw.trim().parse() {
            Ok(score) => Some(score),
            Err(_) => {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                None
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        if save_to_storage(Self::STORAGE_KEY, &score.to_string()) {
            log::info!("High score {} saved", score);
        }
    }
}
