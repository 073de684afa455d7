//! JSON file store for native builds

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::HighScoreStore;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score file: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Record {
    high_score: u64,
}

/// High score kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file; a missing file is not an error
    pub fn read(&self) -> Result<Option<u64>, PersistError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: Record = serde_json::from_str(&json)?;
        Ok(Some(record.high_score))
    }

    pub fn write(&self, score: u64) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(&Record { high_score: score })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> Option<u64> {
        match self.read() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("{} ({}), starting fresh", e, self.path.display());
                None
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        match self.write(score) {
            Ok(()) => log::info!("High score {} saved to {}", score, self.path.display()),
            Err(e) => log::warn!("{} ({}), high score not saved", e, self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        let mut store = FileStore::new(&path);
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.load_high_score(), None);
        store.save_high_score(1234);
        assert_eq!(store.load_high_score(), Some(1234));
    }

    #[test]
    fn test_corrupt_file_reads_as_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.json");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.read(), Err(PersistError::Json(_))));
        assert_eq!(store.load_high_score(), None);
    }

    #[test]
    fn test_unwritable_path_keeps_playing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut store = FileStore::new(blocker.join("highscore.json"));
        assert!(matches!(store.write(10), Err(PersistError::Io(_))));
        store.save_high_score(10);
        assert_eq!(store.load_high_score(), None);
    }
}
