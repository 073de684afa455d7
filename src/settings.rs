//! Player preferences
//!
//! Persisted separately from the high score under the game's storage namespace.

use serde::{Deserialize, Serialize};

use crate::platform::storage::{load_from_storage, save_to_storage};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Silence cues and music
    pub muted: bool,
    /// Speak status codes aloud (speech synthesis) instead of plain effects
    pub speech: bool,
    /// Touch drag distance (px) giving full directional intent
    pub drag_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            speech: true,
            drag_threshold: 30.0,
        }
    }
}

impl Settings {
    /// Storage key under the game namespace
    const STORAGE_KEY: &'static str = "settings";

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Parse stored settings, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from storage (defaults natively)
    pub fn load() -> Self {
        match load_from_storage(Self::STORAGE_KEY) {
            Some(json) => {
                log::info!("Loaded settings from storage");
                Self::from_json(&json)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if save_to_storage(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }
}
