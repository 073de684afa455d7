//! Session state
//!
//! Everything the simulation owns lives in one [`SessionState`] that the
//! frame pipeline mutates and the renderer reads.

use serde::Serialize;

use super::camera::Camera;
use super::entity::EntityStore;
use super::schedule::LevelSchedule;
use super::score;
use crate::highscores::HighScore;
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    /// Static title, waiting for a start input (or the special sequence)
    Title,
    /// Driving
    Playing,
    /// Final score, waiting for a dismiss input
    End,
}

/// Hint message currently on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub message: String,
    /// Seconds left on screen
    pub remaining: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub screen: Screen,
    /// Frozen by the pause input
    pub paused: bool,
    /// Survival time left (s)
    pub countdown: f32,
    /// Teapots collected this session
    pub teapots: u32,
    /// Whether the last session was survived
    pub win: bool,
    /// Score computed when the last session ended
    pub final_score: u64,
    /// Whether `final_score` beat the previous best
    pub new_high_score: bool,
    pub hint: Option<Hint>,
    pub camera: Camera,
    pub entities: EntityStore,
    pub high_score: HighScore,
    /// Progress through the special key sequence on the title screen
    pub sequence_index: usize,
    /// Extra content unlocked (special sequence or host unlock)
    pub extra_content: bool,
    pub tuning: Tuning,
    schedule: LevelSchedule,
}

impl SessionState {
    /// New session on the title screen
    pub fn new(schedule: LevelSchedule, tuning: Tuning) -> Self {
        Self {
            screen: Screen::Title,
            paused: false,
            countdown: tuning.max_game_time,
            teapots: 0,
            win: false,
            final_score: 0,
            new_high_score: false,
            hint: None,
            camera: Camera::new(),
            entities: EntityStore::new(),
            high_score: HighScore::default(),
            sequence_index: 0,
            extra_content: false,
            tuning,
            schedule,
        }
    }

    pub fn schedule(&self) -> &LevelSchedule {
        &self.schedule
    }

    /// Spawn the whole level relative to the current camera
    pub fn materialize_schedule(&mut self) -> usize {
        self.schedule.materialize(
            self.camera.offset.y,
            self.tuning.highway_speed,
            &mut self.entities,
        )
    }

    /// Seconds survived so far
    pub fn elapsed(&self) -> f32 {
        (self.tuning.max_game_time - self.countdown).max(0.0)
    }

    /// Score for the session as it stands
    pub fn current_score(&self) -> u64 {
        score::score(self.elapsed(), self.teapots, self.tuning.teapot_bonus)
    }

    /// Score to display on the current screen
    pub fn display_score(&self) -> u64 {
        match self.screen {
            Screen::End => self.final_score,
            _ => self.current_score(),
        }
    }

    /// Hook for hosts granting extra content (e.g. a supporter unlock)
    pub fn unlock_extra_content(&mut self) {
        if !self.extra_content {
            log::info!("Extra content unlocked");
        }
        self.extra_content = true;
    }

    /// Count the active hint down, clearing it once expired
    pub fn update_hint(&mut self, dt: f32) {
        if let Some(hint) = self.hint.as_mut() {
            hint.remaining -= dt;
            if hint.remaining <= 0.0 {
                self.hint = None;
            }
        }
    }

    pub fn show_hint(&mut self, message: &str) {
        self.hint = Some(Hint {
            message: message.to_owned(),
            remaining: self.tuning.hint_duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_on_title() {
        let state = SessionState::new(LevelSchedule::default(), Tuning::default());
        assert_eq!(state.screen, Screen::Title);
        assert_eq!(state.current_score(), 0);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_hint_expires() {
        let mut state = SessionState::new(LevelSchedule::default(), Tuning::default());
        state.show_hint("keep left");
        state.update_hint(1.0);
        assert_eq!(state.hint.as_ref().map(|h| h.message.as_str()), Some("keep left"));
        state.update_hint(state.tuning.hint_duration);
        assert!(state.hint.is_none());
    }
}
