//! Data-driven game balance
//!
//! Every gameplay timing and speed lives here so a level designer can
//! override it with a JSON blob without touching the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Full highway scroll speed (px/s)
    pub highway_speed: f32,
    /// Hero speed per axis (px/s), multiplied by directional intent
    pub hero_speed: Vec2,
    /// Ramp duration when starting and when the hero dies (s)
    pub acceleration_duration: f32,
    /// Length of the speed-limited window (s)
    pub speed_reduction_duration: f32,
    /// Fraction of full speed held during the speed-limited window
    pub speed_reduction_factor: f32,
    /// Delay before a falling road fragment spawns its successor (s)
    pub spawn_falling_road_duration: f32,
    /// Duration of one animation frame (s)
    pub frame_duration: f32,
    /// Scale lost by a dying entity per animation frame
    pub dying_scale_delta: f32,
    /// Rotation gained by a dying entity per animation frame (radians)
    pub dying_rotation_delta: f32,
    /// Lane redirect tween duration per lane shifted (s)
    pub lane_change_duration: f32,
    /// How long a hint message stays on screen (s)
    pub hint_duration: f32,
    /// Session length; surviving this long wins (s)
    pub max_game_time: f32,
    /// Points per collected teapot
    pub teapot_bonus: u64,
    /// Largest frame delta fed to the simulation (s)
    pub max_frame_dt: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            highway_speed: 200.0,
            hero_speed: Vec2::new(100.0, 50.0),
            acceleration_duration: 1.5,
            speed_reduction_duration: 4.0,
            speed_reduction_factor: 0.25,
            spawn_falling_road_duration: 0.084,
            frame_duration: 0.075,
            dying_scale_delta: 0.125,
            dying_rotation_delta: std::f32::consts::FRAC_PI_4,
            lane_change_duration: 0.25,
            hint_duration: 3.0,
            max_game_time: 404.0,
            teapot_bonus: 418,
            max_frame_dt: 0.1,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), TuningError> {
        let checks = [
            ("highway_speed", self.highway_speed),
            ("acceleration_duration", self.acceleration_duration),
            ("speed_reduction_duration", self.speed_reduction_duration),
            ("spawn_falling_road_duration", self.spawn_falling_road_duration),
            ("frame_duration", self.frame_duration),
            ("dying_scale_delta", self.dying_scale_delta),
            ("lane_change_duration", self.lane_change_duration),
            ("max_game_time", self.max_game_time),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in checks {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning =
            Tuning::from_json(r#"{ "highway_speed": 150.0, "teapot_bonus": 10 }"#).unwrap();
        assert_eq!(tuning.highway_speed, 150.0);
        assert_eq!(tuning.teapot_bonus, 10);
        assert_eq!(tuning.max_game_time, Tuning::default().max_game_time);
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = Tuning::from_json(r#"{ "frame_duration": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NotPositive { field: "frame_duration", .. }));
        assert!(Tuning::from_json("not json").is_err());
    }
}
