//! Highway 404 - A status-code themed arcade highway game
//!
//! Core modules:
//! - `sim`: Gameplay simulation (entities, level schedule, scrolling, collisions, screens)
//! - `platform`: Frame timing, input translation and key/value storage
//! - `persistence`: High score stores
//! - `audio`: Cue vocabulary handed to the host's audio player
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// World geometry constants
pub mod consts {
    /// Size of one highway tile (lane width)
    pub const TILE_SIZE: f32 = 20.0;

    /// Full map rendered off screen (world dimensions)
    pub const MAP_WIDTH: f32 = 160.0;
    pub const MAP_HEIGHT: f32 = 640.0;

    /// Visible portion of the map
    pub const VIEWPORT_WIDTH: f32 = 120.0;
    pub const VIEWPORT_HEIGHT: f32 = 160.0;

    /// Camera-window edges for horizontal edge-snapping
    pub const CAMERA_WINDOW_X: f32 = 20.0;
    pub const CAMERA_WINDOW_WIDTH: f32 = VIEWPORT_WIDTH - CAMERA_WINDOW_X;

    /// Drivable lanes are 1..=LANE_COUNT, lane 0 spans the whole road
    pub const LANE_COUNT: u8 = 6;

    /// Hero sprite size
    pub const HERO_WIDTH: f32 = TILE_SIZE / 2.0;
    pub const HERO_HEIGHT: f32 = TILE_SIZE;

    /// Vertical distance the world loops by on wraparound
    pub const WRAP_DISTANCE: f32 = MAP_HEIGHT - VIEWPORT_HEIGHT;
}

/// Left edge of a lane in world space. Lane 0 maps to the first drivable lane.
#[inline]
pub fn lane_x(lane: u8) -> f32 {
    use consts::TILE_SIZE;
    f32::from(lane.max(1)) * TILE_SIZE
}

/// Lane containing a world x coordinate (0 when on a verge)
#[inline]
pub fn lane_at(x: f32) -> u8 {
    use consts::{LANE_COUNT, TILE_SIZE};
    let lane = (x / TILE_SIZE).floor();
    if lane < 1.0 || lane > f32::from(LANE_COUNT) {
        0
    } else {
        lane as u8
    }
}

/// Linear interpolation between `min` and `max`
#[inline]
pub fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min * (1.0 - t) + max * t
}

/// Smoothstep ease-in/ease-out over t in [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
