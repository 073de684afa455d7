//! Scrolling viewport camera
//!
//! The highway scrolls vertically at a speed chosen by one of three regimes
//! (ramp in, ramp out on death, temporary speed limit). The world is a ring
//! buffer: once the camera scrolls past the top of the map it jumps back down
//! together with every entity. Horizontally the camera edge-snaps to keep the
//! hero inside a window.

use glam::Vec2;
use serde::Serialize;

use super::entity::Entity;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{ease_in_out, lerp};

/// Which rule currently sets the scroll speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollRegime {
    /// Ramping up from a standstill at game start
    Accelerating,
    /// Full highway speed
    Cruising,
    /// Following the speed limit keyframes
    SpeedLimited,
    /// Ramping down after the hero started dying
    Decelerating,
}

/// Speed-limited window keyframes (full, quarter x4, full); `true` holds the reduced speed
const SPEED_LIMIT_KEYFRAMES: [bool; 6] = [false, true, true, true, true, false];

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    /// Top-left of the viewport in world space
    pub offset: Vec2,
    /// Time since the session started scrolling
    elapsed: f32,
    /// Time since the hero started dying
    dying_elapsed: Option<f32>,
    /// Time since a speed limit was hit
    speed_limit_elapsed: Option<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera centered horizontally at the bottom of the map
    pub fn new() -> Self {
        Self {
            offset: Vec2::new((MAP_WIDTH - VIEWPORT_WIDTH) / 2.0, MAP_HEIGHT - VIEWPORT_HEIGHT),
            elapsed: 0.0,
            dying_elapsed: None,
            speed_limit_elapsed: None,
        }
    }

    /// World y of the viewport's bottom edge
    pub fn bottom(&self) -> f32 {
        self.offset.y + VIEWPORT_HEIGHT
    }

    /// Arm (or re-arm) the speed-limited window
    pub fn limit_speed(&mut self) {
        self.speed_limit_elapsed = Some(0.0);
    }

    pub fn is_speed_limited(&self) -> bool {
        self.speed_limit_elapsed.is_some()
    }

    /// Advance regime timers. The speed limit expires on its own.
    pub fn advance_timers(&mut self, dt: f32, hero_dying: bool, tuning: &Tuning) {
        self.elapsed += dt;
        if hero_dying {
            *self.dying_elapsed.get_or_insert(0.0) += dt;
        }
        if let Some(limit) = self.speed_limit_elapsed.as_mut() {
            *limit += dt;
            if *limit >= tuning.speed_reduction_duration {
                self.speed_limit_elapsed = None;
            }
        }
    }

    pub fn regime(&self, tuning: &Tuning) -> ScrollRegime {
        if self.speed_limit_elapsed.is_some() {
            ScrollRegime::SpeedLimited
        } else if self.dying_elapsed.is_some() {
            ScrollRegime::Decelerating
        } else if self.elapsed < tuning.acceleration_duration {
            ScrollRegime::Accelerating
        } else {
            ScrollRegime::Cruising
        }
    }

    /// Current vertical scroll speed (px/s)
    pub fn scroll_speed(&self, tuning: &Tuning) -> f32 {
        let full = tuning.highway_speed;
        match self.regime(tuning) {
            ScrollRegime::SpeedLimited => {
                let t = self.speed_limit_elapsed.unwrap_or(0.0) / tuning.speed_reduction_duration;
                full * speed_limit_curve(t, tuning.speed_reduction_factor)
            }
            ScrollRegime::Decelerating => {
                let t = self.dying_elapsed.unwrap_or(0.0) / tuning.acceleration_duration;
                full * (1.0 - t).max(0.0)
            }
            ScrollRegime::Accelerating => {
                full * (self.elapsed / tuning.acceleration_duration).min(1.0)
            }
            ScrollRegime::Cruising => full,
        }
    }

    /// Scroll the world by `speed * dt`; the hero rides along with the camera.
    ///
    /// Returns the distance scrolled.
    pub fn scroll(&mut self, dt: f32, tuning: &Tuning, entities: &mut [Entity]) -> f32 {
        let distance = self.scroll_speed(tuning) * dt;
        self.offset.y -= distance;
        if let Some(hero) = entities.iter_mut().find(|e| e.is_hero()) {
            hero.pos.y -= distance;
        }
        self.wrap(entities);
        distance
    }

    /// Loop the world vertically once the camera leaves the top of the map
    pub fn wrap(&mut self, entities: &mut [Entity]) -> bool {
        if self.offset.y >= 0.0 {
            return false;
        }
        self.offset.y += WRAP_DISTANCE;
        for entity in entities.iter_mut() {
            entity.pos.y += WRAP_DISTANCE;
        }
        true
    }

    /// Horizontal edge-snapping: only move when the hero crosses a window edge
    pub fn snap_to(&mut self, hero: &Entity) {
        let max_x = MAP_WIDTH - VIEWPORT_WIDTH;
        if 0.0 < self.offset.x && hero.pos.x < self.offset.x + CAMERA_WINDOW_X {
            self.offset.x = (hero.pos.x - CAMERA_WINDOW_X).max(0.0);
        } else if self.offset.x < max_x
            && hero.pos.x + hero.size.x > self.offset.x + CAMERA_WINDOW_WIDTH
        {
            self.offset.x = (hero.pos.x + hero.size.x - CAMERA_WINDOW_WIDTH).min(max_x);
        }
    }

    /// Keep the hero on the road and inside the visible part of the highway
    pub fn constrain(&self, hero: &mut Entity) {
        let min_x = TILE_SIZE;
        let max_x = MAP_WIDTH - TILE_SIZE - hero.size.x;
        hero.pos.x = hero.pos.x.clamp(min_x, max_x);

        let min_y = self.offset.y + TILE_SIZE;
        let max_y = self.offset.y + VIEWPORT_HEIGHT - hero.size.y;
        hero.pos.y = hero.pos.y.clamp(min_y, max_y);
    }
}

/// Eased keyframe curve for the speed-limited window, t in [0, 1]
fn speed_limit_curve(t: f32, reduced: f32) -> f32 {
    let value = |limited: bool| if limited { reduced } else { 1.0 };
    let segments = (SPEED_LIMIT_KEYFRAMES.len() - 1) as f32;
    let t = t.clamp(0.0, 1.0) * segments;
    let i = (t.floor() as usize).min(SPEED_LIMIT_KEYFRAMES.len() - 2);
    let local = t - i as f32;
    lerp(
        value(SPEED_LIMIT_KEYFRAMES[i]),
        value(SPEED_LIMIT_KEYFRAMES[i + 1]),
        ease_in_out(local),
    )
}
