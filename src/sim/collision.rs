//! Box collision for the hero against obstacles
//!
//! The hero only collides through the centered half of its sprite so that
//! grazing a sign with a bumper doesn't count; obstacles use their full box.

use std::cmp::Ordering;

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Box reduced to the centered 25%..75% of each axis
    pub fn shrunk(&self) -> Self {
        let quarter = self.size() * 0.25;
        Self {
            min: self.min + quarter,
            max: self.max - quarter,
        }
    }

    /// Separating axis test; touching edges don't overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.min.x >= other.max.x
            || other.min.x >= self.max.x
            || self.min.y >= other.max.y
            || other.min.y >= self.max.y)
    }
}

/// Does the hero's hitbox overlap an obstacle box
#[inline]
pub fn hero_hits(hero: &Aabb, obstacle: &Aabb) -> bool {
    hero.shrunk().overlaps(obstacle)
}

/// Push `pos` out of `solid` along the axis that penetrated least, using the
/// direction of travel `intent` to decide which faces were hit first.
///
/// Homegrown wall sliding, not physically correct: it only ever moves along
/// one axis by the overlapped distance. Tie-breaks favour the vertical axis.
/// Gameplay tuning depends on this exact behavior. Returns the corrected position.
pub fn push_out(pos: Vec2, size: Vec2, intent: Vec2, solid: &Aabb) -> Vec2 {
    let mover = Aabb::new(pos, size);
    if !mover.overlaps(solid) {
        return pos;
    }

    // Overlap measured from each side of the solid
    let delta_max_x = mover.max.x - solid.min.x;
    let delta_max_y = mover.max.y - solid.min.y;
    let delta_min_x = solid.max.x - mover.min.x;
    let delta_min_y = solid.max.y - mover.min.y;

    let mut out = pos;
    match (intent.x.total_cmp(&0.0), intent.y.total_cmp(&0.0)) {
        // moving right and down
        (Ordering::Greater, Ordering::Greater) => {
            if delta_max_x < delta_max_y {
                out.x -= delta_max_x;
            } else {
                out.y -= delta_max_y;
            }
        }
        // moving right and up
        (Ordering::Greater, Ordering::Less) => {
            if delta_max_x < delta_min_y {
                out.x -= delta_max_x;
            } else {
                out.y += delta_min_y;
            }
        }
        (Ordering::Greater, _) => out.x -= delta_max_x,
        // moving left and down
        (Ordering::Less, Ordering::Greater) => {
            if delta_min_x < delta_max_y {
                out.x += delta_min_x;
            } else {
                out.y -= delta_max_y;
            }
        }
        // moving left and up
        (Ordering::Less, Ordering::Less) => {
            if delta_min_x < delta_min_y {
                out.x += delta_min_x;
            } else {
                out.y += delta_min_y;
            }
        }
        (Ordering::Less, _) => out.x += delta_min_x,
        (_, Ordering::Greater) => out.y -= delta_max_y,
        (_, Ordering::Less) => out.y += delta_min_y,
        // not moving: nothing to slide against
        _ => {}
    }
    out
}
