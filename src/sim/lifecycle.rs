//! Per-frame entity updates: animation, movement, death, chained spawns

use glam::Vec2;

use super::collision::Aabb;
use super::entity::{Entity, EntityKind, EntityStore, Spawner, TransientEffect};
use crate::tuning::Tuning;
use crate::{ease_in_out, lane_at, lerp};

/// Advance every entity by `dt`, then let chained entities spawn successors
pub fn update_entities(store: &mut EntityStore, dt: f32, tuning: &Tuning) {
    for entity in store.iter_mut() {
        update_entity(entity, dt, tuning);
    }
    spawn_successors(store, dt, tuning);
}

/// Animation frame, transient effect and position for a single entity
pub fn update_entity(entity: &mut Entity, dt: f32, tuning: &Tuning) {
    let stepped = entity.animation.advance(dt, tuning.frame_duration);

    // Falling road keeps reacting to the hero every frame until it's gone
    if entity.kind.is_repeatable() {
        entity.triggered = false;
    }

    // Redirects own the horizontal axis, including the frame they land
    let translating = entity.is_translating();

    match entity.effect {
        TransientEffect::Dying { rotation, scale } => {
            if stepped {
                let scale = (scale - tuning.dying_scale_delta).max(0.0);
                entity.effect = TransientEffect::Dying {
                    rotation: rotation + tuning.dying_rotation_delta,
                    scale,
                };
                if scale <= 0.0 {
                    entity.dead = true;
                }
            }
            // The dying don't move
            return;
        }
        TransientEffect::LaneTranslation {
            from,
            to,
            elapsed,
            duration,
        } => {
            let elapsed = elapsed + dt;
            if elapsed >= duration {
                entity.pos.x = to;
                entity.effect = TransientEffect::None;
            } else {
                entity.pos.x = lerp(from, to, ease_in_out(elapsed / duration));
                entity.effect = TransientEffect::LaneTranslation {
                    from,
                    to,
                    elapsed,
                    duration,
                };
            }
        }
        TransientEffect::None => {}
    }

    if let Some(speed) = entity.speed {
        let mut step = speed * entity.intent * dt;
        if translating {
            step.x = 0.0;
        }
        entity.pos += step;
    }
}

/// Tick spawn timers; a falling road tile extends its chain one tile up the
/// lane unless a 200 sign already repaired the road there.
fn spawn_successors(store: &mut EntityStore, dt: f32, tuning: &Tuning) {
    let mut requests: Vec<(Spawner, Vec2, Vec2)> = Vec::new();
    for entity in store.iter_mut() {
        let Some(timer) = entity.spawn.as_mut() else {
            continue;
        };
        timer.elapsed += dt;
        if timer.elapsed > tuning.spawn_falling_road_duration {
            requests.push((timer.spawner, entity.pos, entity.size));
            entity.spawn = None;
        }
    }

    for (spawner, pos, size) in requests {
        match spawner {
            Spawner::FallingRoad => {
                let next = Vec2::new(pos.x, pos.y - size.y);
                let footprint = Aabb::new(next, size);
                let lane = lane_at(next.x);
                let repaired = store.iter().any(|e| {
                    e.kind == EntityKind::RoadOk
                        && lane_at(e.pos.x) == lane
                        && e.bounds().overlaps(&footprint)
                });
                if repaired {
                    log::debug!("Falling road stopped by 200 in lane {}", lane);
                } else {
                    store.spawn(Entity::falling_road(next));
                }
            }
        }
    }
}
