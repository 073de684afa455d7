//! What happens when the hero drives over something
//!
//! The scan runs once per frame after entities moved and the world scrolled.
//! Each obstacle reacts on first contact only, except falling road which keeps
//! reacting while the hero stays on it.

use glam::Vec2;

use super::collision::hero_hits;
use super::entity::{Entity, EntityKind, TransientEffect};
use super::state::SessionState;
use crate::audio::{Cue, CueSet};
use crate::consts::*;

/// Contact with a hole in the road, whether already open or still crumbling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardContact {
    /// Hole is fully open, no grace period
    pub immediate: bool,
    /// Current animation frame of the hazard
    pub frame: usize,
    /// Frame from which the hazard can no longer be driven over
    pub midpoint: usize,
    /// Total animation frames
    pub frames: usize,
}

impl HazardContact {
    /// Render scale of the hero sinking into the hazard
    pub fn hero_scale(&self) -> f32 {
        if self.immediate || self.frames == 0 {
            return 1.0;
        }
        1.0 - self.frame as f32 / self.frames as f32
    }

    pub fn is_fatal(&self) -> bool {
        self.immediate || self.frame > self.midpoint
    }
}

/// Hazard policy for an entity, `None` for anything drivable
pub fn hazard_contact(entity: &Entity) -> Option<HazardContact> {
    let immediate = match entity.kind {
        EntityKind::MissingRoad => true,
        EntityKind::FallingRoad => false,
        _ => return None,
    };
    Some(HazardContact {
        immediate,
        frame: entity.animation.frame,
        midpoint: entity.animation.midpoint(),
        frames: entity.animation.frames.len(),
    })
}

/// Typed response to one contact
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    ShowHint(String),
    /// Advisory only
    Announce(Cue),
    Redirect { lanes: i8 },
    /// Start a falling road chain below the trigger
    FallingRoad { origin: Vec2 },
    Collect,
    LimitSpeed,
    Hazard(HazardContact),
}

impl Reaction {
    /// Response for the obstacle kind, `None` for kinds that never collide
    pub fn for_entity(entity: &Entity) -> Option<Self> {
        if let Some(contact) = hazard_contact(entity) {
            return Some(Reaction::Hazard(contact));
        }
        let reaction = match &entity.kind {
            EntityKind::Hint { message } => Reaction::ShowHint(message.clone()),
            EntityKind::RoadOk => Reaction::Announce(Cue::RoadOk),
            EntityKind::Redirect { lanes, .. } => Reaction::Redirect { lanes: *lanes },
            EntityKind::RoadNotFound => Reaction::FallingRoad { origin: entity.pos },
            EntityKind::Teapot => Reaction::Collect,
            EntityKind::SpeedLimit => Reaction::LimitSpeed,
            EntityKind::RoadNotImplemented => Reaction::Announce(Cue::RoadNotImplemented),
            EntityKind::RoadUnavailable => Reaction::Announce(Cue::RoadUnavailable),
            EntityKind::Hero
            | EntityKind::HighwayPanel { .. }
            | EntityKind::FallingRoad
            | EntityKind::MissingRoad => return None,
        };
        Some(reaction)
    }
}

/// Horizontal tween for a redirect by `lanes`, clamped to the road
fn lane_translation(hero: &Entity, lanes: i8, lane_change_duration: f32) -> TransientEffect {
    let from = hero.pos.x;
    let to = (from + f32::from(lanes) * TILE_SIZE)
        .clamp(TILE_SIZE, MAP_WIDTH - TILE_SIZE - hero.size.x);
    TransientEffect::LaneTranslation {
        from,
        to,
        elapsed: 0.0,
        duration: f32::from(lanes.unsigned_abs()) * lane_change_duration,
    }
}

fn apply(state: &mut SessionState, hero_index: usize, reaction: Reaction, cues: &mut CueSet) {
    match reaction {
        Reaction::ShowHint(message) => state.show_hint(&message),
        Reaction::Announce(cue) => {
            cues.insert(cue);
        }
        Reaction::Redirect { lanes } => {
            let duration = state.tuning.lane_change_duration;
            let hero = &mut state.entities.as_mut_slice()[hero_index];
            hero.effect = lane_translation(hero, lanes, duration);
        }
        Reaction::FallingRoad { origin } => {
            state
                .entities
                .spawn(Entity::falling_road(Vec2::new(origin.x, origin.y + TILE_SIZE)));
            cues.insert(Cue::RoadNotFound);
        }
        Reaction::Collect => {
            state.teapots += 1;
            cues.insert(Cue::Teapot);
        }
        Reaction::LimitSpeed => {
            state.camera.limit_speed();
            cues.insert(Cue::SpeedLimit);
        }
        Reaction::Hazard(contact) => {
            let hero = &mut state.entities.as_mut_slice()[hero_index];
            hero.scale = hero.scale.min(contact.hero_scale());
            if contact.is_fatal() && !hero.is_dying() {
                log::debug!("Hero fell through the road");
                hero.kill();
                cues.insert(Cue::Crash);
            }
        }
    }
}

/// Scan every obstacle against the hero and apply reactions in store order.
///
/// Returns how many contacts were resolved this frame.
pub fn resolve_collisions(state: &mut SessionState, cues: &mut CueSet) -> usize {
    let Some(hero_index) = state.entities.hero_index() else {
        return 0;
    };
    let hero_box = {
        let hero = &mut state.entities.as_mut_slice()[hero_index];
        if hero.dead || hero.is_dying() || hero.is_translating() {
            return 0;
        }
        hero.scale = 1.0;
        hero.bounds()
    };

    let mut resolved = 0;
    for index in 0..state.entities.len() {
        if index == hero_index {
            continue;
        }
        let reaction = {
            let obstacle = &mut state.entities.as_mut_slice()[index];
            if obstacle.dead || obstacle.triggered || !obstacle.kind.is_collidable() {
                continue;
            }
            if !hero_hits(&hero_box, &obstacle.bounds()) {
                continue;
            }
            obstacle.triggered = true;
            if obstacle.kind == EntityKind::Teapot {
                obstacle.dead = true;
            }
            match Reaction::for_entity(obstacle) {
                Some(reaction) => reaction,
                None => continue,
            }
        };
        log::debug!("Hero hit {}", state.entities.as_slice()[index].kind.label());
        resolved += 1;

        let redirect = matches!(reaction, Reaction::Redirect { .. });
        apply(state, hero_index, reaction, cues);

        // Mid-redirect and dying heroes don't trigger anything else
        let hero = &state.entities.as_slice()[hero_index];
        if redirect || hero.is_dying() {
            break;
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_x;
    use crate::sim::schedule::LevelSchedule;
    use crate::tuning::Tuning;

    const HERO_X: f32 = 85.0;
    const HERO_Y: f32 = 500.0;

    fn session() -> SessionState {
        let mut state = SessionState::new(LevelSchedule::default(), Tuning::default());
        let speed = state.tuning.hero_speed;
        state
            .entities
            .push(Entity::hero(Vec2::new(HERO_X, HERO_Y), speed));
        state
    }

    /// Obstacle tile under the hero in lane 4
    fn under_hero(kind: EntityKind) -> Entity {
        Entity::new(kind, Vec2::new(lane_x(4), HERO_Y), Vec2::splat(TILE_SIZE))
    }

    fn hero(state: &SessionState) -> &Entity {
        state.entities.hero().unwrap()
    }

    #[test]
    fn test_teapot_collected_once() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::Teapot));
        let mut cues = CueSet::new();
        assert_eq!(resolve_collisions(&mut state, &mut cues), 1);
        assert_eq!(state.teapots, 1);
        assert!(cues.contains(Cue::Teapot));
        assert_eq!(resolve_collisions(&mut state, &mut CueSet::new()), 0);
        assert_eq!(state.teapots, 1);
    }

    #[test]
    fn test_sign_in_next_lane_is_missed() {
        let mut state = session();
        state.entities.push(Entity::new(
            EntityKind::MissingRoad,
            Vec2::new(lane_x(5), HERO_Y),
            Vec2::splat(TILE_SIZE),
        ));
        assert_eq!(resolve_collisions(&mut state, &mut CueSet::new()), 0);
        assert!(!hero(&state).is_dying());
    }

    #[test]
    fn test_hint_shows_message() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::Hint {
            message: "mind the gap".into(),
        }));
        let mut cues = CueSet::new();
        resolve_collisions(&mut state, &mut cues);
        assert_eq!(state.hint.as_ref().map(|h| h.message.as_str()), Some("mind the gap"));
        assert!(cues.is_empty());
    }

    #[test]
    fn test_redirect_starts_translation_and_blocks_triggers() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::Redirect {
            kind: crate::sim::entity::RedirectKind::Temporary,
            lanes: -2,
        }));
        state.entities.push(under_hero(EntityKind::Teapot));
        resolve_collisions(&mut state, &mut CueSet::new());

        let duration = 2.0 * state.tuning.lane_change_duration;
        assert_eq!(
            hero(&state).effect,
            TransientEffect::LaneTranslation {
                from: HERO_X,
                to: HERO_X - 2.0 * TILE_SIZE,
                elapsed: 0.0,
                duration,
            }
        );
        // Teapot behind the redirect in store order wasn't touched
        assert_eq!(state.teapots, 0);
        assert_eq!(resolve_collisions(&mut state, &mut CueSet::new()), 0);
    }

    #[test]
    fn test_redirect_clamped_to_road() {
        let hero = Entity::hero(Vec2::new(lane_x(5), HERO_Y), Vec2::ONE);
        match lane_translation(&hero, 3, 0.25) {
            TransientEffect::LaneTranslation { to, duration, .. } => {
                assert_eq!(to, MAP_WIDTH - TILE_SIZE - HERO_WIDTH);
                assert_eq!(duration, 0.75);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_road_not_found_spawns_falling_road_below() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::RoadNotFound));
        let mut cues = CueSet::new();
        resolve_collisions(&mut state, &mut cues);
        assert!(cues.contains(Cue::RoadNotFound));
        assert_eq!(state.entities.pending_len(), 1);
        state.entities.merge_pending();
        let road = &state.entities.as_slice()[0];
        assert_eq!(road.kind, EntityKind::FallingRoad);
        assert_eq!(road.pos, Vec2::new(lane_x(4), HERO_Y + TILE_SIZE));
    }

    #[test]
    fn test_speed_limit_arms_camera() {
        let mut state = session();
        state.entities.push(Entity::new(
            EntityKind::SpeedLimit,
            Vec2::new(TILE_SIZE, HERO_Y),
            Vec2::new(f32::from(LANE_COUNT) * TILE_SIZE, TILE_SIZE),
        ));
        let mut cues = CueSet::new();
        resolve_collisions(&mut state, &mut cues);
        assert!(state.camera.is_speed_limited());
        assert!(cues.contains(Cue::SpeedLimit));
    }

    #[test]
    fn test_advisory_signs_only_announce() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::RoadOk));
        state.entities.push(under_hero(EntityKind::RoadUnavailable));
        let mut cues = CueSet::new();
        assert_eq!(resolve_collisions(&mut state, &mut cues), 2);
        assert!(cues.contains(Cue::RoadOk));
        assert!(cues.contains(Cue::RoadUnavailable));
        assert!(!hero(&state).is_dying());
    }

    #[test]
    fn test_missing_road_is_fatal() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::MissingRoad));
        let mut cues = CueSet::new();
        resolve_collisions(&mut state, &mut cues);
        assert!(hero(&state).is_dying());
        assert!(cues.contains(Cue::Crash));
    }

    #[test]
    fn test_falling_road_shrinks_then_kills() {
        let mut state = session();
        let mut road = Entity::falling_road(Vec2::new(lane_x(4), HERO_Y));
        road.animation.frame = 1;
        state.entities.push(road);

        resolve_collisions(&mut state, &mut CueSet::new());
        let frames = crate::sim::entity::atlas::FALLING_ROAD.len() as f32;
        assert_eq!(hero(&state).scale, 1.0 - 1.0 / frames);
        assert!(!hero(&state).is_dying());

        // Still reacting on the next frame once the lifecycle clears the flag
        for entity in state.entities.iter_mut() {
            if entity.kind.is_repeatable() {
                entity.triggered = false;
                entity.animation.frame = 4;
            }
        }
        resolve_collisions(&mut state, &mut CueSet::new());
        assert!(hero(&state).is_dying());
    }

    #[test]
    fn test_hazard_contact_policy() {
        let hole = Entity::new(EntityKind::MissingRoad, Vec2::ZERO, Vec2::splat(TILE_SIZE));
        let contact = hazard_contact(&hole).unwrap();
        assert!(contact.immediate && contact.is_fatal());

        let mut road = Entity::falling_road(Vec2::ZERO);
        let midpoint = road.animation.midpoint();
        road.animation.frame = midpoint;
        assert!(!hazard_contact(&road).unwrap().is_fatal());
        road.animation.frame = midpoint + 1;
        assert!(hazard_contact(&road).unwrap().is_fatal());

        assert!(hazard_contact(&Entity::new(EntityKind::Teapot, Vec2::ZERO, Vec2::ONE)).is_none());
    }

    #[test]
    fn test_panels_never_collide() {
        let mut state = session();
        state.entities.push(under_hero(EntityKind::HighwayPanel {
            text: "EXIT 404".into(),
        }));
        assert_eq!(resolve_collisions(&mut state, &mut CueSet::new()), 0);
    }
}
