//! Entity model and the ordered entity store
//!
//! Every simulated object (hero, obstacles, road fragments, panels) is an
//! [`Entity`] whose [`EntityKind`] carries the kind-specific payload.

use glam::Vec2;
use serde::Serialize;

use super::collision::Aabb;
use crate::consts::*;

/// Sprite region in the tileset. Opaque to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpriteRegion {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

const fn region(col: u16, row: u16, w: u16, h: u16) -> SpriteRegion {
    SpriteRegion {
        x: col * TILE_SIZE as u16,
        y: row * TILE_SIZE as u16,
        w,
        h,
    }
}

const T: u16 = TILE_SIZE as u16;

/// Tileset layout
pub mod atlas {
    use super::*;

    pub const HERO: &[SpriteRegion] = &[region(0, 0, T / 2, T)];
    /// Road crumbling away, last frame is the hole
    pub const FALLING_ROAD: &[SpriteRegion] = &[
        region(2, 0, T, T),
        region(3, 0, T, T),
        region(4, 0, T, T),
        region(5, 0, T, T),
        region(5, 1, T, T),
        region(5, 2, T, T),
    ];
    pub const MISSING_ROAD: &[SpriteRegion] = &[region(5, 2, T, T)];
    pub const HINT: &[SpriteRegion] = &[region(6, 0, T, T)];
    pub const ROAD_OK: &[SpriteRegion] = &[region(0, 3, T, T)];
    pub const MOVED_PERMANENTLY: &[SpriteRegion] = &[region(1, 3, T, T)];
    pub const TEMPORARY_REDIRECT: &[SpriteRegion] = &[region(2, 3, T, T)];
    pub const ROAD_NOT_FOUND: &[SpriteRegion] = &[region(3, 3, T, T)];
    pub const TEAPOT: &[SpriteRegion] = &[region(4, 3, T, T), region(4, 4, T, T)];
    pub const SPEED_LIMIT: &[SpriteRegion] = &[region(5, 3, T, T)];
    pub const NOT_IMPLEMENTED: &[SpriteRegion] = &[region(6, 3, T, T)];
    pub const UNAVAILABLE: &[SpriteRegion] = &[region(7, 3, T, T)];
    /// Text-only entities have no bitmap
    pub const TEXT_ONLY: &[SpriteRegion] = &[];
}

/// Which redirect sign was hit. Both behave the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RedirectKind {
    /// 301
    Permanent,
    /// 307
    Temporary,
}

/// Entity discriminant with kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Hero,
    /// Informational hint, shows a message when driven over
    Hint { message: String },
    /// 200: repairs the road ahead of a falling road chain
    RoadOk,
    /// 301/307: shifts the hero by a number of lanes
    Redirect { kind: RedirectKind, lanes: i8 },
    /// 404: starts a falling road chain behind the hero
    RoadNotFound,
    /// 418: collectible
    Teapot,
    /// 429: slows the highway down for a while
    SpeedLimit,
    /// 501: warns about pre-placed missing road
    RoadNotImplemented,
    /// 503: warns about pre-placed missing road
    RoadUnavailable,
    FallingRoad,
    MissingRoad,
    /// Decorative overhead panel, never collides
    HighwayPanel { text: String },
}

impl EntityKind {
    fn sprites(&self) -> &'static [SpriteRegion] {
        match self {
            EntityKind::Hero => atlas::HERO,
            EntityKind::Hint { .. } => atlas::HINT,
            EntityKind::RoadOk => atlas::ROAD_OK,
            EntityKind::Redirect {
                kind: RedirectKind::Permanent,
                ..
            } => atlas::MOVED_PERMANENTLY,
            EntityKind::Redirect {
                kind: RedirectKind::Temporary,
                ..
            } => atlas::TEMPORARY_REDIRECT,
            EntityKind::RoadNotFound => atlas::ROAD_NOT_FOUND,
            EntityKind::Teapot => atlas::TEAPOT,
            EntityKind::SpeedLimit => atlas::SPEED_LIMIT,
            EntityKind::RoadNotImplemented => atlas::NOT_IMPLEMENTED,
            EntityKind::RoadUnavailable => atlas::UNAVAILABLE,
            EntityKind::FallingRoad => atlas::FALLING_ROAD,
            EntityKind::MissingRoad => atlas::MISSING_ROAD,
            EntityKind::HighwayPanel { .. } => atlas::TEXT_ONLY,
        }
    }

    fn loops(&self) -> bool {
        matches!(self, EntityKind::Teapot)
    }

    /// Whether the hero can collide with this kind at all
    pub fn is_collidable(&self) -> bool {
        !matches!(self, EntityKind::Hero | EntityKind::HighwayPanel { .. })
    }

    /// Kinds that react on every overlapping frame instead of only the first
    pub fn is_repeatable(&self) -> bool {
        matches!(self, EntityKind::FallingRoad)
    }

    /// Short label for renderers and logs
    pub fn label(&self) -> &str {
        match self {
            EntityKind::Hero => "hero",
            EntityKind::Hint { .. } => "hint",
            EntityKind::RoadOk => "200",
            EntityKind::Redirect {
                kind: RedirectKind::Permanent,
                ..
            } => "301",
            EntityKind::Redirect {
                kind: RedirectKind::Temporary,
                ..
            } => "307",
            EntityKind::RoadNotFound => "404",
            EntityKind::Teapot => "418",
            EntityKind::SpeedLimit => "429",
            EntityKind::RoadNotImplemented => "501",
            EntityKind::RoadUnavailable => "503",
            EntityKind::FallingRoad => "falling_road",
            EntityKind::MissingRoad => "missing_road",
            EntityKind::HighwayPanel { text } => text,
        }
    }
}

/// Frame-based sprite animation
#[derive(Debug, Clone, Serialize)]
pub struct Animation {
    pub frame: usize,
    pub frame_time: f32,
    pub looping: bool,
    #[serde(skip)]
    pub frames: &'static [SpriteRegion],
}

impl Animation {
    pub fn new(frames: &'static [SpriteRegion], looping: bool) -> Self {
        Self {
            frame: 0,
            frame_time: 0.0,
            looping,
            frames,
        }
    }

    /// Accumulate time; returns true when an animation frame interval elapsed
    pub fn advance(&mut self, dt: f32, frame_duration: f32) -> bool {
        self.frame_time += dt;
        if self.frame_time <= frame_duration {
            return false;
        }
        self.frame_time -= frame_duration;
        let len = self.frames.len();
        if self.looping && len > 0 {
            self.frame = (self.frame + 1) % len;
        } else if self.frame + 1 < len {
            self.frame += 1;
        }
        true
    }

    /// Index of the middle frame; hazards past it are no longer drivable
    pub fn midpoint(&self) -> usize {
        self.frames.len() / 2
    }

    pub fn sprite(&self) -> Option<SpriteRegion> {
        self.frames.get(self.frame).copied()
    }
}

/// What a chained entity spawns once its timer elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Spawner {
    /// Another falling road tile one tile further up the lane
    FallingRoad,
}

/// Pending spawn of a successor entity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpawnTimer {
    pub elapsed: f32,
    pub spawner: Spawner,
}

/// Time-bounded modifier on an entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TransientEffect {
    #[default]
    None,
    /// Spinning and shrinking out of existence
    Dying { rotation: f32, scale: f32 },
    /// Eased horizontal move between two x positions
    LaneTranslation {
        from: f32,
        to: f32,
        elapsed: f32,
        duration: f32,
    },
}

/// A simulated object
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: u32,
    #[serde(flatten)]
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Directional intent per axis in [-1, 1]
    pub intent: Vec2,
    /// Per-axis speed, absent for static entities
    pub speed: Option<Vec2>,
    pub animation: Animation,
    pub dead: bool,
    /// Collision already resolved
    pub triggered: bool,
    pub spawn: Option<SpawnTimer>,
    pub effect: TransientEffect,
    /// Render scale outside of the dying effect (falling cue)
    pub scale: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        let animation = Animation::new(kind.sprites(), kind.loops());
        Self {
            id: 0,
            kind,
            pos,
            size,
            intent: Vec2::ZERO,
            speed: None,
            animation,
            dead: false,
            triggered: false,
            spawn: None,
            effect: TransientEffect::None,
            scale: 1.0,
        }
    }

    pub fn hero(pos: Vec2, speed: Vec2) -> Self {
        let mut hero = Self::new(EntityKind::Hero, pos, Vec2::new(HERO_WIDTH, HERO_HEIGHT));
        hero.speed = Some(speed);
        hero
    }

    /// A falling road tile that will extend itself up the lane
    pub fn falling_road(pos: Vec2) -> Self {
        let mut tile = Self::new(EntityKind::FallingRoad, pos, Vec2::splat(TILE_SIZE));
        tile.spawn = Some(SpawnTimer {
            elapsed: 0.0,
            spawner: Spawner::FallingRoad,
        });
        tile
    }

    pub fn is_hero(&self) -> bool {
        self.kind == EntityKind::Hero
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.effect, TransientEffect::Dying { .. })
    }

    pub fn is_translating(&self) -> bool {
        matches!(self.effect, TransientEffect::LaneTranslation { .. })
    }

    /// Start dying; irreversible
    pub fn kill(&mut self) {
        if !self.is_dying() && !self.dead {
            // Death steps on animation frames counted from now
            self.animation.frame_time = 0.0;
            self.effect = TransientEffect::Dying {
                rotation: 0.0,
                scale: self.scale,
            };
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Effective render scale and rotation
    pub fn visual(&self) -> (f32, f32) {
        match self.effect {
            TransientEffect::Dying { rotation, scale } => (scale, rotation),
            _ => (self.scale, 0.0),
        }
    }
}

/// Ordered collection of live entities plus those spawned this frame
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    pending: Vec<Entity>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending.clear();
    }

    fn assign_id(&mut self, entity: &mut Entity) -> u32 {
        self.next_id = self.next_id.max(1);
        entity.id = self.next_id;
        self.next_id += 1;
        entity.id
    }

    /// Append directly to the live list
    pub fn push(&mut self, mut entity: Entity) -> u32 {
        let id = self.assign_id(&mut entity);
        self.entities.push(entity);
        id
    }

    /// Queue an entity to join the live list on the next merge
    pub fn spawn(&mut self, mut entity: Entity) -> u32 {
        let id = self.assign_id(&mut entity);
        self.pending.push(entity);
        id
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Prepend newly spawned entities so they draw beneath existing ones
    pub fn merge_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut merged = std::mem::take(&mut self.pending);
        merged.append(&mut self.entities);
        self.entities = merged;
    }

    /// Drop dead entities and everything that scrolled past `bottom`
    pub fn prune(&mut self, bottom: f32) {
        self.entities
            .retain(|e| !e.dead && (e.is_hero() || e.pos.y < bottom));
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn as_mut_slice(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn hero_index(&self) -> Option<usize> {
        self.entities.iter().position(Entity::is_hero)
    }

    pub fn hero(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_hero())
    }

    pub fn hero_mut(&mut self) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.is_hero())
    }
}
