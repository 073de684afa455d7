//! Gameplay simulation
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Entities and the level schedule they're spawned from
//! - Scrolling camera with wraparound
//! - Collisions and their reactions
//! - Title/Playing/End screens and scoring
//!
//! Time comes in as a variable frame delta; side effects (audio, storage)
//! go out through [`FrameOutput`] and the
//! [`HighScoreStore`](crate::persistence::HighScoreStore) collaborator.

pub mod camera;
pub mod collision;
pub mod entity;
pub mod lifecycle;
pub mod reaction;
pub mod schedule;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::{Camera, ScrollRegime};
pub use collision::{Aabb, hero_hits, push_out};
pub use entity::{
    Animation, Entity, EntityKind, EntityStore, RedirectKind, SpriteRegion, TransientEffect,
};
pub use reaction::{HazardContact, Reaction, resolve_collisions};
pub use schedule::{EventKind, LevelSchedule, ScheduleEntry, ScheduleError};
pub use snapshot::{EntityView, Snapshot};
pub use state::{Hint, Screen, SessionState};
pub use tick::{FrameOutput, KONAMI_CODE, TickInput, start_game, tick};
