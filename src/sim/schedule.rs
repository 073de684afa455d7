//! Level schedule
//!
//! A level is an authored list of time-stamped events. On every game start the
//! schedule is converted into entities placed above the viewport at the
//! distance the highway scrolls before the event's time comes up.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Entity, EntityKind, EntityStore, RedirectKind};
use crate::consts::*;
use crate::lane_x;

/// Authored level shipped with the game
const HIGHWAY_404_JSON: &str = include_str!("../../levels/highway_404.json");

/// Why a schedule was rejected
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid schedule: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entry {index}: time {time} must be finite and non-negative")]
    InvalidTime { index: usize, time: f32 },
    #[error("entry {index}: lane {lane} is out of range")]
    LaneOutOfRange { index: usize, lane: u8 },
    #[error("entry {index}: `{kind}` must be placed in a lane, not lane 0")]
    NeedsLane { index: usize, kind: &'static str },
    #[error("entry {index}: `{kind}` needs a non-empty text")]
    EmptyText { index: usize, kind: &'static str },
    #[error("entry {index}: chain length must be at least 1")]
    ZeroChainLength { index: usize },
    #[error("entry {index}: redirect must shift by at least one lane")]
    ZeroRedirect { index: usize },
    #[error("entry {index}: redirect from lane {lane} by {lanes} leaves the road")]
    RedirectOffRoad { index: usize, lane: u8, lanes: i8 },
}

/// What an event spawns, with its kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Hint { message: String },
    RoadOk,
    MovedPermanently { lanes: i8 },
    TemporaryRedirect { lanes: i8 },
    RoadNotFound,
    Teapot,
    SpeedLimit,
    RoadNotImplemented { length: u8 },
    RoadUnavailable { length: u8 },
    Panel { text: String },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Hint { .. } => "hint",
            EventKind::RoadOk => "road_ok",
            EventKind::MovedPermanently { .. } => "moved_permanently",
            EventKind::TemporaryRedirect { .. } => "temporary_redirect",
            EventKind::RoadNotFound => "road_not_found",
            EventKind::Teapot => "teapot",
            EventKind::SpeedLimit => "speed_limit",
            EventKind::RoadNotImplemented { .. } => "road_not_implemented",
            EventKind::RoadUnavailable { .. } => "road_unavailable",
            EventKind::Panel { .. } => "panel",
        }
    }

    /// Kinds that only make sense across the whole road may use lane 0
    fn allows_global_lane(&self) -> bool {
        matches!(
            self,
            EventKind::Hint { .. } | EventKind::SpeedLimit | EventKind::Panel { .. }
        )
    }

    /// Entity kind plus the number of missing road tiles trailing it
    fn to_entity_kind(&self) -> (EntityKind, u8) {
        match self {
            EventKind::Hint { message } => (
                EntityKind::Hint {
                    message: message.clone(),
                },
                0,
            ),
            EventKind::RoadOk => (EntityKind::RoadOk, 0),
            EventKind::MovedPermanently { lanes } => (
                EntityKind::Redirect {
                    kind: RedirectKind::Permanent,
                    lanes: *lanes,
                },
                0,
            ),
            EventKind::TemporaryRedirect { lanes } => (
                EntityKind::Redirect {
                    kind: RedirectKind::Temporary,
                    lanes: *lanes,
                },
                0,
            ),
            EventKind::RoadNotFound => (EntityKind::RoadNotFound, 0),
            EventKind::Teapot => (EntityKind::Teapot, 0),
            EventKind::SpeedLimit => (EntityKind::SpeedLimit, 0),
            EventKind::RoadNotImplemented { length } => (EntityKind::RoadNotImplemented, *length),
            EventKind::RoadUnavailable { length } => (EntityKind::RoadUnavailable, *length),
            EventKind::Panel { text } => (EntityKind::HighwayPanel { text: text.clone() }, 0),
        }
    }
}

/// One authored event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Seconds from game start
    pub time: f32,
    /// 1..=LANE_COUNT, or 0 for effects spanning the road
    pub lane: u8,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl ScheduleEntry {
    pub fn new(time: f32, lane: u8, kind: EventKind) -> Self {
        Self { time, lane, kind }
    }

    fn validate(&self, index: usize) -> Result<(), ScheduleError> {
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(ScheduleError::InvalidTime {
                index,
                time: self.time,
            });
        }
        if self.lane > LANE_COUNT {
            return Err(ScheduleError::LaneOutOfRange {
                index,
                lane: self.lane,
            });
        }
        if self.lane == 0 && !self.kind.allows_global_lane() {
            return Err(ScheduleError::NeedsLane {
                index,
                kind: self.kind.name(),
            });
        }
        match &self.kind {
            EventKind::Hint { message: text } | EventKind::Panel { text } => {
                if text.trim().is_empty() {
                    return Err(ScheduleError::EmptyText {
                        index,
                        kind: self.kind.name(),
                    });
                }
            }
            EventKind::RoadNotImplemented { length } | EventKind::RoadUnavailable { length } => {
                if *length == 0 {
                    return Err(ScheduleError::ZeroChainLength { index });
                }
            }
            EventKind::MovedPermanently { lanes } | EventKind::TemporaryRedirect { lanes } => {
                if *lanes == 0 {
                    return Err(ScheduleError::ZeroRedirect { index });
                }
                let target = i16::from(self.lane) + i16::from(*lanes);
                if target < 1 || target > i16::from(LANE_COUNT) {
                    return Err(ScheduleError::RedirectOffRoad {
                        index,
                        lane: self.lane,
                        lanes: *lanes,
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// World position and size of the entity this entry spawns
    fn placement(&self, top: f32, scroll_speed: f32) -> (Vec2, Vec2) {
        let y = spawn_y(self.time, top, scroll_speed);
        if self.lane == 0 {
            (
                Vec2::new(TILE_SIZE, y),
                Vec2::new(f32::from(LANE_COUNT) * TILE_SIZE, TILE_SIZE),
            )
        } else {
            (Vec2::new(lane_x(self.lane), y), Vec2::splat(TILE_SIZE))
        }
    }
}

/// World y for an event happening `time` seconds in, relative to the viewport top
#[inline]
pub fn spawn_y(time: f32, top: f32, scroll_speed: f32) -> f32 {
    top - time * scroll_speed
}

/// A validated, immutable list of events
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelSchedule {
    entries: Vec<ScheduleEntry>,
}

impl LevelSchedule {
    /// Validate every entry; a single bad entry rejects the whole level
    pub fn new(entries: Vec<ScheduleEntry>) -> Result<Self, ScheduleError> {
        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index)?;
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// The level shipped with the game
    pub fn highway_404() -> Result<Self, ScheduleError> {
        Self::from_json(HIGHWAY_404_JSON)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawn every event as entities above the viewport whose top is at `top`.
    ///
    /// Chained hazards add their missing road tiles one tile apart up the lane.
    pub fn materialize(&self, top: f32, scroll_speed: f32, store: &mut EntityStore) -> usize {
        let before = store.len() + store.pending_len();
        for entry in &self.entries {
            let (pos, size) = entry.placement(top, scroll_speed);
            let (kind, chain) = entry.kind.to_entity_kind();
            store.push(Entity::new(kind, pos, size));
            for i in 1..=chain {
                let tile = Vec2::new(pos.x, pos.y - f32::from(i) * TILE_SIZE);
                store.push(Entity::new(EntityKind::MissingRoad, tile, size));
            }
        }
        let spawned = store.len() + store.pending_len() - before;
        log::debug!(
            "Materialized {} schedule entries into {} entities",
            self.entries.len(),
            spawned
        );
        spawned
    }
}
