//! Read-only view of a session for renderers
//!
//! Built fresh every frame; owns its data so a host can serialize it or hand
//! it across the wasm boundary without borrowing the simulation.

use glam::Vec2;
use serde::Serialize;

use super::entity::{Entity, EntityKind, SpriteRegion};
use super::state::{Screen, SessionState};

/// One drawable entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub label: String,
    pub pos: Vec2,
    pub size: Vec2,
    /// Current animation frame, `None` for text-only entities
    pub sprite: Option<SpriteRegion>,
    pub scale: f32,
    pub rotation: f32,
    /// Text drawn instead of (or over) a sprite
    pub text: Option<String>,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        let (scale, rotation) = entity.visual();
        let text = match &entity.kind {
            EntityKind::HighwayPanel { text } => Some(text.clone()),
            _ => None,
        };
        Self {
            id: entity.id,
            label: entity.kind.label().to_owned(),
            pos: entity.pos,
            size: entity.size,
            sprite: entity.animation.sprite(),
            scale,
            rotation,
            text,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub screen: Screen,
    pub paused: bool,
    /// Top-left of the viewport in world space
    pub camera: Vec2,
    pub countdown: f32,
    /// Countdown as `m:ss`
    pub countdown_label: String,
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
    pub teapots: u32,
    pub hint: Option<String>,
    pub win: bool,
    pub extra_content: bool,
    /// Draw order
    pub entities: Vec<EntityView>,
}

/// `m:ss`, rounding partial seconds up so 0:00 only shows at the very end
pub fn format_countdown(seconds: f32) -> String {
    let total = seconds.max(0.0).ceil() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

impl SessionState {
    pub fn snapshot(&self) -> Snapshot {
        let entities = match self.screen {
            Screen::Playing => self.entities.iter().map(EntityView::from).collect(),
            Screen::Title | Screen::End => Vec::new(),
        };
        Snapshot {
            screen: self.screen,
            paused: self.paused,
            camera: self.camera.offset,
            countdown: self.countdown,
            countdown_label: format_countdown(self.countdown),
            score: self.display_score(),
            high_score: self.high_score.best,
            new_high_score: self.new_high_score,
            teapots: self.teapots,
            hint: self.hint.as_ref().map(|h| h.message.clone()),
            win: self.win,
            extra_content: self.extra_content,
            entities,
        }
    }
}
