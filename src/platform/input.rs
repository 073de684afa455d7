//! Input translation
//!
//! Turns raw host events (DOM key codes, pointer positions) into the
//! per-frame [`TickInput`] the simulation consumes.

use glam::Vec2;

use crate::sim::TickInput;

/// Legacy key codes used by the title screen's special sequence
pub mod keys {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const A: u32 = 65;
    pub const B: u32 = 66;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    fn sign(self) -> f32 {
        match self {
            Direction::Left | Direction::Up => -1.0,
            Direction::Right | Direction::Down => 1.0,
        }
    }
}

/// Direction for a physical key (`KeyboardEvent.code`). Arrows, WASD and ZQSD.
pub fn direction_for_code(code: &str) -> Option<Direction> {
    match code {
        "ArrowLeft" | "KeyA" | "KeyQ" => Some(Direction::Left),
        "ArrowRight" | "KeyD" => Some(Direction::Right),
        "ArrowUp" | "KeyW" | "KeyZ" => Some(Direction::Up),
        "ArrowDown" | "KeyS" => Some(Direction::Down),
        _ => None,
    }
}

/// Keyboard intent: each axis holds the last key pressed on it and releasing
/// any key on an axis stops that axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keyboard {
    intent: Vec2,
}

impl Keyboard {
    pub fn press(&mut self, direction: Direction) {
        if direction.is_horizontal() {
            self.intent.x = direction.sign();
        } else {
            self.intent.y = direction.sign();
        }
    }

    pub fn release(&mut self, direction: Direction) {
        if direction.is_horizontal() {
            self.intent.x = 0.0;
        } else {
            self.intent.y = 0.0;
        }
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }

    pub fn clear(&mut self) {
        self.intent = Vec2::ZERO;
    }
}

/// Touch/pointer drag measured from where the touch started.
///
/// The drag is scaled by the threshold, so dragging `threshold` px or more
/// gives full intent on that axis.
#[derive(Debug, Clone, Copy)]
pub struct TouchTracker {
    origin: Option<Vec2>,
    intent: Vec2,
    threshold: f32,
}

impl TouchTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            origin: None,
            intent: Vec2::ZERO,
            threshold: threshold.max(1.0),
        }
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn start(&mut self, pos: Vec2) {
        self.origin = Some(pos);
        self.intent = Vec2::ZERO;
    }

    pub fn move_to(&mut self, pos: Vec2) {
        if let Some(origin) = self.origin {
            self.intent = ((pos - origin) / self.threshold).clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
    }

    /// Lifting the finger stops the hero
    pub fn end(&mut self) {
        self.origin = None;
        self.intent = Vec2::ZERO;
    }

    pub fn intent(&self) -> Vec2 {
        self.intent
    }
}

/// Accumulates host events between two frames
#[derive(Debug, Clone)]
pub struct InputState {
    pub keyboard: Keyboard,
    pub touch: TouchTracker,
    key: Option<u32>,
    confirm: bool,
    pause: bool,
    restart: bool,
}

impl InputState {
    pub fn new(drag_threshold: f32) -> Self {
        Self {
            keyboard: Keyboard::default(),
            touch: TouchTracker::new(drag_threshold),
            key: None,
            confirm: false,
            pause: false,
            restart: false,
        }
    }

    /// Key pressed. Auto-repeats are ignored.
    pub fn key_down(&mut self, code: &str, repeat: bool) {
        if repeat {
            return;
        }
        if let Some(direction) = direction_for_code(code) {
            self.keyboard.press(direction);
            return;
        }
        match code {
            "KeyP" => self.pause = true,
            "KeyR" => self.restart = true,
            _ => {}
        }
    }

    /// Key released; `key_code` feeds the title screen
    pub fn key_up(&mut self, code: &str, key_code: u32) {
        if let Some(direction) = direction_for_code(code) {
            self.keyboard.release(direction);
        }
        self.key = Some(key_code);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.touch.start(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.touch.move_to(pos);
    }

    pub fn pointer_up(&mut self) {
        self.touch.end();
        self.confirm = true;
    }

    /// Input for the next frame; one-shot events are consumed
    pub fn take(&mut self) -> TickInput {
        let intent = if self.touch.is_active() {
            self.touch.intent()
        } else {
            self.keyboard.intent()
        };
        TickInput {
            intent,
            key: self.key.take(),
            confirm: std::mem::take(&mut self.confirm),
            pause: std::mem::take(&mut self.pause),
            restart: std::mem::take(&mut self.restart),
        }
    }
}
