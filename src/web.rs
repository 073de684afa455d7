//! Browser host glue
//!
//! The page owns the canvas, the animation frame loop and audio playback. It
//! forwards DOM events here and gets back one JSON frame per callback with the
//! render snapshot plus the cues and music commands to play.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{Cue, MusicCommand};
use crate::persistence::BrowserStore;
use crate::platform::{InputState, Timebase};
use crate::settings::Settings;
use crate::sim::{LevelSchedule, SessionState, Snapshot, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        // Another logger is already installed, so this still reaches the console
        log::warn!("Logger not initialised: {}", e);
    }
    log::info!("Highway 404 starting...");
}

#[derive(Serialize)]
struct CueView {
    id: &'static str,
    phrase: Option<&'static str>,
}

impl From<Cue> for CueView {
    fn from(cue: Cue) -> Self {
        Self {
            id: cue.id(),
            phrase: cue.phrase(),
        }
    }
}

/// What the page receives every frame
#[derive(Serialize)]
struct Frame {
    #[serde(flatten)]
    snapshot: Snapshot,
    cues: Vec<CueView>,
    music: Vec<MusicCommand>,
    muted: bool,
    speech: bool,
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    state: SessionState,
    input: InputState,
    timebase: Timebase,
    settings: Settings,
    store: BrowserStore,
}

impl WebGame {
    fn with_schedule(schedule: LevelSchedule, tuning: Tuning) -> Self {
        let settings = Settings::load();
        let timebase = Timebase::new(tuning.max_frame_dt);
        Self {
            state: SessionState::new(schedule, tuning),
            input: InputState::new(settings.drag_threshold),
            timebase,
            settings,
            store: BrowserStore,
        }
    }
}

#[wasm_bindgen]
impl WebGame {
    /// Game on the shipped level
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebGame, JsValue> {
        let schedule = LevelSchedule::highway_404().map_err(to_js)?;
        Ok(Self::with_schedule(schedule, Tuning::default()))
    }

    /// Game on a custom level (JSON array of schedule entries)
    pub fn with_level(level_json: &str) -> Result<WebGame, JsValue> {
        let schedule = LevelSchedule::from_json(level_json).map_err(to_js)?;
        Ok(Self::with_schedule(schedule, Tuning::default()))
    }

    /// Advance one animation frame and return it as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let dt = self.timebase.frame(now_ms);
        let input = self.input.take();
        let out = tick(&mut self.state, &input, dt, &mut self.store);

        let (cues, music): (Vec<CueView>, Vec<MusicCommand>) = if self.settings.muted {
            (Vec::new(), Vec::new())
        } else {
            (out.cues.iter().map(CueView::from).collect(), out.music)
        };
        let frame = Frame {
            snapshot: self.state.snapshot(),
            cues,
            music,
            muted: self.settings.muted,
            speech: self.settings.speech,
        };
        serde_json::to_string(&frame).map_err(to_js)
    }

    pub fn key_down(&mut self, code: &str, repeat: bool) {
        self.input.key_down(code, repeat);
    }

    pub fn key_up(&mut self, code: &str, key_code: u32) {
        self.input.key_up(code, key_code);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.input.pointer_down(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.input.pointer_up();
    }

    /// Page visibility changed; hidden time never reaches the simulation
    pub fn set_visible(&mut self, visible: bool, now_ms: f64) {
        if visible {
            self.timebase.resume(now_ms);
        } else {
            self.timebase.suspend();
            self.input.keyboard.clear();
            log::info!("Suspended (page hidden)");
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.settings.save();
        muted
    }

    /// Host-side unlock (e.g. a supporter subscription)
    pub fn unlock_extra_content(&mut self) {
        self.state.unlock_extra_content();
    }
}
