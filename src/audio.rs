//! Audio cues
//!
//! The simulation never plays sound itself. Each frame it produces a set of
//! named cues (spoken status messages and effects) plus music commands, and
//! the host forwards them to whatever plays audio on its platform.

use std::collections::BTreeSet;

use serde::Serialize;

/// Sound/speech feedback requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// 200 sign driven over
    RoadOk,
    /// 404 sign driven over, road starts falling
    RoadNotFound,
    /// 418 collected
    Teapot,
    /// 429 sign driven over
    SpeedLimit,
    /// 501 sign driven over
    RoadNotImplemented,
    /// 503 sign driven over
    RoadUnavailable,
    /// Hero fell off the road
    Crash,
}

impl Cue {
    /// Identifier handed to the audio player
    pub fn id(&self) -> &'static str {
        match self {
            Cue::RoadOk => "road_ok",
            Cue::RoadNotFound => "road_not_found",
            Cue::Teapot => "teapot",
            Cue::SpeedLimit => "speed_limit",
            Cue::RoadNotImplemented => "road_not_implemented",
            Cue::RoadUnavailable => "road_unavailable",
            Cue::Crash => "crash",
        }
    }

    /// Text for a speech synthesizer, `None` for plain sound effects
    pub fn phrase(&self) -> Option<&'static str> {
        match self {
            Cue::RoadOk => Some("200, OK"),
            Cue::RoadNotFound => Some("404, road not found"),
            Cue::Teapot => Some("418, I'm a teapot"),
            Cue::SpeedLimit => Some("429, too many requests"),
            Cue::RoadNotImplemented => Some("501, road not implemented"),
            Cue::RoadUnavailable => Some("503, road unavailable"),
            Cue::Crash => None,
        }
    }
}

/// Cues requested during one frame. Asking twice plays once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CueSet(BTreeSet<Cue>);

impl CueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the cue was already requested this frame
    pub fn insert(&mut self, cue: Cue) -> bool {
        self.0.insert(cue)
    }

    pub fn contains(&self, cue: Cue) -> bool {
        self.0.contains(&cue)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cue> + '_ {
        self.0.iter().copied()
    }
}

/// Background music control tied to screen transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicCommand {
    Start,
    Stop,
}

/// Anything that can play cues and music
pub trait AudioSink {
    fn play_cue(&mut self, cue: Cue);
    fn music(&mut self, command: MusicCommand);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    pub muted: bool,
    pub played: Vec<Cue>,
}

impl AudioSink for LogAudio {
    fn play_cue(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        log::debug!("Cue: {} ({})", cue.id(), cue.phrase().unwrap_or("sfx"));
        self.played.push(cue);
    }

    fn music(&mut self, command: MusicCommand) {
        if !self.muted {
            log::debug!("Music: {:?}", command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_deduplicate() {
        let mut cues = CueSet::new();
        assert!(cues.insert(Cue::Teapot));
        assert!(!cues.insert(Cue::Teapot));
        assert!(cues.insert(Cue::RoadOk));
        assert_eq!(cues.len(), 2);
        assert_eq!(cues.iter().collect::<Vec<_>>(), vec![Cue::RoadOk, Cue::Teapot]);
    }

    #[test]
    fn test_muted_sink_plays_nothing() {
        let mut sink = LogAudio {
            muted: true,
            ..Default::default()
        };
        sink.play_cue(Cue::Crash);
        assert!(sink.played.is_empty());
    }
}
