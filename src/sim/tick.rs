//! Per-frame simulation step
//!
//! Drives the Title/Playing/End screens and, while playing, the frame
//! pipeline: countdown, entity updates, scrolling, collisions, spawn merge and
//! pruning.

use glam::Vec2;
use serde::Serialize;

use super::camera::Camera;
use super::entity::Entity;
use super::lifecycle::update_entities;
use super::reaction::resolve_collisions;
use super::state::{Screen, SessionState};
use crate::audio::{AudioSink, CueSet, MusicCommand};
use crate::consts::*;
use crate::highscores::HighScore;
use crate::lane_x;
use crate::persistence::HighScoreStore;

/// Key codes of the title screen's special sequence
pub const KONAMI_CODE: [u32; 10] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];

/// Lane the hero starts in
const START_LANE: u8 = 4;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional intent per axis in [-1, 1]
    pub intent: Vec2,
    /// Key released this frame (legacy key code)
    pub key: Option<u32>,
    /// Start/dismiss (click/tap)
    pub confirm: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart the session
    pub restart: bool,
}

/// Side effects requested during one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameOutput {
    pub cues: CueSet,
    pub music: Vec<MusicCommand>,
}

impl FrameOutput {
    /// Forward everything to an audio sink
    pub fn dispatch(&self, sink: &mut dyn AudioSink) {
        for command in &self.music {
            sink.music(*command);
        }
        for cue in self.cues.iter() {
            sink.play_cue(cue);
        }
    }
}

/// Advance the session by `dt` seconds
pub fn tick(
    state: &mut SessionState,
    input: &TickInput,
    dt: f32,
    store: &mut dyn HighScoreStore,
) -> FrameOutput {
    let mut out = FrameOutput::default();
    match state.screen {
        Screen::Title => title(state, input, &mut out),
        Screen::Playing => play(state, input, dt, store, &mut out),
        Screen::End => {
            if input.key.is_some() || input.confirm {
                log::info!("Back to title");
                state.screen = Screen::Title;
            }
        }
    }
    out
}

fn title(state: &mut SessionState, input: &TickInput, out: &mut FrameOutput) {
    if let Some(code) = input.key {
        let index = state.sequence_index;
        if index < KONAMI_CODE.len() && code == KONAMI_CODE[index] {
            state.sequence_index += 1;
            if state.sequence_index == KONAMI_CODE.len() {
                state.unlock_extra_content();
            }
            return;
        }
        start_game(state, out);
    } else if input.confirm {
        start_game(state, out);
    }
}

/// Reset the session and spawn the level
pub fn start_game(state: &mut SessionState, out: &mut FrameOutput) {
    state.screen = Screen::Playing;
    state.paused = false;
    state.countdown = state.tuning.max_game_time;
    state.teapots = 0;
    state.win = false;
    state.final_score = 0;
    state.new_high_score = false;
    state.hint = None;
    state.sequence_index = 0;
    state.camera = Camera::new();
    state.entities.clear();

    let start = Vec2::new(
        lane_x(START_LANE) + (TILE_SIZE - HERO_WIDTH) / 2.0,
        MAP_HEIGHT - 2.0 * TILE_SIZE,
    );
    state
        .entities
        .push(Entity::hero(start, state.tuning.hero_speed));
    let spawned = state.materialize_schedule();

    log::info!("Game started with {} entities", spawned + 1);
    out.music.push(MusicCommand::Start);
}

/// Score the session, persist a new best and show the end screen
fn end_game(
    state: &mut SessionState,
    win: bool,
    store: &mut dyn HighScoreStore,
    out: &mut FrameOutput,
) {
    state.win = win;
    state.final_score = state.current_score();
    state.high_score = HighScore::load(store);
    state.new_high_score = state.high_score.submit(state.final_score, store);
    state.screen = Screen::End;
    state.paused = false;
    state.hint = None;

    log::info!(
        "Game over ({}), score {}",
        if win { "survived" } else { "fell" },
        state.final_score
    );
    out.music.push(MusicCommand::Stop);
}

fn play(
    state: &mut SessionState,
    input: &TickInput,
    dt: f32,
    store: &mut dyn HighScoreStore,
    out: &mut FrameOutput,
) {
    if input.restart {
        log::info!("Restart");
        start_game(state, out);
        return;
    }
    if input.pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if state.paused {
        return;
    }

    let Some(hero) = state.entities.hero_mut() else {
        log::error!("No hero while playing");
        if cfg!(debug_assertions) {
            panic!("no hero entity while playing");
        }
        start_game(state, out);
        return;
    };
    hero.intent = input.intent.clamp(Vec2::NEG_ONE, Vec2::ONE);

    state.countdown -= dt;
    if state.countdown <= 0.0 {
        state.countdown = 0.0;
        end_game(state, true, store, out);
        return;
    }
    state.update_hint(dt);

    update_entities(&mut state.entities, dt, &state.tuning);
    // Successors spawned above must ride this frame's scroll and wrap
    state.entities.merge_pending();
    let (hero_dead, hero_dying) = state
        .entities
        .hero()
        .map_or((true, false), |h| (h.dead, h.is_dying()));
    if hero_dead {
        state.entities.prune(state.camera.bottom());
        end_game(state, false, store, out);
        return;
    }

    state.camera.advance_timers(dt, hero_dying, &state.tuning);
    state
        .camera
        .scroll(dt, &state.tuning, state.entities.as_mut_slice());
    if let Some(hero) = state.entities.hero_mut() {
        if !hero_dying {
            state.camera.constrain(hero);
        }
        state.camera.snap_to(hero);
    }

    resolve_collisions(state, &mut out.cues);

    state.entities.merge_pending();
    state.entities.prune(state.camera.bottom());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Cue, LogAudio};
    use crate::persistence::MemoryStore;
    use crate::sim::entity::{EntityKind, RedirectKind};
    use crate::sim::schedule::LevelSchedule;
    use crate::tuning::Tuning;

    fn title_session() -> SessionState {
        SessionState::new(LevelSchedule::default(), Tuning::default())
    }

    fn playing_session(store: &mut MemoryStore) -> SessionState {
        let mut state = title_session();
        let start = TickInput {
            confirm: true,
            ..Default::default()
        };
        let out = tick(&mut state, &start, 0.0, store);
        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(out.music, vec![MusicCommand::Start]);
        state
    }

    fn hero(state: &SessionState) -> &Entity {
        state.entities.hero().unwrap()
    }

    /// Tile in the hero's lane at world y
    fn in_hero_lane(kind: EntityKind, y: f32) -> Entity {
        Entity::new(kind, Vec2::new(lane_x(START_LANE), y), Vec2::splat(TILE_SIZE))
    }

    #[test]
    fn test_start_game_places_hero_and_level() {
        let mut store = MemoryStore::default();
        let mut state = SessionState::new(LevelSchedule::highway_404().unwrap(), Tuning::default());
        tick(
            &mut state,
            &TickInput {
                confirm: true,
                ..Default::default()
            },
            0.0,
            &mut store,
        );
        assert_eq!(hero(&state).pos, Vec2::new(85.0, 600.0));
        assert!(state.entities.len() > state.schedule().len());
        assert_eq!(state.countdown, state.tuning.max_game_time);
    }

    #[test]
    fn test_survive_countdown_wins() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let input = TickInput::default();
        let ticks = (state.tuning.max_game_time / 0.5) as usize;
        let mut last = FrameOutput::default();
        for i in 0..ticks {
            assert_eq!(state.screen, Screen::Playing, "ended early at tick {i}");
            last = tick(&mut state, &input, 0.5, &mut store);
        }
        assert_eq!(state.screen, Screen::End);
        assert!(state.win);
        assert_eq!(state.countdown, 0.0);
        assert_eq!(state.final_score, 4040);
        assert!(state.new_high_score);
        assert_eq!(store.value, Some(4040));
        assert_eq!(last.music, vec![MusicCommand::Stop]);
    }

    #[test]
    fn test_missing_road_kills_after_death_animation() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let y = hero(&state).pos.y;
        state.entities.push(in_hero_lane(EntityKind::MissingRoad, y));

        let input = TickInput::default();
        let out = tick(&mut state, &input, 0.08, &mut store);
        assert!(hero(&state).is_dying());
        assert!(out.cues.contains(Cue::Crash));

        let frames = (1.0 / state.tuning.dying_scale_delta) as usize;
        for _ in 0..frames - 1 {
            tick(&mut state, &input, 0.08, &mut store);
            assert_eq!(state.screen, Screen::Playing);
            assert!(!hero(&state).dead);
        }
        tick(&mut state, &input, 0.08, &mut store);
        assert_eq!(state.screen, Screen::End);
        assert!(!state.win);
        assert!(state.entities.hero().is_none());
    }

    #[test]
    fn test_teapots_add_bonus() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        for y in [560.0, 520.0, 480.0] {
            state.entities.push(in_hero_lane(EntityKind::Teapot, y));
        }
        let input = TickInput::default();
        for _ in 0..180 {
            tick(&mut state, &input, 1.0 / 60.0, &mut store);
        }
        assert_eq!(state.teapots, 3);
        assert!(state.entities.iter().all(|e| e.kind != EntityKind::Teapot));

        state.countdown = 0.001;
        tick(&mut state, &input, 1.0 / 60.0, &mut store);
        assert_eq!(state.screen, Screen::End);
        assert!(state.win);
        assert_eq!(state.final_score, 4040 + 3 * state.tuning.teapot_bonus);
    }

    #[test]
    fn test_redirect_lands_in_target_lane() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let y = hero(&state).pos.y;
        state.entities.push(in_hero_lane(
            EntityKind::Redirect {
                kind: RedirectKind::Permanent,
                lanes: -2,
            },
            y,
        ));
        tick(&mut state, &TickInput::default(), 1.0 / 60.0, &mut store);
        assert!(hero(&state).is_translating());

        let input = TickInput {
            intent: Vec2::new(1.0, 0.0),
            ..Default::default()
        };

        // Steering is ignored horizontally until the move completes
        while hero(&state).is_translating() {
            tick(&mut state, &input, 1.0 / 60.0, &mut store);
        }
        assert_eq!(hero(&state).pos.x, 85.0 - 2.0 * TILE_SIZE);

        // Free to steer again afterwards
        tick(&mut state, &input, 1.0 / 60.0, &mut store);
        assert!(hero(&state).pos.x > 85.0 - 2.0 * TILE_SIZE);
    }

    #[test]
    fn test_triggers_fire_again_after_redirect() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let y = hero(&state).pos.y;
        state.entities.push(in_hero_lane(
            EntityKind::Redirect {
                kind: RedirectKind::Permanent,
                lanes: -2,
            },
            y,
        ));
        // Tall teapot column in the landing lane, crossed during the tween
        state.entities.push(Entity::new(
            EntityKind::Teapot,
            Vec2::new(lane_x(START_LANE - 2), y - 180.0),
            Vec2::new(TILE_SIZE, 200.0),
        ));

        let input = TickInput::default();
        tick(&mut state, &input, 1.0 / 60.0, &mut store);
        assert!(hero(&state).is_translating());
        while hero(&state).is_translating() {
            assert_eq!(state.teapots, 0);
            tick(&mut state, &input, 1.0 / 60.0, &mut store);
        }

        // The landing frame scans again
        assert_eq!(state.teapots, 1);
        assert!(state.entities.iter().all(|e| e.kind != EntityKind::Teapot));
    }

    #[test]
    fn test_successors_follow_the_wrap() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let tuning = state.tuning.clone();
        state.camera.advance_timers(10.0, false, &tuning);
        state.camera.offset.y = 5.0;

        let mut road = Entity::falling_road(Vec2::new(lane_x(1), 60.0));
        if let Some(timer) = road.spawn.as_mut() {
            timer.elapsed = 0.08;
        }
        state.entities.push(road);

        tick(&mut state, &TickInput::default(), 0.05, &mut store);
        assert_eq!(state.camera.offset.y, 5.0 - 10.0 + WRAP_DISTANCE);

        let mut ys: Vec<f32> = state
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::FallingRoad)
            .map(|e| e.pos.y)
            .collect();
        ys.sort_by(f32::total_cmp);
        assert_eq!(ys, vec![40.0 + WRAP_DISTANCE, 60.0 + WRAP_DISTANCE]);
        assert_eq!(state.entities.pending_len(), 0);
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, 0.1, &mut store);
        assert!(state.paused);
        let countdown = state.countdown;
        let camera = state.camera.offset;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.1, &mut store);
        }
        assert_eq!(state.countdown, countdown);
        assert_eq!(state.camera.offset, camera);

        tick(&mut state, &pause, 0.1, &mut store);
        assert!(!state.paused);
        assert!(state.countdown < countdown);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), 0.1, &mut store);
        }
        assert!(state.countdown < state.tuning.max_game_time);
        let out = tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            0.1,
            &mut store,
        );
        assert_eq!(state.countdown, state.tuning.max_game_time);
        assert_eq!(state.camera.offset, Camera::new().offset);
        assert_eq!(out.music, vec![MusicCommand::Start]);
    }

    #[test]
    fn test_special_sequence_unlocks_extra_content() {
        let mut store = MemoryStore::default();
        let mut state = title_session();
        for code in KONAMI_CODE {
            let input = TickInput {
                key: Some(code),
                ..Default::default()
            };
            tick(&mut state, &input, 0.0, &mut store);
            assert_eq!(state.screen, Screen::Title);
        }
        assert!(state.extra_content);

        // Any key after the full sequence starts the game
        let input = TickInput {
            key: Some(KONAMI_CODE[0]),
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, &mut store);
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.extra_content);
    }

    #[test]
    fn test_wrong_key_starts_game() {
        let mut store = MemoryStore::default();
        let mut state = title_session();
        for code in [38, 38, 13] {
            let input = TickInput {
                key: Some(code),
                ..Default::default()
            };
            tick(&mut state, &input, 0.0, &mut store);
        }
        assert_eq!(state.screen, Screen::Playing);
        assert!(!state.extra_content);
        assert_eq!(state.sequence_index, 0);
    }

    #[test]
    fn test_end_screen_returns_to_title() {
        let mut store = MemoryStore::with_score(1_000_000);
        let mut state = playing_session(&mut store);
        state.countdown = 0.01;
        tick(&mut state, &TickInput::default(), 0.1, &mut store);
        assert_eq!(state.screen, Screen::End);
        assert!(!state.new_high_score);
        assert_eq!(state.high_score.best, 1_000_000);
        assert_eq!(store.saves, 0);

        tick(&mut state, &TickInput::default(), 0.1, &mut store);
        assert_eq!(state.screen, Screen::End);
        let dismiss = TickInput {
            key: Some(32),
            ..Default::default()
        };
        tick(&mut state, &dismiss, 0.1, &mut store);
        assert_eq!(state.screen, Screen::Title);
    }

    #[test]
    fn test_frame_output_dispatch() {
        let mut out = FrameOutput::default();
        out.cues.insert(Cue::Teapot);
        out.cues.insert(Cue::Teapot);
        out.music.push(MusicCommand::Start);
        let mut sink = LogAudio::default();
        out.dispatch(&mut sink);
        assert_eq!(sink.played, vec![Cue::Teapot]);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "no hero")]
    fn test_missing_hero_fails_fast() {
        let mut store = MemoryStore::default();
        let mut state = playing_session(&mut store);
        state.entities.clear();
        tick(&mut state, &TickInput::default(), 0.1, &mut store);
    }
}
