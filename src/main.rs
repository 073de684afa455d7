//! Highway 404 entry point
//!
//! The browser build is driven from the page through `highway_404::web`.
//! Natively this runs one headless session with a simple autopilot and logs
//! how it went. Set `RUST_LOG=debug` to follow every trigger.
//!
//! Usage: `highway-404 [--level level.json] [--tuning tuning.json] [--scores highscore.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;

    use highway_404::audio::LogAudio;
    use highway_404::consts::*;
    use highway_404::persistence::FileStore;
    use highway_404::sim::{EntityKind, LevelSchedule, Screen, SessionState, TickInput, tick};
    use highway_404::{Tuning, lane_at, lane_x};

    /// Simulated display refresh
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// How far ahead of the hero the autopilot looks for holes (px)
    const LOOKAHEAD: f32 = 3.0 * TILE_SIZE;

    #[derive(Parser, Debug)]
    #[command(name = "highway-404")]
    #[command(about = "Play one headless Highway 404 session with an autopilot")]
    pub struct Cli {
        /// Level file (JSON array of schedule entries); the shipped level otherwise
        #[arg(long)]
        level: Option<PathBuf>,
        /// Partial tuning overrides (JSON object)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// High score file
        #[arg(long)]
        scores: Option<PathBuf>,
    }

    fn read(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
    }

    fn load(cli: &Cli) -> Result<(LevelSchedule, Tuning)> {
        let schedule = match &cli.level {
            Some(path) => LevelSchedule::from_json(&read(path)?)
                .with_context(|| format!("invalid level {}", path.display()))?,
            None => LevelSchedule::highway_404().context("shipped level is invalid")?,
        };
        let tuning = match &cli.tuning {
            Some(path) => Tuning::from_json(&read(path)?)
                .with_context(|| format!("invalid tuning {}", path.display()))?,
            None => Tuning::default(),
        };
        Ok((schedule, tuning))
    }

    fn is_hazard(kind: &EntityKind) -> bool {
        matches!(
            kind,
            EntityKind::MissingRoad | EntityKind::FallingRoad | EntityKind::RoadNotFound
        )
    }

    /// Stay centered in a lane, change lanes when a hole is coming up
    fn autopilot(state: &SessionState) -> Vec2 {
        let Some(hero) = state.entities.hero() else {
            return Vec2::ZERO;
        };
        let center = |x: f32| x + TILE_SIZE / 2.0;
        let blocked = |lane: u8| {
            state.entities.iter().any(|e| {
                is_hazard(&e.kind)
                    && lane_at(center(e.pos.x)) == lane
                    && e.pos.y < hero.pos.y + hero.size.y
                    && e.pos.y + e.size.y > hero.pos.y - LOOKAHEAD
            })
        };

        let current = lane_at(hero.pos.x + hero.size.x / 2.0).max(1);
        let target = [0i8, -1, 1, -2, 2, -3, 3, -4, 4, -5, 5]
            .iter()
            .map(|offset| i16::from(current) + i16::from(*offset))
            .filter(|lane| (1..=i16::from(LANE_COUNT)).contains(lane))
            .map(|lane| lane as u8)
            .find(|lane| !blocked(*lane))
            .unwrap_or(current);

        let goal = lane_x(target) + (TILE_SIZE - hero.size.x) / 2.0;
        Vec2::new(((goal - hero.pos.x) / 4.0).clamp(-1.0, 1.0), 0.0)
    }

    pub fn run(cli: Cli) -> Result<()> {
        let (schedule, tuning) = load(&cli)?;
        log::info!("Loaded level with {} events", schedule.len());

        let scores = cli
            .scores
            .unwrap_or_else(|| std::env::temp_dir().join("highway-404-highscore.json"));
        let mut store = FileStore::new(scores);
        log::info!("High score file: {}", store.path().display());
        let mut audio = LogAudio::default();
        let mut state = SessionState::new(schedule, tuning);

        let start = TickInput {
            confirm: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.0, &mut store).dispatch(&mut audio);

        let mut frames = 0u64;
        while state.screen == Screen::Playing {
            let input = TickInput {
                intent: autopilot(&state),
                ..Default::default()
            };
            tick(&mut state, &input, FRAME_DT, &mut store).dispatch(&mut audio);
            frames += 1;
            if frames % 3600 == 0 {
                let snapshot = state.snapshot();
                log::info!(
                    "{} left, score {}, {} entities",
                    snapshot.countdown_label,
                    snapshot.score,
                    snapshot.entities.len()
                );
            }
        }

        let outcome = if state.win { "survived" } else { "fell through the road" };
        println!(
            "Hero {} after {:.1}s: score {} ({} teapots), best {}{}",
            outcome,
            state.elapsed(),
            state.final_score,
            state.teapots,
            state.high_score.best,
            if state.new_high_score { " (new!)" } else { "" }
        );
        log::debug!("{} cues played", audio.played.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Highway 404 (native) starting...");
    native::run(native::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is highway_404::web::start, this is just to satisfy the compiler
}
