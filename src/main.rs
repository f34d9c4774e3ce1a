//! Tumbler headless runner
//!
//! Plays the simulation under the seeded autopilot for a fixed number of
//! ticks, logging tumbles, landings and resets, then prints the final render
//! state as JSON.
//!
//! Usage: `tumbler [settings.json] [level.json]`
//!
//! Environment:
//! - `TUMBLER_TICKS`: ticks to run (default 3600, one minute at 60 Hz)
//! - `TUMBLER_SEED`: autopilot seed (default 12345)
//! - `TUMBLER_COLLISION`: collision mode override (`sign-driven`, `minimum-penetration`)
//! - `RUST_LOG`: log filter (`debug` shows every tumble)

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use tumbler::sim::{Autopilot, CollisionMode, GameEvent, GameState, ResetReason, tick};
    use tumbler::{Level, Settings};

    const DEFAULT_TICKS: u64 = 3600;
    const DEFAULT_SEED: u64 = 12345;

    /// Per-run tallies
    #[derive(Debug, Default)]
    struct RunStats {
        tumbles: u32,
        completed: u32,
        interrupted: u32,
        landings: u32,
        requested_resets: u32,
        falls: u32,
    }

    impl RunStats {
        fn record(&mut self, event: &GameEvent, tick: u64) {
            match event {
                GameEvent::RotationStarted(_) => self.tumbles += 1,
                GameEvent::RotationCompleted => self.completed += 1,
                GameEvent::RotationInterrupted => self.interrupted += 1,
                GameEvent::Landed { y } => {
                    self.landings += 1;
                    log::debug!("[{tick}] landed at y={y:.1}");
                }
                GameEvent::Reset(ResetReason::Requested) => self.requested_resets += 1,
                GameEvent::Reset(ResetReason::FellOff) => {
                    self.falls += 1;
                    log::info!("[{tick}] fell off the level");
                }
            }
        }
    }

    fn env_u64(name: &str, default: u64) -> u64 {
        match std::env::var(name) {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring {name}={value:?}, using {default}");
                default
            }),
            Err(_) => default,
        }
    }

    fn load() -> Result<(Settings, Level), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);

        let mut settings = match args.next() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let level = match args.next() {
            Some(path) => Level::load(path)?,
            None => Level::default(),
        };

        if let Ok(name) = std::env::var("TUMBLER_COLLISION") {
            match CollisionMode::from_str(&name) {
                Some(mode) => settings.collision_mode = mode,
                None => log::warn!(
                    "Unknown collision mode {name:?}, keeping {}",
                    settings.collision_mode.as_str()
                ),
            }
        }

        Ok((settings, level))
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let (settings, level) = load()?;
        let ticks = env_u64("TUMBLER_TICKS", DEFAULT_TICKS);
        let seed = env_u64("TUMBLER_SEED", DEFAULT_SEED);

        log::info!(
            "Running {} ticks, seed {}, {} platforms, collision mode {}",
            ticks,
            seed,
            level.platforms.len(),
            settings.collision_mode.as_str()
        );

        let mut state = GameState::new(settings, level);
        let mut pilot = Autopilot::new(seed);
        let mut stats = RunStats::default();

        for _ in 0..ticks {
            let input = pilot.next_input(&state);
            tick(&mut state, &input);
            for event in state.drain_events() {
                stats.record(&event, state.time_ticks);
            }
        }

        log::info!(
            "Done: {} tumbles ({} completed, {} interrupted), {} landings, {} resets, {} falls",
            stats.tumbles,
            stats.completed,
            stats.interrupted,
            stats.landings,
            stats.requested_resets,
            stats.falls
        );

        println!("{}", serde_json::to_string_pretty(&state.render_state())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Tumbler (headless) starting...");

    match headless::run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("tumbler: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point lives in the library (`tumbler::wasm`)
}
