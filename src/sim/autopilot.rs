//! Seeded autopilot that plays the game by itself
//!
//! Holds a random direction for a random stretch of ticks, turns around
//! when pinned against a screen edge, and now and then asks for a reset.
//! Same seed and same state sequence give the same inputs.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rotation::Direction;
use super::state::GameState;
use super::tick::TickInput;

/// Chance per tick of pressing reset
const RESET_CHANCE: f64 = 0.002;
/// Shortest and longest hold (ticks)
const MIN_HOLD: u32 = 10;
const MAX_HOLD: u32 = 90;

/// Random intent source for demo and soak runs
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    held: Option<Direction>,
    hold_ticks: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            held: None,
            hold_ticks: 0,
        }
    }

    /// Direction currently being held
    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Decide the input for the next tick
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if self.hold_ticks == 0 {
            // Ledges climb to the right in the default level, so lean right
            self.held = match self.rng.random_range(0..4) {
                0 => None,
                1 => Some(Direction::Left),
                _ => Some(Direction::Right),
            };
            self.hold_ticks = self.rng.random_range(MIN_HOLD..=MAX_HOLD);
        }
        self.hold_ticks -= 1;

        let player = &state.player;
        let pinned = match self.held {
            Some(Direction::Left) => player.pos.x <= 0.0,
            Some(Direction::Right) => player.pos.x >= state.settings.max_x(),
            None => false,
        };
        if pinned && !player.is_rotating() {
            self.held = self.held.map(|d| match d {
                Direction::Left => Direction::Right,
                Direction::Right => Direction::Left,
            });
            log::debug!(
                "Autopilot pinned at x={:.1}, turning to {:?}",
                player.pos.x,
                self.held
            );
        }

        TickInput {
            left: self.held == Some(Direction::Left),
            right: self.held == Some(Direction::Right),
            reset: self.rng.random_bool(RESET_CHANCE),
        }
    }
}
