//! Game state and core simulation types
//!
//! Everything the tick mutates is owned by [`GameState`]; the host only
//! ever sees copies ([`RenderState`]) and drained [`GameEvent`]s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platform::PlatformRegistry;
use super::rect::Rect;
use super::rotation::{Advance, Direction, Rotation, RotationParams, tumble_speed};
use crate::level::Level;
use crate::settings::Settings;

/// Why the player was put back at the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    /// Reset key held
    Requested,
    /// Fell below the fall-through threshold
    FellOff,
}

/// Things that happened during a tick (for logging and host feedback only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RotationStarted(Direction),
    RotationCompleted,
    /// A horizontal collision cut the tumble short
    RotationInterrupted,
    /// Touched down on a platform top at this y
    Landed { y: f32 },
    Reset(ResetReason),
}

/// What an external renderer needs to draw the player
///
/// The box is drawn rotated by `rotation` about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

/// The tumbling box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the (unrotated) collision box
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
    pub rotation: Rotation,
    /// Resting on a platform top as of the last collision pass
    pub on_ground: bool,
    /// Where resets put the player
    pub start: Vec2,
}

impl Player {
    pub fn new(start: Vec2, size: Vec2) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            size,
            rotation: Rotation::default(),
            on_ground: false,
            start,
        }
    }

    /// Axis-aligned collision box (rotation is visual only)
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_rotating()
    }

    /// Start a tumble and set the constant horizontal speed for it
    pub fn start_rotation(&mut self, direction: Direction, params: &RotationParams) {
        let sweep = self.rotation.begin(direction, params);
        self.vel.x = tumble_speed(self.size, sweep) * direction.sign();
    }

    /// Step the tumble; horizontal motion stops the tick it snaps
    pub fn advance_rotation(&mut self, params: &RotationParams) -> Advance {
        let result = self.rotation.advance(params);
        if result == Advance::Completed {
            self.vel.x = 0.0;
        }
        result
    }

    /// Cut the tumble short (horizontal collision). Angle is left as is.
    pub fn interrupt_rotation(&mut self) -> bool {
        self.vel.x = 0.0;
        self.rotation.interrupt()
    }

    /// Back to the start: position, velocity and rotation all cleared.
    /// The start is in mid-air until a collision pass says otherwise.
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.vel = Vec2::ZERO;
        self.rotation.reset();
        self.on_ground = false;
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            x: self.pos.x,
            y: self.pos.y,
            width: self.size.x,
            height: self.size.y,
            rotation: self.rotation.angle,
        }
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    /// Read-only during play
    pub platforms: PlatformRegistry,
    pub settings: Settings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Total resets (requested and fall-through)
    pub resets: u32,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a session from already validated settings and level
    pub fn new(settings: Settings, level: Level) -> Self {
        let size = Vec2::new(settings.player_width, settings.player_height);
        let (start, platforms) = level.into_parts();
        Self {
            player: Player::new(start, size),
            platforms,
            settings,
            time_ticks: 0,
            resets: 0,
            events: Vec::new(),
        }
    }

    pub fn rotation_params(&self) -> RotationParams {
        self.settings.rotation_params()
    }

    pub fn render_state(&self) -> RenderState {
        self.player.render_state()
    }

    /// Take all events recorded since the previous call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn reset_player(&mut self, reason: ResetReason) {
        self.player.reset();
        self.resets += 1;
        self.events.push(GameEvent::Reset(reason));
        log::info!("Player reset ({:?}) at tick {}", reason, self.time_ticks);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Settings::default(), Level::default())
    }
}
