//! Tumbler - a box that rolls across platforms one quarter turn at a time
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rotation, gravity, platform collisions)
//! - `settings`: Data-driven tuning constants
//! - `level`: Level description, validation and the built-in level
//! - `wasm`: Browser binding (wasm32 only)

pub mod level;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use level::{Level, LevelError};
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Below this y the player has fallen off the level
    pub const FALL_THRESHOLD: f32 = 650.0;

    /// Player box defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_START_X: f32 = 100.0;
    pub const PLAYER_START_Y: f32 = 300.0;

    /// Downward acceleration (pixels/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Angular rate while tumbling (degrees/tick)
    pub const ROTATION_SPEED_DEG: f32 = 8.0;
    /// Remaining angle (radians) at which a tumble snaps to its target
    pub const ROTATION_EPSILON: f32 = 0.05;
    /// Horizontal damping after an interrupted tumble (per tick)
    pub const FRICTION: f32 = 0.85;
    /// Below this horizontal speed the player stops dead
    pub const FRICTION_CUTOFF: f32 = 0.1;
}
