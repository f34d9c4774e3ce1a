//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no wall-clock time
//! - Seeded RNG only (autopilot)
//! - Platforms visited in registry order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod platform;
pub mod rect;
pub mod rotation;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{CollisionMode, Contact, resolve};
pub use platform::{Platform, PlatformRegistry};
pub use rect::Rect;
pub use rotation::{Direction, Rotation, RotationParams, RotationPhase};
pub use state::{GameEvent, GameState, Player, RenderState, ResetReason};
pub use tick::{TickInput, tick};
