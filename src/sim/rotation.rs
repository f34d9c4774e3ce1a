//! Quarter-turn rotation state machine
//!
//! A tumble swings the box through π/2 about an edge while the body slides
//! sideways at constant speed, so after one tumble the box has traveled
//! roughly one "body diagonal" and rests on its adjacent face.
//!
//! ```text
//!   Idle --(on ground, left/right held)--> Rotating(dir)
//!   Rotating(dir) --(|target - angle| <= epsilon)--> Idle   (snap to target)
//!   Rotating(dir) --(horizontal collision)---------> Idle   (no snap)
//! ```

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Upper bound on sweep length; only reachable with a misconfigured step
const MAX_SWEEP_TICKS: u32 = 10_000;

/// Tumble direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1 for left, +1 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// Resolve held keys to a direction. Left wins when both are held.
    pub fn from_held(left: bool, right: bool) -> Option<Self> {
        if left {
            Some(Direction::Left)
        } else if right {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Where the state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationPhase {
    #[default]
    Idle,
    Rotating(Direction),
}

/// Angular stepping parameters (derived from settings)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationParams {
    /// Angle advanced per tick (radians)
    pub step: f32,
    /// Remaining difference at which the angle snaps to its target (radians)
    pub epsilon: f32,
}

impl RotationParams {
    pub fn from_degrees(step_deg: f32, epsilon: f32) -> Self {
        Self {
            step: step_deg.to_radians(),
            epsilon,
        }
    }
}

/// Outcome of advancing one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still turning (or idle, nothing happened)
    Turning,
    /// Snapped to the target this tick
    Completed,
}

/// Rotation state of the player box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    /// Current angle (radians); only changes while rotating
    pub angle: f32,
    /// Angle the current (or last) tumble is heading to
    pub target: f32,
    pub phase: RotationPhase,
}

impl Rotation {
    #[inline]
    pub fn is_rotating(&self) -> bool {
        matches!(self.phase, RotationPhase::Rotating(_))
    }

    /// -1, 0 or +1
    pub fn direction_sign(&self) -> i8 {
        match self.phase {
            RotationPhase::Idle => 0,
            RotationPhase::Rotating(Direction::Left) => -1,
            RotationPhase::Rotating(Direction::Right) => 1,
        }
    }

    /// Enter `Rotating(direction)` and return how many ticks the sweep takes
    pub fn begin(&mut self, direction: Direction, params: &RotationParams) -> u32 {
        self.target = self.angle + FRAC_PI_2 * direction.sign();
        self.phase = RotationPhase::Rotating(direction);
        sweep_ticks(self.angle, self.target, params)
    }

    /// Advance one tick toward the target
    pub fn advance(&mut self, params: &RotationParams) -> Advance {
        if !self.is_rotating() {
            return Advance::Turning;
        }

        let diff = self.target - self.angle;
        if diff.abs() > params.epsilon {
            self.angle += params.step * diff.signum();
            Advance::Turning
        } else {
            self.angle = self.target;
            self.phase = RotationPhase::Idle;
            Advance::Completed
        }
    }

    /// Forced exit on a horizontal collision. The angle stays where it is.
    ///
    /// Returns whether a tumble was actually in progress.
    pub fn interrupt(&mut self) -> bool {
        let was_rotating = self.is_rotating();
        self.phase = RotationPhase::Idle;
        was_rotating
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Number of ticks that advance the angle by a full step before the
/// remaining difference drops to `epsilon` (the snap tick is not counted).
///
/// Mirrors [`Rotation::advance`] step for step so the result matches what
/// the state machine will actually do.
pub fn sweep_ticks(from: f32, to: f32, params: &RotationParams) -> u32 {
    let mut angle = from;
    let mut ticks = 0;
    while (to - angle).abs() > params.epsilon && ticks < MAX_SWEEP_TICKS {
        angle += params.step * (to - angle).signum();
        ticks += 1;
    }
    ticks
}

/// Horizontal speed of a tumble: the mean of width and height, covered
/// over the sweep ticks
pub fn tumble_speed(size: Vec2, sweep_ticks: u32) -> f32 {
    if sweep_ticks == 0 {
        return 0.0;
    }
    move_distance(size) / sweep_ticks as f32
}

/// Distance one full tumble travels
#[inline]
pub fn move_distance(size: Vec2) -> f32 {
    (size.x + size.y) / 2.0
}
