//! Level description: where the player starts and the platforms to stand on
//!
//! Levels are validated here, at the load boundary, so the simulation can
//! treat platform geometry as trusted.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::platform::{Platform, PlatformRegistry};

/// Errors loading or validating a level
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has no platforms")]
    NoPlatforms,
    #[error("platform {index} has non-finite coordinates")]
    NonFinite { index: usize },
    #[error("platform {index} has degenerate size {width}x{height}")]
    DegeneratePlatform { index: usize, width: f32, height: f32 },
    #[error("player start ({x}, {y}) is not finite")]
    BadStart { x: f32, y: f32 },
}

fn default_start() -> Vec2 {
    Vec2::new(PLAYER_START_X, PLAYER_START_Y)
}

/// A playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Top-left corner of the player box at spawn and after every reset
    #[serde(default = "default_start")]
    pub player_start: Vec2,
    /// Checked in this order during collision resolution
    pub platforms: Vec<Platform>,
}

impl Default for Level {
    /// Ground plus four floating ledges stepping up to the right
    fn default() -> Self {
        Self {
            player_start: default_start(),
            platforms: vec![
                Platform::new(0.0, 500.0, 800.0, 100.0), // Ground
                Platform::new(200.0, 400.0, 200.0, 30.0),
                Platform::new(450.0, 300.0, 150.0, 30.0),
                Platform::new(650.0, 200.0, 150.0, 30.0),
                Platform::new(300.0, 150.0, 200.0, 30.0),
            ],
        }
    }
}

impl Level {
    /// Parse and validate a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({} platforms)",
            path.display(),
            level.platforms.len()
        );
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every platform must have finite coordinates and positive extents
    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.player_start.is_finite() {
            return Err(LevelError::BadStart {
                x: self.player_start.x,
                y: self.player_start.y,
            });
        }
        if self.platforms.is_empty() {
            return Err(LevelError::NoPlatforms);
        }
        for (index, p) in self.platforms.iter().enumerate() {
            if ![p.x, p.y, p.width, p.height].iter().all(|v| v.is_finite()) {
                return Err(LevelError::NonFinite { index });
            }
            if p.width <= 0.0 || p.height <= 0.0 {
                return Err(LevelError::DegeneratePlatform {
                    index,
                    width: p.width,
                    height: p.height,
                });
            }
        }
        Ok(())
    }

    /// Split into the spawn point and the read-only registry
    pub fn into_parts(self) -> (Vec2, PlatformRegistry) {
        (self.player_start, PlatformRegistry::new(self.platforms))
    }
}
