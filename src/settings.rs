//! Simulation tuning and playfield settings
//!
//! Loaded from JSON; any field left out falls back to the values in
//! [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::CollisionMode;
use crate::sim::rotation::RotationParams;

/// Errors loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// y beyond which the player is considered fallen off
    pub fall_threshold: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,

    // === Physics (per tick) ===
    pub gravity: f32,
    /// Tumble angular rate (degrees/tick)
    pub rotation_speed_deg: f32,
    /// Snap tolerance (radians)
    pub rotation_epsilon: f32,
    /// Horizontal damping after an interrupted tumble (0..1)
    pub friction: f32,
    pub friction_cutoff: f32,

    /// Overlap resolution strategy
    pub collision_mode: CollisionMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            fall_threshold: FALL_THRESHOLD,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,

            gravity: GRAVITY,
            rotation_speed_deg: ROTATION_SPEED_DEG,
            rotation_epsilon: ROTATION_EPSILON,
            friction: FRICTION,
            friction_cutoff: FRICTION_CUTOFF,

            collision_mode: CollisionMode::SignDriven,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject tuning the simulation can't run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let finite = [
            self.screen_width,
            self.screen_height,
            self.fall_threshold,
            self.player_width,
            self.player_height,
            self.gravity,
            self.rotation_speed_deg,
            self.rotation_epsilon,
            self.friction,
            self.friction_cutoff,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(SettingsError::Invalid("all values must be finite".into()));
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "player size must be positive, got {}x{}",
                self.player_width, self.player_height
            )));
        }
        if self.screen_width < self.player_width {
            return Err(SettingsError::Invalid(format!(
                "screen width {} is narrower than the player ({})",
                self.screen_width, self.player_width
            )));
        }
        if self.rotation_speed_deg <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "rotation speed must be positive, got {}",
                self.rotation_speed_deg
            )));
        }
        let step = self.rotation_speed_deg.to_radians();
        if self.rotation_epsilon <= 0.0 || self.rotation_epsilon >= step {
            return Err(SettingsError::Invalid(format!(
                "rotation epsilon must be in (0, {step}), got {}",
                self.rotation_epsilon
            )));
        }
        if self.friction <= 0.0 || self.friction >= 1.0 {
            return Err(SettingsError::Invalid(format!(
                "friction must be in (0, 1), got {}",
                self.friction
            )));
        }
        if self.friction_cutoff <= 0.0 {
            return Err(SettingsError::Invalid(format!(
                "friction cutoff must be positive, got {}",
                self.friction_cutoff
            )));
        }
        Ok(())
    }

    /// Angular stepping derived from the tumble settings
    pub fn rotation_params(&self) -> RotationParams {
        RotationParams::from_degrees(self.rotation_speed_deg, self.rotation_epsilon)
    }

    /// Largest x the player's left edge may reach
    pub fn max_x(&self) -> f32 {
        self.screen_width - self.player_width
    }
}
