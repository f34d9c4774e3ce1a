//! Browser binding
//!
//! The page owns the canvas, the key listeners and the animation frame; it
//! feeds held keys and frame deltas in and reads the player box back out.

use wasm_bindgen::prelude::*;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::level::Level;
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, tick};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Tumbler starting...");
}

/// Game instance holding all state
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    input: TickInput,
    accumulator: f32,
}

#[wasm_bindgen]
impl WasmGame {
    /// Both arguments are optional JSON documents; missing ones use defaults
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: Option<String>,
        level_json: Option<String>,
    ) -> Result<WasmGame, JsValue> {
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(to_js)?,
            None => Settings::default(),
        };
        let level = match level_json {
            Some(json) => Level::from_json(&json).map_err(to_js)?,
            None => Level::default(),
        };
        log::info!("Game initialized with {} platforms", level.platforms.len());

        Ok(Self {
            state: GameState::new(settings, level),
            input: TickInput::default(),
            accumulator: 0.0,
        })
    }

    /// Update held keys (from keydown/keyup)
    pub fn set_input(&mut self, left: bool, right: bool, reset: bool) {
        self.input = TickInput { left, right, reset };
    }

    /// Run the fixed ticks covered by `dt` seconds of frame time.
    /// Returns how many ticks ran.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }

        for event in self.state.drain_events() {
            log::debug!("{:?}", event);
        }
        substeps
    }

    /// Single tick with explicit keys (for step-through debugging)
    pub fn step(&mut self, left: bool, right: bool, reset: bool) {
        tick(&mut self.state, &TickInput { left, right, reset });
    }

    pub fn x(&self) -> f32 {
        self.state.player.pos.x
    }

    pub fn y(&self) -> f32 {
        self.state.player.pos.y
    }

    pub fn width(&self) -> f32 {
        self.state.player.size.x
    }

    pub fn height(&self) -> f32 {
        self.state.player.size.y
    }

    /// Radians, applied about the box center
    pub fn rotation(&self) -> f32 {
        self.state.player.rotation.angle
    }

    pub fn on_ground(&self) -> bool {
        self.state.player.on_ground
    }

    /// Canvas size the level was laid out for
    pub fn screen_width(&self) -> f32 {
        self.state.settings.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.state.settings.screen_height
    }

    /// Platform list as JSON, for drawing the level once
    pub fn platforms_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.platforms).map_err(to_js)
    }

    /// Current render state as JSON
    pub fn render_state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.render_state()).map_err(to_js)
    }
}
