//! Simulation settings
//!
//! Compile-time defaults for every tunable, optionally overridden on native
//! builds by a JSON file named in `FINGERGUN_SETTINGS`.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Startup values for the tunables plus the run seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the running phase RNG
    pub seed: u64,

    // === Player ===
    /// Units per second
    pub player_speed: f32,
    /// Distance of the held item from the body center
    pub hand_offset: f32,

    // === Arena ===
    pub stage_width: f32,
    pub stage_height: f32,

    // === Civilians ===
    /// Units per millisecond
    pub civilian_speed: f32,
    pub civilian_wander_min_ms: f32,
    pub civilian_wander_max_ms: f32,
    pub civilian_wander_min_dist: f32,
    pub civilian_wander_max_dist: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: consts::DEFAULT_SEED,

            player_speed: 200.0,
            hand_offset: 32.0,

            stage_width: 2000.0,
            stage_height: 2000.0,

            civilian_speed: 1.0,
            civilian_wander_min_ms: 2000.0,
            civilian_wander_max_ms: 8000.0,
            civilian_wander_min_dist: 50.0,
            civilian_wander_max_dist: 500.0,
        }
    }
}

impl Settings {
    /// Environment variable naming an override file
    pub const ENV_VAR: &'static str = "FINGERGUN_SETTINGS";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load overrides from the file in `FINGERGUN_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {path}: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings file {path}: {e}");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }
}
