//! Runtime settings
//!
//! Read once at startup from a JSON file. Missing fields fall back to their
//! defaults, so a file only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{RELEASE_POLL_MS, SETTLE_MS, STEERING_ALPHA, TICK_MS};

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "TILT_ARCADE_SETTINGS";
/// Used when the environment variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "tilt-arcade.json";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay between ticks
    pub tick_ms: u32,
    /// Steering filter smoothing factor (0.0 - 1.0]
    pub smoothing: f32,
    /// Fixed RNG seed; the clock is used when absent
    pub seed: Option<u64>,
    /// Confirm on the game-over screen starts another run. Navigate there
    /// always returns to the menu.
    pub restart_after_game_over: bool,
    /// Pause after a menu action
    pub settle_ms: u32,
    /// Poll interval while waiting for a button release
    pub release_poll_ms: u32,
    /// Offer a power-off entry after the games
    pub power_off_entry: bool,

    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            smoothing: STEERING_ALPHA,
            seed: None,
            restart_after_game_over: true,
            settle_ms: SETTLE_MS,
            release_poll_ms: RELEASE_POLL_MS,
            power_off_entry: false,

            muted: false,
            master_volume: 1.0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Settings file location
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
