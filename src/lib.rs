//! Tilt Arcade - two tilt-steered arcade games on a 128x64 handheld
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, difficulty)
//! - `games`: Moto and Aliens plugged into the shared session machine
//! - `session`: Per-game state machine (Playing / GameOver / Restart)
//! - `menu`: Game selector driving the active session
//! - `platform`: Hardware collaborator traits and the host harness
//! - `renderer`: Monochrome frame buffer
//! - `settings`: Runtime configuration

pub mod audio;
pub mod error;
pub mod games;
pub mod menu;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::HardwareFault;
pub use menu::{GameDescriptor, Menu};
pub use session::{GameSession, SessionResult};
pub use settings::Settings;

/// Hardware and gameplay constants
pub mod consts {
    /// Display dimensions (SSD1306)
    pub const SCREEN_W: i32 = 128;
    pub const SCREEN_H: i32 = 64;

    /// Delay between ticks (~20 Hz)
    pub const TICK_MS: u32 = 50;

    /// Smoothing factor for the steering filter
    pub const STEERING_ALPHA: f32 = 0.2;

    /// Poll interval while waiting for a button release
    pub const RELEASE_POLL_MS: u32 = 10;
    /// Pause after a menu action before the next poll
    pub const SETTLE_MS: u32 = 200;
}
