//! The playable games
//!
//! Each game's simulation lives in `sim`; this module adds drawing, sound
//! and button bindings so it can run inside a [`GameSession`].

pub mod aliens;
pub mod moto;

use embedded_graphics::pixelcolor::BinaryColor;

use crate::error::HwResult;
use crate::platform::DisplayDriver;
use crate::session::{GameSession, Session};
use crate::settings::Settings;
use crate::sim::{AliensState, Entity, MotoState};

/// Start a Moto session
pub fn moto(settings: &Settings, seed: u64) -> Box<dyn Session> {
    Box::new(GameSession::new(MotoState::new(seed), settings))
}

/// Start an Aliens session. The invader game has no randomness.
pub fn aliens(settings: &Settings, _seed: u64) -> Box<dyn Session> {
    Box::new(GameSession::new(AliensState::new(), settings))
}

/// Solid box covering an entity, at whole pixels
fn fill_entity(display: &mut dyn DisplayDriver, entity: &Entity, color: BinaryColor) -> HwResult<()> {
    let bounds = entity.bounds();
    display.fill_rect(
        bounds.left as i32,
        bounds.top as i32,
        entity.width as u32,
        entity.height as u32,
        color,
    )
}
