//! Aliens screens and bindings

use embedded_graphics::pixelcolor::BinaryColor;

use super::fill_entity;
use crate::audio::SoundEffect;
use crate::error::HwResult;
use crate::platform::DisplayDriver;
use crate::session::{Bindings, ButtonRole, Game};
use crate::sim::{AliensState, EntityKind, GameEvent, TickInput};

impl Game for AliensState {
    fn label(&self) -> &'static str {
        "Aliens"
    }

    fn reset(&mut self) {
        AliensState::reset(self);
    }

    fn advance(&mut self, input: &TickInput) -> Vec<GameEvent> {
        self.tick(input)
    }

    fn check_terminal(&self) -> bool {
        self.breached
    }

    fn render(&self, display: &mut dyn DisplayDriver) -> HwResult<()> {
        display.draw_text(&format!("Score: {}", self.score), 0, 0, BinaryColor::On)?;

        // Ship with its nose
        fill_entity(display, &self.player, BinaryColor::On)?;
        let x = self.player.pos.x as i32;
        let y = self.player.pos.y as i32;
        display.fill_rect(x + 3, y - 2, 2, 2, BinaryColor::On)?;

        for shot in self.entities.active(EntityKind::is_projectile) {
            fill_entity(display, shot, BinaryColor::On)?;
        }

        for enemy in self.active_enemies() {
            fill_entity(display, enemy, BinaryColor::On)?;
            let (ex, ey) = (enemy.pos.x as i32, enemy.pos.y as i32);
            // Eyes
            display.fill_rect(ex + 2, ey + 1, 2, 2, BinaryColor::Off)?;
            display.fill_rect(ex + 5, ey + 1, 2, 2, BinaryColor::Off)?;
        }
        Ok(())
    }

    fn render_game_over(&self, display: &mut dyn DisplayDriver) -> HwResult<()> {
        display.draw_text("GAME OVER", 30, 20, BinaryColor::On)?;
        display.draw_text(&format!("Score: {}", self.score), 40, 35, BinaryColor::On)?;
        display.draw_text("Press Button", 20, 50, BinaryColor::On)
    }

    fn game_over_cue(&self) -> SoundEffect {
        SoundEffect::GameOver
    }

    fn final_score(&self) -> u32 {
        self.score
    }

    fn bindings(&self) -> Bindings {
        Bindings {
            confirm: ButtonRole::Fire,
            nav: ButtonRole::Exit,
        }
    }
}
