//! Moto screens and bindings

use embedded_graphics::pixelcolor::BinaryColor;

use super::fill_entity;
use crate::audio::SoundEffect;
use crate::consts::SCREEN_H;
use crate::error::HwResult;
use crate::platform::DisplayDriver;
use crate::session::{Bindings, ButtonRole, Game};
use crate::sim::moto::{BIKE_WIDTH, BIKE_Y, LANE_MARKERS, ROAD_LEFT, ROAD_RIGHT};
use crate::sim::{EntityKind, GameEvent, MotoState, TickInput};

/// Lane marker dot spacing
const MARKER_STEP: usize = 8;
const BODY_HEIGHT: u32 = 8;

fn draw_road(display: &mut dyn DisplayDriver) -> HwResult<()> {
    let width = (ROAD_RIGHT - ROAD_LEFT) as u32;
    let height = SCREEN_H as u32;
    display.fill_rect(ROAD_LEFT, 0, width, 1, BinaryColor::On)?;
    display.fill_rect(ROAD_LEFT, SCREEN_H - 1, width, 1, BinaryColor::On)?;
    display.fill_rect(ROAD_LEFT, 0, 1, height, BinaryColor::On)?;
    display.fill_rect(ROAD_RIGHT - 1, 0, 1, height, BinaryColor::On)?;

    for y in (0..SCREEN_H).step_by(MARKER_STEP) {
        for x in LANE_MARKERS {
            display.draw_pixel(x, y, BinaryColor::On)?;
        }
    }
    Ok(())
}

impl Game for MotoState {
    fn label(&self) -> &'static str {
        "Moto"
    }

    fn reset(&mut self) {
        MotoState::reset(self);
    }

    fn advance(&mut self, input: &TickInput) -> Vec<GameEvent> {
        self.tick(input)
    }

    fn check_terminal(&self) -> bool {
        self.crashed()
    }

    fn render(&self, display: &mut dyn DisplayDriver) -> HwResult<()> {
        draw_road(display)?;

        let x = self.player.pos.x as i32;
        display.fill_rect(x, BIKE_Y, BIKE_WIDTH as u32, BODY_HEIGHT, BinaryColor::On)?;
        // Wheels
        display.fill_rect(x + 2, BIKE_Y + BODY_HEIGHT as i32, 4, 2, BinaryColor::On)?;

        for car in self.cars.active(EntityKind::is_obstacle) {
            fill_entity(display, car, BinaryColor::On)?;
        }
        Ok(())
    }

    fn render_game_over(&self, display: &mut dyn DisplayDriver) -> HwResult<()> {
        display.draw_text("CRASH!", 40, 20, BinaryColor::On)?;
        display.draw_text(&format!("Score: {}", self.final_score()), 32, 40, BinaryColor::On)
    }

    fn game_over_cue(&self) -> SoundEffect {
        SoundEffect::Crash
    }

    fn final_score(&self) -> u32 {
        MotoState::final_score(self)
    }

    fn bindings(&self) -> Bindings {
        Bindings {
            confirm: ButtonRole::Exit,
            nav: ButtonRole::Unused,
        }
    }
}
