//! 128x64 one-bit frame buffer
//!
//! Laid out like SSD1306 display RAM: 8 pages of 128 columns, one byte per
//! column per page, least significant bit at the top.

use core::convert::Infallible;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::consts::{SCREEN_H, SCREEN_W};
use crate::error::HwResult;
use crate::platform::DisplayDriver;

const WIDTH: usize = SCREEN_W as usize;
const HEIGHT: usize = SCREEN_H as usize;
const PAGES: usize = HEIGHT / 8;

#[derive(Clone)]
pub struct FrameBuffer {
    ram: [u8; WIDTH * PAGES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            ram: [0; WIDTH * PAGES],
        }
    }

    /// Pixel state; anything off-screen reads as off
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !(0..SCREEN_W).contains(&x) || !(0..SCREEN_H).contains(&y) {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        self.ram[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }

    /// Set a pixel; off-screen writes are clipped
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if !(0..SCREEN_W).contains(&x) || !(0..SCREEN_H).contains(&y) {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let byte = &mut self.ram[(y / 8) * WIDTH + x];
        if on {
            *byte |= 1 << (y % 8);
        } else {
            *byte &= !(1 << (y % 8));
        }
    }

    /// Raw display RAM, ready to stream to the panel
    pub fn as_bytes(&self) -> &[u8] {
        &self.ram
    }

    pub fn lit_pixels(&self) -> usize {
        self.ram.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Render with half-block characters, two pixel rows per line
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((WIDTH + 1) * HEIGHT / 2);
        for y in (0..SCREEN_H).step_by(2) {
            for x in 0..SCREEN_W {
                out.push(match (self.get(x, y), self.get(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(SCREEN_W as u32, SCREEN_H as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

impl DisplayDriver for FrameBuffer {
    fn clear(&mut self) -> HwResult<()> {
        self.ram.fill(0);
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: BinaryColor) -> HwResult<()> {
        infallible(
            Rectangle::new(Point::new(x, y), Size::new(w, h))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(self),
        );
        Ok(())
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: BinaryColor) -> HwResult<()> {
        infallible(Pixel(Point::new(x, y), color).draw(self));
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: BinaryColor) -> HwResult<()> {
        let style = MonoTextStyle::new(&FONT_6X10, color);
        infallible(Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self));
        Ok(())
    }

    fn present(&mut self) -> HwResult<()> {
        Ok(())
    }
}
