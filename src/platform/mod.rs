//! Platform abstraction layer
//!
//! The engine only ever talks to hardware through these traits:
//! - Display (128x64, one bit per pixel)
//! - Motion sensor (one steering axis)
//! - Tone generator (piezo buzzer)
//! - Buttons (confirm and navigate)
//! - Time (monotonic ms and sleep)
//!
//! `host` implements them for a desktop terminal.

pub mod host;
#[cfg(test)]
pub(crate) mod testing;

use embedded_graphics::pixelcolor::BinaryColor;

use crate::error::HwResult;

pub trait DisplayDriver {
    fn clear(&mut self) -> HwResult<()>;
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: BinaryColor) -> HwResult<()>;
    fn draw_pixel(&mut self, x: i32, y: i32, color: BinaryColor) -> HwResult<()>;
    /// Text with its top-left corner at (x, y)
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: BinaryColor) -> HwResult<()>;
    /// Flush the frame to the panel
    fn present(&mut self) -> HwResult<()>;
}

pub trait MotionSensor {
    /// Raw acceleration along the steering axis
    fn read_axis(&mut self) -> HwResult<f32>;
}

pub trait ToneGenerator {
    /// Sound a square wave. Blocks for `duration_ms`.
    fn play_tone(&mut self, frequency_hz: u32, duty: u16, duration_ms: u32) -> HwResult<()>;
    fn stop(&mut self) -> HwResult<()>;
}

pub trait Button {
    /// True while held down (the pin reads low)
    fn is_pressed(&mut self) -> HwResult<bool>;
}

pub trait Clock {
    fn now_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u32);
}

/// Every collaborator the engine needs, initialized once at startup
pub struct Board {
    pub display: Box<dyn DisplayDriver>,
    pub sensor: Box<dyn MotionSensor>,
    pub tone: Box<dyn ToneGenerator>,
    /// Select in the menu, fire/restart in games
    pub confirm: Box<dyn Button>,
    /// Next entry in the menu, exit in Aliens
    pub nav: Box<dyn Button>,
    pub clock: Box<dyn Clock>,
}

impl Board {
    /// Clear, draw, and flush one frame
    pub fn present_frame(
        &mut self,
        draw: impl FnOnce(&mut dyn DisplayDriver) -> HwResult<()>,
    ) -> HwResult<()> {
        self.display.clear()?;
        draw(self.display.as_mut())?;
        self.display.present()
    }
}

/// Spin until the button is let go
pub fn wait_for_release(
    button: &mut dyn Button,
    clock: &mut dyn Clock,
    poll_ms: u32,
) -> HwResult<()> {
    while button.is_pressed()? {
        clock.sleep_ms(poll_ms);
    }
    Ok(())
}

/// Turns a level-triggered button into one action per press
///
/// A press only counts after a release has been seen, and counting it blocks
/// until the button is released again.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    armed: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a fresh release before the next press counts
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn poll(
        &mut self,
        button: &mut dyn Button,
        clock: &mut dyn Clock,
        poll_ms: u32,
    ) -> HwResult<bool> {
        if !button.is_pressed()? {
            self.armed = true;
            return Ok(false);
        }
        if !self.armed {
            return Ok(false);
        }
        wait_for_release(button, clock, poll_ms)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeClock, ScriptedButton};
    use super::*;

    #[test]
    fn test_press_fires_once() {
        let mut button = ScriptedButton::new([false, true, true, true, false, true, false]);
        let mut clock = FakeClock::new();
        let mut edge = EdgeDetector::new();

        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
        // Press, then two held reads and the release are consumed
        assert!(edge.poll(&mut button, &mut clock, 10).unwrap());
        assert_eq!(clock.now_ms(), 20);
        // Next press fires again
        assert!(edge.poll(&mut button, &mut clock, 10).unwrap());
        // Script exhausted: released
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
    }

    #[test]
    fn test_held_button_needs_release_first() {
        let mut button = ScriptedButton::new([true, true, false, true]);
        let mut clock = FakeClock::new();
        let mut edge = EdgeDetector::new();

        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
        assert!(edge.poll(&mut button, &mut clock, 10).unwrap());
    }

    #[test]
    fn test_held_press_blocks_until_release() {
        let mut button = ScriptedButton::default();
        let mut clock = FakeClock::new();
        let mut edge = EdgeDetector::new();
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());

        button.hold(3);
        assert!(edge.poll(&mut button, &mut clock, 10).unwrap());
        // Two held reads while waiting, 10 ms apart
        assert_eq!(clock.now_ms(), 20);
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
    }

    #[test]
    fn test_disarm_ignores_held_press() {
        let mut button = ScriptedButton::new([false, true, false]);
        let mut clock = FakeClock::new();
        let mut edge = EdgeDetector::new();

        edge.poll(&mut button, &mut clock, 10).unwrap();
        edge.disarm();
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
        assert!(!edge.poll(&mut button, &mut clock, 10).unwrap());
    }
}
