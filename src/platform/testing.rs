//! Scripted collaborators for state machine tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;

use super::{Board, Button, Clock, DisplayDriver, MotionSensor, ToneGenerator};
use crate::error::HwResult;

/// Replays queued levels; reads as released once the queue is empty
#[derive(Clone, Default)]
pub struct ScriptedButton {
    script: Rc<RefCell<VecDeque<bool>>>,
}

impl ScriptedButton {
    pub fn new(levels: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Rc::new(RefCell::new(levels.into_iter().collect())),
        }
    }

    /// Queue one press (the following read is a release)
    pub fn press(&self) {
        self.script.borrow_mut().push_back(true);
    }

    /// Queue a held state for `reads` reads
    pub fn hold(&self, reads: usize) {
        self.script.borrow_mut().extend(std::iter::repeat_n(true, reads));
    }
}

impl Button for ScriptedButton {
    fn is_pressed(&mut self) -> HwResult<bool> {
        Ok(self.script.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// Virtual time: sleeping just moves the clock
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.advance(ms as u64);
    }
}

/// Sensor reporting whatever the test last set
#[derive(Clone, Default)]
pub struct FakeSensor {
    value: Rc<Cell<f32>>,
}

impl FakeSensor {
    pub fn set(&self, value: f32) {
        self.value.set(value);
    }
}

impl MotionSensor for FakeSensor {
    fn read_axis(&mut self) -> HwResult<f32> {
        Ok(self.value.get())
    }
}

/// Records every tone as (frequency, duty, duration)
#[derive(Clone, Default)]
pub struct ToneRecorder {
    pub tones: Rc<RefCell<Vec<(u32, u16, u32)>>>,
}

impl ToneRecorder {
    pub fn frequencies(&self) -> Vec<u32> {
        self.tones.borrow().iter().map(|t| t.0).collect()
    }
}

impl ToneGenerator for ToneRecorder {
    fn play_tone(&mut self, frequency_hz: u32, duty: u16, duration_ms: u32) -> HwResult<()> {
        self.tones.borrow_mut().push((frequency_hz, duty, duration_ms));
        Ok(())
    }

    fn stop(&mut self) -> HwResult<()> {
        Ok(())
    }
}

/// Keeps the text drawn in each presented frame
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pending: Rc<RefCell<Vec<String>>>,
    pub frames: Rc<RefCell<Vec<Vec<String>>>>,
}

impl RecordingDisplay {
    pub fn last_frame(&self) -> Vec<String> {
        self.frames.borrow().last().cloned().unwrap_or_default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl DisplayDriver for RecordingDisplay {
    fn clear(&mut self) -> HwResult<()> {
        self.pending.borrow_mut().clear();
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: u32, _h: u32, _c: BinaryColor) -> HwResult<()> {
        Ok(())
    }

    fn draw_pixel(&mut self, _x: i32, _y: i32, _c: BinaryColor) -> HwResult<()> {
        Ok(())
    }

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _c: BinaryColor) -> HwResult<()> {
        self.pending.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn present(&mut self) -> HwResult<()> {
        let frame = self.pending.borrow().clone();
        self.frames.borrow_mut().push(frame);
        Ok(())
    }
}

/// Test-side handles to the fakes inside a `Board`
pub struct Rig {
    pub display: RecordingDisplay,
    pub sensor: FakeSensor,
    pub tone: ToneRecorder,
    pub confirm: ScriptedButton,
    pub nav: ScriptedButton,
    pub clock: FakeClock,
}

pub fn rig() -> (Board, Rig) {
    let rig = Rig {
        display: RecordingDisplay::default(),
        sensor: FakeSensor::default(),
        tone: ToneRecorder::default(),
        confirm: ScriptedButton::default(),
        nav: ScriptedButton::default(),
        clock: FakeClock::new(),
    };
    let board = Board {
        display: Box::new(rig.display.clone()),
        sensor: Box::new(rig.sensor.clone()),
        tone: Box::new(rig.tone.clone()),
        confirm: Box::new(rig.confirm.clone()),
        nav: Box::new(rig.nav.clone()),
        clock: Box::new(rig.clock.clone()),
    };
    (board, rig)
}
