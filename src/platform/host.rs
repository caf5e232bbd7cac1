//! Desktop stand-in for the handheld
//!
//! The frame is drawn into the terminal's alternate screen with half-block
//! characters while the terminal sits in raw mode. Keys:
//! - Left / Right or `a` / `d`: tilt (repeat to lean further)
//! - Down or `s`: level the handheld
//! - Space, Enter or `c`: confirm
//! - Tab or `n`: navigate
//! - Esc, `q` or Ctrl-C: quit
//!
//! Tones go to the default audio output. Logs share the terminal, so redirect
//! stderr when `RUST_LOG` is set.

use std::cell::RefCell;
use std::io::{Stdout, Write, stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, queue, style, terminal};
use embedded_graphics::pixelcolor::BinaryColor;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};

use super::{Board, Button, Clock, DisplayDriver, MotionSensor, ToneGenerator};
use crate::error::{HardwareFault, HwResult};
use crate::renderer::FrameBuffer;
use crate::settings::Settings;

/// Tilt change per key press
const TILT_STEP: i32 = 2;
const MAX_TILT: i32 = 10;
/// Sensor jitter amplitude
const SENSOR_NOISE: f32 = 0.3;
/// Presses a button can buffer between reads
const MAX_QUEUED: u32 = 8;

const SAMPLE_RATE: u32 = 44_100;
/// Peak-to-peak level of the buzzer wave
const AMPLITUDE: f32 = 0.2;

/// Monotonic time since startup
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

fn display_fault(e: std::io::Error) -> HardwareFault {
    HardwareFault::Display(e.to_string())
}

/// Frame buffer drawn into the alternate screen
///
/// Owns the terminal mode: raw mode is entered on open and undone on drop.
pub struct TerminalDisplay {
    frame: FrameBuffer,
    out: Stdout,
    /// Key release events are reported
    enhanced: bool,
}

impl TerminalDisplay {
    pub fn open() -> HwResult<Self> {
        terminal::enable_raw_mode().map_err(display_fault)?;
        // Dropping on any later failure puts the terminal back
        let mut display = Self {
            frame: FrameBuffer::new(),
            out: stdout(),
            enhanced: false,
        };
        execute!(
            display.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(terminal::ClearType::All),
        )
        .map_err(display_fault)?;

        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                display.out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .map_err(display_fault)?;
            display.enhanced = true;
        }
        Ok(display)
    }

    /// Whether the terminal reports key releases, so buttons can be held
    pub fn reports_releases(&self) -> bool {
        self.enhanced
    }

    fn restore(&mut self) -> std::io::Result<()> {
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::warn!("Failed to restore the terminal: {}", e);
        }
    }
}

impl DisplayDriver for TerminalDisplay {
    fn clear(&mut self) -> HwResult<()> {
        self.frame.clear()
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: BinaryColor) -> HwResult<()> {
        self.frame.fill_rect(x, y, w, h, color)
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: BinaryColor) -> HwResult<()> {
        self.frame.draw_pixel(x, y, color)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: BinaryColor) -> HwResult<()> {
        self.frame.draw_text(text, x, y, color)
    }

    fn present(&mut self) -> HwResult<()> {
        let text = self.frame.to_text();
        for (row, line) in text.lines().enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16), style::Print(line))
                .map_err(display_fault)?;
        }
        self.out.flush().map_err(display_fault)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Confirm,
    Nav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    Press(Key),
    Lean(i32),
    Level,
}

fn action(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')).then_some(Action::Quit);
    }
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::Press(Key::Confirm)),
        KeyCode::Tab => Some(Action::Press(Key::Nav)),
        KeyCode::Left => Some(Action::Lean(-TILT_STEP)),
        KeyCode::Right => Some(Action::Lean(TILT_STEP)),
        KeyCode::Down => Some(Action::Level),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(Action::Quit),
            ' ' | 'c' => Some(Action::Press(Key::Confirm)),
            'n' => Some(Action::Press(Key::Nav)),
            'a' => Some(Action::Lean(-TILT_STEP)),
            'd' => Some(Action::Lean(TILT_STEP)),
            's' => Some(Action::Level),
            _ => None,
        },
        _ => None,
    }
}

/// Level seen by one button
///
/// Each press reads as down at least once and is always followed by an up
/// read, so two quick taps are two edges.
#[derive(Debug, Default)]
struct KeyState {
    queued: u32,
    /// Physically down; only tracked when the terminal reports releases
    held: bool,
    /// The last read was down
    reported: bool,
}

impl KeyState {
    fn press(&mut self, tracks_release: bool) {
        self.queued = (self.queued + 1).min(MAX_QUEUED);
        self.held = tracks_release;
    }

    fn release(&mut self) {
        self.held = false;
    }

    fn read(&mut self) -> bool {
        if self.reported {
            if self.held {
                return true;
            }
            self.reported = false;
            return false;
        }
        if self.queued > 0 {
            self.queued -= 1;
            self.reported = true;
            return true;
        }
        false
    }
}

/// Key state shared by the buttons and the tilt sensor
struct Keyboard {
    tilt: i32,
    confirm: KeyState,
    nav: KeyState,
    quit: bool,
    tracks_release: bool,
    /// Drain crossterm events on every read; off when events are fed by hand
    reads_terminal: bool,
}

impl Keyboard {
    fn new(tracks_release: bool, reads_terminal: bool) -> Self {
        Self {
            tilt: 0,
            confirm: KeyState::default(),
            nav: KeyState::default(),
            quit: false,
            tracks_release,
            reads_terminal,
        }
    }

    fn key_mut(&mut self, key: Key) -> &mut KeyState {
        match key {
            Key::Confirm => &mut self.confirm,
            Key::Nav => &mut self.nav,
        }
    }

    fn handle(&mut self, event: &Event) {
        let Event::Key(key) = event else {
            return;
        };
        let Some(action) = action(key) else {
            log::debug!("Unbound key {:?}", key.code);
            return;
        };

        match (key.kind, action) {
            (KeyEventKind::Release, Action::Press(k)) => self.key_mut(k).release(),
            (KeyEventKind::Release, _) => {}
            (_, Action::Quit) => self.quit = true,
            (KeyEventKind::Press, Action::Press(k)) => {
                let tracks_release = self.tracks_release;
                self.key_mut(k).press(tracks_release);
            }
            // Held with release reporting on; already counted
            (_, Action::Press(_)) => {}
            (_, Action::Lean(delta)) => {
                self.tilt = (self.tilt + delta).clamp(-MAX_TILT, MAX_TILT);
            }
            (_, Action::Level) => self.tilt = 0,
        }
    }

    /// Apply every pending terminal event, failing once quit was asked for
    fn pump(&mut self) -> HwResult<()> {
        if self.reads_terminal {
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle(&event);
            }
        }
        if self.quit {
            return Err(HardwareFault::Shutdown);
        }
        Ok(())
    }
}

pub struct KeyButton {
    keyboard: Rc<RefCell<Keyboard>>,
    key: Key,
}

impl Button for KeyButton {
    fn is_pressed(&mut self) -> HwResult<bool> {
        let mut keyboard = self.keyboard.borrow_mut();
        keyboard.pump()?;
        Ok(keyboard.key_mut(self.key).read())
    }
}

/// Keyboard tilt with a little accelerometer jitter
pub struct TiltSensor {
    keyboard: Rc<RefCell<Keyboard>>,
    rng: Pcg32,
}

impl MotionSensor for TiltSensor {
    fn read_axis(&mut self) -> HwResult<f32> {
        let mut keyboard = self.keyboard.borrow_mut();
        keyboard.pump()?;
        let tilt = keyboard.tilt as f32;
        Ok(tilt + self.rng.random_range(-SENSOR_NOISE..=SENSOR_NOISE))
    }
}

/// One mono buffer of a square wave
///
/// `duty` is the high fraction out of 65535. The wave is centred on zero, so
/// the audible level follows the duty the way a piezo's does. Zero duty or
/// frequency is silence.
pub fn square_wave(frequency_hz: u32, duty: u16, duration_ms: u32, sample_rate: u32) -> Vec<f32> {
    let count = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    if frequency_hz == 0 || duty == 0 {
        return vec![0.0; count];
    }

    let high = duty as f32 / u16::MAX as f32;
    let period = sample_rate as f32 / frequency_hz as f32;
    (0..count)
        .map(|i| {
            let phase = (i as f32 % period) / period;
            if phase < high {
                AMPLITUDE * (1.0 - high)
            } else {
                -AMPLITUDE * high
            }
        })
        .collect()
}

/// Square-wave tones on the default audio output
///
/// Falls back to holding the tick silently when no output device exists.
pub struct Buzzer {
    _stream: Option<OutputStream>,
    sink: Option<Sink>,
}

impl Buzzer {
    pub fn open() -> Self {
        let output = OutputStream::try_default()
            .map_err(|e| e.to_string())
            .and_then(|(stream, handle)| {
                let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
                Ok((stream, sink))
            });
        match output {
            Ok((stream, sink)) => Self {
                _stream: Some(stream),
                sink: Some(sink),
            },
            Err(e) => {
                log::warn!("No audio output ({}), tones are silent", e);
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self {
            _stream: None,
            sink: None,
        }
    }
}

impl ToneGenerator for Buzzer {
    fn play_tone(&mut self, frequency_hz: u32, duty: u16, duration_ms: u32) -> HwResult<()> {
        log::trace!("Tone {} Hz duty {} for {} ms", frequency_hz, duty, duration_ms);
        match &self.sink {
            Some(sink) => {
                let samples = square_wave(frequency_hz, duty, duration_ms, SAMPLE_RATE);
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.sleep_until_end();
            }
            None => std::thread::sleep(Duration::from_millis(duration_ms as u64)),
        }
        Ok(())
    }

    fn stop(&mut self) -> HwResult<()> {
        if let Some(sink) = &self.sink {
            sink.stop();
        }
        Ok(())
    }
}

/// Wire up every collaborator for a terminal session
pub fn board(settings: &Settings) -> HwResult<Board> {
    let display = TerminalDisplay::open()?;
    let keyboard = Rc::new(RefCell::new(Keyboard::new(
        display.reports_releases(),
        true,
    )));
    let noise_seed = settings.seed.unwrap_or_else(|| std::process::id() as u64);

    log::info!(
        "Host board ready (key releases {}): arrows tilt, Space confirm, Tab navigate, Esc quit",
        if display.reports_releases() { "reported" } else { "not reported" }
    );
    Ok(Board {
        display: Box::new(display),
        sensor: Box::new(TiltSensor {
            keyboard: Rc::clone(&keyboard),
            rng: Pcg32::seed_from_u64(noise_seed),
        }),
        tone: Box::new(Buzzer::open()),
        confirm: Box::new(KeyButton {
            keyboard: Rc::clone(&keyboard),
            key: Key::Confirm,
        }),
        nav: Box::new(KeyButton {
            keyboard,
            key: Key::Nav,
        }),
        clock: Box::new(SystemClock::new()),
    })
}
