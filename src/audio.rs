//! Buzzer sound effects
//!
//! Every effect is a short sequence of single tones. Playback blocks the tick
//! for its whole duration; gameplay freezes briefly while a cue sounds.

use crate::error::HwResult;
use crate::platform::{Clock, ToneGenerator};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shot fired in Aliens
    Shoot,
    /// Invader destroyed
    EnemyHit,
    /// Bike hit a car
    Crash,
    /// Invaders won
    GameOver,
}

/// One tone followed by an optional silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub frequency_hz: u32,
    pub duty: u16,
    pub duration_ms: u32,
    pub gap_ms: u32,
}

const fn step(frequency_hz: u32, duty: u16, duration_ms: u32, gap_ms: u32) -> ToneStep {
    ToneStep {
        frequency_hz,
        duty,
        duration_ms,
        gap_ms,
    }
}

const SHOOT: [ToneStep; 1] = [step(800, 3000, 50, 0)];
const ENEMY_HIT: [ToneStep; 1] = [step(2000, 5000, 100, 0)];
const CRASH: [ToneStep; 2] = [step(800, 32768, 200, 100), step(800, 32768, 200, 100)];
const GAME_OVER: [ToneStep; 3] = [
    step(400, 6000, 150, 0),
    step(300, 6000, 150, 0),
    step(200, 6000, 150, 0),
];

impl SoundEffect {
    pub fn steps(&self) -> &'static [ToneStep] {
        match self {
            SoundEffect::Shoot => &SHOOT,
            SoundEffect::EnemyHit => &ENEMY_HIT,
            SoundEffect::Crash => &CRASH,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect to completion
    pub fn play(
        &self,
        effect: SoundEffect,
        tone: &mut dyn ToneGenerator,
        clock: &mut dyn Clock,
    ) -> HwResult<()> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Ok(());
        }

        for step in effect.steps() {
            let duty = (step.duty as f32 * vol) as u16;
            tone.play_tone(step.frequency_hz, duty, step.duration_ms)?;
            if step.gap_ms > 0 {
                tone.stop()?;
                clock.sleep_ms(step.gap_ms);
            }
        }
        tone.stop()
    }
}
