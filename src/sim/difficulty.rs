//! Difficulty rules
//!
//! Moto has flat difficulty: constant speed and a fixed per-tick spawn roll,
//! with the spacing guard as the only coupling. Aliens gets harder with every
//! kill and every cleared wave, and never resets to wave one.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lane game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneDifficulty {
    /// Minimum vertical distance between consecutive cars
    pub min_gap_px: f32,
    /// Downward car speed
    pub speed_px_per_tick: f32,
    /// Chance per tick of attempting a spawn
    pub spawn_chance: f64,
}

impl Default for LaneDifficulty {
    fn default() -> Self {
        Self {
            min_gap_px: 40.0,
            speed_px_per_tick: 0.8,
            spawn_chance: 0.03,
        }
    }
}

impl LaneDifficulty {
    /// Independent Bernoulli trial, one per tick
    pub fn roll_spawn<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random_bool(self.spawn_chance)
    }
}

/// Formation move interval at the start of a session
pub const INITIAL_MOVE_INTERVAL_MS: u32 = 500;
/// Fastest the formation can ever move
pub const MOVE_INTERVAL_FLOOR_MS: u32 = 200;
/// Interval the kill-count formula starts from
pub const KILL_SCALE_BASE_MS: u32 = 1000;
/// Interval shaved off per enemy destroyed
pub const KILL_SCALE_STEP_MS: u32 = 50;
/// Interval shaved off per cleared wave
pub const WAVE_CLEAR_STEP_MS: u32 = 50;

/// Shooter wave progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDifficulty {
    /// Enemies still alive in the current wave
    pub active_count: u32,
    /// Size of the current wave
    pub wave_spawned: u32,
    /// Enemies spawned across all waves
    pub total_spawned: u32,
    /// Milliseconds between formation moves
    pub move_interval_ms: u32,
    /// Horizontal direction of the formation (+1 right, -1 left)
    pub direction: i32,
    /// Waves cleared so far
    pub wave: u32,
    /// Y of the first row of the current wave
    pub base_offset: f32,
    /// Time of the last formation move (None until the first tick)
    pub last_move_ms: Option<u64>,
}

impl WaveDifficulty {
    pub fn new(base_offset: f32) -> Self {
        Self {
            active_count: 0,
            wave_spawned: 0,
            total_spawned: 0,
            move_interval_ms: INITIAL_MOVE_INTERVAL_MS,
            direction: 1,
            wave: 0,
            base_offset,
            last_move_ms: None,
        }
    }

    /// Enemies destroyed in the current wave
    pub fn destroyed(&self) -> u32 {
        self.wave_spawned.saturating_sub(self.active_count)
    }

    /// Whether the formation should move at `now_ms`
    ///
    /// The first call only starts the clock.
    pub fn move_due(&mut self, now_ms: u64) -> bool {
        match self.last_move_ms {
            None => {
                self.last_move_ms = Some(now_ms);
                false
            }
            Some(last) => now_ms.saturating_sub(last) > self.move_interval_ms as u64,
        }
    }

    pub fn record_move(&mut self, now_ms: u64) {
        self.last_move_ms = Some(now_ms);
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }

    pub fn on_wave_spawned(&mut self, count: u32) {
        self.active_count = count;
        self.wave_spawned = count;
        self.total_spawned += count;
    }

    pub fn on_enemy_destroyed(&mut self) {
        self.active_count = self.active_count.saturating_sub(1);
    }

    /// Speed up after a move, based on kills in this wave
    ///
    /// Never slows the formation down, so a fresh wave keeps the pace the
    /// last one ended on. No-op once the wave is empty.
    pub fn recompute_interval(&mut self) {
        if self.active_count == 0 {
            return;
        }
        let scaled = KILL_SCALE_BASE_MS
            .saturating_sub(self.destroyed() * KILL_SCALE_STEP_MS)
            .max(MOVE_INTERVAL_FLOOR_MS);
        self.move_interval_ms = self.move_interval_ms.min(scaled);
    }

    /// Step to the next wave: faster, and one row spacing lower (up to `max_base`)
    pub fn advance_wave(&mut self, row_spacing: f32, max_base: f32) {
        self.wave += 1;
        self.move_interval_ms = self
            .move_interval_ms
            .saturating_sub(WAVE_CLEAR_STEP_MS)
            .max(MOVE_INTERVAL_FLOOR_MS);
        self.base_offset = (self.base_offset + row_spacing).min(max_base);
    }
}
