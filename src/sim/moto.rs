//! Moto: dodge cars on a three-lane road by tilting the handheld

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::test_overlap;
use super::difficulty::LaneDifficulty;
use super::entity::{Entity, EntityId, EntityKind};
use super::store::{EntityStore, SpawnRejected, SpawnRule};
use super::{GameEvent, TickInput};
use crate::consts::SCREEN_H;

/// Road edges (outline is drawn on these columns)
pub const ROAD_LEFT: i32 = 24;
pub const ROAD_RIGHT: i32 = 104;
/// Dotted lane markers
pub const LANE_MARKERS: [i32; 2] = [44, 84];
/// Lane centres cars are spawned on
pub const LANE_CENTERS: [i32; 3] = [34, 64, 94];

pub const BIKE_WIDTH: i32 = 8;
/// Body (8 px) plus wheels (2 px). The box ends on the last screen row, so a
/// car whose top reaches row 64 is already off screen and never collides.
pub const BIKE_HEIGHT: i32 = 10;
pub const BIKE_Y: i32 = 54;
pub const BIKE_START_X: f32 = 64.0;
/// Pixels per tick per unit of filtered tilt
pub const STEER_GAIN: f32 = 0.8;

pub const CAR_WIDTH: i32 = 12;
pub const CAR_HEIGHT: i32 = 8;
/// Cars enter just above the screen
pub const CAR_SPAWN_Y: f32 = -8.0;

/// Lane game state
#[derive(Debug, Clone)]
pub struct MotoState {
    pub player: Entity,
    pub cars: EntityStore,
    /// Ticks survived
    pub score: u32,
    /// Score at the first crash of the run, if any
    pub crash_score: Option<u32>,
    pub difficulty: LaneDifficulty,
    pub time_ticks: u64,
    rng: Pcg32,
}

impl MotoState {
    pub fn new(seed: u64) -> Self {
        Self {
            player: Self::fresh_bike(),
            cars: EntityStore::new(),
            score: 0,
            crash_score: None,
            difficulty: LaneDifficulty::default(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn fresh_bike() -> Entity {
        let left = BIKE_START_X - (BIKE_WIDTH / 2) as f32;
        Entity::new(
            0,
            EntityKind::PlayerCraft,
            Vec2::new(left, BIKE_Y as f32),
            BIKE_WIDTH,
            BIKE_HEIGHT,
        )
    }

    /// Start a new run. The RNG stream carries on.
    pub fn reset(&mut self) {
        self.player = Self::fresh_bike();
        self.cars.clear();
        self.score = 0;
        self.crash_score = None;
        self.time_ticks = 0;
    }

    /// Horizontal centre of the bike
    pub fn bike_center(&self) -> f32 {
        self.player.pos.x + (BIKE_WIDTH / 2) as f32
    }

    pub fn crashed(&self) -> bool {
        self.crash_score.is_some()
    }

    /// Score to report for this run
    pub fn final_score(&self) -> u32 {
        self.crash_score.unwrap_or(self.score)
    }

    /// Move the bike by the filtered tilt, kept on the road at whole pixels
    pub fn steer(&mut self, steering: f32) {
        let half = (BIKE_WIDTH / 2) as f32;
        let min = ROAD_LEFT as f32 + half;
        let max = ROAD_RIGHT as f32 - half;
        let center = (self.bike_center() + steering * STEER_GAIN).clamp(min, max).trunc();
        self.player.pos.x = center - half;
    }

    /// Put a car at the top of `lane`, respecting the spacing guard
    pub fn spawn_car(&mut self, lane: u8) -> Result<EntityId, SpawnRejected> {
        let center = LANE_CENTERS[lane as usize % LANE_CENTERS.len()];
        let pos = Vec2::new((center - CAR_WIDTH / 2) as f32, CAR_SPAWN_Y);
        self.cars.spawn(
            EntityKind::Obstacle { lane },
            pos,
            CAR_WIDTH,
            CAR_HEIGHT,
            SpawnRule::MinGap(self.difficulty.min_gap_px),
        )
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.time_ticks += 1;

        self.steer(input.steering);

        if self.difficulty.roll_spawn(&mut self.rng) {
            let lane = self.rng.random_range(0..LANE_CENTERS.len()) as u8;
            match self.spawn_car(lane) {
                Ok(id) => events.push(GameEvent::ObstacleSpawned { id }),
                Err(rejected) => log::debug!(
                    "Car spawn rejected: gap {:.1} < {:.1}",
                    rejected.gap,
                    rejected.min_gap
                ),
            }
        }

        self.cars.advance(self.difficulty.speed_px_per_tick);

        // Keep scanning after a crash; every overlapping car is reported
        for car in self.cars.active(EntityKind::is_obstacle) {
            if test_overlap(&self.player, car) {
                if self.crash_score.is_none() {
                    self.crash_score = Some(self.score);
                    log::info!("Crash! Score: {}", self.score);
                }
                events.push(GameEvent::Crash { obstacle: car.id });
            }
        }

        self.cars.cull_out_of_bounds(SCREEN_H as f32);
        // The tick still counts, even the one that crashed
        self.score += 1;

        events
    }
}
