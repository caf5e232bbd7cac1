//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call per tick, time passed in explicitly
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or hardware dependencies

pub mod aliens;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod filter;
pub mod moto;
pub mod store;

pub use aliens::AliensState;
pub use collision::{Aabb, first_overlap, test_overlap};
pub use difficulty::{LaneDifficulty, WaveDifficulty};
pub use entity::{Entity, EntityId, EntityKind};
pub use filter::SteeringFilter;
pub use moto::MotoState;
pub use store::{EntityStore, SpawnRejected, SpawnRule};

/// Input for a single tick (already sampled and filtered)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Filtered steering value from the motion sensor
    pub steering: f32,
    /// Monotonic time at the start of the tick
    pub now_ms: u64,
    /// Fire button edge seen this tick
    pub fire: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A car entered the road
    ObstacleSpawned { id: EntityId },
    /// The bike hit a car
    Crash { obstacle: EntityId },
    /// A shot left the ship
    ShotFired { id: EntityId },
    /// A shot destroyed an invader
    EnemyDestroyed { enemy: EntityId, projectile: EntityId },
    /// The formation hit a field edge and stepped down
    FormationReversed,
    /// Every invader was destroyed and a new wave spawned
    WaveCleared { wave: u32 },
    /// An invader reached the ship's row
    Breach { enemy: EntityId },
}
