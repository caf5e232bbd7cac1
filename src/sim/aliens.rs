//! Aliens: a tilt-steered invaders shooter

use glam::Vec2;

use super::collision::first_overlap;
use super::difficulty::WaveDifficulty;
use super::entity::{Entity, EntityId, EntityKind};
use super::store::{EntityStore, SpawnRule};
use super::{GameEvent, TickInput};
use crate::consts::{SCREEN_H, SCREEN_W};

pub const PLAYER_WIDTH: i32 = 8;
pub const PLAYER_HEIGHT: i32 = 6;
pub const PLAYER_Y: i32 = 56;
pub const PLAYER_START_X: f32 = (64 - PLAYER_WIDTH / 2) as f32;
/// Pixels per tick per unit of filtered tilt
pub const STEER_GAIN: f32 = 1.5;

pub const ENEMY_WIDTH: i32 = 8;
pub const ENEMY_HEIGHT: i32 = 6;
pub const ENEMY_ROWS: u8 = 3;
pub const ENEMY_COLS: u8 = 5;
pub const FIRST_COL_X: f32 = 20.0;
pub const COL_SPACING: f32 = 20.0;
pub const FIRST_ROW_Y: f32 = 10.0;
pub const ROW_SPACING: f32 = 10.0;
/// Sideways step per formation move
pub const FORMATION_STEP_X: f32 = 2.0;
/// Drop when the formation reverses
pub const FORMATION_DROP_Y: f32 = 5.0;
/// Distance from the screen edge that triggers a reversal
pub const EDGE_MARGIN: f32 = 2.0;
/// Any invader at or below this row ends the game
pub const BREACH_Y: f32 = (PLAYER_Y - 5) as f32;
/// Lowest first-row offset for a new wave: the bottom row must survive one drop
pub const MAX_WAVE_BASE_Y: f32 =
    BREACH_Y - (ENEMY_ROWS as f32 - 1.0) * ROW_SPACING - FORMATION_DROP_Y - 1.0;

pub const SHOT_WIDTH: i32 = 2;
pub const SHOT_HEIGHT: i32 = 4;
pub const SHOT_SPEED: f32 = 3.0;
pub const FIRE_COOLDOWN_MS: u64 = 500;

pub const POINTS_PER_KILL: u32 = 10;

/// Shooter game state
#[derive(Debug, Clone)]
pub struct AliensState {
    pub player: Entity,
    /// Invaders and shots, in spawn order
    pub entities: EntityStore,
    pub score: u32,
    pub wave: WaveDifficulty,
    pub last_shot_ms: Option<u64>,
    /// An invader reached the ship's row
    pub breached: bool,
}

impl Default for AliensState {
    fn default() -> Self {
        Self::new()
    }
}

impl AliensState {
    pub fn new() -> Self {
        let mut state = Self {
            player: Self::fresh_ship(),
            entities: EntityStore::new(),
            score: 0,
            wave: WaveDifficulty::new(FIRST_ROW_Y),
            last_shot_ms: None,
            breached: false,
        };
        state.spawn_wave();
        state
    }

    fn fresh_ship() -> Entity {
        Entity::new(
            0,
            EntityKind::PlayerCraft,
            Vec2::new(PLAYER_START_X, PLAYER_Y as f32),
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
        )
    }

    /// Start over from wave one
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replace any invaders with a full formation at the current base offset
    fn spawn_wave(&mut self) {
        self.entities.retain(|e| !e.kind.is_enemy());
        let base = self.wave.base_offset;
        let mut spawned = 0;
        for row in 0..ENEMY_ROWS {
            for col in 0..ENEMY_COLS {
                let pos = Vec2::new(
                    FIRST_COL_X + col as f32 * COL_SPACING,
                    base + row as f32 * ROW_SPACING,
                );
                let kind = EntityKind::Enemy { row, col };
                if self
                    .entities
                    .spawn(kind, pos, ENEMY_WIDTH, ENEMY_HEIGHT, SpawnRule::Free)
                    .is_ok()
                {
                    spawned += 1;
                }
            }
        }
        self.wave.on_wave_spawned(spawned);
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.active(EntityKind::is_enemy)
    }

    /// Move the ship by the filtered tilt, kept on screen
    pub fn steer(&mut self, steering: f32) {
        let max = (SCREEN_W - PLAYER_WIDTH) as f32;
        self.player.pos.x = (self.player.pos.x + steering * STEER_GAIN).clamp(0.0, max);
    }

    /// Launch a shot from the ship's nose if the cooldown has passed
    pub fn fire(&mut self, now_ms: u64) -> Option<EntityId> {
        if let Some(last) = self.last_shot_ms {
            if now_ms.saturating_sub(last) <= FIRE_COOLDOWN_MS {
                return None;
            }
        }
        let pos = Vec2::new(
            self.player.pos.x + (PLAYER_WIDTH / 2) as f32 - 1.0,
            (PLAYER_Y - SHOT_HEIGHT) as f32,
        );
        let id = self
            .entities
            .spawn(EntityKind::Projectile, pos, SHOT_WIDTH, SHOT_HEIGHT, SpawnRule::Free)
            .ok()?;
        self.last_shot_ms = Some(now_ms);
        Some(id)
    }

    /// Each live shot takes out at most one invader, the earliest spawned it touches
    fn resolve_hits(&mut self, events: &mut Vec<GameEvent>) {
        let shots: Vec<EntityId> = self
            .entities
            .active(EntityKind::is_projectile)
            .map(|e| e.id)
            .collect();

        for shot_id in shots {
            let Some(shot) = self.entities.get(shot_id) else {
                continue;
            };
            let Some(enemy_id) = first_overlap(shot, self.entities.active(EntityKind::is_enemy))
            else {
                continue;
            };

            if let Some(enemy) = self.entities.get_mut(enemy_id) {
                enemy.active = false;
            }
            if let Some(shot) = self.entities.get_mut(shot_id) {
                shot.active = false;
            }
            self.score += POINTS_PER_KILL;
            self.wave.on_enemy_destroyed();
            events.push(GameEvent::EnemyDestroyed {
                enemy: enemy_id,
                projectile: shot_id,
            });
        }

        // Spent shots go; dead invaders stay until the wave is replaced
        self.entities
            .retain(|e| e.active || !e.kind.is_projectile());
    }

    /// One formation move: sideways, or reverse and drop at an edge
    fn step_formation(&mut self, events: &mut Vec<GameEvent>) {
        let direction = self.wave.direction;
        let right_edge = (SCREEN_W - ENEMY_WIDTH) as f32 - EDGE_MARGIN;
        let at_edge = self.active_enemies().any(|e| {
            (direction < 0 && e.pos.x <= EDGE_MARGIN) || (direction > 0 && e.pos.x >= right_edge)
        });

        if at_edge {
            self.wave.reverse();
            self.entities
                .shift(EntityKind::is_enemy, Vec2::new(0.0, FORMATION_DROP_Y));
            log::debug!("Formation reversed, direction {}", self.wave.direction);
            events.push(GameEvent::FormationReversed);
        } else {
            self.entities.shift(
                EntityKind::is_enemy,
                Vec2::new(FORMATION_STEP_X * direction as f32, 0.0),
            );
        }
    }

    fn next_wave(&mut self) {
        self.wave.advance_wave(ROW_SPACING, MAX_WAVE_BASE_Y);
        self.spawn_wave();
        log::info!(
            "Wave {} cleared, next wave at y={} interval={}ms",
            self.wave.wave,
            self.wave.base_offset,
            self.wave.move_interval_ms
        );
    }

    /// Advance one tick
    pub fn tick(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        self.steer(input.steering);

        self.entities.advance(SHOT_SPEED);
        self.entities.cull_out_of_bounds(SCREEN_H as f32);
        self.resolve_hits(&mut events);

        if self.wave.move_due(input.now_ms) {
            self.wave.record_move(input.now_ms);
            self.step_formation(&mut events);
            self.wave.recompute_interval();
        }

        if self.wave.active_count == 0 {
            self.next_wave();
            events.push(GameEvent::WaveCleared {
                wave: self.wave.wave,
            });
        }

        let breach = self
            .active_enemies()
            .find(|e| e.pos.y >= BREACH_Y)
            .map(|e| e.id);
        if let Some(enemy) = breach {
            self.breached = true;
            log::info!("Invaders landed! Score: {}", self.score);
            events.push(GameEvent::Breach { enemy });
        }

        if input.fire && !self.breached {
            if let Some(id) = self.fire(input.now_ms) {
                events.push(GameEvent::ShotFired { id });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::MOVE_INTERVAL_FLOOR_MS;
    use proptest::prelude::*;

    fn input_at(now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    /// State with just the given invaders on the field
    fn with_enemies(positions: &[(f32, f32)]) -> (AliensState, Vec<EntityId>) {
        let mut state = AliensState::new();
        state.entities.clear();
        let ids: Vec<EntityId> = positions
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                state
                    .entities
                    .spawn(
                        EntityKind::Enemy { row: 0, col: i as u8 },
                        Vec2::new(x, y),
                        ENEMY_WIDTH,
                        ENEMY_HEIGHT,
                        SpawnRule::Free,
                    )
                    .unwrap()
            })
            .collect();
        state.wave = WaveDifficulty::new(FIRST_ROW_Y);
        state.wave.on_wave_spawned(ids.len() as u32);
        (state, ids)
    }

    fn place_shot(state: &mut AliensState, x: f32, y: f32) -> EntityId {
        state
            .entities
            .spawn(EntityKind::Projectile, Vec2::new(x, y), SHOT_WIDTH, SHOT_HEIGHT, SpawnRule::Free)
            .unwrap()
    }

    #[test]
    fn test_initial_formation() {
        let state = AliensState::new();
        assert_eq!(state.active_enemies().count(), 15);
        assert_eq!(state.wave.active_count, 15);
        let first = state.active_enemies().next().unwrap();
        assert_eq!(first.pos, Vec2::new(20.0, 10.0));
        let last = state.active_enemies().last().unwrap();
        assert_eq!(last.pos, Vec2::new(100.0, 30.0));
        assert_eq!(state.player.pos.x, 60.0);
    }

    #[test]
    fn test_shot_destroys_enemy() {
        let (mut state, enemies) = with_enemies(&[(28.0, 22.0), (100.0, 10.0)]);
        // Lands on (30, 20) after this tick's 3 px climb
        let shot = place_shot(&mut state, 30.0, 23.0);

        let events = state.tick(&input_at(1_000));

        assert!(events.contains(&GameEvent::EnemyDestroyed {
            enemy: enemies[0],
            projectile: shot,
        }));
        assert_eq!(state.score, 10);
        assert!(!state.entities.get(enemies[0]).unwrap().active);
        assert!(state.entities.get(shot).is_none());
        assert_eq!(state.wave.active_count, 1);
    }

    #[test]
    fn test_shot_hits_only_earliest_enemy() {
        let (mut state, enemies) =
            with_enemies(&[(28.0, 18.0), (29.0, 20.0), (100.0, 10.0)]);
        place_shot(&mut state, 30.0, 23.0);

        state.tick(&input_at(1_000));

        assert!(!state.entities.get(enemies[0]).unwrap().active);
        assert!(state.entities.get(enemies[1]).unwrap().active);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_shot_leaves_top_of_screen() {
        let (mut state, _) = with_enemies(&[(100.0, 40.0)]);
        place_shot(&mut state, 10.0, 2.0);
        state.tick(&input_at(1_000));
        assert_eq!(state.entities.count_active(EntityKind::is_projectile), 0);
    }

    #[test]
    fn test_fire_cooldown() {
        let mut state = AliensState::new();
        assert!(state.fire(1_000).is_some());
        assert!(state.fire(1_400).is_none());
        assert!(state.fire(1_500).is_none());
        let shot = state.fire(1_501).unwrap();
        let shot = state.entities.get(shot).unwrap();
        assert_eq!(shot.pos, Vec2::new(63.0, 52.0));
    }

    #[test]
    fn test_formation_reverses_at_edge() {
        let (mut state, enemies) = with_enemies(&[(118.0, 20.0), (60.0, 20.0)]);
        state.tick(&input_at(0));
        let events = state.tick(&input_at(501));

        assert!(events.contains(&GameEvent::FormationReversed));
        assert_eq!(state.wave.direction, -1);
        let edge = state.entities.get(enemies[0]).unwrap();
        assert_eq!(edge.pos, Vec2::new(118.0, 25.0));
    }

    #[test]
    fn test_formation_steps_sideways() {
        let (mut state, enemies) = with_enemies(&[(40.0, 20.0)]);
        state.tick(&input_at(0));
        state.tick(&input_at(500));
        assert_eq!(state.entities.get(enemies[0]).unwrap().pos.x, 40.0);
        state.tick(&input_at(501));
        assert_eq!(state.entities.get(enemies[0]).unwrap().pos.x, 42.0);
    }

    #[test]
    fn test_breach_ends_game() {
        let (mut state, enemies) = with_enemies(&[(40.0, BREACH_Y)]);
        let events = state.tick(&TickInput {
            now_ms: 1_000,
            fire: true,
            ..Default::default()
        });
        assert!(state.breached);
        assert!(events.contains(&GameEvent::Breach { enemy: enemies[0] }));
        // No shot once the game is lost
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ShotFired { .. })));
    }

    #[test]
    fn test_wave_clear_respawns_lower_and_faster() {
        let (mut state, _) = with_enemies(&[(28.0, 22.0)]);
        place_shot(&mut state, 30.0, 23.0);
        let before = state.wave.move_interval_ms;

        let events = state.tick(&input_at(1_000));

        assert!(events.contains(&GameEvent::WaveCleared { wave: 1 }));
        assert_eq!(state.active_enemies().count(), 15);
        let first_row_y = state.active_enemies().next().unwrap().pos.y;
        assert_eq!(first_row_y, FIRST_ROW_Y + ROW_SPACING);
        assert!(state.wave.move_interval_ms < before);
        assert!(state.wave.move_interval_ms >= MOVE_INTERVAL_FLOOR_MS);
    }

    #[test]
    fn test_fresh_wave_never_spawns_breached() {
        let mut state = AliensState::new();
        for _ in 0..10 {
            state.wave.active_count = 0;
            state.tick(&input_at(0));
            assert!(!state.breached);
        }
        assert_eq!(state.wave.base_offset, MAX_WAVE_BASE_Y);
    }

    proptest! {
        #[test]
        fn ship_stays_on_screen(inputs in prop::collection::vec(-50.0f32..50.0, 1..100)) {
            let mut state = AliensState::new();
            for steering in inputs {
                state.steer(steering);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= (SCREEN_W - PLAYER_WIDTH) as f32);
            }
        }
    }
}
