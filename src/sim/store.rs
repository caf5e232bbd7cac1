//! Ordered entity collection
//!
//! Entities are kept in spawn order. Collision resolution walks them in that
//! order, so "first match wins" always means "earliest spawned wins".

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};

/// Placement constraint checked by `EntityStore::spawn`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRule {
    /// Always accepted
    Free,
    /// Rejected when the newest entity of the same role is closer than this
    /// (vertically) to the spawn point
    MinGap(f32),
}

/// Why a spawn was refused
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRejected {
    pub gap: f32,
    pub min_gap: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert a new active entity, subject to `rule`
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        width: i32,
        height: i32,
        rule: SpawnRule,
    ) -> Result<EntityId, SpawnRejected> {
        if let SpawnRule::MinGap(min_gap) = rule {
            let newest = self.entities.iter().rev().find(|e| e.kind.same_role(&kind));
            if let Some(newest) = newest {
                let gap = newest.pos.y - pos.y;
                if gap < min_gap {
                    return Err(SpawnRejected { gap, min_gap });
                }
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity::new(id, kind, pos, width, height));
        Ok(id)
    }

    /// Move every active entity `delta` pixels along its role axis
    pub fn advance(&mut self, delta: f32) {
        for entity in self.entities.iter_mut().filter(|e| e.active) {
            entity.pos += entity.kind.axis() * delta;
        }
    }

    /// Move active entities matching `filter` by `offset`
    pub fn shift(&mut self, filter: impl Fn(&EntityKind) -> bool, offset: Vec2) {
        for entity in self.entities.iter_mut() {
            if entity.active && filter(&entity.kind) {
                entity.pos += offset;
            }
        }
    }

    /// Drop entities that left the field along their axis
    ///
    /// Descending entities go at `y >= field_height`, ascending ones at `y <= 0`.
    /// Returns how many were removed.
    pub fn cull_out_of_bounds(&mut self, field_height: f32) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| {
            let axis = e.kind.axis();
            if axis.y > 0.0 {
                e.pos.y < field_height
            } else if axis.y < 0.0 {
                e.pos.y > 0.0
            } else {
                true
            }
        });
        before - self.entities.len()
    }

    pub fn retain(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.entities.retain(keep);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Active entities matching `filter`, in spawn order
    pub fn active(&self, filter: impl Fn(&EntityKind) -> bool) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.active && filter(&e.kind))
    }

    pub fn count_active(&self, filter: impl Fn(&EntityKind) -> bool) -> usize {
        self.active(filter).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAR: EntityKind = EntityKind::Obstacle { lane: 0 };

    #[test]
    fn test_min_gap_rejects_closer_spawn() {
        let mut store = EntityStore::new();
        let first = store.spawn(CAR, Vec2::new(28.0, 31.9), 12, 8, SpawnRule::MinGap(40.0));
        assert!(first.is_ok());

        let rejected = store.spawn(CAR, Vec2::new(58.0, -8.0), 12, 8, SpawnRule::MinGap(40.0));
        assert!(rejected.is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_min_gap_accepts_exact_gap() {
        let mut store = EntityStore::new();
        store
            .spawn(CAR, Vec2::new(28.0, 32.0), 12, 8, SpawnRule::MinGap(40.0))
            .unwrap();
        let accepted = store.spawn(CAR, Vec2::new(58.0, -8.0), 12, 8, SpawnRule::MinGap(40.0));
        assert!(accepted.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_min_gap_only_checks_same_role() {
        let mut store = EntityStore::new();
        store
            .spawn(EntityKind::Projectile, Vec2::new(10.0, -8.0), 2, 4, SpawnRule::Free)
            .unwrap();
        let accepted = store.spawn(CAR, Vec2::new(58.0, -8.0), 12, 8, SpawnRule::MinGap(40.0));
        assert!(accepted.is_ok());
    }

    #[test]
    fn test_advance_moves_along_role_axis() {
        let mut store = EntityStore::new();
        let car = store.spawn(CAR, Vec2::new(0.0, 10.0), 12, 8, SpawnRule::Free).unwrap();
        let shot = store
            .spawn(EntityKind::Projectile, Vec2::new(0.0, 10.0), 2, 4, SpawnRule::Free)
            .unwrap();
        let enemy = store
            .spawn(EntityKind::Enemy { row: 0, col: 0 }, Vec2::new(0.0, 10.0), 8, 6, SpawnRule::Free)
            .unwrap();

        store.advance(3.0);

        assert_eq!(store.get(car).unwrap().pos.y, 13.0);
        assert_eq!(store.get(shot).unwrap().pos.y, 7.0);
        assert_eq!(store.get(enemy).unwrap().pos.y, 10.0);
    }

    #[test]
    fn test_cull_removes_only_departed() {
        let mut store = EntityStore::new();
        store.spawn(CAR, Vec2::new(0.0, 63.9), 12, 8, SpawnRule::Free).unwrap();
        store.spawn(CAR, Vec2::new(0.0, 64.0), 12, 8, SpawnRule::Free).unwrap();
        store
            .spawn(EntityKind::Projectile, Vec2::new(0.0, 0.0), 2, 4, SpawnRule::Free)
            .unwrap();
        store
            .spawn(EntityKind::Projectile, Vec2::new(0.0, 0.5), 2, 4, SpawnRule::Free)
            .unwrap();

        let removed = store.cull_out_of_bounds(64.0);

        assert_eq!(removed, 2);
        let ys: Vec<f32> = store.iter().map(|e| e.pos.y).collect();
        assert_eq!(ys, vec![63.9, 0.5]);
    }

    #[test]
    fn test_iteration_keeps_spawn_order_after_removal() {
        let mut store = EntityStore::new();
        let ids: Vec<_> = (0..4)
            .map(|i| {
                store
                    .spawn(CAR, Vec2::new(0.0, i as f32 * 50.0), 12, 8, SpawnRule::Free)
                    .unwrap()
            })
            .collect();
        store.retain(|e| e.id != ids[1]);
        let remaining: Vec<_> = store.iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }
}
