//! Entity records shared by both games

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

pub type EntityId = u32;

/// Role of an entity, with only the fields that role needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The steered craft (bike or ship)
    PlayerCraft,
    /// A car in one of the road lanes
    Obstacle { lane: u8 },
    /// An invader at its formation slot
    Enemy { row: u8, col: u8 },
    /// A shot travelling up the screen
    Projectile,
}

impl EntityKind {
    /// Unit direction used by `EntityStore::advance`
    ///
    /// Enemies and the player have no free axis; the formation and the
    /// steering input move them.
    pub fn axis(&self) -> Vec2 {
        match self {
            EntityKind::Obstacle { .. } => Vec2::Y,
            EntityKind::Projectile => Vec2::NEG_Y,
            EntityKind::Enemy { .. } | EntityKind::PlayerCraft => Vec2::ZERO,
        }
    }

    /// True if both kinds are the same role, ignoring per-role fields
    pub fn same_role(&self, other: &EntityKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Enemy { .. })
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self, EntityKind::Projectile)
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, EntityKind::Obstacle { .. })
    }
}

/// A rectangle on the play field. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub width: i32,
    pub height: i32,
    pub active: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, pos: Vec2, width: i32, height: i32) -> Self {
        Self {
            id,
            kind,
            pos,
            width,
            height,
            active: true,
        }
    }

    /// Collision box. Cars are drawn and tested at their whole-pixel row.
    pub fn bounds(&self) -> Aabb {
        let y = match self.kind {
            EntityKind::Obstacle { .. } => self.pos.y.trunc(),
            _ => self.pos.y,
        };
        Aabb::new(self.pos.x, y, self.width as f32, self.height as f32)
    }
}
