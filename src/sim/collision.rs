//! Axis-aligned box intersection
//!
//! Everything on the field is a rectangle, so a strict AABB test is the whole
//! collision engine. Touching edges never count: a shot that exactly reaches
//! an invader's boundary is a miss.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// Axis-aligned bounding box in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Check whether two entities' boxes intersect
#[inline]
pub fn test_overlap(a: &Entity, b: &Entity) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// First candidate (in iteration order) that overlaps `subject`
///
/// Callers pass candidates in spawn order, so ties go to the earliest spawned.
pub fn first_overlap<'a>(
    subject: &Entity,
    candidates: impl IntoIterator<Item = &'a Entity>,
) -> Option<EntityId> {
    let subject_box = subject.bounds();
    candidates
        .into_iter()
        .find(|c| subject_box.overlaps(&c.bounds()))
        .map(|c| c.id)
}
