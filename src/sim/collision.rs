//! Axis-aligned collision geometry
//!
//! Everything in the play area is a box: the entity, and the two segments of
//! each obstacle pair. Touching edges do not count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Boxes with zero area never collide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Strict overlap test
    pub fn intersects(&self, other: &Aabb) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Whether the vertical extent lies within `[top, bottom]`
    pub fn within_vertical(&self, top: f32, bottom: f32) -> bool {
        self.min.y >= top && self.max.y <= bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(15.0, 15.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_degenerate_box_never_hits() {
        let flat = Aabb::new(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0));
        let big = Aabb::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0));
        assert!(!flat.intersects(&big));
    }

    #[test]
    fn test_within_vertical() {
        let b = Aabb::from_center(Vec2::new(0.0, 20.0), Vec2::splat(10.0));
        assert!(b.within_vertical(0.0, 100.0));
        assert!(b.within_vertical(10.0, 30.0));
        assert!(!b.within_vertical(11.0, 100.0));
        assert!(!b.within_vertical(0.0, 29.0));
    }
}
