//! Planar geometry primitives shared across the pipeline.

use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// A planar point usable as a map key.
///
/// Equality and hashing go through the bit pattern of each coordinate, so a
/// point only matches a key built from the exact same snapshot. `-0.0` is
/// folded into `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Planar projection of a world position
    pub fn from_world(position: Vec3) -> Self {
        Self::new(position.x, position.y)
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance(self, other: Self) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    fn key_bits(self) -> (u32, u32) {
        // Adding 0.0 turns -0.0 into +0.0
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl From<Vec2> for Point2D {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point2D> for Vec2 {
    fn from(p: Point2D) -> Self {
        p.to_vec2()
    }
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for Point2D {}

impl Hash for Point2D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

/// Axis-aligned planar bounds of a room footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn around(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict intersection: boxes that only share an edge do not overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn include_point(&self, p: Vec2) -> Aabb {
        Aabb::new(self.min.min(p), self.max.max(p))
    }
}

/// A straight line segment on the room plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Lift onto the room plane
    pub fn to_world(&self, plane_height: f32) -> (Vec3, Vec3) {
        (self.start.extend(plane_height), self.end.extend(plane_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_point_key_folds_negative_zero() {
        let mut map = HashMap::new();
        map.insert(Point2D::new(0.0, 5.0), 1);
        assert_eq!(map.get(&Point2D::new(-0.0, 5.0)), Some(&1));
    }

    #[test]
    fn test_point_key_is_exact() {
        let a = Point2D::new(1.0, 2.0);
        let b = Point2D::new(1.0 + f32::EPSILON, 2.0);
        assert_ne!(a, b);
        assert_eq!(a, Point2D::from(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let c = Aabb::new(Vec2::new(9.0, 9.0), Vec2::new(20.0, 20.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }
}
