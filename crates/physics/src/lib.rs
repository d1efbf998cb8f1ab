#![warn(missing_docs)]
//! Physics primitives (AABB, angles, direction vectors).

mod backend;
mod vector;

pub use backend::{LookupTrig, MathBackend, PortableTrig, TrigBackend};
pub use glam::{DVec2, DVec3};
pub use vector::{Angle, VectorMath};

/// Overlap tolerance: boxes that merely touch do not intersect.
pub const INTERSECT_EPSILON: f64 = 1.0e-7;

/// Axis-aligned bounding box used for collisions and range queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: DVec3,
    /// Maximum corner (x, y, z).
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box of a body standing at `feet`: centred on x/z, rising `height` on y.
    pub fn from_feet(feet: DVec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self::new(
            DVec3::new(feet.x - half, feet.y, feet.z - half),
            DVec3::new(feet.x + half, feet.y + height, feet.z + half),
        )
    }

    /// Tests strict overlap with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        other.max.x - self.min.x > INTERSECT_EPSILON
            && self.max.x - other.min.x > INTERSECT_EPSILON
            && other.max.y - self.min.y > INTERSECT_EPSILON
            && self.max.y - other.min.y > INTERSECT_EPSILON
            && other.max.z - self.min.z > INTERSECT_EPSILON
            && self.max.z - other.min.z > INTERSECT_EPSILON
    }

    /// Copy grown by the given amount on both sides of each axis.
    pub fn expanded(&self, x: f64, y: f64, z: f64) -> Self {
        let grow = DVec3::new(x, y, z);
        Self::new(self.min - grow, self.max + grow)
    }

    /// Copy translated by `delta`.
    pub fn offset(&self, delta: DVec3) -> Self {
        Self::new(self.min + delta, self.max + delta)
    }

    /// Centre point.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Euclidean distance from `point` to the closest point of the box.
    ///
    /// Zero when the point lies inside.
    pub fn distance_to_point(&self, point: DVec3) -> f64 {
        let outside = (self.min - point).max(point - self.max).max(DVec3::ZERO);
        outside.length()
    }
}
