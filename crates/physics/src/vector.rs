//! Angle and direction helpers.
//!
//! Conventions follow the game client: yaw is in degrees, 0° faces +Z and
//! grows clockwise seen from above (90° faces -X); pitch is in degrees,
//! negative looks up.

use crate::backend::{MathBackend, TrigBackend};
use crate::Aabb;
use glam::{DVec2, DVec3};
use std::sync::Arc;

/// Yaw/pitch pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Angle {
    /// Heading in `[0, 360)`.
    pub yaw: f64,
    /// Elevation in `[-90, 90]`, negative is up.
    pub pitch: f64,
}

impl Angle {
    /// Construct from degrees.
    pub const fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }
}

/// Vector math service; cheap to clone, shares one backend.
#[derive(Debug, Clone)]
pub struct VectorMath {
    trig: Arc<dyn TrigBackend>,
}

impl Default for VectorMath {
    fn default() -> Self {
        Self::new(MathBackend::Portable)
    }
}

impl VectorMath {
    /// Build with the selected backend.
    pub fn new(backend: MathBackend) -> Self {
        Self {
            trig: Arc::from(backend.build()),
        }
    }

    /// Build around a caller-supplied backend.
    pub fn with_backend(trig: Arc<dyn TrigBackend>) -> Self {
        Self { trig }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        self.trig.name()
    }

    /// Yaw and pitch that look from `from` toward `to`.
    pub fn angle(&self, from: DVec3, to: DVec3) -> Angle {
        let dx = to.x - from.x;
        let dz = to.z - from.z;
        let horizontal = (dx * dx + dz * dz).sqrt();
        let vertical = to.y - from.y;
        let pitch = -self.trig.atan2(vertical, horizontal).to_degrees();

        Angle::new(self.yaw_towards(dx, dz), pitch)
    }

    /// Yaw toward `to`, ignoring height; pitch is always zero.
    pub fn angle_horizontal(&self, from: DVec3, to: DVec3) -> Angle {
        Angle::new(self.yaw_towards(to.x - from.x, to.z - from.z), 0.0)
    }

    fn yaw_towards(&self, dx: f64, dz: f64) -> f64 {
        let yaw = self.trig.atan2(dz, dx).to_degrees() - 90.0;
        if yaw < 0.0 {
            yaw + 360.0
        } else {
            yaw
        }
    }

    /// Unit vector pointing along `yaw`/`pitch`.
    pub fn direction_vector(&self, yaw: f64, pitch: f64) -> DVec3 {
        let pitch_rad = pitch.to_radians();
        let yaw_rad = yaw.to_radians();
        let y = -self.trig.sin(pitch_rad);
        let xz = self.trig.cos(pitch_rad);
        let x = -xz * self.trig.sin(yaw_rad);
        let z = xz * self.trig.cos(yaw_rad);

        DVec3::new(x, y, z).normalize_or_zero()
    }

    /// Horizontal unit vector along `yaw` (y is zero).
    pub fn direction_horizontal(&self, yaw: f64) -> DVec3 {
        let yaw_rad = yaw.to_radians();
        DVec3::new(-self.trig.sin(yaw_rad), 0.0, self.trig.cos(yaw_rad)).normalize_or_zero()
    }

    /// Planar (x, z) unit vector along `yaw`.
    pub fn direction_2d(&self, yaw: f64) -> DVec2 {
        let dir = self.direction_horizontal(yaw);
        DVec2::new(dir.x, dir.z)
    }

    /// Unit vector from `from` toward `to`, routed through yaw/pitch.
    pub fn angle_direction_vector(&self, from: DVec3, to: DVec3) -> DVec3 {
        let angle = self.angle(from, to);
        self.direction_vector(angle.yaw, angle.pitch)
    }

    /// Horizontal unit vector from `from` toward `to`.
    pub fn angle_direction_horizontal(&self, from: DVec3, to: DVec3) -> DVec3 {
        let angle = self.angle_horizontal(from, to);
        self.direction_horizontal(angle.yaw)
    }

    /// Distance from a point to the closest point of a box.
    pub fn distance_to_aabb(&self, point: DVec3, aabb: &Aabb) -> f64 {
        aabb.distance_to_point(point)
    }
}
