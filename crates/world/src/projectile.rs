//! Projectile launch requests.
//!
//! Creatures only compute how a projectile should leave the bow; spawning and
//! flying it is the host's job.

use natural_core::EntityId;
use natural_physics::{Angle, DVec3, VectorMath};
use serde::Serialize;

/// Velocity scale of a fully drawn bow.
pub const DEFAULT_LAUNCH_POWER: f64 = 2.0;

/// Everything the host needs to spawn a projectile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRequest {
    pub owner: EntityId,
    pub target: EntityId,
    pub origin: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    pub velocity: DVec3,
    pub damage: f32,
    pub critical: bool,
}

/// Launch angle and velocity for a shot from `origin` at `target`.
pub fn aim_projectile(math: &VectorMath, origin: DVec3, target: DVec3, power: f64) -> (Angle, DVec3) {
    let angle = math.angle(origin, target);
    let velocity = math.direction_vector(angle.yaw, angle.pitch) * power;
    (angle, velocity)
}
