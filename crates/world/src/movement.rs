//! Walking helpers.

use crate::entity_world::Surface;
use crate::path::PathProvider;
use natural_physics::{DVec2, DVec3, VectorMath};

/// Speed multiplier while sprinting.
pub const SPRINT_MULTIPLIER: f64 = 1.3;

/// Per-tick walking speed.
pub fn walk_speed(base: f64, sprint: bool, surface: Surface, ignore_terrain: bool) -> f64 {
    let mut speed = base;
    if sprint {
        speed *= SPRINT_MULTIPLIER;
    }
    if !ignore_terrain {
        speed *= surface.speed_modifier();
    }
    speed
}

/// Add a walking step to `motion` without overshooting what it already has.
///
/// Each horizontal axis only receives the step if the motion has not reached
/// it yet in that direction.
pub fn apply_walk(motion: &mut DVec3, direction: DVec2, speed: f64) {
    let step = direction * speed;
    if (step.x > 0.0 && motion.x < step.x) || (step.x < 0.0 && motion.x > step.x) {
        motion.x += step.x;
    }
    if (step.y > 0.0 && motion.z < step.y) || (step.y < 0.0 && motion.z > step.y) {
        motion.z += step.y;
    }
}

fn with_neighbours(position: DVec3) -> [DVec3; 5] {
    [
        position,
        position + DVec3::X,
        position - DVec3::X,
        position + DVec3::Z,
        position - DVec3::Z,
    ]
}

/// Horizontal heading from `position` toward `to`, consulting `provider`.
///
/// Straight line when there is no provider or it reports `to` reachable.
/// Otherwise the first available pair among each end and its four cardinal
/// neighbours picks a waypoint; `None` when no pair is available.
pub fn heading_toward(
    math: &VectorMath,
    provider: Option<&dyn PathProvider>,
    position: DVec3,
    to: DVec3,
) -> Option<DVec2> {
    let towards = |point: DVec3| {
        let dir = math.angle_direction_horizontal(position, point);
        DVec2::new(dir.x, dir.z)
    };

    let Some(provider) = provider else {
        return Some(towards(to));
    };
    if provider.is_reachable(position, to) {
        return Some(towards(to));
    }

    for source in with_neighbours(position) {
        for target in with_neighbours(to) {
            if provider.is_available(source, target) {
                let waypoint = provider.next_step(source.floor(), target.floor());
                return Some(towards(waypoint + DVec3::new(0.5, 0.0, 0.5)));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Column, GridPathProvider};

    #[test]
    fn speed_stacks_sprint_and_terrain() {
        assert!((walk_speed(0.1, true, Surface::Ground, false) - 0.13).abs() < 1e-12);
        assert!((walk_speed(0.1, false, Surface::Water, false) - 0.02).abs() < 1e-12);
        assert!((walk_speed(0.1, false, Surface::Lava, true) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn walk_does_not_overshoot() {
        let mut motion = DVec3::ZERO;
        apply_walk(&mut motion, DVec2::new(1.0, -1.0), 0.1);
        assert_eq!(motion, DVec3::new(0.1, 0.0, -0.1));
        apply_walk(&mut motion, DVec2::new(1.0, -1.0), 0.1);
        assert_eq!(motion, DVec3::new(0.1, 0.0, -0.1));
        apply_walk(&mut motion, DVec2::new(-1.0, 0.0), 0.1);
        assert!((motion.x - 0.0).abs() < 1e-12);
    }

    #[test]
    fn no_provider_goes_straight() {
        let math = VectorMath::default();
        let dir = heading_toward(&math, None, DVec3::ZERO, DVec3::new(0.0, 5.0, 4.0)).unwrap();
        assert!((dir - DVec2::new(0.0, 1.0)).length() < 1e-9);
    }

    #[test]
    fn unreachable_target_routes_around() {
        let math = VectorMath::default();
        let mut grid = GridPathProvider::open_area(Column::new(-3, -3), Column::new(3, 3), 512);
        for z in -3..=2 {
            grid.block(Column::new(1, z));
        }
        // Target column enclosed on every side.
        grid.block(Column::new(2, 3));
        grid.block(Column::new(3, 2));
        let from = DVec3::new(0.5, 64.0, 0.5);
        let to = DVec3::new(3.5, 64.0, 3.5);
        assert!(!grid.is_reachable(from, to));
        let dir = heading_toward(&math, Some(&grid as &dyn PathProvider), from, to).expect("neighbour pair");
        assert!(dir.is_finite());
    }

    #[test]
    fn nothing_available_gives_none() {
        let math = VectorMath::default();
        let grid = GridPathProvider::new(16);
        assert!(heading_toward(&math, Some(&grid as &dyn PathProvider), DVec3::ZERO, DVec3::new(9.0, 0.0, 9.0)).is_none());
    }
}
