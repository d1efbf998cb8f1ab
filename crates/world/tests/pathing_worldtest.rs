//! Pathing worldtest: melee creatures steering through a grid path provider.

use natural_core::EntityId;
use natural_physics::DVec3;
use natural_testkit::Arena;
use natural_world::{Column, GridPathProvider, PathProvider};
use std::sync::Arc;

/// Open field with the player's column walled off and a post right in front
/// of the zombie, so the only routes go around the north or south side.
fn walled_field() -> GridPathProvider {
    let mut grid = GridPathProvider::open_area(Column::new(-2, -3), Column::new(8, 3), 512);
    grid.block(Column::new(1, 0));
    grid.block(Column::new(6, 0));
    grid
}

/// Zombie at (0.5, 0.5) already hunting a player at (6.5, 0.5), after one tick.
fn chase_one_tick(provider: Option<GridPathProvider>) -> (Arena, EntityId) {
    let mut arena = Arena::new(41);
    let player = arena.player("alex", 6.5, 0.5);
    let zombie = arena.zombie(0.5, 0.5).unwrap();
    let brain = arena.sim.creature_mut(zombie).unwrap().brain_mut();
    if let Some(grid) = provider {
        brain.set_path_provider(Some(Arc::new(grid) as Arc<dyn PathProvider>));
    }
    brain.aggro.engage(player, 400);

    arena.run(1);
    (arena, zombie)
}

#[test]
fn without_provider_heads_straight_at_the_target() {
    let (arena, zombie) = chase_one_tick(None);
    let body = arena.sim.world().get(zombie).unwrap();
    assert!(body.position.x > 0.5, "x = {}", body.position.x);
    assert!((body.position.z - 0.5).abs() < 1e-9);
    // Aim goes straight at the target's body, which is due +x.
    assert!((body.yaw - 270.0).abs() < 1e-6, "yaw = {}", body.yaw);
}

#[test]
fn unreachable_target_is_approached_through_the_first_waypoint() {
    let grid = walled_field();
    let from = DVec3::new(0.5, 64.5, 0.5);
    assert!(!grid.is_reachable(from, DVec3::new(6.5, 64.5, 0.5)));
    assert_eq!(grid.first_step(Column::new(0, 0), Column::new(7, 0)), Some(Column::new(0, -1)));

    let (arena, zombie) = chase_one_tick(Some(grid));
    let body = arena.sim.world().get(zombie).unwrap();
    assert!(body.position.z < 0.5, "should step north first, z = {}", body.position.z);
    assert!((body.position.x - 0.5).abs() < 1e-9, "x = {}", body.position.x);
    // Facing follows the waypoint heading, not the target.
    assert!((body.yaw - 180.0).abs() < 1e-6, "yaw = {}", body.yaw);
    assert_eq!(body.pitch, 0.0);
}

#[test]
fn reachable_target_keeps_the_straight_line() {
    let mut grid = walled_field();
    grid.open(Column::new(6, 0));
    let (arena, zombie) = chase_one_tick(Some(grid));
    let body = arena.sim.world().get(zombie).unwrap();
    assert!(body.position.x > 0.5);
    assert!((body.position.z - 0.5).abs() < 1e-9);
    assert!((body.yaw - 270.0).abs() < 1e-6, "yaw = {}", body.yaw);
}
