//! Crowd worldtest: repulsion between overlapping creatures, index upkeep
//! across worlds, and run-to-run determinism.

use natural_core::{MobClassification, WorldId};
use natural_physics::{DVec3, MathBackend};
use natural_testkit::{assert_same_trace, Arena, RunMetrics};
use natural_world::{CreatureProfile, RepulsionMode, SelectorPreset, TickedEvent};

fn still_zombie() -> CreatureProfile {
    let mut profile = CreatureProfile::zombie();
    profile.select_target.enabled = false;
    profile.fight.enabled = false;
    profile
}

fn cow() -> CreatureProfile {
    CreatureProfile {
        kind: "cow".to_string(),
        classification: MobClassification::Neutral,
        selector: SelectorPreset::Neutral,
        ..still_zombie()
    }
}

#[test]
fn nearly_coincident_creatures_push_apart_finitely() {
    let mut arena = Arena::new(31);
    let a = arena.creature(&still_zombie(), 0.0, 0.0).unwrap();
    let b = arena.creature(&still_zombie(), 0.005, 0.0).unwrap();

    arena.run(1);
    let xa = arena.sim.world().get(a).unwrap().position.x;
    let xb = arena.sim.world().get(b).unwrap().position.x;
    assert!(xa.is_finite() && xb.is_finite());
    // Offset 0.005 is treated as distance 0.01, so each gets a 0.05 push.
    assert!((xa + 0.05).abs() < 1e-9, "xa = {xa}");
    assert!((xb - 0.055).abs() < 1e-9, "xb = {xb}");

    arena.run(20);
    let gap = arena.sim.world().get(b).unwrap().position.x - arena.sim.world().get(a).unwrap().position.x;
    assert!(gap > 0.5, "creatures should separate, gap = {gap}");
}

#[test]
fn repulsion_can_be_disabled_per_creature() {
    let mut arena = Arena::new(32);
    let mut anchored = still_zombie();
    anchored.movement.repulsion_enabled = false;
    let a = arena.creature(&anchored, 0.0, 0.0).unwrap();
    let b = arena.creature(&still_zombie(), 0.2, 0.0).unwrap();

    arena.run(1);
    assert_eq!(arena.sim.world().get(a).unwrap().position, Arena::at(0.0, 0.0));
    assert!(arena.sim.world().get(b).unwrap().position.x > 0.2);
}

#[test]
fn accumulate_mode_sums_all_contacts() {
    let mut arena = Arena::new(33);
    let mut middle = still_zombie();
    middle.movement.repulsion_mode = RepulsionMode::Accumulate;
    let centre = arena.creature(&middle, 0.0, 0.0).unwrap();
    arena.creature(&still_zombie(), 0.0, 0.3).unwrap();
    arena.creature(&still_zombie(), 0.0, -0.3).unwrap();

    arena.run(1);
    // Opposite pushes cancel out.
    let z = arena.sim.world().get(centre).unwrap().position.z;
    assert!(z.abs() < 1e-9, "z = {z}");
}

#[test]
fn teleport_moves_index_membership() {
    let mut arena = Arena::new(34);
    let zombie = arena.creature(&still_zombie(), 0.0, 0.0).unwrap();
    let nether = WorldId(1);
    assert!(arena.sim.teleport(zombie, nether, DVec3::new(0.0, 40.0, 0.0)));

    let index = arena.sim.index();
    assert_eq!(index.world_of(zombie), Some(nether));
    assert_eq!(
        index
            .entities_by_classification(nether, MobClassification::Hostile)
            .collect::<Vec<_>>(),
        vec![zombie]
    );
    assert!(index
        .entities_by_classification(WorldId::DEFAULT, MobClassification::Hostile)
        .next()
        .is_none());
}

#[test]
fn creatures_never_target_across_worlds() {
    let mut arena = Arena::new(35);
    let player = arena.player("alex", 2.0, 0.0);
    let zombie = arena.zombie(0.0, 0.0).unwrap();
    arena.sim.teleport(player, WorldId(1), Arena::at(2.0, 0.0));

    arena.run(200);
    assert_eq!(arena.target_of(zombie), None);
}

#[test]
fn reclassified_creature_is_reindexed() {
    let mut arena = Arena::new(36);
    let zombie = arena.creature(&still_zombie(), 0.0, 0.0).unwrap();
    arena
        .sim
        .set_classification(zombie, MobClassification::Neutral)
        .unwrap();
    let index = arena.sim.index();
    assert!(index
        .entities_by_classification(WorldId::DEFAULT, MobClassification::Hostile)
        .next()
        .is_none());
    assert_eq!(
        index
            .entities_by_classification(WorldId::DEFAULT, MobClassification::Neutral)
            .collect::<Vec<_>>(),
        vec![zombie]
    );
}

fn crowded_run(seed: u64, backend: MathBackend) -> (Vec<TickedEvent>, Vec<DVec3>) {
    let mut arena = Arena::with_backend(seed, backend);
    arena.player("alex", 4.0, 4.0);
    arena.player("sam", -6.0, 2.0);
    for x in [-3.0, 0.0, 3.0] {
        arena.zombie(x, -4.0).unwrap();
    }
    arena.skeleton(8.0, -8.0).unwrap();
    arena.golem(0.0, 8.0).unwrap();
    for z in [-2.0, 0.0, 2.0] {
        arena.creature(&cow(), 10.0, z).unwrap();
    }

    let events = arena.run(400);
    let positions = arena.sim.world().iter().map(|body| body.position).collect();
    (events, positions)
}

#[test]
fn same_seed_same_trace() {
    for backend in [MathBackend::Portable, MathBackend::Lookup] {
        let (first, first_positions) = crowded_run(7, backend);
        let (second, second_positions) = crowded_run(7, backend);
        assert!(!first.is_empty());
        assert_same_trace(&first, &second).unwrap();
        assert_eq!(first_positions, second_positions);

        let mut metrics = RunMetrics::new("crowd", 7, format!("{backend:?}"));
        metrics.record_all(&first);
        assert!(metrics.events.targets_acquired > 0);
    }
}
