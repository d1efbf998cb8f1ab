//! Weighted target selection worldtest.
//!
//! Draws many selections from a fixed scene and checks the kind frequencies
//! against the declared weights with a chi-square test at p = 0.001.

use natural_core::{EntityId, EntityKind, MobClassification, WorldId};
use natural_physics::DVec3;
use natural_testkit::{chi_square, chi_square_critical, seeded_rng};
use natural_world::{Body, EntityWorld, SelectionQuery, SpatialIndex, TargetSelector};
use std::collections::BTreeMap;

const DRAWS: usize = 20_000;

fn kind(key: &str) -> EntityKind {
    EntityKind::parse(key).unwrap()
}

fn mob(world: &mut EntityWorld, key: &str, class: MobClassification, x: f64) -> EntityId {
    world.spawn(Body::living(kind(key), DVec3::new(x, 64.0, 0.0)).with_classification(class))
}

fn tally(selector: &TargetSelector, world: &EntityWorld, requester: EntityId) -> BTreeMap<String, u64> {
    let index = SpatialIndex::new();
    let mut rng = seeded_rng(0xD1CE);
    let requester = world.get(requester).unwrap();
    let query = SelectionQuery {
        requester,
        targeting_range: 32.0,
        select_invisible: false,
    };
    let mut counts = BTreeMap::new();
    for _ in 0..DRAWS {
        let id = selector
            .select(&query, world, &index, &mut rng)
            .expect("scene always has a weighted candidate");
        let picked = world.get(id).unwrap();
        *counts.entry(picked.kind.path().to_string()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn player_and_neutral_follow_declared_weights() {
    let mut world = EntityWorld::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    world.spawn(Body::player("alex", DVec3::new(3.0, 64.0, 0.0)));
    mob(&mut world, "cow", MobClassification::Neutral, -3.0);

    let counts = tally(&TargetSelector::hostile(true), &world, zombie);
    let observed = [counts["player"], counts["cow"]];
    let statistic = chi_square(&observed, &[100.0, 40.0]);
    assert!(
        statistic < chi_square_critical(2).unwrap(),
        "player/cow split {:?} does not fit 100:40 (chi2 = {statistic:.2})",
        observed
    );

    let share = observed[0] as f64 / DRAWS as f64;
    assert!((share - 100.0 / 140.0).abs() < 0.02, "player share {share}");
}

#[test]
fn player_against_hostile_group_weight() {
    let mut world = EntityWorld::new();
    let golem = mob(&mut world, "iron_golem", MobClassification::Friendly, 0.0);
    world.spawn(Body::player("alex", DVec3::new(3.0, 64.0, 0.0)));
    mob(&mut world, "zombie", MobClassification::Hostile, -3.0);

    let mut selector = TargetSelector::new();
    selector
        .set_entity_weight(EntityKind::player(), 100, false)
        .unwrap();
    selector.set_group_weight(MobClassification::Hostile, 40);

    let counts = tally(&selector, &world, golem);
    let observed = [counts["player"], counts["zombie"]];
    assert!(
        chi_square(&observed, &[100.0, 40.0]) < chi_square_critical(2).unwrap(),
        "player/zombie split {observed:?} does not fit 100:40"
    );
    let share = observed[0] as f64 / DRAWS as f64;
    assert!((share - 100.0 / 140.0).abs() < 0.02, "player share {share}");
}

#[test]
fn group_weight_is_per_kind_not_per_member() {
    let mut world = EntityWorld::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    world.spawn(Body::player("alex", DVec3::new(3.0, 64.0, 0.0)));
    for x in [-2.0, -4.0, -6.0] {
        mob(&mut world, "cow", MobClassification::Neutral, x);
    }

    let counts = tally(&TargetSelector::hostile(true), &world, zombie);
    let observed = [counts["player"], counts["cow"]];
    assert!(
        chi_square(&observed, &[100.0, 40.0]) < chi_square_critical(2).unwrap(),
        "three cows should still weigh 40 together: {observed:?}"
    );
}

#[test]
fn three_kinds_fit_weights() {
    let mut world = EntityWorld::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    world.spawn(Body::player("alex", DVec3::new(3.0, 64.0, 0.0)));
    mob(&mut world, "iron_golem", MobClassification::Friendly, 0.0 + 6.0);
    mob(&mut world, "cow", MobClassification::Neutral, -3.0);

    let counts = tally(&TargetSelector::hostile(true), &world, zombie);
    let observed = [counts["player"], counts["iron_golem"], counts["cow"]];
    assert!(
        chi_square(&observed, &[100.0, 100.0, 40.0]) < chi_square_critical(3).unwrap(),
        "{observed:?}"
    );
}

#[test]
fn nothing_weighted_selects_nothing() {
    let mut world = EntityWorld::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    mob(&mut world, "skeleton", MobClassification::Hostile, 2.0);
    let index = SpatialIndex::new();
    let mut rng = seeded_rng(1);
    let query = SelectionQuery {
        requester: world.get(zombie).unwrap(),
        targeting_range: 32.0,
        select_invisible: false,
    };

    // Hostile presets ignore other hostiles.
    assert_eq!(
        TargetSelector::hostile(true).select(&query, &world, &index, &mut rng),
        None
    );
    assert_eq!(
        TargetSelector::neutral().select(&query, &world, &index, &mut rng),
        None
    );
}

#[test]
fn out_of_range_and_invisible_candidates_are_skipped() {
    let mut world = EntityWorld::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    world.spawn(Body::player("far", DVec3::new(40.0, 64.0, 0.0)));
    world.spawn(Body::player("hidden", DVec3::new(2.0, 64.0, 0.0)).invisible());
    let index = SpatialIndex::new();
    let mut rng = seeded_rng(2);
    let selector = TargetSelector::hostile(true);

    let query = SelectionQuery {
        requester: world.get(zombie).unwrap(),
        targeting_range: 32.0,
        select_invisible: false,
    };
    assert_eq!(selector.select(&query, &world, &index, &mut rng), None);

    let seeing = SelectionQuery {
        select_invisible: true,
        ..query
    };
    let picked = selector.select(&seeing, &world, &index, &mut rng).unwrap();
    assert_eq!(world.get(picked).unwrap().name, "hidden");
}

#[test]
fn friendly_only_selector_reads_the_index_and_keeps_range() {
    let mut world = EntityWorld::new();
    let mut index = SpatialIndex::new();
    let zombie = mob(&mut world, "zombie", MobClassification::Hostile, 0.0);
    let near = mob(&mut world, "iron_golem", MobClassification::Friendly, 4.0);
    let far = mob(&mut world, "iron_golem", MobClassification::Friendly, 40.0);
    // Friendly and in range, but never registered with the index.
    let stray = mob(&mut world, "villager", MobClassification::Friendly, -4.0);
    index.on_entity_join(WorldId::DEFAULT, MobClassification::Hostile, zombie, &kind("zombie"));
    for golem in [near, far] {
        index.on_entity_join(WorldId::DEFAULT, MobClassification::Friendly, golem, &kind("iron_golem"));
    }

    let mut selector = TargetSelector::new();
    selector.set_group_weight(MobClassification::Friendly, 100);
    assert!(selector.uses_indexed_lookup());

    let query = SelectionQuery {
        requester: world.get(zombie).unwrap(),
        targeting_range: 32.0,
        select_invisible: false,
    };
    assert_eq!(selector.candidates(&query, &world, &index), vec![near]);
    let mut rng = seeded_rng(3);
    for _ in 0..200 {
        assert_eq!(selector.select(&query, &world, &index, &mut rng), Some(near));
    }

    // Weighting another classification falls back to the box scan, which
    // sees the unindexed villager but still not the distant golem.
    selector.set_group_weight(MobClassification::Neutral, 1);
    assert!(!selector.uses_indexed_lookup());
    assert_eq!(selector.candidates(&query, &world, &index), vec![near, stray]);
}
