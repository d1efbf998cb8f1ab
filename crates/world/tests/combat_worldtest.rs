//! Combat worldtest: melee reach and cooldown, ranged launches, defenders,
//! deaths and cleanup.

use natural_core::{EntityId, MobClassification, SimTick};
use natural_testkit::Arena;
use natural_world::{
    CreatureProfile, DamageCause, DamageEvent, SimEvent, TickedEvent, ATTACK_HIT_BONUS,
    DEFAULT_ATTACK_COOLDOWN,
};
use std::cell::Cell;
use std::rc::Rc;

fn swing_ticks(events: &[TickedEvent], attacker: EntityId) -> Vec<u64> {
    events
        .iter()
        .filter(|e| matches!(e.event, SimEvent::AttackSwing { attacker: a, .. } if a == attacker))
        .map(|e| e.tick.0)
        .collect()
}

fn launch_ticks(events: &[TickedEvent], owner: EntityId) -> Vec<u64> {
    events
        .iter()
        .filter(|e| matches!(&e.event, SimEvent::ProjectileLaunched(req) if req.owner == owner))
        .map(|e| e.tick.0)
        .collect()
}

#[test]
fn melee_swing_in_reach_damages_and_cools_down() {
    let mut arena = Arena::new(21);
    let player = arena.player("alex", 1.5, 0.0);
    let zombie = arena.zombie(0.0, 0.0).unwrap();

    let events = arena.run(61);
    assert_eq!(swing_ticks(&events, zombie), vec![61]);
    assert!(events.iter().any(|e| e.event
        == SimEvent::Damaged {
            victim: player,
            attacker: Some(zombie),
            cause: DamageCause::EntityAttack,
            amount: 3.0,
        }));
    assert_eq!(arena.sim.world().get(player).unwrap().health, 17.0);

    let aggro = &arena.sim.creature(zombie).unwrap().brain().aggro;
    assert_eq!(aggro.interest(), 400 + ATTACK_HIT_BONUS);
    assert_eq!(aggro.post_attack_cooldown(), DEFAULT_ATTACK_COOLDOWN);

    let events = arena.run(10);
    assert_eq!(swing_ticks(&events, zombie), vec![71]);
    assert_eq!(arena.sim.world().get(player).unwrap().health, 14.0);
}

#[test]
fn additional_cooldown_extends_the_gap() {
    let mut arena = Arena::new(22);
    arena.player("alex", 1.5, 0.0);
    let mut profile = CreatureProfile::zombie();
    profile.additional_attack_cooldown = 5.0;
    let zombie = arena.creature(&profile, 0.0, 0.0).unwrap();

    let events = arena.run(80);
    assert_eq!(swing_ticks(&events, zombie), vec![61, 76]);
}

#[test]
fn out_of_reach_target_is_chased_not_hit() {
    let mut arena = Arena::new(23);
    let player = arena.player("alex", 6.0, 0.0);
    let zombie = arena.zombie(0.0, 0.0).unwrap();

    let events = arena.run(61);
    assert!(swing_ticks(&events, zombie).is_empty());
    assert_eq!(arena.target_of(zombie), Some(player));
    arena.run(5);
    let x = arena.sim.world().get(zombie).unwrap().position.x;
    assert!(x > 0.5, "zombie should close in, x = {x}");
}

#[test]
fn skeleton_launches_on_its_cooldown() {
    let mut arena = Arena::new(24);
    let player = arena.player("alex", 8.0, 0.0);
    let skeleton = arena.skeleton(0.0, 0.0).unwrap();

    let events = arena.run(120);
    assert_eq!(launch_ticks(&events, skeleton), vec![61, 101]);
    let request = events
        .iter()
        .find_map(|e| match &e.event {
            SimEvent::ProjectileLaunched(req) => Some(req.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(request.target, player);
    assert_eq!(request.damage, 2.0);
    assert!(request.critical);
    assert!(request.velocity.is_finite());
    assert!(request.velocity.x > 0.0);
    assert!(swing_ticks(&events, skeleton).is_empty());
    // Launches never hurt anyone by themselves.
    assert_eq!(arena.sim.world().get(player).unwrap().health, 20.0);
}

#[test]
fn skeleton_backs_off_when_crowded() {
    let mut arena = Arena::new(25);
    arena.player("alex", 3.0, 0.0);
    let skeleton = arena.skeleton(0.0, 0.0).unwrap();

    let events = arena.run(61);
    assert_eq!(launch_ticks(&events, skeleton), vec![61]);
    let x = arena.sim.world().get(skeleton).unwrap().position.x;
    assert!(x < 0.0, "skeleton should retreat, x = {x}");
}

#[test]
fn golem_defends_against_hostiles() {
    let mut arena = Arena::new(26);
    let golem = arena.golem(0.0, 0.0).unwrap();
    let mut passive = CreatureProfile::zombie();
    passive.select_target.enabled = false;
    passive.fight.enabled = false;
    let zombie = arena.creature(&passive, 5.0, 0.0).unwrap();

    let disposed = Rc::new(Cell::new(None));
    let seen = Rc::clone(&disposed);
    arena
        .sim
        .creature_mut(zombie)
        .unwrap()
        .on_dispose(move |id| seen.set(Some(id)));

    arena.run(61);
    assert_eq!(arena.target_of(golem), Some(zombie));

    let events = arena.run(300);
    assert!(events.iter().any(|e| e.event
        == SimEvent::Died {
            entity: zombie,
            killer: Some(golem)
        }));
    assert!(arena.sim.creature(zombie).is_none());
    assert!(arena.sim.world().get(zombie).is_none());
    assert_eq!(arena.sim.index().world_of(zombie), None);
    assert_eq!(disposed.get(), Some(zombie));
    assert_eq!(arena.target_of(golem), None);
}

#[test]
fn killed_creature_is_reaped_at_end_of_step() {
    let mut arena = Arena::new(27);
    let player = arena.player("alex", 10.0, 0.0);
    let zombie = arena.zombie(0.0, 0.0).unwrap();

    let event = arena.sim.deliver_damage(DamageEvent::by_entity(
        player,
        zombie,
        DamageCause::EntityAttack,
        50.0,
    ));
    assert!(!event.is_cancelled());
    let events = arena.sim.drain_events();
    assert!(events.contains(&TickedEvent {
        tick: SimTick::ZERO,
        event: SimEvent::Died {
            entity: zombie,
            killer: Some(player)
        }
    }));
    assert!(arena.sim.world().get(zombie).is_some());

    arena.run(1);
    assert!(arena.sim.world().get(zombie).is_none());
    assert!(arena
        .sim
        .index()
        .entities_by_classification(arena.world(), MobClassification::Hostile)
        .next()
        .is_none());
}

#[test]
fn creative_players_take_no_damage() {
    let mut arena = Arena::new(28);
    let player = arena.player("alex", 1.5, 0.0);
    if let Some(state) = arena.sim.world_mut().get_mut(player).unwrap().player.as_mut() {
        state.finite_resources = false;
    }
    let zombie = arena.zombie(0.0, 0.0).unwrap();

    let event = arena.sim.deliver_damage(DamageEvent::by_entity(
        zombie,
        player,
        DamageCause::EntityAttack,
        5.0,
    ));
    assert!(event.is_cancelled());
    assert_eq!(arena.sim.world().get(player).unwrap().health, 20.0);
}
