//! Fixed-step driver tying bodies, creatures and the index together.

use crate::body::Body;
use crate::creature::Creature;
use crate::damage::DamageEvent;
use crate::entity_world::EntityWorld;
use crate::error::CreatureError;
use crate::event::{SimEvent, TickedEvent};
use crate::profile::CreatureProfile;
use crate::spatial_index::SpatialIndex;
use natural_core::{scoped_rng, EntityId, MobClassification, SimTick, WorldId};
use natural_physics::{DVec3, VectorMath};
use rand::rngs::StdRng;
use rand::RngCore;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// RNG domain used for target selection draws.
const SELECTION_DOMAIN: u64 = 0x5e1e_c7;

/// Everything a creature may touch during its tick.
///
/// The ticking creature itself is taken out of `creatures` for the duration,
/// so lookups there only see the others.
pub struct TickContext<'a> {
    pub world: &'a mut EntityWorld,
    pub creatures: &'a mut BTreeMap<EntityId, Creature>,
    pub index: &'a SpatialIndex,
    pub math: &'a VectorMath,
    pub rng: &'a mut dyn RngCore,
    pub now: SimTick,
    pub events: &'a mut Vec<TickedEvent>,
}

impl TickContext<'_> {
    /// Record an event at the current tick.
    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(TickedEvent {
            tick: self.now,
            event,
        });
    }
}

/// Apply a damage event to its victim.
///
/// Creature victims may cancel it first. Returns the event as finally
/// applied (possibly cancelled).
pub fn deliver_damage(ctx: &mut TickContext<'_>, mut event: DamageEvent) -> DamageEvent {
    let victim = event.victim;
    let Some(body) = ctx.world.resolve(victim) else {
        event.cancel();
        return event;
    };
    if body.player.is_some_and(|player| !player.finite_resources) {
        event.cancel();
        return event;
    }

    if let Some(creature) = ctx.creatures.get_mut(&victim) {
        creature.on_damage(&mut event, ctx.world, ctx.now, ctx.events);
    }
    if event.is_cancelled() {
        return event;
    }

    let killed = match ctx.world.get_mut(victim) {
        Some(body) => body.apply_damage(event.amount),
        None => false,
    };
    ctx.emit(SimEvent::Damaged {
        victim,
        attacker: event.attacker,
        cause: event.cause,
        amount: event.amount,
    });
    if killed {
        debug!(entity = victim.0, killer = ?event.attacker, "died");
        ctx.emit(SimEvent::Died {
            entity: victim,
            killer: event.attacker,
        });
    }
    event
}

/// Owns the world, the index and every creature.
#[derive(Debug)]
pub struct Simulation {
    world: EntityWorld,
    index: SpatialIndex,
    creatures: BTreeMap<EntityId, Creature>,
    math: VectorMath,
    rng: StdRng,
    tick: SimTick,
    events: Vec<TickedEvent>,
}

impl Simulation {
    /// Empty simulation seeded for reproducible selection draws.
    pub fn new(seed: u64, math: VectorMath) -> Self {
        Self::with_rng(scoped_rng(seed, SELECTION_DOMAIN, SimTick::ZERO), math)
    }

    /// Empty simulation with a caller-supplied generator.
    pub fn with_rng(rng: StdRng, math: VectorMath) -> Self {
        Self {
            world: EntityWorld::new(),
            index: SpatialIndex::new(),
            creatures: BTreeMap::new(),
            math,
            rng,
            tick: SimTick::ZERO,
            events: Vec::new(),
        }
    }

    pub fn tick(&self) -> SimTick {
        self.tick
    }

    pub fn world(&self) -> &EntityWorld {
        &self.world
    }

    /// Direct world access for host-side edits (terrain, positions).
    pub fn world_mut(&mut self) -> &mut EntityWorld {
        &mut self.world
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn math(&self) -> &VectorMath {
        &self.math
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    /// Ids of all creatures, ascending.
    pub fn creature_ids(&self) -> Vec<EntityId> {
        self.creatures.keys().copied().collect()
    }

    /// Spawn a classified body and attach creature AI to it.
    pub fn spawn_creature(&mut self, body: Body, mut creature: Creature) -> Result<EntityId, CreatureError> {
        let Some(classification) = body.classification else {
            return Err(CreatureError::NotACreature(body.kind));
        };
        let world = body.world;
        let kind = body.kind.clone();
        let id = self.world.spawn(body);
        creature.attach(id);
        self.index.on_entity_join(world, classification, id, &kind);
        self.creatures.insert(id, creature);
        debug!(entity = id.0, %kind, %world, "creature spawned");
        Ok(id)
    }

    /// Spawn a creature from a template.
    pub fn spawn_profile(
        &mut self,
        profile: &CreatureProfile,
        world: WorldId,
        position: DVec3,
    ) -> Result<EntityId, CreatureError> {
        let body = profile.body_at(world, position)?;
        let creature = profile.build_creature()?;
        self.spawn_creature(body, creature)
    }

    /// Add a player; players are indexed as friendly.
    pub fn join_player(&mut self, body: Body) -> EntityId {
        let world = body.world;
        let kind = body.kind.clone();
        let id = self.world.spawn(body);
        self.index
            .on_entity_join(world, MobClassification::Friendly, id, &kind);
        debug!(entity = id.0, %world, "player joined");
        id
    }

    /// Add a body without AI and without indexing (items, projectiles).
    pub fn spawn_body(&mut self, body: Body) -> EntityId {
        self.world.spawn(body)
    }

    /// Remove any entity. Creatures have their hooks fired first.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if let Some(mut creature) = self.creatures.remove(&id) {
            creature.dispose();
        }
        self.index.on_entity_leave(id);
        let removed = self.world.remove(id).is_some();
        if removed {
            debug!(entity = id.0, "despawned");
        }
        removed
    }

    /// Move an entity, keeping the index in step with world changes.
    pub fn teleport(&mut self, id: EntityId, world: WorldId, position: DVec3) -> bool {
        let Some(previous) = self.world.teleport(id, world, position) else {
            return false;
        };
        self.index.on_entity_teleport(previous, world, id);
        debug!(entity = id.0, from = %previous, to = %world, "teleported");
        true
    }

    /// Change a creature's classification and re-index it.
    pub fn set_classification(&mut self, id: EntityId, classification: MobClassification) -> Result<(), CreatureError> {
        if !self.creatures.contains_key(&id) {
            return Err(CreatureError::UnknownEntity(id));
        }
        let body = self.world.get_mut(id).ok_or(CreatureError::UnknownEntity(id))?;
        body.classification = Some(classification);
        let (world, kind) = (body.world, body.kind.clone());
        self.index.on_entity_join(world, classification, id, &kind);
        Ok(())
    }

    /// Apply host-originated damage (e.g. a player hitting a creature).
    pub fn deliver_damage(&mut self, event: DamageEvent) -> DamageEvent {
        self.with_context(|ctx| deliver_damage(ctx, event))
    }

    /// Run `f` with a context over the whole simulation.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let mut ctx = TickContext {
            world: &mut self.world,
            creatures: &mut self.creatures,
            index: &self.index,
            math: &self.math,
            rng: &mut self.rng,
            now: self.tick,
            events: &mut self.events,
        };
        f(&mut ctx)
    }

    /// Advance one tick: every creature thinks, then bodies move.
    pub fn step(&mut self) {
        self.tick = self.tick.advance(1);
        let ids = self.creature_ids();
        trace!(tick = self.tick.0, creatures = ids.len(), "step");

        for id in ids {
            let Some(mut creature) = self.creatures.remove(&id) else {
                continue;
            };
            self.with_context(|ctx| creature.tick(ctx, 1));
            self.creatures.insert(id, creature);
        }

        self.world.integrate();
        self.reap_dead();
    }

    /// Advance `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Take all events recorded so far.
    pub fn drain_events(&mut self) -> Vec<TickedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every entity and forget the index.
    pub fn shutdown(&mut self) {
        let ids: Vec<EntityId> = self.world.iter().map(|body| body.id).collect();
        for id in ids {
            self.despawn(id);
        }
        self.index.clear();
    }

    // Dead non-player bodies leave the world; dead players stay until the
    // host respawns or removes them.
    fn reap_dead(&mut self) {
        let dead: Vec<EntityId> = self
            .world
            .iter()
            .filter(|body| !body.alive && !body.is_player())
            .map(|body| body.id)
            .collect();
        for id in dead {
            self.despawn(id);
        }
    }
}
