//! Natural creatures: AI state attached to a body in the world.
//!
//! A [`Creature`] is split into a [`Brain`] (aggro, selector, options and
//! movement), a [`BehaviorStyle`] deciding how to fight, and an
//! [`AggroPolicy`] answering who may anger it. Styles receive the brain by
//! `&mut` so the two never alias.

use crate::aggro::{AggroState, ATTACK_HIT_BONUS};
use crate::body::Body;
use crate::damage::{DamageCause, DamageEvent, PlayerDamageRecord};
use crate::entity_world::EntityWorld;
use crate::error::CreatureError;
use crate::event::{SimEvent, TickedEvent};
use crate::modifier::ModifiableValue;
use crate::movement::{apply_walk, heading_toward, walk_speed};
use crate::options::{FightOptions, MovementOptions, SelectTargetOptions};
use crate::path::PathProvider;
use crate::repulsion;
use crate::selector::{SelectionQuery, TargetSelector};
use crate::sim::{deliver_damage, TickContext};
use crate::style::{BehaviorStyle, MeleeStyle, RangedStyle};
use natural_core::{EntityId, SimTick};
use natural_physics::{DVec2, DVec3, VectorMath};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace_span};

/// Default melee reach from eye to eye.
pub const DEFAULT_ATTACK_RANGE: f64 = 2.0;
/// Default edge of the target search cube.
pub const DEFAULT_TARGETING_RANGE: f64 = 32.0;

/// Who may anger a creature and how long it keeps a target.
pub trait AggroPolicy: fmt::Debug {
    /// Whether a hit from `attacker` may change the target.
    fn can_anger_from(&self, _me: &Body, _attacker: &Body) -> bool {
        true
    }

    /// Checked every tick while engaged; false drops the target.
    fn can_continue_targeting(&self, me: &Body, target: &Body) -> bool {
        can_keep_target(me, target)
    }
}

/// Default continuation check: the target must be living, must not share the
/// creature's name, and a player target must be in survival and not
/// spectating.
pub fn can_keep_target(me: &Body, target: &Body) -> bool {
    if !target.living || target.name == me.name {
        return false;
    }
    target
        .player
        .map_or(true, |player| player.finite_resources && !player.spectator)
}

/// Policy with the default answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAggroPolicy;

impl AggroPolicy for DefaultAggroPolicy {}

/// Item keys in each hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldItems {
    pub main_hand: Option<String>,
    pub off_hand: Option<String>,
}

/// Per-creature state shared by every behavior style.
#[derive(Debug)]
pub struct Brain {
    id: EntityId,
    /// Target and interest.
    pub aggro: AggroState,
    /// Weight tables.
    pub selector: TargetSelector,
    /// Movement switches.
    pub movement: MovementOptions,
    /// Selection switches.
    pub select_target: SelectTargetOptions,
    /// Fight switches.
    pub fight: FightOptions,
    /// Edge of the target search cube.
    pub targeting_range: f64,
    /// Extra ticks added after each attack.
    pub additional_cooldown: ModifiableValue,
    attack_range: f64,
    path_provider: Option<Arc<dyn PathProvider>>,
    immobile: bool,
    queued_repulsion: Option<DVec3>,
    held: HeldItems,
    held_changed: bool,
}

impl Brain {
    pub fn new(selector: TargetSelector) -> Self {
        Self {
            id: EntityId(0),
            aggro: AggroState::new(),
            selector,
            movement: MovementOptions::default(),
            select_target: SelectTargetOptions::default(),
            fight: FightOptions::default(),
            targeting_range: DEFAULT_TARGETING_RANGE,
            additional_cooldown: ModifiableValue::default(),
            attack_range: DEFAULT_ATTACK_RANGE,
            path_provider: None,
            immobile: false,
            queued_repulsion: None,
            held: HeldItems::default(),
            held_changed: false,
        }
    }

    /// Body this brain drives.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn attack_range(&self) -> f64 {
        self.attack_range
    }

    /// Set the reach; negative or NaN ranges are rejected.
    pub fn set_attack_range(&mut self, range: f64) -> Result<(), CreatureError> {
        if range.is_nan() || range < 0.0 {
            return Err(CreatureError::NegativeAttackRange(range));
        }
        self.attack_range = range;
        Ok(())
    }

    pub fn path_provider(&self) -> Option<&dyn PathProvider> {
        self.path_provider.as_deref()
    }

    pub fn set_path_provider(&mut self, provider: Option<Arc<dyn PathProvider>>) {
        self.path_provider = provider;
    }

    pub fn is_immobile(&self) -> bool {
        self.immobile
    }

    /// Frozen creatures keep thinking but never move.
    pub fn set_immobile(&mut self, immobile: bool) {
        self.immobile = immobile;
    }

    /// Push queued for the end of this tick.
    pub fn queued_repulsion(&self) -> Option<DVec3> {
        self.queued_repulsion
    }

    /// Queue a push unless one is already queued this tick.
    pub fn queue_repulsion(&mut self, push: DVec3) -> bool {
        if self.queued_repulsion.is_some() {
            return false;
        }
        self.queued_repulsion = Some(push);
        true
    }

    pub fn held_items(&self) -> &HeldItems {
        &self.held
    }

    pub fn set_item_in_hand(&mut self, item: Option<String>) {
        self.held.main_hand = item;
        self.held_changed = true;
    }

    pub fn set_item_in_offhand(&mut self, item: Option<String>) {
        self.held.off_hand = item;
        self.held_changed = true;
    }

    /// Target if it still resolves; a dead or removed one is cleared.
    pub fn current_target(&mut self, world: &EntityWorld) -> Option<EntityId> {
        self.aggro.resolve_target(world)
    }

    /// Whether walking is currently possible for `body`.
    pub fn can_walk(&self, body: &Body) -> bool {
        self.movement.walk_enabled
            && !self.immobile
            && (body.on_ground || self.movement.walk_in_air)
    }

    /// Push the body along a planar direction. Returns false if walking is
    /// not possible right now.
    pub fn walk(&self, world: &mut EntityWorld, direction: DVec2, sprint: bool) -> bool {
        let Some(body) = world.resolve(self.id) else {
            return false;
        };
        if !self.can_walk(body) {
            return false;
        }
        let surface = world.surface_at(body.world, body.position);
        let speed = walk_speed(
            body.movement_speed,
            sprint,
            surface,
            self.movement.ignore_terrain_modifiers,
        );
        match world.get_mut(self.id) {
            Some(body) => {
                apply_walk(&mut body.motion, direction, speed);
                true
            }
            None => false,
        }
    }

    /// Walk along the current yaw.
    pub fn walk_forward(&self, world: &mut EntityWorld, math: &VectorMath, sprint: bool) -> bool {
        let Some(yaw) = world.get(self.id).map(|body| body.yaw) else {
            return false;
        };
        self.walk(world, math.direction_2d(yaw), sprint)
    }

    /// Back away against the current yaw.
    pub fn walk_backward(&self, world: &mut EntityWorld, math: &VectorMath) -> bool {
        let Some(yaw) = world.get(self.id).map(|body| body.yaw) else {
            return false;
        };
        self.walk(world, -math.direction_2d(yaw), false)
    }

    /// Walk toward `to`, routing through the path provider when one is set.
    /// Returns the heading used, or `None` if no route was available.
    pub fn walk_to(
        &self,
        world: &mut EntityWorld,
        math: &VectorMath,
        to: DVec3,
        sprint: bool,
    ) -> Option<DVec2> {
        let position = world.get(self.id)?.position + DVec3::new(0.0, 0.5, 0.0);
        let heading = heading_toward(math, self.path_provider(), position, to)?;
        self.walk(world, heading, sprint);
        Some(heading)
    }

    pub fn set_rotation(&self, world: &mut EntityWorld, yaw: f64, pitch: f64) {
        if let Some(body) = world.get_mut(self.id) {
            body.yaw = yaw;
            body.pitch = pitch;
        }
    }

    /// Turn the eyes toward a point.
    pub fn look_at(&self, world: &mut EntityWorld, math: &VectorMath, point: DVec3) {
        let Some(eye) = world.get(self.id).map(Body::eye_pos) else {
            return;
        };
        let angle = math.angle(eye, point);
        self.set_rotation(world, angle.yaw, angle.pitch);
    }

    /// Run one selection attempt if the interval has elapsed while idle.
    pub fn try_select_target(&mut self, ctx: &mut TickContext<'_>) -> Option<EntityId> {
        let interval = self.select_target.interval_ticks;
        if !self.select_target.enabled
            || self.select_target.initial_interest <= 0
            || self.aggro.is_engaged()
            || !self.aggro.select_due(interval)
        {
            return None;
        }
        let requester = ctx.world.resolve(self.id)?;
        let query = SelectionQuery {
            requester,
            targeting_range: self.targeting_range,
            select_invisible: self.select_target.select_invisible,
        };
        let chosen = self.selector.select(&query, ctx.world, ctx.index, &mut *ctx.rng);
        self.aggro.finish_select_cycle(interval);

        let target = chosen?;
        let interest = self.select_target.initial_interest;
        self.aggro.engage(target, interest);
        debug!(creature = self.id.0, target = target.0, interest, "target acquired");
        ctx.emit(SimEvent::TargetAcquired {
            creature: self.id,
            target,
            interest,
        });
        Some(target)
    }

    /// Melee swing at `target`.
    ///
    /// Fails without side effects if the target is gone, the creature is
    /// cooling down, or the eyes are farther apart than the attack range.
    pub fn try_attack_entity(&mut self, ctx: &mut TickContext<'_>, target: EntityId) -> bool {
        let Some(victim) = ctx.world.resolve(target) else {
            return false;
        };
        if self.aggro.is_cooling_down() {
            return false;
        }
        let Some(me) = ctx.world.resolve(self.id) else {
            return false;
        };
        let reach = self.attack_range;
        if me.eye_pos().distance_squared(victim.eye_pos()) > reach * reach {
            return false;
        }
        let damage = me.attack_damage;

        ctx.emit(SimEvent::AttackSwing {
            attacker: self.id,
            target,
        });
        let event = deliver_damage(
            ctx,
            DamageEvent::by_entity(self.id, target, DamageCause::EntityAttack, damage),
        );
        if !event.is_cancelled() {
            self.aggro.add_interest(ATTACK_HIT_BONUS);
        }
        self.aggro
            .set_post_attack_cooldown(event.attack_cooldown + self.additional_cooldown.floored());
        true
    }
}

/// A natural creature.
pub struct Creature {
    brain: Brain,
    style: Box<dyn BehaviorStyle>,
    policy: Box<dyn AggroPolicy>,
    dispose_hooks: Vec<Box<dyn FnOnce(EntityId)>>,
}

impl fmt::Debug for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creature")
            .field("brain", &self.brain)
            .field("style", &self.style)
            .field("policy", &self.policy)
            .field("dispose_hooks", &self.dispose_hooks.len())
            .finish()
    }
}

impl Creature {
    pub fn new(selector: TargetSelector, style: Box<dyn BehaviorStyle>) -> Self {
        Self {
            brain: Brain::new(selector),
            style,
            policy: Box::new(DefaultAggroPolicy),
            dispose_hooks: Vec::new(),
        }
    }

    /// Melee creature with default aim cadence.
    pub fn melee(selector: TargetSelector) -> Self {
        Self::new(selector, Box::new(MeleeStyle::default()))
    }

    /// Ranged creature with default aim cadence and launch power.
    pub fn ranged(selector: TargetSelector) -> Self {
        Self::new(selector, Box::new(RangedStyle::default()))
    }

    /// Replace the anger policy.
    pub fn with_policy(mut self, policy: Box<dyn AggroPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> EntityId {
        self.brain.id
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn brain_mut(&mut self) -> &mut Brain {
        &mut self.brain
    }

    pub fn style(&self) -> &dyn BehaviorStyle {
        self.style.as_ref()
    }

    /// Run `hook` once when the creature leaves the simulation.
    pub fn on_dispose(&mut self, hook: impl FnOnce(EntityId) + 'static) {
        self.dispose_hooks.push(Box::new(hook));
    }

    pub(crate) fn attach(&mut self, id: EntityId) {
        self.brain.id = id;
    }

    /// Clear the target and run dispose hooks.
    pub(crate) fn dispose(&mut self) {
        self.brain.aggro.disengage();
        let id = self.brain.id;
        for hook in self.dispose_hooks.drain(..) {
            hook(id);
        }
    }

    /// One behavior tick.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>, tick_diff: u64) {
        let id = self.brain.id;
        if !ctx.world.is_valid(id) {
            return;
        }

        self.update_aggro(ctx, tick_diff);
        self.brain.aggro.cool_down(tick_diff);
        self.brain.aggro.advance_select_cycle(tick_diff);

        {
            let _span = trace_span!("repulsion", creature = id.0).entered();
            repulsion::process(&mut self.brain, ctx);
        }
        {
            let _span = trace_span!("target_selecting", creature = id.0).entered();
            self.brain.try_select_target(ctx);
        }
        if self.brain.fight.enabled {
            let _span = trace_span!("fight_update", creature = id.0, style = self.style.label()).entered();
            self.style.on_fight_update(&mut self.brain, ctx, tick_diff);
        }

        if self.brain.held_changed {
            self.brain.held_changed = false;
            ctx.emit(SimEvent::EquipmentChanged {
                entity: id,
                main_hand: self.brain.held.main_hand.clone(),
                off_hand: self.brain.held.off_hand.clone(),
            });
        }

        let push = self.brain.queued_repulsion.take();
        if let Some(body) = ctx.world.get_mut(id) {
            if let Some(push) = push {
                body.motion += push;
            }
            if self.brain.immobile {
                body.motion = DVec3::ZERO;
            }
        }
    }

    fn update_aggro(&mut self, ctx: &mut TickContext<'_>, tick_diff: u64) {
        let id = self.brain.id;
        let Some(target) = self.brain.current_target(ctx.world) else {
            return;
        };
        let keep = match (ctx.world.get(id), ctx.world.get(target)) {
            (Some(me), Some(them)) => self.policy.can_continue_targeting(me, them),
            _ => false,
        };
        if let Some(lost) = self.brain.aggro.decay(tick_diff, keep) {
            debug!(creature = id.0, target = lost.0, "target lost");
            ctx.emit(SimEvent::TargetLost {
                creature: id,
                target: lost,
            });
        }
    }

    /// Inspect and possibly cancel incoming damage, updating aggro.
    pub fn on_damage(
        &mut self,
        event: &mut DamageEvent,
        world: &EntityWorld,
        now: SimTick,
        events: &mut Vec<TickedEvent>,
    ) {
        if matches!(event.cause, DamageCause::Fall | DamageCause::Suffocation) {
            event.cancel();
        }
        self.brain.aggro.note_damage(now);

        let Some(attacker_id) = event.attacker else {
            return;
        };
        let Some(attacker) = world.get(attacker_id) else {
            return;
        };

        // Projectiles answer for their shooter.
        let aggressor = match attacker.owner {
            Some(owner_id) => match world.get(owner_id) {
                Some(owner) => owner,
                None => {
                    event.cancel();
                    return;
                }
            },
            None => attacker,
        };
        if attacker.owner.is_some() && aggressor.player.is_some_and(|player| !player.online) {
            event.cancel();
            return;
        }
        // A creature hit by its own projectile takes the damage but is not angered.
        if aggressor.id == self.brain.id {
            return;
        }
        if aggressor.is_player() {
            self.brain.aggro.record_player_damage(PlayerDamageRecord {
                event: event.clone(),
                player: aggressor.id,
                tick: now,
            });
        }

        let Some(me) = world.get(self.brain.id) else {
            return;
        };
        self.brain.aggro.resolve_target(world);
        let can_anger = self.policy.can_anger_from(me, aggressor);
        let reaction = self.brain.aggro.react_to_hit(aggressor.id, now, can_anger);
        debug!(
            creature = self.brain.id.0,
            attacker = aggressor.id.0,
            ?reaction,
            interest = self.brain.aggro.interest(),
            "hit received"
        );
        events.push(TickedEvent {
            tick: now,
            event: SimEvent::Angered {
                creature: self.brain.id,
                attacker: aggressor.id,
                reaction,
            },
        });
    }
}
