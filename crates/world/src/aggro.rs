//! Target, interest and cooldown bookkeeping for one creature.
//!
//! The target is held as an [`EntityId`] and re-resolved against the world on
//! every read; a handle that no longer resolves clears the target.
//!
//! ```text
//! Idle --select / hit--> Engaged --interest <= 0 / target gone--> Idle
//! ```

use crate::damage::PlayerDamageRecord;
use crate::entity_world::EntityWorld;
use natural_core::{EntityId, SimTick};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Interest given to an attacker when the creature had no target.
pub const ANGER_INTEREST: i32 = 400;
/// Interest given to an attacker that displaced the previous target.
pub const REDIRECT_INTEREST: i32 = 300;
/// Interest lost on the current target when someone else hits.
pub const ANGER_PENALTY: i32 = 52;
/// Interest gained when the current target hits again.
pub const REINFORCE_BONUS: i32 = 45;
/// Interest gained on a landed attack.
pub const ATTACK_HIT_BONUS: i32 = 25;
/// Repeat hits from one attacker inside this window are ignored.
pub const ANGER_GUARD_TICKS: u64 = 4;

/// What a hit did to the aggro state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AngerReaction {
    /// Same attacker hit again inside the guard window.
    Throttled,
    /// The creature refuses to be angered by this attacker.
    Ignored,
    /// Idle creature now targets the attacker.
    Engaged,
    /// Current target kept, with less interest.
    Penalized,
    /// Current target dropped in favour of the attacker.
    Redirected,
    /// The attacker already is the target; interest went up.
    Reinforced,
}

/// Aggro state machine.
#[derive(Debug, Clone, Default)]
pub struct AggroState {
    target: Option<EntityId>,
    interest: i32,
    targeting_tick: u64,
    select_cycle_tick: u64,
    post_attack_cooldown: i32,
    last_player_damage: Option<PlayerDamageRecord>,
    last_damage_tick: Option<SimTick>,
    recent_hits: BTreeMap<EntityId, SimTick>,
}

impl AggroState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored target, without checking that it still exists.
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Current target if it still resolves to a live body; clears it otherwise.
    pub fn resolve_target(&mut self, world: &EntityWorld) -> Option<EntityId> {
        let target = self.target?;
        if world.is_valid(target) {
            return Some(target);
        }
        debug!(target = target.0, "target no longer valid");
        self.disengage();
        None
    }

    pub fn is_engaged(&self) -> bool {
        self.target.is_some()
    }

    pub fn interest(&self) -> i32 {
        self.interest
    }

    /// Ticks since the current target was acquired.
    pub fn targeting_tick(&self) -> u64 {
        self.targeting_tick
    }

    /// Adjust interest on the current target; ignored while idle.
    pub fn add_interest(&mut self, delta: i32) {
        if self.target.is_some() {
            self.interest = self.interest.saturating_add(delta);
        }
    }

    /// Start targeting `target` with the given interest. Restarts the
    /// selection timer.
    pub fn engage(&mut self, target: EntityId, interest: i32) {
        self.target = Some(target);
        self.interest = interest;
        self.targeting_tick = 0;
        self.select_cycle_tick = 0;
    }

    /// Drop the target. Returns the one dropped.
    pub fn disengage(&mut self) -> Option<EntityId> {
        self.interest = 0;
        self.targeting_tick = 0;
        self.target.take()
    }

    /// Age the current target by `tick_diff`.
    ///
    /// `keep` is the continuation check; when it fails interest is forced to
    /// zero. Returns the target if it was dropped.
    pub fn decay(&mut self, tick_diff: u64, keep: bool) -> Option<EntityId> {
        self.target?;
        let diff = i32::try_from(tick_diff).unwrap_or(i32::MAX);
        self.interest = self.interest.saturating_sub(diff);
        self.targeting_tick += tick_diff;
        if !keep {
            self.interest = 0;
        }
        if self.interest <= 0 {
            return self.disengage();
        }
        None
    }

    pub fn post_attack_cooldown(&self) -> i32 {
        self.post_attack_cooldown
    }

    pub fn set_post_attack_cooldown(&mut self, ticks: i32) {
        self.post_attack_cooldown = ticks.max(0);
    }

    pub fn is_cooling_down(&self) -> bool {
        self.post_attack_cooldown > 0
    }

    /// Count the attack cooldown down, stopping at zero.
    pub fn cool_down(&mut self, tick_diff: u64) {
        let diff = i32::try_from(tick_diff).unwrap_or(i32::MAX);
        self.post_attack_cooldown = self.post_attack_cooldown.saturating_sub(diff).max(0);
    }

    /// Advance the selection timer.
    pub fn advance_select_cycle(&mut self, tick_diff: u64) {
        self.select_cycle_tick += tick_diff;
    }

    /// Whether more than `interval` ticks have passed since the last attempt.
    pub fn select_due(&self, interval: u64) -> bool {
        self.select_cycle_tick > interval
    }

    /// Consume one interval after a selection attempt.
    pub fn finish_select_cycle(&mut self, interval: u64) {
        self.select_cycle_tick = self.select_cycle_tick.saturating_sub(interval);
    }

    /// React to a hit from `attacker`.
    ///
    /// Call [`AggroState::resolve_target`] first so a dead target does not
    /// shield the creature from a new attacker.
    pub fn react_to_hit(&mut self, attacker: EntityId, now: SimTick, can_anger: bool) -> AngerReaction {
        self.recent_hits
            .retain(|_, at| now.since(*at) < ANGER_GUARD_TICKS);
        if self.recent_hits.contains_key(&attacker) {
            return AngerReaction::Throttled;
        }
        self.recent_hits.insert(attacker, now);

        if self.target == Some(attacker) {
            self.add_interest(REINFORCE_BONUS);
            return AngerReaction::Reinforced;
        }
        if !can_anger {
            return AngerReaction::Ignored;
        }
        if self.target.is_none() {
            self.engage(attacker, ANGER_INTEREST);
            return AngerReaction::Engaged;
        }
        self.interest -= ANGER_PENALTY;
        if self.interest <= 0 {
            self.engage(attacker, REDIRECT_INTEREST);
            return AngerReaction::Redirected;
        }
        AngerReaction::Penalized
    }

    /// Record damage of any cause.
    pub fn note_damage(&mut self, now: SimTick) {
        self.last_damage_tick = Some(now);
    }

    /// Tick of the last damage taken.
    pub fn last_damage_tick(&self) -> Option<SimTick> {
        self.last_damage_tick
    }

    pub fn record_player_damage(&mut self, record: PlayerDamageRecord) {
        self.last_player_damage = Some(record);
    }

    /// Last hit attributed to a player.
    pub fn last_player_damage(&self) -> Option<&PlayerDamageRecord> {
        self.last_player_damage.as_ref()
    }

    pub fn clear_last_player_damage(&mut self) -> Option<PlayerDamageRecord> {
        self.last_player_damage.take()
    }
}
