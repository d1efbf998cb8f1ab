//! Outbound notifications produced while ticking.
//!
//! The simulation never talks to clients; everything a host would broadcast
//! (swings, launches, equipment) lands here instead.

use crate::aggro::AngerReaction;
use crate::damage::DamageCause;
use crate::projectile::LaunchRequest;
use natural_core::{EntityId, SimTick};
use serde::Serialize;

/// Something observable happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// Idle creature picked a target.
    TargetAcquired {
        creature: EntityId,
        target: EntityId,
        interest: i32,
    },
    /// Creature went back to idle.
    TargetLost { creature: EntityId, target: EntityId },
    /// A hit changed (or failed to change) a creature's aggro.
    Angered {
        creature: EntityId,
        attacker: EntityId,
        reaction: AngerReaction,
    },
    /// Attack animation.
    AttackSwing { attacker: EntityId, target: EntityId },
    /// Health was subtracted.
    Damaged {
        victim: EntityId,
        attacker: Option<EntityId>,
        cause: DamageCause,
        amount: f32,
    },
    /// A body died.
    Died {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    /// Ranged creature fired.
    ProjectileLaunched(LaunchRequest),
    /// Held items changed since the last tick.
    EquipmentChanged {
        entity: EntityId,
        main_hand: Option<String>,
        off_hand: Option<String>,
    },
}

/// An event stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickedEvent {
    pub tick: SimTick,
    #[serde(flatten)]
    pub event: SimEvent,
}
