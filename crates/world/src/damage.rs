//! Damage events passed between attackers, victims and the host.

use natural_core::{EntityId, SimTick};
use serde::{Deserialize, Serialize};

/// Invulnerability ticks granted by an ordinary hit.
pub const DEFAULT_ATTACK_COOLDOWN: i32 = 10;

/// Why damage happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCause {
    /// Direct melee hit.
    EntityAttack,
    /// Hit by a projectile.
    Projectile,
    /// Landing too hard.
    Fall,
    /// Stuck inside a block.
    Suffocation,
    /// Potions and similar.
    Magic,
    /// Anything else.
    Other,
}

/// One damage application, cancellable by the victim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageEvent {
    /// Body taking damage.
    pub victim: EntityId,
    /// Entity that dealt it; for projectiles this is the projectile itself.
    pub attacker: Option<EntityId>,
    /// Cause.
    pub cause: DamageCause,
    /// Health to subtract.
    pub amount: f32,
    /// Invulnerability ticks this hit grants the victim.
    pub attack_cooldown: i32,
    cancelled: bool,
}

impl DamageEvent {
    /// Damage dealt by another entity.
    pub fn by_entity(attacker: EntityId, victim: EntityId, cause: DamageCause, amount: f32) -> Self {
        Self {
            victim,
            attacker: Some(attacker),
            cause,
            amount,
            attack_cooldown: DEFAULT_ATTACK_COOLDOWN,
            cancelled: false,
        }
    }

    /// Damage without an attacker.
    pub fn environmental(victim: EntityId, cause: DamageCause, amount: f32) -> Self {
        Self {
            victim,
            attacker: None,
            cause,
            amount,
            attack_cooldown: DEFAULT_ATTACK_COOLDOWN,
            cancelled: false,
        }
    }

    /// Suppress the damage.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the damage was suppressed.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Last hit a creature took from a player, directly or through an owned entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDamageRecord {
    /// The event as received.
    pub event: DamageEvent,
    /// Responsible player.
    pub player: EntityId,
    /// When it happened.
    pub tick: SimTick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_sticky() {
        let mut event = DamageEvent::environmental(EntityId(1), DamageCause::Fall, 4.0);
        assert!(!event.is_cancelled());
        event.cancel();
        assert!(event.is_cancelled());
        assert_eq!(event.attack_cooldown, DEFAULT_ATTACK_COOLDOWN);
    }
}
