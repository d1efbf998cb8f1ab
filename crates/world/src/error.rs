//! Error types for creature configuration.

use natural_core::{EntityId, EntityKind, KindError};
use thiserror::Error;

/// Target-weight configuration conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// An explicit weight exists and the caller did not ask to override it.
    #[error("target weight for {kind} already registered")]
    AlreadyRegistered {
        /// Kind whose weight was already set.
        kind: EntityKind,
    },
}

/// Errors raised while configuring or spawning a creature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CreatureError {
    /// Attack range below zero (or NaN).
    #[error("attack range must be between 0 and infinity, got {0}")]
    NegativeAttackRange(f64),
    /// No body with this id exists.
    #[error("no entity {0}")]
    UnknownEntity(EntityId),
    /// The body carries no classification, so it cannot host creature AI.
    #[error("body of kind {0} is not a natural creature")]
    NotACreature(EntityKind),
    /// A kind key in a profile failed to parse.
    #[error(transparent)]
    InvalidKind(#[from] KindError),
    /// A profile registered the same explicit weight twice.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
