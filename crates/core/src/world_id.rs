//! World identifiers.
//!
//! Entities live in exactly one world at a time. Everything that buckets
//! entities spatially (chunk columns, the classification index) is scoped by
//! world, so moving between worlds is always a remove-then-add.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u16);

impl WorldId {
    /// The world entities spawn into unless told otherwise.
    pub const DEFAULT: Self = Self(0);
}

impl Default for WorldId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_is_zero() {
        assert_eq!(WorldId::default(), WorldId(0));
        assert_eq!(WorldId(3).to_string(), "world-3");
    }
}
