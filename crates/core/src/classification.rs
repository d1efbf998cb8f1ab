//! Coarse creature grouping used for bulk target weighting.

use serde::{Deserialize, Serialize};

/// Hostility class of a creature.
///
/// Players are indexed as [`MobClassification::Friendly`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobClassification {
    /// Attacks friendly creatures and players.
    Hostile,
    /// Only fights back.
    Neutral,
    /// Players and their allies.
    Friendly,
}

impl MobClassification {
    /// Every classification, in index order.
    pub const ALL: [Self; 3] = [Self::Hostile, Self::Neutral, Self::Friendly];

    /// Canonical lowercase key for configs/logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hostile => "hostile",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
        }
    }

    /// Parse a classification key (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "hostile" => Some(Self::Hostile),
            "neutral" => Some(Self::Neutral),
            "friendly" | "friend" => Some(Self::Friendly),
            _ => None,
        }
    }
}
