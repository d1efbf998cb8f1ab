//! Per-creature behavior switches.

use serde::{Deserialize, Serialize};

/// How many overlapping neighbours contribute to the repulsion push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepulsionMode {
    /// Push away from the first overlapping body only.
    #[default]
    FirstContact,
    /// Sum the push of every overlapping body.
    Accumulate,
}

/// Movement switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementOptions {
    /// Creature may walk at all.
    pub walk_enabled: bool,
    /// Creature may steer while airborne.
    pub walk_in_air: bool,
    /// Ignore water/lava/cobweb slowdowns.
    pub ignore_terrain_modifiers: bool,
    /// Soft collision with neighbours.
    pub repulsion_enabled: bool,
    /// Neighbour handling for soft collision.
    pub repulsion_mode: RepulsionMode,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self {
            walk_enabled: true,
            walk_in_air: false,
            ignore_terrain_modifiers: false,
            repulsion_enabled: true,
            repulsion_mode: RepulsionMode::FirstContact,
        }
    }
}

/// Target selection switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectTargetOptions {
    /// Look for targets while idle.
    pub enabled: bool,
    /// Ticks between selection attempts.
    pub interval_ticks: u64,
    /// Interest granted to a freshly selected target.
    pub initial_interest: i32,
    /// Consider invisible bodies.
    pub select_invisible: bool,
}

impl Default for SelectTargetOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ticks: 60,
            initial_interest: 400,
            select_invisible: false,
        }
    }
}

/// Fight switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightOptions {
    /// Run the fight update each tick.
    pub enabled: bool,
}

impl Default for FightOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let movement = MovementOptions::default();
        assert!(movement.walk_enabled && movement.repulsion_enabled);
        assert!(!movement.walk_in_air && !movement.ignore_terrain_modifiers);
        let select = SelectTargetOptions::default();
        assert_eq!((select.interval_ticks, select.initial_interest), (60, 400));
        assert!(FightOptions::default().enabled);
    }

    #[test]
    fn partial_records_fill_defaults() {
        let select: SelectTargetOptions =
            serde_json::from_str(r#"{"interval_ticks": 20}"#).unwrap();
        assert_eq!(select.interval_ticks, 20);
        assert_eq!(select.initial_interest, 400);
        let movement: MovementOptions =
            serde_json::from_str(r#"{"repulsion_mode": "accumulate"}"#).unwrap();
        assert_eq!(movement.repulsion_mode, RepulsionMode::Accumulate);
        assert!(movement.walk_enabled);
    }
}
