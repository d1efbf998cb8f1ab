use anyhow::{Context, Result};
use natural_core::WorldId;
use natural_physics::MathBackend;
use natural_world::CreatureProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/arena.toml";

/// A row of identical creatures.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpawnGroup {
    /// Name of a profile from `[profiles]` or a built-in one.
    pub profile: String,
    pub count: u32,
    pub world: u16,
    pub x: f64,
    pub z: f64,
    /// Gap along x between members of the group.
    pub spacing: f64,
}

impl Default for SpawnGroup {
    fn default() -> Self {
        Self {
            profile: "zombie".to_string(),
            count: 1,
            world: 0,
            x: 0.0,
            z: 0.0,
            spacing: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSpawn {
    pub name: String,
    pub world: u16,
    pub x: f64,
    pub z: f64,
    /// Creative players are never damaged and targets drop them.
    pub creative: bool,
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self {
            name: "steve".to_string(),
            world: 0,
            x: 0.0,
            z: 0.0,
            creative: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub ticks: u64,
    pub math: MathBackend,
    /// Height every spawn stands at.
    pub floor: f64,
    /// Extra creature templates by name; these shadow the built-ins.
    pub profiles: BTreeMap<String, CreatureProfile>,
    pub spawn: Vec<SpawnGroup>,
    pub players: Vec<PlayerSpawn>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            ticks: 600,
            math: MathBackend::Portable,
            floor: 64.0,
            profiles: BTreeMap::new(),
            spawn: vec![
                SpawnGroup {
                    count: 2,
                    x: -4.0,
                    z: -6.0,
                    ..SpawnGroup::default()
                },
                SpawnGroup {
                    profile: "skeleton".to_string(),
                    x: 8.0,
                    z: -10.0,
                    ..SpawnGroup::default()
                },
                SpawnGroup {
                    profile: "iron_golem".to_string(),
                    x: 0.0,
                    z: 8.0,
                    ..SpawnGroup::default()
                },
            ],
            players: vec![PlayerSpawn {
                z: 4.0,
                ..PlayerSpawn::default()
            }],
        }
    }
}

impl SimConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SimConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SimConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Arena config not found at {}. Using defaults", path.display());
                }
                SimConfig::default()
            }
        }
    }

    /// Load configuration, returning read and parse errors to the caller.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Template by name: configured profiles first, then built-ins.
    pub fn profile(&self, name: &str) -> Option<CreatureProfile> {
        self.profiles
            .get(name)
            .cloned()
            .or_else(|| CreatureProfile::builtin(name))
    }

    /// Check that every spawn group names a known profile.
    pub fn validate(&self) -> Result<()> {
        for group in &self.spawn {
            if self.profile(&group.profile).is_none() {
                anyhow::bail!("spawn group names unknown profile `{}`", group.profile);
            }
        }
        Ok(())
    }
}

impl SpawnGroup {
    pub fn world_id(&self) -> WorldId {
        WorldId(self.world)
    }
}

impl PlayerSpawn {
    pub fn world_id(&self) -> WorldId {
        WorldId(self.world)
    }
}
