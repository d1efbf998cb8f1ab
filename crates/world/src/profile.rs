//! Serializable creature templates.

use crate::body::{Body, DEFAULT_MOVEMENT_SPEED};
use crate::creature::{Creature, DEFAULT_ATTACK_RANGE, DEFAULT_TARGETING_RANGE};
use crate::error::CreatureError;
use crate::modifier::ModifiableValue;
use crate::options::{FightOptions, MovementOptions, SelectTargetOptions};
use crate::projectile::DEFAULT_LAUNCH_POWER;
use crate::selector::TargetSelector;
use crate::style::{
    BehaviorStyle, MeleeStyle, RangedStyle, DEFAULT_MELEE_AIM_FLEXIBILITY,
    DEFAULT_RANGED_AIM_FLEXIBILITY,
};
use natural_core::{EntityKind, MobClassification, WorldId};
use natural_physics::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn melee_aim() -> u64 {
    DEFAULT_MELEE_AIM_FLEXIBILITY
}

fn ranged_aim() -> u64 {
    DEFAULT_RANGED_AIM_FLEXIBILITY
}

fn launch_power() -> f64 {
    DEFAULT_LAUNCH_POWER
}

/// Fighting style and its tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StyleProfile {
    Melee {
        #[serde(default = "melee_aim")]
        aim_flexibility: u64,
    },
    Ranged {
        #[serde(default = "ranged_aim")]
        aim_flexibility: u64,
        #[serde(default = "launch_power")]
        launch_power: f64,
    },
}

impl StyleProfile {
    pub fn build(&self) -> Box<dyn BehaviorStyle> {
        match *self {
            Self::Melee { aim_flexibility } => Box::new(MeleeStyle::new(aim_flexibility)),
            Self::Ranged {
                aim_flexibility,
                launch_power,
            } => Box::new(RangedStyle::new(aim_flexibility, launch_power)),
        }
    }
}

/// Starting weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorPreset {
    /// Friendly and neutral creatures.
    Hostile,
    /// Like `Hostile`, plus players.
    #[default]
    HostileToPlayers,
    /// Hostile creatures.
    Friendly,
    /// Nothing.
    Neutral,
}

impl SelectorPreset {
    pub fn build(self) -> TargetSelector {
        match self {
            Self::Hostile => TargetSelector::hostile(false),
            Self::HostileToPlayers => TargetSelector::hostile(true),
            Self::Friendly => TargetSelector::friendly(),
            Self::Neutral => TargetSelector::neutral(),
        }
    }
}

/// Everything needed to spawn one kind of creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureProfile {
    /// Entity kind key, e.g. `zombie` or `natural:zombie`.
    pub kind: String,
    /// Display name; defaults to the kind path.
    pub name: Option<String>,
    pub classification: MobClassification,
    pub width: f64,
    pub height: f64,
    pub eye_height: f64,
    pub max_health: f32,
    pub movement_speed: f64,
    pub attack_damage: f32,
    pub attack_range: f64,
    pub targeting_range: f64,
    /// Base of the additional post-attack cooldown, in ticks.
    pub additional_attack_cooldown: f64,
    pub selector: SelectorPreset,
    /// Explicit per-kind weights on top of the preset. Restating a weight
    /// the preset already sets is a conflict.
    pub entity_weights: BTreeMap<String, i32>,
    /// Classification weights; these replace the preset's.
    pub group_weights: BTreeMap<MobClassification, i32>,
    pub style: StyleProfile,
    pub movement: MovementOptions,
    pub select_target: SelectTargetOptions,
    pub fight: FightOptions,
}

impl Default for CreatureProfile {
    fn default() -> Self {
        Self::zombie()
    }
}

impl CreatureProfile {
    /// Melee hostile that hunts players.
    pub fn zombie() -> Self {
        Self {
            kind: "zombie".to_string(),
            name: None,
            classification: MobClassification::Hostile,
            width: 0.6,
            height: 1.95,
            eye_height: 1.74,
            max_health: 20.0,
            movement_speed: DEFAULT_MOVEMENT_SPEED * 2.3,
            attack_damage: 3.0,
            attack_range: DEFAULT_ATTACK_RANGE,
            targeting_range: DEFAULT_TARGETING_RANGE,
            additional_attack_cooldown: 0.0,
            selector: SelectorPreset::HostileToPlayers,
            entity_weights: BTreeMap::new(),
            group_weights: BTreeMap::new(),
            style: StyleProfile::Melee {
                aim_flexibility: DEFAULT_MELEE_AIM_FLEXIBILITY,
            },
            movement: MovementOptions::default(),
            select_target: SelectTargetOptions::default(),
            fight: FightOptions::default(),
        }
    }

    /// Ranged hostile.
    pub fn skeleton() -> Self {
        Self {
            kind: "skeleton".to_string(),
            height: 1.99,
            eye_height: 1.75,
            movement_speed: DEFAULT_MOVEMENT_SPEED * 2.5,
            attack_damage: 2.0,
            attack_range: 16.0,
            additional_attack_cooldown: 40.0,
            style: StyleProfile::Ranged {
                aim_flexibility: DEFAULT_RANGED_AIM_FLEXIBILITY,
                launch_power: DEFAULT_LAUNCH_POWER,
            },
            ..Self::zombie()
        }
    }

    /// Friendly guard that attacks hostile creatures.
    pub fn iron_golem() -> Self {
        Self {
            kind: "iron_golem".to_string(),
            classification: MobClassification::Friendly,
            width: 1.4,
            height: 2.7,
            eye_height: 2.2,
            max_health: 100.0,
            movement_speed: DEFAULT_MOVEMENT_SPEED * 2.5,
            attack_damage: 7.0,
            attack_range: 2.5,
            additional_attack_cooldown: 10.0,
            selector: SelectorPreset::Friendly,
            ..Self::zombie()
        }
    }

    /// Built-in template by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "zombie" => Some(Self::zombie()),
            "skeleton" => Some(Self::skeleton()),
            "iron_golem" | "golem" => Some(Self::iron_golem()),
            _ => None,
        }
    }

    pub fn entity_kind(&self) -> Result<EntityKind, CreatureError> {
        Ok(EntityKind::parse(&self.kind)?)
    }

    /// Body for this template standing at `position`.
    pub fn body_at(&self, world: WorldId, position: DVec3) -> Result<Body, CreatureError> {
        let kind = self.entity_kind()?;
        let mut body = Body::living(kind, position)
            .with_classification(self.classification)
            .with_size(self.width, self.height, self.eye_height)
            .with_health(self.max_health)
            .with_attributes(self.movement_speed, self.attack_damage)
            .in_world(world);
        if let Some(name) = &self.name {
            body = body.with_name(name.clone());
        }
        Ok(body)
    }

    /// Creature AI for this template.
    pub fn build_creature(&self) -> Result<Creature, CreatureError> {
        let mut selector = self.selector.build();
        for (key, weight) in &self.entity_weights {
            selector.set_entity_weight(EntityKind::parse(key)?, *weight, false)?;
        }
        for (classification, weight) in &self.group_weights {
            selector.set_group_weight(*classification, *weight);
        }

        let mut creature = Creature::new(selector, self.style.build());
        let brain = creature.brain_mut();
        brain.set_attack_range(self.attack_range)?;
        brain.targeting_range = self.targeting_range;
        brain.additional_cooldown = ModifiableValue::new(self.additional_attack_cooldown);
        brain.movement = self.movement;
        brain.select_target = self.select_target;
        brain.fight = self.fight;
        Ok(creature)
    }
}
