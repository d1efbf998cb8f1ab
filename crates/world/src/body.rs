//! Physical entity records owned by the host world.
//!
//! A [`Body`] is everything the behavior engine may read about an entity:
//! position, box, liveness and a few attributes. Creatures keep their AI state
//! separately and refer to bodies only by [`EntityId`].

use natural_core::{EntityId, EntityKind, MobClassification, WorldId};
use natural_physics::{Aabb, DVec3};
use serde::{Deserialize, Serialize};

/// Default movement speed attribute (blocks per tick).
pub const DEFAULT_MOVEMENT_SPEED: f64 = 0.1;

/// Connection and game-mode flags of a player body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Still connected.
    pub online: bool,
    /// Survival/adventure (true) as opposed to creative.
    pub finite_resources: bool,
    /// Spectating; cannot be targeted or collided with.
    pub spectator: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            online: true,
            finite_resources: true,
            spectator: false,
        }
    }
}

/// An entity as seen by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Handle assigned by the world on spawn (`EntityId(0)` before).
    pub id: EntityId,
    /// Concrete type.
    pub kind: EntityKind,
    /// Display name; creatures sharing a name never target each other.
    pub name: String,
    /// Set for natural creatures.
    pub classification: Option<MobClassification>,
    /// World the body lives in.
    pub world: WorldId,
    /// Feet position.
    pub position: DVec3,
    /// Velocity applied by the integrator.
    pub motion: DVec3,
    /// Heading in degrees.
    pub yaw: f64,
    /// Elevation in degrees, negative is up.
    pub pitch: f64,
    /// Box width (x and z).
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Eye offset above the feet.
    pub eye_height: f64,
    /// Current health.
    pub health: f32,
    /// Maximum health.
    pub max_health: f32,
    /// Living things can be targeted; projectiles and items cannot.
    pub living: bool,
    /// False once killed.
    pub alive: bool,
    /// True once removed from the world.
    pub closed: bool,
    /// Hidden from target selection unless the selector allows it.
    pub invisible: bool,
    /// Standing on something.
    pub on_ground: bool,
    /// Takes part in soft collision.
    pub collidable: bool,
    /// Movement speed attribute.
    pub movement_speed: f64,
    /// Attack damage attribute.
    pub attack_damage: f32,
    /// Entity that launched or owns this one.
    pub owner: Option<EntityId>,
    /// Present for players.
    pub player: Option<PlayerState>,
}

impl Body {
    /// A living body of the given kind standing at `position`.
    pub fn living(kind: EntityKind, position: DVec3) -> Self {
        Self {
            id: EntityId(0),
            name: kind.path().to_string(),
            kind,
            classification: None,
            world: WorldId::DEFAULT,
            position,
            motion: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            width: 0.6,
            height: 1.8,
            eye_height: 1.62,
            health: 20.0,
            max_health: 20.0,
            living: true,
            alive: true,
            closed: false,
            invisible: false,
            on_ground: true,
            collidable: true,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            attack_damage: 2.0,
            owner: None,
            player: None,
        }
    }

    /// A survival-mode player.
    pub fn player(name: impl Into<String>, position: DVec3) -> Self {
        let mut body = Self::living(EntityKind::player(), position);
        body.name = name.into();
        body.player = Some(PlayerState::default());
        body
    }

    /// A non-living projectile launched by `owner`.
    pub fn projectile(kind: EntityKind, owner: EntityId, position: DVec3) -> Self {
        let mut body = Self::living(kind, position);
        body.living = false;
        body.collidable = false;
        body.on_ground = false;
        body.width = 0.25;
        body.height = 0.25;
        body.eye_height = 0.125;
        body.owner = Some(owner);
        body
    }

    /// Builder: mark as a natural creature of `classification`.
    pub fn with_classification(mut self, classification: MobClassification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Builder: display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: box size and eye height.
    pub fn with_size(mut self, width: f64, height: f64, eye_height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.eye_height = eye_height;
        self
    }

    /// Builder: full health.
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    /// Builder: world.
    pub fn in_world(mut self, world: WorldId) -> Self {
        self.world = world;
        self
    }

    /// Builder: movement speed and attack damage attributes.
    pub fn with_attributes(mut self, movement_speed: f64, attack_damage: f32) -> Self {
        self.movement_speed = movement_speed;
        self.attack_damage = attack_damage;
        self
    }

    /// Builder: invisible.
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// Collision box at the current position.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_feet(self.position, self.width, self.height)
    }

    /// Eye position.
    pub fn eye_pos(&self) -> DVec3 {
        self.position + DVec3::new(0.0, self.eye_height, 0.0)
    }

    /// Alive and still in the world.
    pub fn is_valid(&self) -> bool {
        self.alive && !self.closed
    }

    /// Whether this body is a player.
    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    /// Whether this is a spectating player.
    pub fn is_spectator(&self) -> bool {
        self.player.is_some_and(|p| p.spectator)
    }

    /// Whether other bodies may bump into this one.
    pub fn can_be_collided_with(&self) -> bool {
        self.is_valid() && self.collidable && !self.is_spectator()
    }

    /// Whether this body reacts to bumping into `other`.
    pub fn can_collide_with(&self, other: &Body) -> bool {
        self.id != other.id
    }

    /// Straight-line distance between feet positions.
    pub fn distance_to(&self, other: &Body) -> f64 {
        self.position.distance(other.position)
    }

    /// Subtract health; returns true if this hit killed the body.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
            return true;
        }
        false
    }
}
