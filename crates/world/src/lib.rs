//! Creature behavior engine: target selection, aggro, repulsion and fighting
//! styles on top of a small deterministic entity world.

mod aggro;
mod body;
mod creature;
mod damage;
mod entity_world;
mod error;
mod event;
mod modifier;
mod movement;
mod options;
mod path;
mod profile;
mod projectile;
pub mod repulsion;
mod selector;
mod sim;
mod spatial_index;
mod style;

pub use aggro::*;
pub use body::*;
pub use creature::*;
pub use damage::*;
pub use entity_world::*;
pub use error::*;
pub use event::*;
pub use modifier::*;
pub use movement::*;
pub use options::*;
pub use path::*;
pub use profile::*;
pub use projectile::*;
pub use selector::*;
pub use sim::*;
pub use spatial_index::*;
pub use style::*;
