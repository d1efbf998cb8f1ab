//! Minimal host world: bodies bucketed into 16x16 chunk columns.
//!
//! Stands in for the game server's level. Ids are handed out monotonically and
//! never reused, so a stale [`EntityId`] resolves to `None` rather than to a
//! newer body.

use crate::body::Body;
use natural_core::{EntityId, WorldId};
use natural_physics::{Aabb, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Chunk column edge length in blocks.
pub const CHUNK_SIZE: i32 = 16;
const CHUNK_SHIFT: i32 = 4;

/// Extra blocks scanned around a query box; covers bodies whose feet sit in a
/// neighbouring column while their box pokes over the edge.
pub const NEARBY_MARGIN: f64 = 2.0;

/// Horizontal velocity damping per integrated tick.
pub const HORIZONTAL_DRAG: f64 = 0.6;
/// Vertical velocity damping per integrated tick.
pub const VERTICAL_DRAG: f64 = 0.98;

/// Chunk column key.
pub type ChunkKey = (WorldId, i32, i32);

/// Chunk column containing a horizontal block coordinate.
pub fn chunk_coord(value: f64) -> i32 {
    (value.floor() as i32) >> CHUNK_SHIFT
}

/// What a body is standing in; drives walking speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Open ground.
    #[default]
    Ground,
    /// Water.
    Water,
    /// Lava.
    Lava,
    /// Cobweb.
    Cobweb,
}

impl Surface {
    /// Walking speed multiplier while inside this surface.
    pub fn speed_modifier(self) -> f64 {
        match self {
            Self::Ground => 1.0,
            Self::Water => 0.2,
            Self::Lava => 0.15,
            Self::Cobweb => 0.1,
        }
    }
}

/// All live bodies plus the chunk buckets used for neighbourhood scans.
#[derive(Debug, Default)]
pub struct EntityWorld {
    bodies: BTreeMap<EntityId, Body>,
    chunks: BTreeMap<ChunkKey, BTreeSet<EntityId>>,
    surfaces: BTreeMap<(WorldId, i32, i32, i32), Surface>,
    next_id: u64,
}

impl EntityWorld {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body and return its freshly assigned id.
    pub fn spawn(&mut self, mut body: Body) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        body.id = id;
        body.closed = false;
        self.chunks.entry(chunk_key(&body)).or_default().insert(id);
        self.bodies.insert(id, body);
        id
    }

    /// Remove a body; it is marked closed and no longer resolves.
    pub fn remove(&mut self, id: EntityId) -> Option<Body> {
        let mut body = self.bodies.remove(&id)?;
        self.unbucket(&body);
        body.closed = true;
        Some(body)
    }

    /// Body by id, valid or not.
    pub fn get(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Mutable body by id.
    ///
    /// Moving a body through this handle skips chunk bookkeeping until the
    /// next [`EntityWorld::integrate`]; use [`EntityWorld::set_position`] for
    /// explicit moves.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    /// Body by id if it is alive and present.
    pub fn resolve(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id).filter(|body| body.is_valid())
    }

    /// Whether the id resolves to a live body.
    pub fn is_valid(&self, id: EntityId) -> bool {
        self.resolve(id).is_some()
    }

    /// Number of bodies, including dead ones not yet removed.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the world holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// All bodies in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Move a body within its world.
    pub fn set_position(&mut self, id: EntityId, position: DVec3) -> bool {
        let Some(body) = self.bodies.get_mut(&id) else {
            return false;
        };
        let before = chunk_key(body);
        body.position = position;
        let after = chunk_key(body);
        self.rebucket(id, before, after);
        true
    }

    /// Move a body, possibly across worlds. Returns the world it left.
    pub fn teleport(&mut self, id: EntityId, world: WorldId, position: DVec3) -> Option<WorldId> {
        let body = self.bodies.get_mut(&id)?;
        let before = chunk_key(body);
        let previous = body.world;
        body.world = world;
        body.position = position;
        let after = chunk_key(body);
        self.rebucket(id, before, after);
        Some(previous)
    }

    /// Ids bucketed in one chunk column.
    pub fn chunk_entities(&self, world: WorldId, cx: i32, cz: i32) -> impl Iterator<Item = EntityId> + '_ {
        self.chunks
            .get(&(world, cx, cz))
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Bodies whose boxes intersect `area`, in id order.
    pub fn nearby(&self, world: WorldId, area: &Aabb, exclude: Option<EntityId>) -> Vec<EntityId> {
        let (min_x, max_x) = (
            chunk_coord(area.min.x - NEARBY_MARGIN),
            chunk_coord(area.max.x + NEARBY_MARGIN),
        );
        let (min_z, max_z) = (
            chunk_coord(area.min.z - NEARBY_MARGIN),
            chunk_coord(area.max.z + NEARBY_MARGIN),
        );

        let mut found = BTreeSet::new();
        for cx in min_x..=max_x {
            for cz in min_z..=max_z {
                for id in self.chunk_entities(world, cx, cz) {
                    if Some(id) == exclude {
                        continue;
                    }
                    let Some(body) = self.bodies.get(&id) else {
                        continue;
                    };
                    if body.bounding_box().intersects(area) {
                        found.insert(id);
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// Mark the block at `block` as a special surface.
    pub fn set_surface(&mut self, world: WorldId, block: (i32, i32, i32), surface: Surface) {
        let key = (world, block.0, block.1, block.2);
        if surface == Surface::Ground {
            self.surfaces.remove(&key);
        } else {
            self.surfaces.insert(key, surface);
        }
    }

    /// Surface at a position (the block containing it).
    pub fn surface_at(&self, world: WorldId, position: DVec3) -> Surface {
        let key = (
            world,
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        );
        self.surfaces.get(&key).copied().unwrap_or_default()
    }

    /// Apply motion to every non-player body, then damp it.
    pub fn integrate(&mut self) {
        let mut moved = Vec::new();
        for (id, body) in self.bodies.iter_mut() {
            if body.is_player() || !body.is_valid() || body.motion == DVec3::ZERO {
                continue;
            }
            let before = chunk_key(body);
            body.position += body.motion;
            body.motion.x *= HORIZONTAL_DRAG;
            body.motion.z *= HORIZONTAL_DRAG;
            body.motion.y *= VERTICAL_DRAG;
            let after = chunk_key(body);
            if before != after {
                moved.push((*id, before, after));
            }
        }
        for (id, before, after) in moved {
            self.rebucket(id, before, after);
        }
    }

    fn rebucket(&mut self, id: EntityId, before: ChunkKey, after: ChunkKey) {
        if before == after {
            return;
        }
        if let Some(ids) = self.chunks.get_mut(&before) {
            ids.remove(&id);
            if ids.is_empty() {
                self.chunks.remove(&before);
            }
        }
        self.chunks.entry(after).or_default().insert(id);
    }

    fn unbucket(&mut self, body: &Body) {
        let key = chunk_key(body);
        if let Some(ids) = self.chunks.get_mut(&key) {
            ids.remove(&body.id);
            if ids.is_empty() {
                self.chunks.remove(&key);
            }
        }
    }
}

fn chunk_key(body: &Body) -> ChunkKey {
    (body.world, chunk_coord(body.position.x), chunk_coord(body.position.z))
}
