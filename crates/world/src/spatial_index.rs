//! Per-world lookup of entities by classification and by kind.
//!
//! The index only answers "who exists here"; callers still filter by
//! distance. A reverse membership map keeps every entity in at most one world
//! and lets leave/teleport run without the caller restating what was indexed.

use natural_core::{EntityId, EntityKind, MobClassification, WorldId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Membership {
    world: WorldId,
    classification: MobClassification,
    kind: EntityKind,
}

/// Entity lookup keyed by world.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    by_class: BTreeMap<WorldId, BTreeMap<MobClassification, BTreeSet<EntityId>>>,
    by_kind: BTreeMap<WorldId, BTreeMap<EntityKind, BTreeSet<EntityId>>>,
    members: BTreeMap<EntityId, Membership>,
}

impl SpatialIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity; re-joining moves it out of its previous entry.
    pub fn on_entity_join(
        &mut self,
        world: WorldId,
        classification: MobClassification,
        id: EntityId,
        kind: &EntityKind,
    ) {
        self.on_entity_leave(id);
        self.insert(
            id,
            Membership {
                world,
                classification,
                kind: kind.clone(),
            },
        );
    }

    /// Drop an entity from every map. Returns false if it was not indexed.
    pub fn on_entity_leave(&mut self, id: EntityId) -> bool {
        let Some(membership) = self.members.remove(&id) else {
            return false;
        };
        self.detach(id, &membership);
        true
    }

    /// Move an entity between worlds. No-op when the worlds are equal or the
    /// entity is not indexed in `from`.
    pub fn on_entity_teleport(&mut self, from: WorldId, to: WorldId, id: EntityId) -> bool {
        if from == to {
            return false;
        }
        let Some(mut membership) = self.members.remove(&id) else {
            return false;
        };
        if membership.world != from {
            self.members.insert(id, membership);
            return false;
        }
        self.detach(id, &membership);
        membership.world = to;
        debug!(entity = id.0, %from, %to, "index entry moved");
        self.insert(id, membership);
        true
    }

    /// Entities of one classification in a world, ascending by id.
    pub fn entities_by_classification(
        &self,
        world: WorldId,
        classification: MobClassification,
    ) -> impl Iterator<Item = EntityId> + '_ {
        self.by_class
            .get(&world)
            .and_then(|classes| classes.get(&classification))
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Entities of one kind in a world, ascending by id.
    pub fn entities_by_kind<'a>(
        &'a self,
        world: WorldId,
        kind: &EntityKind,
    ) -> impl Iterator<Item = EntityId> + 'a {
        self.by_kind
            .get(&world)
            .and_then(|kinds| kinds.get(kind))
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// World an entity is indexed in.
    pub fn world_of(&self, id: EntityId) -> Option<WorldId> {
        self.members.get(&id).map(|m| m.world)
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Forget everything (shutdown).
    pub fn clear(&mut self) {
        self.by_class.clear();
        self.by_kind.clear();
        self.members.clear();
    }

    fn insert(&mut self, id: EntityId, membership: Membership) {
        self.by_class
            .entry(membership.world)
            .or_default()
            .entry(membership.classification)
            .or_default()
            .insert(id);
        self.by_kind
            .entry(membership.world)
            .or_default()
            .entry(membership.kind.clone())
            .or_default()
            .insert(id);
        self.members.insert(id, membership);
    }

    fn detach(&mut self, id: EntityId, membership: &Membership) {
        if let Some(classes) = self.by_class.get_mut(&membership.world) {
            if let Some(ids) = classes.get_mut(&membership.classification) {
                ids.remove(&id);
                if ids.is_empty() {
                    classes.remove(&membership.classification);
                }
            }
            if classes.is_empty() {
                self.by_class.remove(&membership.world);
            }
        }
        if let Some(kinds) = self.by_kind.get_mut(&membership.world) {
            if let Some(ids) = kinds.get_mut(&membership.kind) {
                ids.remove(&id);
                if ids.is_empty() {
                    kinds.remove(&membership.kind);
                }
            }
            if kinds.is_empty() {
                self.by_kind.remove(&membership.world);
            }
        }
    }
}
