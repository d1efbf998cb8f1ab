//! Weighted random target choice.
//!
//! Candidates are grouped by concrete kind. A group is drawn with probability
//! proportional to its declared weight, then a member is drawn uniformly, so
//! the number of zombies in range changes which zombie is picked but not how
//! often "a zombie" is picked.

use crate::body::Body;
use crate::entity_world::EntityWorld;
use crate::error::SelectorError;
use crate::spatial_index::SpatialIndex;
use natural_core::{EntityId, EntityKind, MobClassification};
use natural_physics::Aabb;
use rand::{Rng, RngCore};
use std::collections::{BTreeMap, BTreeSet};

/// Who is looking, and how far.
#[derive(Debug, Clone, Copy)]
pub struct SelectionQuery<'a> {
    /// The selecting creature's body.
    pub requester: &'a Body,
    /// Full edge of the search cube; the box grows by half of it on each side.
    pub targeting_range: f64,
    /// Whether invisible bodies qualify.
    pub select_invisible: bool,
}

impl SelectionQuery<'_> {
    /// Box scanned for candidates.
    pub fn search_area(&self) -> Aabb {
        let half = self.targeting_range / 2.0;
        self.requester.bounding_box().expanded(half, half, half)
    }
}

/// Candidates of one kind with their shared weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    pub kind: EntityKind,
    pub weight: i32,
    /// Ascending by id.
    pub members: Vec<EntityId>,
}

/// Per-creature weight tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelector {
    by_kind: BTreeMap<EntityKind, i32>,
    by_class: BTreeMap<MobClassification, i32>,
}

impl TargetSelector {
    /// Selector that never picks anything until configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hunts friendly creatures and, less eagerly, neutral ones.
    pub fn hostile(include_player: bool) -> Self {
        let mut selector = Self::new();
        selector.set_group_weight(MobClassification::Friendly, 100);
        selector.set_group_weight(MobClassification::Neutral, 40);
        if include_player {
            selector.by_kind.insert(EntityKind::player(), 100);
        }
        selector
    }

    /// Defends against hostile creatures.
    pub fn friendly() -> Self {
        let mut selector = Self::new();
        selector.set_group_weight(MobClassification::Hostile, 100);
        selector
    }

    /// Never starts a fight.
    pub fn neutral() -> Self {
        Self::new()
    }

    /// Set an explicit weight for one kind.
    ///
    /// Fails if a weight is already registered and `override_existing` is
    /// false. A weight `<= 0` removes the override instead of storing it.
    pub fn set_entity_weight(
        &mut self,
        kind: EntityKind,
        weight: i32,
        override_existing: bool,
    ) -> Result<(), SelectorError> {
        if !override_existing && self.by_kind.contains_key(&kind) {
            return Err(SelectorError::AlreadyRegistered { kind });
        }
        if weight <= 0 {
            self.by_kind.remove(&kind);
        } else {
            self.by_kind.insert(kind, weight);
        }
        Ok(())
    }

    /// Set the fallback weight of a classification, replacing any previous one.
    pub fn set_group_weight(&mut self, classification: MobClassification, weight: i32) {
        self.by_class.insert(classification, weight);
    }

    /// Explicit weight registered for `kind`.
    pub fn entity_weight(&self, kind: &EntityKind) -> Option<i32> {
        self.by_kind.get(kind).copied()
    }

    /// Fallback weight for a classification (0 when unset).
    pub fn group_weight(&self, classification: MobClassification) -> i32 {
        self.by_class.get(&classification).copied().unwrap_or(0)
    }

    /// Weight of one candidate; `<= 0` means not targetable.
    pub fn weight_of(&self, body: &Body) -> i32 {
        if let Some(weight) = self.entity_weight(&body.kind) {
            return weight;
        }
        body.classification
            .map(|classification| self.group_weight(classification))
            .unwrap_or(0)
    }

    /// True when the only classification weighted is Friendly, which lets the
    /// index answer instead of a box scan.
    pub fn uses_indexed_lookup(&self) -> bool {
        !self.by_class.is_empty()
            && self
                .by_class
                .keys()
                .all(|classification| *classification == MobClassification::Friendly)
    }

    /// Live, visible bodies in range, ascending by id.
    pub fn candidates(
        &self,
        query: &SelectionQuery<'_>,
        world: &EntityWorld,
        index: &SpatialIndex,
    ) -> Vec<EntityId> {
        let requester = query.requester;
        let area = query.search_area();

        let raw: Vec<EntityId> = if self.uses_indexed_lookup() {
            let mut ids: BTreeSet<EntityId> = index
                .entities_by_classification(requester.world, MobClassification::Friendly)
                .collect();
            for kind in self.by_kind.keys() {
                ids.extend(index.entities_by_kind(requester.world, kind));
            }
            ids.into_iter()
                .filter(|id| {
                    world.get(*id).is_some_and(|body| {
                        body.world == requester.world && body.bounding_box().intersects(&area)
                    })
                })
                .collect()
        } else {
            world.nearby(requester.world, &area, Some(requester.id))
        };

        raw.into_iter()
            .filter(|id| *id != requester.id)
            .filter(|id| {
                world.resolve(*id).is_some_and(|body| {
                    query.select_invisible || !body.invisible
                })
            })
            .collect()
    }

    /// Group weighted candidates by kind, in order of first appearance.
    pub fn groups(&self, candidates: &[EntityId], world: &EntityWorld) -> Vec<TargetGroup> {
        let mut groups: Vec<TargetGroup> = Vec::new();
        for id in candidates {
            let Some(body) = world.get(*id) else {
                continue;
            };
            let weight = self.weight_of(body);
            if weight <= 0 {
                continue;
            }
            match groups.iter_mut().find(|group| group.kind == body.kind) {
                Some(group) => group.members.push(*id),
                None => groups.push(TargetGroup {
                    kind: body.kind.clone(),
                    weight,
                    members: vec![*id],
                }),
            }
        }
        groups
    }

    /// Pick a target for `query.requester`, or `None` if nothing qualifies.
    pub fn select(
        &self,
        query: &SelectionQuery<'_>,
        world: &EntityWorld,
        index: &SpatialIndex,
        rng: &mut dyn RngCore,
    ) -> Option<EntityId> {
        let candidates = self.candidates(query, world, index);
        let groups = self.groups(&candidates, world);
        let group = pick_group(&groups, rng)?;
        let member = rng.gen_range(0..group.members.len());
        Some(group.members[member])
    }
}

/// Draw one group with probability `weight / total`.
///
/// Groups are walked in ascending weight order (stable for ties).
pub fn pick_group<'g>(groups: &'g [TargetGroup], rng: &mut dyn RngCore) -> Option<&'g TargetGroup> {
    let total: i64 = groups.iter().map(|group| i64::from(group.weight)).sum();
    assert!(total >= 0, "negative total target weight {total}");
    if total == 0 {
        return None;
    }

    let mut ordered: Vec<&TargetGroup> = groups.iter().collect();
    ordered.sort_by_key(|group| group.weight);

    let mut roll = rng.gen_range(1..=total);
    for group in ordered {
        roll -= i64::from(group.weight);
        if roll <= 0 {
            return Some(group);
        }
    }
    unreachable!("weighted roll left {roll} after exhausting total weight {total}")
}
