//! Soft push-apart between overlapping bodies.
//!
//! Pushes are queued on the brain and applied once at the end of the owning
//! creature's tick. When the other body is also a repulsion-enabled creature
//! it gets the opposite push queued, and its own scan is skipped later in
//! the tick because something is already queued.

use crate::body::Body;
use crate::creature::Brain;
use crate::entity_world::{chunk_coord, EntityWorld};
use crate::options::RepulsionMode;
use crate::sim::TickContext;
use natural_core::EntityId;
use natural_physics::{Aabb, DVec3};
use std::ops::RangeInclusive;

/// Push strength before the distance falloff.
pub const REPULSION_STRENGTH: f64 = 0.2;
/// Planar distances below this are treated as this.
pub const MIN_REPULSION_DISTANCE: f64 = 0.01;
/// Final scale applied to each push.
pub const REPULSION_SCALE: f64 = 0.5;
/// Blocks added around the body box when picking chunk columns to scan.
pub const NEIGHBOURHOOD_MARGIN: f64 = 1.0;

/// One overlapping body and the push it causes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: EntityId,
    pub push: DVec3,
}

/// Horizontal push on a body at `me` from a body at `other`.
pub fn push_between(me: DVec3, other: DVec3) -> DVec3 {
    let dx = me.x - other.x;
    let dz = me.z - other.z;
    let distance = (dx * dx + dz * dz).sqrt().max(MIN_REPULSION_DISTANCE);
    let scale = REPULSION_STRENGTH / distance * REPULSION_SCALE;
    DVec3::new(dx * scale, 0.0, dz * scale)
}

/// Chunk columns to scan around a box.
pub fn neighbourhood(area: &Aabb) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
    (
        chunk_coord(area.min.x - NEIGHBOURHOOD_MARGIN)..=chunk_coord(area.max.x + NEIGHBOURHOOD_MARGIN),
        chunk_coord(area.min.z - NEIGHBOURHOOD_MARGIN)..=chunk_coord(area.max.z + NEIGHBOURHOOD_MARGIN),
    )
}

/// Bodies overlapping `me`; at most one in first-contact mode.
pub fn contacts(world: &EntityWorld, me: &Body, mode: RepulsionMode) -> Vec<Contact> {
    let area = me.bounding_box();
    let (xs, zs) = neighbourhood(&area);
    let mut found = Vec::new();
    for cx in xs {
        for cz in zs.clone() {
            for id in world.chunk_entities(me.world, cx, cz) {
                let Some(other) = world.get(id) else {
                    continue;
                };
                if !me.can_collide_with(other)
                    || !other.can_be_collided_with()
                    || !other.bounding_box().intersects(&area)
                {
                    continue;
                }
                found.push(Contact {
                    other: id,
                    push: push_between(me.position, other.position),
                });
                if mode == RepulsionMode::FirstContact {
                    return found;
                }
            }
        }
    }
    found
}

/// Queue this tick's push for `brain`, and the counter-push on neighbours.
pub fn process(brain: &mut Brain, ctx: &mut TickContext<'_>) {
    if !brain.movement.repulsion_enabled || brain.queued_repulsion().is_some() {
        return;
    }
    let Some(me) = ctx.world.resolve(brain.id()) else {
        return;
    };
    if !me.collidable {
        return;
    }
    let found = contacts(ctx.world, me, brain.movement.repulsion_mode);

    let mut total = DVec3::ZERO;
    for contact in found {
        total += contact.push;
        if let Some(other) = ctx.creatures.get_mut(&contact.other) {
            let other = other.brain_mut();
            if other.movement.repulsion_enabled {
                other.queue_repulsion(-contact.push);
            }
        }
    }
    brain.queue_repulsion(total);
}
