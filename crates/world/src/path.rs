//! Path providers consulted when walking toward a target.
//!
//! Creatures never require one: without a provider every target counts as
//! reachable in a straight line.

use natural_physics::DVec3;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Route-finding capability.
pub trait PathProvider: Send + Sync + fmt::Debug {
    /// Next waypoint (block corner) on the way from `from` to `to`.
    fn next_step(&self, from: DVec3, to: DVec3) -> DVec3;

    /// Whether a route exists.
    fn is_reachable(&self, from: DVec3, to: DVec3) -> bool;

    /// Whether both endpoints are usable as route ends.
    fn is_available(&self, from: DVec3, to: DVec3) -> bool;
}

/// Block column a creature can stand in, ignoring height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Column {
    pub x: i32,
    pub z: i32,
}

impl Column {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column a position stands in.
    pub fn containing(position: DVec3) -> Self {
        Self::new(position.x.floor() as i32, position.z.floor() as i32)
    }

    /// North-west corner of the column at height `y`.
    pub fn corner(self, y: f64) -> DVec3 {
        DVec3::new(f64::from(self.x), y, f64::from(self.z))
    }

    fn blocks_to(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    fn sides(self) -> [Self; 4] {
        [
            Self::new(self.x - 1, self.z),
            Self::new(self.x + 1, self.z),
            Self::new(self.x, self.z - 1),
            Self::new(self.x, self.z + 1),
        ]
    }
}

/// Open-set entry: lowest `(estimate, cost, column)` is expanded first, and
/// `first` remembers which side of the start the entry came through.
type Pending = (i32, i32, Column, Column);

/// Path provider over an explicit set of walkable columns.
///
/// Searches are four-neighbour A* bounded by `max_expansions`. Equal inputs
/// always produce the same step.
#[derive(Debug, Clone)]
pub struct GridPathProvider {
    walkable: BTreeSet<Column>,
    max_expansions: usize,
}

impl GridPathProvider {
    pub fn new(max_expansions: usize) -> Self {
        Self {
            walkable: BTreeSet::new(),
            max_expansions,
        }
    }

    /// Every column in the inclusive rectangle is walkable.
    pub fn open_area(min: Column, max: Column, max_expansions: usize) -> Self {
        let mut provider = Self::new(max_expansions);
        for x in min.x..=max.x {
            provider
                .walkable
                .extend((min.z..=max.z).map(|z| Column::new(x, z)));
        }
        provider
    }

    pub fn open(&mut self, column: Column) {
        self.walkable.insert(column);
    }

    pub fn block(&mut self, column: Column) {
        self.walkable.remove(&column);
    }

    pub fn is_walkable(&self, column: Column) -> bool {
        self.walkable.contains(&column)
    }

    /// Column to enter first on a shortest walk from `from` to `to`.
    ///
    /// `Some(to)` when already there; `None` when no walk exists within the
    /// expansion budget.
    pub fn first_step(&self, from: Column, to: Column) -> Option<Column> {
        if from == to {
            return Some(to);
        }
        if !self.is_walkable(from) || !self.is_walkable(to) {
            return None;
        }

        let mut open: BTreeSet<Pending> = BTreeSet::from([(from.blocks_to(to), 0, from, from)]);
        let mut cheapest: BTreeMap<Column, i32> = BTreeMap::from([(from, 0)]);
        let mut settled: BTreeSet<Column> = BTreeSet::new();
        let mut budget = self.max_expansions;

        while let Some((_, cost, column, first)) = open.pop_first() {
            if !settled.insert(column) {
                continue;
            }
            if column == to {
                return Some(first);
            }
            if budget == 0 {
                return None;
            }
            budget -= 1;

            let cost = cost + 1;
            for side in column.sides() {
                if settled.contains(&side) || !self.is_walkable(side) {
                    continue;
                }
                if cheapest.get(&side).is_some_and(|known| *known <= cost) {
                    continue;
                }
                cheapest.insert(side, cost);
                let first = if column == from { side } else { first };
                open.insert((cost + side.blocks_to(to), cost, side, first));
            }
        }
        None
    }
}

impl PathProvider for GridPathProvider {
    fn next_step(&self, from: DVec3, to: DVec3) -> DVec3 {
        let goal = Column::containing(to);
        self.first_step(Column::containing(from), goal)
            .unwrap_or(goal)
            .corner(from.y.floor())
    }

    fn is_reachable(&self, from: DVec3, to: DVec3) -> bool {
        self.first_step(Column::containing(from), Column::containing(to))
            .is_some()
    }

    fn is_available(&self, from: DVec3, to: DVec3) -> bool {
        self.is_walkable(Column::containing(from)) && self.is_walkable(Column::containing(to))
    }
}
