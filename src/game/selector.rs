//! # Target Selection
//!
//! Interactive cycling through a fixed set of candidate targets. Objects
//! stacked on one coordinate are cycled with [`ValidTargets::next`] and
//! [`ValidTargets::prev`]; moving between coordinates is a separate
//! directional search.

use super::{Direction, Position, TargetCandidate, TargetKind};
use std::collections::BTreeMap;

/// Sorted candidates with a per-coordinate index and a current selection.
#[derive(Debug, Clone)]
pub struct ValidTargets {
    targets: Vec<TargetCandidate>,
    /// Indexes into `targets`, grouped by coordinate
    buckets: BTreeMap<Position, Vec<usize>>,
    current_coord: Option<Position>,
    /// Index into the bucket at `current_coord`
    current: usize,
}

impl ValidTargets {
    /// Sorts by the caller's kind priority, then by range.
    pub fn new(mut targets: Vec<TargetCandidate>, priority: &[TargetKind]) -> Self {
        let rank = |candidate: &TargetCandidate| {
            priority
                .iter()
                .position(|&kind| kind == candidate.value.kind())
                .unwrap_or(priority.len())
        };
        targets.sort_by(|a, b| {
            rank(a)
                .cmp(&rank(b))
                .then_with(|| a.range.total_cmp(&b.range))
        });

        let mut buckets: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (index, candidate) in targets.iter().enumerate() {
            buckets.entry(candidate.position).or_default().push(index);
        }
        let current_coord = targets.first().map(|candidate| candidate.position);

        Self {
            targets,
            buckets,
            current_coord,
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All candidates in sorted order.
    pub fn targets(&self) -> &[TargetCandidate] {
        &self.targets
    }

    pub fn current_coord(&self) -> Option<Position> {
        self.current_coord
    }

    fn bucket(&self) -> Option<&Vec<usize>> {
        self.current_coord.and_then(|coord| self.buckets.get(&coord))
    }

    /// The selected candidate, or `None` when nothing is selectable.
    pub fn current(&self) -> Option<&TargetCandidate> {
        let bucket = self.bucket()?;
        bucket.get(self.current).map(|&index| &self.targets[index])
    }

    /// Number of candidates stacked at the current coordinate.
    pub fn stacked_at_current(&self) -> usize {
        self.bucket().map_or(0, Vec::len)
    }

    /// Cycles forward within the current coordinate.
    pub fn next(&mut self) -> Option<&TargetCandidate> {
        let len = self.stacked_at_current();
        if len > 0 {
            self.current = (self.current + 1) % len;
        }
        self.current()
    }

    /// Cycles backward within the current coordinate.
    pub fn prev(&mut self) -> Option<&TargetCandidate> {
        let len = self.stacked_at_current();
        if len > 0 {
            self.current = (self.current + len - 1) % len;
        }
        self.current()
    }

    /// Jumps to the nearest occupied coordinate strictly on the given side.
    ///
    /// Leaves the selection untouched and returns `false` if there is none.
    pub fn set_current_coord_in_direction(&mut self, direction: Direction) -> bool {
        let from = match self.current_coord {
            Some(from) => from,
            None => return false,
        };
        let on_side = |pos: &Position| match direction {
            Direction::Up => pos.y < from.y,
            Direction::Down => pos.y > from.y,
            Direction::Left => pos.x < from.x,
            Direction::Right => pos.x > from.x,
        };
        let nearest = self
            .buckets
            .keys()
            .filter(|pos| on_side(pos))
            .min_by(|a, b| {
                from.euclidean_distance(**a)
                    .total_cmp(&from.euclidean_distance(**b))
            })
            .copied();

        match nearest {
            Some(pos) => {
                self.current_coord = Some(pos);
                self.current = 0;
                true
            }
            None => false,
        }
    }

    /// Selects a specific coordinate if any candidate sits there.
    pub fn set_current_coord(&mut self, pos: Position) -> bool {
        if self.buckets.contains_key(&pos) {
            self.current_coord = Some(pos);
            self.current = 0;
            true
        } else {
            false
        }
    }
}
