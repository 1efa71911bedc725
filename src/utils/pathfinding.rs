//! # Pathfinding
//!
//! The core never searches paths itself: it hands a passability predicate and
//! a destination to a [`Pathfinder`] and consumes the first step.

use crate::game::Position;
use ::pathfinding::prelude::astar;

/// Grid path search collaborator.
pub trait Pathfinder {
    /// Returns the cells from the step after `start` up to and including `goal`.
    ///
    /// `passable` is consulted for every cell except `goal`, which is always
    /// considered reachable so callers can path to an occupied target.
    fn find_path(
        &self,
        start: Position,
        goal: Position,
        passable: &dyn Fn(Position) -> bool,
    ) -> Option<Vec<Position>>;
}

/// A* over non-diagonal moves, bounded to a rectangular grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AStarPathfinder {
    pub width: usize,
    pub height: usize,
}

impl AStarPathfinder {
    /// Creates a pathfinder for a grid of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }
}

impl Pathfinder for AStarPathfinder {
    fn find_path(
        &self,
        start: Position,
        goal: Position,
        passable: &dyn Fn(Position) -> bool,
    ) -> Option<Vec<Position>> {
        if start == goal {
            return Some(Vec::new());
        }

        let (path, _cost) = astar(
            &start,
            |&pos| {
                pos.cardinal_adjacent_positions()
                    .into_iter()
                    .filter(|&next| self.in_bounds(next) && (next == goal || passable(next)))
                    .map(|next| (next, 1u32))
                    .collect::<Vec<_>>()
            },
            |&pos| pos.manhattan_distance(goal),
            |&pos| pos == goal,
        )?;

        Some(path.into_iter().skip(1).collect())
    }
}
