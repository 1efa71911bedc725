//! # Game Module
//!
//! Core game state, spatial grids, objects and the action protocol.
//!
//! This module contains the fundamental building blocks of a Shamble floor:
//! - Dense spatial grids for tiles and multi-occupant object layers
//! - Entities, furniture, items and generation markers
//! - The performable/resolvable action protocol and its effects
//! - Zombie AI and the turn loop

pub mod actions;
pub mod ai;
pub mod entities;
pub mod events;
pub mod fov;
pub mod grid;
pub mod layers;
pub mod registry;
pub mod selector;
pub mod state;
pub mod world;

pub use actions::*;
pub use ai::*;
pub use entities::*;
pub use events::*;
pub use fov::*;
pub use grid::*;
pub use layers::*;
pub use registry::*;
pub use selector::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Represents a 2D cell coordinate on the floor.
///
/// # Examples
///
/// ```
/// use shamble::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use shamble::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the 4 non-diagonal neighbours in up, left, right, down order.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| self + direction.to_delta())
            .collect()
    }

    /// True when `other` is one non-diagonal step away.
    pub fn is_cardinal_neighbor(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Non-diagonal directions used for movement, pushing and target cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use shamble::{Direction, Position};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// Converts a unit delta back to a direction.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Left, Direction::Right, Direction::Down]
    }

    /// The opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Unique identifier for objects placed on the floor.
pub type ObjectId = Uuid;

/// Creates a new unique object ID.
pub fn new_object_id() -> ObjectId {
    Uuid::new_v4()
}

/// Reference to any object that can take part in an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRef {
    Entity(ObjectId),
    Furniture(ObjectId),
    Item(ObjectId),
}

impl ObjectRef {
    /// The underlying id regardless of layer.
    pub fn id(self) -> ObjectId {
        match self {
            ObjectRef::Entity(id) | ObjectRef::Furniture(id) | ObjectRef::Item(id) => id,
        }
    }

    /// Which object layer this reference points into.
    pub fn kind(self) -> TargetKind {
        match self {
            ObjectRef::Entity(_) => TargetKind::Entity,
            ObjectRef::Furniture(_) => TargetKind::Furniture,
            ObjectRef::Item(_) => TargetKind::Item,
        }
    }
}

/// Object layers, used as the primary sort key when selecting targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Entity,
    Furniture,
    Item,
}

impl TargetKind {
    /// Entities first, then furniture, then items.
    pub fn default_priority() -> Vec<TargetKind> {
        vec![TargetKind::Entity, TargetKind::Furniture, TargetKind::Item]
    }
}
