//! # Generation Module
//!
//! Procedural floor generation from character-grid templates.
//!
//! A floor template lays down the shell and hallways and marks one origin per
//! room slot. Room templates are rotated, stamped into the slots, and doors are
//! cut where neighbouring rooms agree on a shared wall.

pub mod content;
pub mod floor;
pub mod template;

pub use floor::*;
pub use template::*;

use crate::game::{GameState, Position};
use crate::ShambleResult;
use std::fmt;

/// Trait for procedural generators.
///
/// Generators write directly into the floor state they are given and return a
/// summary of what they built.
pub trait Generator<T> {
    /// Generates content into `state`.
    fn generate(&self, state: &mut GameState) -> ShambleResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, state: &GameState) -> ShambleResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// One of the four sides of a rectangle, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub fn all() -> [Side; 4] {
        [Side::Top, Side::Right, Side::Bottom, Side::Left]
    }

    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    pub fn from_index(index: usize) -> Side {
        Side::all()[index % 4]
    }

    /// The side this one ends up on after `rotation` clockwise quarter turns.
    pub fn rotated(self, rotation: usize) -> Side {
        Side::from_index(self.index() + rotation)
    }

    /// Unit vector pointing out of the rectangle.
    pub fn outward(self) -> Position {
        match self {
            Side::Top => Position::new(0, -1),
            Side::Right => Position::new(1, 0),
            Side::Bottom => Position::new(0, 1),
            Side::Left => Position::new(-1, 0),
        }
    }
}

/// What lies beyond a room side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideKind {
    Room,
    Hallway,
    MapEdge,
    None,
}

impl fmt::Display for SideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SideKind::Room => "room",
            SideKind::Hallway => "hallway",
            SideKind::MapEdge => "map_edge",
            SideKind::None => "none",
        };
        f.write_str(name)
    }
}

/// A room template instance placed on the floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: usize,
    pub template: String,
    pub origin: Position,
    /// Clockwise quarter turns, 0-3
    pub rotation: usize,
    /// Footprint width after rotation
    pub width: u32,
    /// Footprint height after rotation
    pub height: u32,
    /// Indexed by [`Side::index`] in world orientation
    pub sides: [SideKind; 4],
    /// Whether each world side may receive a random door
    pub random_doors: [bool; 4],
}

impl Room {
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.origin.x + self.width as i32 - 1,
            self.origin.y + self.height as i32 - 1,
        )
    }

    /// Checks if a position is inside this room's footprint, walls included.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.origin.x
            && pos.y >= self.origin.y
            && pos.x < self.origin.x + self.width as i32
            && pos.y < self.origin.y + self.height as i32
    }

    /// Checks if a position is on the border of this room.
    pub fn is_border(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let far = self.bottom_right();
        pos.x == self.origin.x || pos.y == self.origin.y || pos.x == far.x || pos.y == far.y
    }

    /// End points of a side's wall segment, corners included.
    pub fn side_segment(&self, side: Side) -> (Position, Position) {
        let near = self.origin;
        let far = self.bottom_right();
        match side {
            Side::Top => (near, Position::new(far.x, near.y)),
            Side::Right => (Position::new(far.x, near.y), far),
            Side::Bottom => (Position::new(near.x, far.y), far),
            Side::Left => (near, Position::new(near.x, far.y)),
        }
    }

    /// The cell just outside the middle of a side.
    pub fn side_probe(&self, side: Side) -> Position {
        let (start, end) = self.side_segment(side);
        let middle = Position::new((start.x + end.x) / 2, (start.y + end.y) / 2);
        middle + side.outward()
    }

    pub fn side_kind(&self, side: Side) -> SideKind {
        self.sides[side.index()]
    }
}

/// Cells strictly between two end points of a straight segment.
pub fn segment_interior(start: Position, end: Position) -> Vec<Position> {
    let cells = crate::line_between(start, end);
    if cells.len() <= 2 {
        return Vec::new();
    }
    cells[1..cells.len() - 1].to_vec()
}
