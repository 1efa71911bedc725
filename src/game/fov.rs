//! Field-of-view provider. Computing visibility is the host's job; the core
//! only asks whether a cell is currently visible to the player.

use super::Position;
use std::collections::HashSet;

/// Visibility query for the observing entity.
pub trait FieldOfView {
    fn is_visible(&self, pos: Position) -> bool;
}

/// Everything is visible. Used by headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVisible;

impl FieldOfView for AllVisible {
    fn is_visible(&self, _pos: Position) -> bool {
        true
    }
}

/// An explicit set of visible cells, as produced by an external FOV pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleCells {
    cells: HashSet<Position>,
}

impl VisibleCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: Position) {
        self.cells.insert(pos);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Position> for VisibleCells {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl FieldOfView for VisibleCells {
    fn is_visible(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_cells() {
        let fov: VisibleCells = [Position::new(1, 1), Position::new(2, 1)].into_iter().collect();
        assert!(fov.is_visible(Position::new(2, 1)));
        assert!(!fov.is_visible(Position::new(3, 1)));
        assert!(AllVisible.is_visible(Position::new(-4, 99)));
    }
}
