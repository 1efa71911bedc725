//! # Spatial Grids
//!
//! Dense per-cell storage. [`Array2d`] keeps exactly one value per cell and is
//! used for tiles and effect layers; [`ObjectManager`] keeps zero or more
//! objects per cell and is used for furniture, items, entities and markers.

use super::{ObjectId, Position};
use crate::{ShambleError, ShambleResult};
use std::collections::HashMap;

/// Objects that live at a single authoritative position.
pub trait Placed {
    fn id(&self) -> ObjectId;
    fn position(&self) -> Position;
    fn set_position(&mut self, position: Position);
}

/// Dense 2D grid with one value per cell.
///
/// # Examples
///
/// ```
/// use shamble::{Array2d, Position};
///
/// let mut grid = Array2d::new(3, 2, 0u8);
/// grid.set(Position::new(2, 1), 7).unwrap();
/// assert_eq!(grid.get(Position::new(2, 1)), Some(&7));
/// assert!(grid.get(Position::new(3, 0)).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Array2d<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Array2d<T> {
    /// Creates a grid filled with `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Resizes the grid, discarding its contents.
    pub fn set_size(&mut self, width: usize, height: usize, fill: T) {
        self.width = width;
        self.height = height;
        self.cells = vec![fill; width * height];
    }

    /// Overwrites every cell with `fill`.
    pub fn reset(&mut self, fill: T) {
        for cell in &mut self.cells {
            *cell = fill.clone();
        }
    }
}

impl<T> Array2d<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Checks whether a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.index(pos).map(move |index| &mut self.cells[index])
    }

    /// Replaces the value at `pos`.
    pub fn set(&mut self, pos: Position, value: T) -> ShambleResult<()> {
        let index = self.index(pos).ok_or(ShambleError::OutOfBounds(pos))?;
        self.cells[index] = value;
        Ok(())
    }

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.width * self.height)
            .map(move |index| Position::new((index % width) as i32, (index / width) as i32))
    }

    /// Every cell with its position in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, value)| {
            (
                Position::new((index % width) as i32, (index / width) as i32),
                value,
            )
        })
    }

    /// Calls `callback` for every cell.
    pub fn each<F: FnMut(Position, &T)>(&self, mut callback: F) {
        for (pos, value) in self.iter() {
            callback(pos, value);
        }
    }
}

/// Multi-occupant object grid with stable iteration order.
///
/// Objects are owned by the manager; the per-cell index and each object's own
/// position are updated together by [`ObjectManager::move_to`]. An exclusive
/// manager allows at most one object per cell.
#[derive(Debug, Clone)]
pub struct ObjectManager<T> {
    objects: HashMap<ObjectId, T>,
    order: Vec<ObjectId>,
    cells: Array2d<Vec<ObjectId>>,
    exclusive: bool,
}

impl<T: Placed> ObjectManager<T> {
    /// Creates a manager allowing any number of objects per cell.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            cells: Array2d::new(width, height, Vec::new()),
            exclusive: false,
        }
    }

    /// Creates a manager allowing a single object per cell.
    pub fn exclusive(width: usize, height: usize) -> Self {
        Self {
            exclusive: true,
            ..Self::new(width, height)
        }
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Resizes the grid and drops every object.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.objects.clear();
        self.order.clear();
        self.cells.set_size(width, height, Vec::new());
    }

    /// Drops every object, keeping the size.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.cells.reset(Vec::new());
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        self.cells.in_bounds(pos)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Places an object at its own position.
    pub fn add(&mut self, object: T) -> ShambleResult<ObjectId> {
        let id = object.id();
        let pos = object.position();
        let cell = self
            .cells
            .get_mut(pos)
            .ok_or(ShambleError::OutOfBounds(pos))?;
        if self.exclusive && !cell.is_empty() {
            return Err(ShambleError::CellOccupied(pos));
        }
        cell.push(id);
        self.order.push(id);
        self.objects.insert(id, object);
        Ok(id)
    }

    /// Takes an object off the grid and hands it back.
    pub fn remove(&mut self, id: ObjectId) -> Option<T> {
        let object = self.objects.remove(&id)?;
        if let Some(cell) = self.cells.get_mut(object.position()) {
            cell.retain(|&other| other != id);
        }
        self.order.retain(|&other| other != id);
        Some(object)
    }

    /// Relocates an object, keeping its position field and the index in sync.
    pub fn move_to(&mut self, id: ObjectId, pos: Position) -> ShambleResult<()> {
        if !self.cells.in_bounds(pos) {
            return Err(ShambleError::OutOfBounds(pos));
        }
        let from = self
            .objects
            .get(&id)
            .map(|object| object.position())
            .ok_or_else(|| ShambleError::InvalidState(format!("Object {} is not on the grid", id)))?;
        if from == pos {
            return Ok(());
        }
        if self.exclusive && self.cells.get(pos).map_or(false, |cell| !cell.is_empty()) {
            return Err(ShambleError::CellOccupied(pos));
        }

        if let Some(cell) = self.cells.get_mut(from) {
            cell.retain(|&other| other != id);
        }
        if let Some(cell) = self.cells.get_mut(pos) {
            cell.push(id);
        }
        if let Some(object) = self.objects.get_mut(&id) {
            object.set_position(pos);
        }
        Ok(())
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(&id)
    }

    /// Ids stacked at a cell, oldest first.
    pub fn ids_at(&self, pos: Position) -> &[ObjectId] {
        self.cells.get(pos).map(|cell| cell.as_slice()).unwrap_or(&[])
    }

    /// Objects stacked at a cell, oldest first.
    pub fn at(&self, pos: Position) -> impl Iterator<Item = &T> {
        self.ids_at(pos)
            .iter()
            .filter_map(move |id| self.objects.get(id))
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.ids_at(pos).is_empty()
    }

    /// The oldest object at a cell matching `predicate`.
    pub fn first_at<P: Fn(&T) -> bool>(&self, pos: Position, predicate: P) -> Option<&T> {
        self.at(pos).find(|object| predicate(object))
    }

    /// The newest object at a cell matching `predicate`.
    pub fn last_at<P: Fn(&T) -> bool>(&self, pos: Position, predicate: P) -> Option<&T> {
        self.ids_at(pos)
            .iter()
            .rev()
            .filter_map(|id| self.objects.get(id))
            .find(|object| predicate(object))
    }

    /// All objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(move |id| self.objects.get(id))
    }

    /// Snapshot of ids in insertion order, safe to hold while mutating.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    /// Calls `callback` for every object in insertion order.
    pub fn each<F: FnMut(&T)>(&self, mut callback: F) {
        for object in self.iter() {
            callback(object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_object_id;

    #[derive(Debug, Clone, PartialEq)]
    struct Crate {
        id: ObjectId,
        position: Position,
        label: &'static str,
    }

    impl Crate {
        fn at(x: i32, y: i32, label: &'static str) -> Self {
            Self {
                id: new_object_id(),
                position: Position::new(x, y),
                label,
            }
        }
    }

    impl Placed for Crate {
        fn id(&self) -> ObjectId {
            self.id
        }

        fn position(&self) -> Position {
            self.position
        }

        fn set_position(&mut self, position: Position) {
            self.position = position;
        }
    }

    #[test]
    fn test_array2d_bounds_and_iteration() {
        let mut grid = Array2d::new(4, 3, '.');
        assert!(grid.set(Position::new(4, 0), '#').is_err());
        grid.set(Position::new(1, 2), '#').unwrap();

        let walls: Vec<Position> = grid
            .iter()
            .filter(|(_, &c)| c == '#')
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(walls, vec![Position::new(1, 2)]);
        assert_eq!(grid.positions().count(), 12);

        grid.reset('.');
        assert_eq!(grid.get(Position::new(1, 2)), Some(&'.'));
        grid.set_size(2, 2, 'x');
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.get(Position::new(1, 1)), Some(&'x'));
    }

    #[test]
    fn test_stacking_and_first_last() {
        let mut manager = ObjectManager::new(5, 5);
        let bottom = manager.add(Crate::at(2, 2, "bottom")).unwrap();
        let top = manager.add(Crate::at(2, 2, "top")).unwrap();

        assert_eq!(manager.ids_at(Position::new(2, 2)), &[bottom, top]);
        assert_eq!(
            manager.first_at(Position::new(2, 2), |_| true).unwrap().label,
            "bottom"
        );
        assert_eq!(
            manager.last_at(Position::new(2, 2), |_| true).unwrap().label,
            "top"
        );
        assert!(manager.first_at(Position::new(2, 2), |c| c.label == "none").is_none());
    }

    #[test]
    fn test_move_keeps_index_and_field_in_sync() {
        let mut manager = ObjectManager::new(5, 5);
        let id = manager.add(Crate::at(1, 1, "box")).unwrap();

        manager.move_to(id, Position::new(3, 4)).unwrap();
        assert!(manager.is_empty_at(Position::new(1, 1)));
        assert_eq!(manager.ids_at(Position::new(3, 4)), &[id]);
        assert_eq!(manager.get(id).unwrap().position, Position::new(3, 4));

        assert!(manager.move_to(id, Position::new(9, 9)).is_err());
        assert_eq!(manager.get(id).unwrap().position, Position::new(3, 4));
    }

    #[test]
    fn test_exclusive_rejects_second_occupant() {
        let mut manager = ObjectManager::exclusive(3, 3);
        let first = manager.add(Crate::at(0, 0, "a")).unwrap();
        let second = manager.add(Crate::at(1, 0, "b")).unwrap();

        assert!(matches!(
            manager.add(Crate::at(0, 0, "c")),
            Err(ShambleError::CellOccupied(_))
        ));
        assert!(manager.move_to(second, Position::new(0, 0)).is_err());
        assert_eq!(manager.get(second).unwrap().position, Position::new(1, 0));
        assert_eq!(manager.ids(), vec![first, second]);
    }

    #[test]
    fn test_remove_and_order() {
        let mut manager = ObjectManager::new(3, 3);
        let a = manager.add(Crate::at(0, 0, "a")).unwrap();
        let b = manager.add(Crate::at(1, 1, "b")).unwrap();
        let c = manager.add(Crate::at(2, 2, "c")).unwrap();

        let removed = manager.remove(b).unwrap();
        assert_eq!(removed.label, "b");
        assert!(manager.remove(b).is_none());
        assert_eq!(manager.ids(), vec![a, c]);
        assert!(manager.is_empty_at(Position::new(1, 1)));

        let mut labels = Vec::new();
        manager.each(|c| labels.push(c.label));
        assert_eq!(labels, vec!["a", "c"]);

        manager.reset();
        assert!(manager.is_empty());
    }
}
