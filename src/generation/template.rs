//! # Template Compositor
//!
//! Character-grid templates with per-character legends. Every character is
//! looked up twice, once in the tile layer and once in the object layer, and
//! the legend value is resolved through the random data grammar before being
//! dispatched by type name.

use super::Side;
use crate::game::{GameState, GenerationMarker, Position, TypeRef};
use crate::{new_object_id, RandomData, ShambleError, ShambleResult};
use std::collections::HashMap;

/// A single legend outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spawn {
    /// A registered tile, furniture, entity or item type
    Type(String),
    /// A generation marker consumed later by the floor generator
    Placeholder { placeholder: String, value: String },
}

impl Spawn {
    pub fn of(name: &str) -> Self {
        Spawn::Type(name.to_string())
    }

    pub fn placeholder(placeholder: &str, value: &str) -> Self {
        Spawn::Placeholder {
            placeholder: placeholder.to_string(),
            value: value.to_string(),
        }
    }
}

/// Character legend for one layer.
#[derive(Debug, Clone, Default)]
pub struct TemplateLayer {
    pub legend: HashMap<char, RandomData<Spawn>>,
    /// Used for characters missing from the legend
    pub default: Option<RandomData<Spawn>>,
}

impl TemplateLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, data: RandomData<Spawn>) -> Self {
        self.default = Some(data);
        self
    }

    pub fn with(mut self, key: char, data: RandomData<Spawn>) -> Self {
        self.legend.insert(key, data);
        self
    }

    pub fn lookup(&self, key: char) -> Option<&RandomData<Spawn>> {
        self.legend.get(&key).or(self.default.as_ref())
    }
}

/// A rectangular grid of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl CharGrid {
    /// Builds a grid from equal-length rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> ShambleResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 {
            return Err(ShambleError::InvalidConfiguration(
                "Template has no cells".to_string(),
            ));
        }
        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row: Vec<char> = row.as_ref().chars().collect();
            if row.len() != width {
                return Err(ShambleError::InvalidConfiguration(format!(
                    "Template row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// A quarter turn clockwise: transpose, then reverse every row.
    pub fn rotate_clockwise(&self) -> Self {
        let (width, height) = (self.height, self.width);
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..height {
            for x in 0..width {
                cells.push(self.cells[(self.height - 1 - x) * self.width + y]);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().collect())
            .collect()
    }
}

/// A named template with all four rotations computed up front.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub tiles: TemplateLayer,
    pub objects: TemplateLayer,
    /// Indexed by [`Side::index`] in template orientation
    pub random_doors: [bool; 4],
    rotations: [CharGrid; 4],
}

impl Template {
    pub fn new<S: AsRef<str>>(
        name: &str,
        rows: &[S],
        tiles: TemplateLayer,
        objects: TemplateLayer,
    ) -> ShambleResult<Self> {
        let base = CharGrid::from_rows(rows)?;
        let quarter = base.rotate_clockwise();
        let half = quarter.rotate_clockwise();
        let three_quarters = half.rotate_clockwise();
        Ok(Self {
            name: name.to_string(),
            tiles,
            objects,
            random_doors: [false; 4],
            rotations: [base, quarter, half, three_quarters],
        })
    }

    /// Marks which sides may receive a door during floor generation.
    pub fn with_random_doors(mut self, sides: &[Side]) -> Self {
        for side in sides {
            self.random_doors[side.index()] = true;
        }
        self
    }

    /// The grid for `rotation` clockwise quarter turns.
    pub fn grid(&self, rotation: usize) -> &CharGrid {
        &self.rotations[rotation % 4]
    }

    pub fn is_square(&self) -> bool {
        self.rotations[0].width() == self.rotations[0].height()
    }

    /// Rotations that keep the template usable in a slot. Non-square
    /// templates only flip so their footprint stays the same.
    pub fn allowed_rotations(&self) -> &'static [usize] {
        if self.is_square() {
            &[0, 1, 2, 3]
        } else {
            &[0, 2]
        }
    }

    /// Stamps the template onto the floor.
    ///
    /// Outside the first pass, passable tiles never replace impassable ones
    /// and nothing lands on impassable furniture.
    pub fn load(
        &self,
        state: &mut GameState,
        origin: Position,
        rotation: usize,
        first_pass: bool,
    ) -> ShambleResult<()> {
        let grid = self.grid(rotation);
        log::debug!(
            "Loading template '{}' at {} rotated {} times",
            self.name,
            origin,
            rotation % 4
        );

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let pos = origin + Position::new(x as i32, y as i32);
                if !state.in_bounds(pos) {
                    return Err(ShambleError::OutOfBounds(pos));
                }
                let key = match grid.get(x, y) {
                    Some(key) => key,
                    None => continue,
                };

                for layer in [&self.tiles, &self.objects] {
                    let data = match layer.lookup(key) {
                        Some(data) => data,
                        None => continue,
                    };
                    for spawn in state.random.resolve(data) {
                        place_spawn(state, spawn, pos, first_pass)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn place_spawn(
    state: &mut GameState,
    spawn: Spawn,
    pos: Position,
    first_pass: bool,
) -> ShambleResult<()> {
    let name = match spawn {
        Spawn::Placeholder { placeholder, value } => {
            state.markers.add(GenerationMarker {
                id: new_object_id(),
                position: pos,
                placeholder,
                value,
            })?;
            return Ok(());
        }
        Spawn::Type(name) => name,
    };

    let registry = state.registry.clone();
    match registry.lookup(&name) {
        Some(TypeRef::Tile(tile_type)) => {
            if !first_pass {
                let blocked_terrain = state
                    .tile(pos)
                    .map_or(false, |tile| !tile.is_void() && !tile.passable && tile_type.passable);
                let blocked_by_furniture = state.furniture.first_at(pos, |f| !f.passable).is_some();
                if blocked_terrain || blocked_by_furniture {
                    return Ok(());
                }
            }
            if let Some(tile) = state.tiles.get_mut(pos) {
                tile.retype(tile_type);
            }
        }
        Some(TypeRef::Furniture(furniture_type)) => {
            if furniture_type.is_wall {
                let has_wall = state.furniture.first_at(pos, |f| f.is_wall).is_some();
                let solid_ground = state.tile(pos).map_or(false, |tile| !tile.passable);
                if has_wall || solid_ground {
                    return Ok(());
                }
                let floor = registry.floor_tile_type()?;
                if let Some(tile) = state.tiles.get_mut(pos) {
                    tile.retype(floor);
                }
            }
            state.spawn_furniture(&name, pos)?;
        }
        Some(TypeRef::Entity(entity_type)) => {
            if !state.entities.is_empty_at(pos) {
                log::debug!("Skipping {} at {}: cell taken", name, pos);
                return Ok(());
            }
            if entity_type.kind == crate::EntityKind::Player {
                state.spawn_player(&name, pos)?;
            } else {
                state.spawn_entity(&name, pos)?;
            }
        }
        Some(TypeRef::Item(_)) => {
            state.spawn_item(&name, pos)?;
        }
        None => return Err(ShambleError::UnknownType(name)),
    }
    Ok(())
}
