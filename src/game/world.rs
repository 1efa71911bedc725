//! # Tiles
//!
//! One tile per cell. Tiles are created when the floor is first loaded and
//! afterwards only mutated in place: retyping keeps accumulated blood and the
//! explored flag.

use super::TileType;
use serde::{Deserialize, Serialize};

/// RGB display color handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Terrain occupying a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub type_name: String,
    pub glyph: char,
    pub color: Color,
    pub passable: bool,
    pub blocks_los: bool,
    /// Blood intensity, only ever grows and never exceeds the configured max
    pub blood: u32,
    pub explored: bool,
    /// Stepping here ends the floor
    pub exit: bool,
    /// Generation-only room footprint marker
    pub room_placeholder: bool,
}

impl Tile {
    /// The filler used before any template has been loaded.
    pub fn void() -> Self {
        Self {
            type_name: String::new(),
            glyph: ' ',
            color: Color::default(),
            passable: false,
            blocks_los: true,
            blood: 0,
            explored: false,
            exit: false,
            room_placeholder: false,
        }
    }

    pub fn from_type(tile_type: &TileType) -> Self {
        let mut tile = Self::void();
        tile.retype(tile_type);
        tile
    }

    /// Whether nothing has been loaded into this cell yet.
    pub fn is_void(&self) -> bool {
        self.type_name.is_empty()
    }

    /// Changes the terrain type in place.
    pub fn retype(&mut self, tile_type: &TileType) {
        self.type_name = tile_type.name.clone();
        self.glyph = tile_type.glyph;
        self.color = tile_type.color;
        self.passable = tile_type.passable;
        self.blocks_los = tile_type.blocks_los;
        self.exit = tile_type.exit;
        self.room_placeholder = tile_type.room_placeholder;
    }

    /// Adds blood, saturating at `max`. Returns the new intensity.
    pub fn splatter(&mut self, amount: u32, max: u32) -> u32 {
        self.blood = self.blood.saturating_add(amount).min(max.max(self.blood));
        self.blood
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::void()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carpet() -> TileType {
        TileType {
            name: "carpet".to_string(),
            glyph: '.',
            color: Color::new(90, 80, 120),
            passable: true,
            blocks_los: false,
            exit: false,
            room_placeholder: false,
        }
    }

    #[test]
    fn test_retype_keeps_blood_and_explored() {
        let mut tile = Tile::from_type(&carpet());
        tile.splatter(3, 10);
        tile.explored = true;

        let elevator = TileType {
            name: "elevator".to_string(),
            exit: true,
            ..carpet()
        };
        tile.retype(&elevator);
        assert_eq!(tile.type_name, "elevator");
        assert!(tile.exit);
        assert_eq!(tile.blood, 3);
        assert!(tile.explored);
    }

    #[test]
    fn test_splatter_clamps() {
        let mut tile = Tile::from_type(&carpet());
        assert_eq!(tile.splatter(4, 5), 4);
        assert_eq!(tile.splatter(4, 5), 5);
        assert_eq!(tile.splatter(u32::MAX, 5), 5);
    }

    #[test]
    fn test_void_tile() {
        let tile = Tile::default();
        assert!(tile.is_void());
        assert!(!tile.passable);
    }
}
