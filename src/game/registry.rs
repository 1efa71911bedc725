//! # Type Registry
//!
//! Immutable per-type configuration for tiles, furniture, entities and items.
//! A type name is unique across all four tables so a template legend value
//! can be dispatched by name alone.

use super::{
    new_object_id, Capabilities, Color, DoorState, Entity, EntityKind, Furniture, Item, ItemKind,
    Position, Tile, ZombieMemory,
};
use crate::{ShambleError, ShambleResult};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileType {
    pub name: String,
    pub glyph: char,
    pub color: Color,
    pub passable: bool,
    pub blocks_los: bool,
    pub exit: bool,
    pub room_placeholder: bool,
}

#[derive(Debug, Clone)]
pub struct FurnitureType {
    pub name: String,
    pub display_name: String,
    pub glyph: char,
    pub hp: Option<i32>,
    pub passable: bool,
    pub blocks_los: bool,
    pub is_wall: bool,
    pub door: Option<DoorState>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone)]
pub struct EntityType {
    pub name: String,
    pub display_name: String,
    pub kind: EntityKind,
    pub glyph: char,
    pub hp: i32,
    pub organic: bool,
    /// Item type equipped in the melee slot on spawn
    pub melee_weapon: Option<String>,
    /// Item type equipped in the ranged slot on spawn
    pub ranged_weapon: Option<String>,
    /// Item types carried on spawn
    pub inventory: Vec<String>,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone)]
pub struct ItemType {
    pub name: String,
    pub display_name: String,
    pub glyph: char,
    pub kind: ItemKind,
    pub capabilities: Capabilities,
}

/// A registered type found by name.
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    Tile(&'a TileType),
    Furniture(&'a FurnitureType),
    Entity(&'a EntityType),
    Item(&'a ItemType),
}

/// All content types known to a session.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    tiles: HashMap<String, TileType>,
    furniture: HashMap<String, FurnitureType>,
    entities: HashMap<String, EntityType>,
    items: HashMap<String, ItemType>,
    /// Tile stamped under wall furniture, opened doors and stripped placeholders
    pub floor_tile: String,
}

impl TypeRegistry {
    pub fn new(floor_tile: impl Into<String>) -> Self {
        Self {
            floor_tile: floor_tile.into(),
            ..Self::default()
        }
    }

    fn ensure_unique(&self, name: &str) -> ShambleResult<()> {
        if self.lookup(name).is_some() {
            return Err(ShambleError::InvalidConfiguration(format!(
                "Type name '{}' is registered twice",
                name
            )));
        }
        Ok(())
    }

    pub fn register_tile(&mut self, tile: TileType) -> ShambleResult<()> {
        self.ensure_unique(&tile.name)?;
        self.tiles.insert(tile.name.clone(), tile);
        Ok(())
    }

    pub fn register_furniture(&mut self, furniture: FurnitureType) -> ShambleResult<()> {
        self.ensure_unique(&furniture.name)?;
        self.furniture.insert(furniture.name.clone(), furniture);
        Ok(())
    }

    pub fn register_entity(&mut self, entity: EntityType) -> ShambleResult<()> {
        self.ensure_unique(&entity.name)?;
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    pub fn register_item(&mut self, item: ItemType) -> ShambleResult<()> {
        self.ensure_unique(&item.name)?;
        self.items.insert(item.name.clone(), item);
        Ok(())
    }

    /// Finds a type in any of the four tables.
    pub fn lookup(&self, name: &str) -> Option<TypeRef<'_>> {
        if let Some(tile) = self.tiles.get(name) {
            return Some(TypeRef::Tile(tile));
        }
        if let Some(furniture) = self.furniture.get(name) {
            return Some(TypeRef::Furniture(furniture));
        }
        if let Some(entity) = self.entities.get(name) {
            return Some(TypeRef::Entity(entity));
        }
        self.items.get(name).map(TypeRef::Item)
    }

    pub fn tile_type(&self, name: &str) -> ShambleResult<&TileType> {
        self.tiles
            .get(name)
            .ok_or_else(|| ShambleError::UnknownType(name.to_string()))
    }

    pub fn furniture_type(&self, name: &str) -> ShambleResult<&FurnitureType> {
        self.furniture
            .get(name)
            .ok_or_else(|| ShambleError::UnknownType(name.to_string()))
    }

    pub fn entity_type(&self, name: &str) -> ShambleResult<&EntityType> {
        self.entities
            .get(name)
            .ok_or_else(|| ShambleError::UnknownType(name.to_string()))
    }

    pub fn item_type(&self, name: &str) -> ShambleResult<&ItemType> {
        self.items
            .get(name)
            .ok_or_else(|| ShambleError::UnknownType(name.to_string()))
    }

    pub fn floor_tile_type(&self) -> ShambleResult<&TileType> {
        self.tile_type(&self.floor_tile)
    }

    pub fn make_tile(&self, name: &str) -> ShambleResult<Tile> {
        Ok(Tile::from_type(self.tile_type(name)?))
    }

    pub fn make_furniture(&self, name: &str, position: Position) -> ShambleResult<Furniture> {
        let config = self.furniture_type(name)?;
        let glyph = match config.door {
            Some(door) if door.open => door.open_glyph,
            Some(door) => door.closed_glyph,
            None => config.glyph,
        };
        Ok(Furniture {
            id: new_object_id(),
            type_name: config.name.clone(),
            name: config.display_name.clone(),
            position,
            glyph,
            hp: config.hp,
            passable: config.passable,
            blocks_los: config.blocks_los,
            is_wall: config.is_wall,
            door: config.door,
            dead: false,
            capabilities: config.capabilities.clone(),
        })
    }

    pub fn make_item(&self, name: &str, position: Position) -> ShambleResult<Item> {
        let config = self.item_type(name)?;
        Ok(Item {
            id: new_object_id(),
            type_name: config.name.clone(),
            name: config.display_name.clone(),
            position,
            glyph: config.glyph,
            kind: config.kind.clone(),
            capabilities: config.capabilities.clone(),
        })
    }

    /// Builds an entity with its starting equipment.
    pub fn make_entity(&self, name: &str, position: Position) -> ShambleResult<Entity> {
        let config = self.entity_type(name)?;
        let mut entity = Entity {
            id: new_object_id(),
            type_name: config.name.clone(),
            name: config.display_name.clone(),
            kind: config.kind,
            position,
            glyph: config.glyph,
            hp: config.hp,
            hp_max: config.hp,
            organic: config.organic,
            melee_weapon: None,
            ranged_weapon: None,
            inventory: Vec::new(),
            grab_target: None,
            horde_push_bonus: 0,
            knocked_down: 0,
            dead: false,
            memory: ZombieMemory::default(),
            capabilities: config.capabilities.clone(),
        };

        for item_name in &config.inventory {
            entity.inventory.push(self.make_item(item_name, position)?);
        }
        let equipment = [("melee", &config.melee_weapon), ("ranged", &config.ranged_weapon)];
        for (slot, item_name) in equipment {
            if let Some(item_name) = item_name {
                let item = self.make_item(item_name, position)?;
                let item_id = item.id;
                entity.inventory.push(item);
                entity.equip(item_id, slot)?;
            }
        }
        Ok(entity)
    }
}
