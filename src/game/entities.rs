//! # Floor Objects
//!
//! Entities (player and zombies), furniture, items and generation markers.
//! Each object owns its capability table and mirrors its grid position in its
//! own `position` field; the owning [`ObjectManager`](super::ObjectManager)
//! keeps both in step.

use super::{AreaEffect, Capabilities, ObjectId, ObjectRef, Placed, Position};
use crate::{ShambleError, ShambleResult};
use serde::{Deserialize, Serialize};

/// Which side an entity plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Zombie,
}

/// Perception and pacing state carried between zombie turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZombieMemory {
    pub player_last_seen: Option<Position>,
    pub turns_since_last_stumble: u32,
}

/// A player or zombie. At most one entity occupies a cell.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: ObjectId,
    pub type_name: String,
    pub name: String,
    pub kind: EntityKind,
    pub position: Position,
    pub glyph: char,
    pub hp: i32,
    pub hp_max: i32,
    /// Organic targets bleed when hurt
    pub organic: bool,
    pub melee_weapon: Option<Item>,
    pub ranged_weapon: Option<Item>,
    pub inventory: Vec<Item>,
    pub grab_target: Option<ObjectRef>,
    pub horde_push_bonus: i32,
    /// Remaining turns spent on the floor
    pub knocked_down: u32,
    pub dead: bool,
    pub memory: ZombieMemory,
    pub capabilities: Capabilities,
}

impl Entity {
    pub fn is_alive(&self) -> bool {
        !self.dead && self.hp > 0
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn melee_stats(&self) -> Option<&WeaponStats> {
        match self.melee_weapon.as_ref().map(|item| &item.kind) {
            Some(ItemKind::Melee(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn ranged_stats(&self) -> Option<&RangedStats> {
        match self.ranged_weapon.as_ref().map(|item| &item.kind) {
            Some(ItemKind::Ranged(stats)) => Some(stats),
            _ => None,
        }
    }

    pub fn ranged_stats_mut(&mut self) -> Option<&mut RangedStats> {
        match self.ranged_weapon.as_mut().map(|item| &mut item.kind) {
            Some(ItemKind::Ranged(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Damage of the equipped melee weapon, if any.
    pub fn melee_damage(&self) -> Option<i32> {
        self.melee_stats().map(|stats| stats.damage)
    }

    /// Position of an inventory item by id.
    pub fn inventory_index(&self, item_id: ObjectId) -> Option<usize> {
        self.inventory.iter().position(|item| item.id == item_id)
    }

    /// Moves an inventory item into an equipment slot.
    ///
    /// Whatever occupied the slot goes back to the inventory. A slot that does
    /// not exist or an item that does not fit the slot is a content error.
    pub fn equip(&mut self, item_id: ObjectId, slot: &str) -> ShambleResult<()> {
        let slot = EquipSlot::from_name(slot)?;
        let index = self.inventory_index(item_id).ok_or_else(|| {
            ShambleError::InvalidState(format!("{} does not carry item {}", self.name, item_id))
        })?;

        let fits = matches!(
            (slot, &self.inventory[index].kind),
            (EquipSlot::Melee, ItemKind::Melee(_)) | (EquipSlot::Ranged, ItemKind::Ranged(_))
        );
        if !fits {
            return Err(ShambleError::InvalidConfiguration(format!(
                "{} cannot be equipped in the {} slot",
                self.inventory[index].name,
                slot.name()
            )));
        }

        let item = self.inventory.remove(index);
        let previous = match slot {
            EquipSlot::Melee => self.melee_weapon.replace(item),
            EquipSlot::Ranged => self.ranged_weapon.replace(item),
        };
        if let Some(previous) = previous {
            self.inventory.push(previous);
        }
        Ok(())
    }

    /// Loads an ammo item from the inventory into the equipped ranged weapon.
    ///
    /// Returns the number of rounds loaded. Ammo of the wrong type is a
    /// content error.
    pub fn load_ammo(&mut self, item_id: ObjectId) -> ShambleResult<u32> {
        let index = self.inventory_index(item_id).ok_or_else(|| {
            ShambleError::InvalidState(format!("{} does not carry item {}", self.name, item_id))
        })?;
        let (ammo_type, rounds) = match &self.inventory[index].kind {
            ItemKind::Ammo { ammo_type, rounds } => (ammo_type.clone(), *rounds),
            _ => {
                return Err(ShambleError::InvalidConfiguration(format!(
                    "{} is not ammunition",
                    self.inventory[index].name
                )))
            }
        };

        let owner = self.name.clone();
        let stats = self.ranged_stats_mut().ok_or_else(|| {
            ShambleError::InvalidConfiguration(format!("{} has no ranged weapon to load", owner))
        })?;
        if stats.ammo_type.as_deref() != Some(ammo_type.as_str()) {
            return Err(ShambleError::InvalidConfiguration(format!(
                "{} ammo does not fit this weapon",
                ammo_type
            )));
        }

        let space = stats.capacity.saturating_sub(stats.loaded);
        let loaded = space.min(rounds);
        stats.loaded += loaded;

        let remaining = rounds - loaded;
        if remaining == 0 {
            self.inventory.remove(index);
        } else if let ItemKind::Ammo { rounds, .. } = &mut self.inventory[index].kind {
            *rounds = remaining;
        }
        Ok(loaded)
    }

    /// Consumes a healing item. Returns the hp actually restored.
    pub fn use_item(&mut self, item_id: ObjectId) -> ShambleResult<i32> {
        let index = self.inventory_index(item_id).ok_or_else(|| {
            ShambleError::InvalidState(format!("{} does not carry item {}", self.name, item_id))
        })?;
        let amount = match self.inventory[index].kind {
            ItemKind::Healing { amount } => amount,
            _ => return Ok(0),
        };
        self.inventory.remove(index);
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.hp_max);
        Ok(self.hp - before)
    }
}

impl Placed for Entity {
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

/// Open/closed state of door-like furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    pub open: bool,
    pub open_glyph: char,
    pub closed_glyph: char,
    /// Whether the closed door hides what is behind it
    pub closed_blocks_los: bool,
}

/// Walls, doors, desks and anything else standing on a cell.
#[derive(Debug, Clone)]
pub struct Furniture {
    pub id: ObjectId,
    pub type_name: String,
    pub name: String,
    pub position: Position,
    pub glyph: char,
    /// `None` means indestructible
    pub hp: Option<i32>,
    pub passable: bool,
    pub blocks_los: bool,
    /// Wall furniture is the passability authority of its cell
    pub is_wall: bool,
    pub door: Option<DoorState>,
    pub dead: bool,
    pub capabilities: Capabilities,
}

impl Furniture {
    /// Whether this piece can be worn down by attacks.
    pub fn is_destructible(&self) -> bool {
        self.hp.is_some()
    }

    /// Applies a door transition and the matching passability changes.
    pub fn set_open(&mut self, open: bool) {
        if let Some(door) = self.door.as_mut() {
            door.open = open;
            self.glyph = if open { door.open_glyph } else { door.closed_glyph };
            self.passable = open;
            self.blocks_los = !open && door.closed_blocks_los;
        }
    }

    pub fn is_open(&self) -> bool {
        self.door.map_or(false, |door| door.open)
    }
}

impl Placed for Furniture {
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

/// Damage and side effects of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: i32,
    pub knock_back: Option<u32>,
    pub knock_down: Option<u32>,
    pub area: Option<AreaEffect>,
}

/// A ranged weapon's stats and magazine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedStats {
    pub weapon: WeaponStats,
    pub range: u32,
    /// `None` for weapons that never need reloading
    pub ammo_type: Option<String>,
    pub loaded: u32,
    pub capacity: u32,
}

impl RangedStats {
    pub fn has_ammo(&self) -> bool {
        self.ammo_type.is_none() || self.loaded > 0
    }
}

/// What an item does once carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Melee(WeaponStats),
    Ranged(RangedStats),
    Ammo { ammo_type: String, rounds: u32 },
    Healing { amount: i32 },
    Junk,
}

/// An item lying on the grid or carried by an entity, never both.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ObjectId,
    pub type_name: String,
    pub name: String,
    /// Meaningful only while the item is on the grid
    pub position: Position,
    pub glyph: char,
    pub kind: ItemKind,
    pub capabilities: Capabilities,
}

impl Placed for Item {
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

/// Equipment slots an entity has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Melee,
    Ranged,
}

impl EquipSlot {
    pub fn name(self) -> &'static str {
        match self {
            EquipSlot::Melee => "melee",
            EquipSlot::Ranged => "ranged",
        }
    }

    pub fn from_name(name: &str) -> ShambleResult<Self> {
        match name {
            "melee" => Ok(EquipSlot::Melee),
            "ranged" => Ok(EquipSlot::Ranged),
            other => Err(ShambleError::InvalidConfiguration(format!(
                "No equipment slot named '{}'",
                other
            ))),
        }
    }
}

/// Generation-only marker left by a template; never part of gameplay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationMarker {
    pub id: ObjectId,
    pub position: Position,
    /// Marker family, e.g. `door` or `room`
    pub placeholder: String,
    /// Type to instantiate when the marker is consumed
    pub value: String,
}

impl Placed for GenerationMarker {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::new_object_id;

    fn item(name: &str, kind: ItemKind) -> Item {
        Item {
            id: new_object_id(),
            type_name: name.to_string(),
            name: name.to_string(),
            position: Position::new(0, 0),
            glyph: '!',
            kind,
            capabilities: Capabilities::new(),
        }
    }

    fn survivor() -> Entity {
        Entity {
            id: new_object_id(),
            type_name: "player".to_string(),
            name: "Survivor".to_string(),
            kind: EntityKind::Player,
            position: Position::new(1, 1),
            glyph: '@',
            hp: 5,
            hp_max: 10,
            organic: true,
            melee_weapon: None,
            ranged_weapon: None,
            inventory: Vec::new(),
            grab_target: None,
            horde_push_bonus: 0,
            knocked_down: 0,
            dead: false,
            memory: ZombieMemory::default(),
            capabilities: Capabilities::new(),
        }
    }

    fn pistol() -> Item {
        item(
            "pistol",
            ItemKind::Ranged(RangedStats {
                weapon: WeaponStats {
                    damage: 3,
                    ..WeaponStats::default()
                },
                range: 6,
                ammo_type: Some("9mm".to_string()),
                loaded: 0,
                capacity: 6,
            }),
        )
    }

    #[test]
    fn test_equip_swaps_previous_weapon_back() {
        let mut entity = survivor();
        let stapler = item("stapler", ItemKind::Melee(WeaponStats { damage: 1, ..Default::default() }));
        let crowbar = item("crowbar", ItemKind::Melee(WeaponStats { damage: 3, ..Default::default() }));
        let (stapler_id, crowbar_id) = (stapler.id, crowbar.id);
        entity.inventory.push(stapler);
        entity.inventory.push(crowbar);

        entity.equip(stapler_id, "melee").unwrap();
        assert_eq!(entity.melee_damage(), Some(1));
        entity.equip(crowbar_id, "melee").unwrap();
        assert_eq!(entity.melee_damage(), Some(3));
        assert_eq!(entity.inventory.len(), 1);
        assert_eq!(entity.inventory[0].id, stapler_id);
    }

    #[test]
    fn test_equip_rejects_bad_slot_and_kind() {
        let mut entity = survivor();
        let medkit = item("medkit", ItemKind::Healing { amount: 4 });
        let medkit_id = medkit.id;
        entity.inventory.push(medkit);

        assert!(matches!(
            entity.equip(medkit_id, "hat"),
            Err(ShambleError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            entity.equip(medkit_id, "melee"),
            Err(ShambleError::InvalidConfiguration(_))
        ));
        assert_eq!(entity.inventory.len(), 1);
    }

    #[test]
    fn test_load_ammo_checks_type() {
        let mut entity = survivor();
        let gun = pistol();
        let gun_id = gun.id;
        entity.inventory.push(gun);
        entity.equip(gun_id, "ranged").unwrap();
        assert!(!entity.ranged_stats().unwrap().has_ammo());

        let shells = item(
            "shells",
            ItemKind::Ammo {
                ammo_type: "12gauge".to_string(),
                rounds: 4,
            },
        );
        let shells_id = shells.id;
        entity.inventory.push(shells);
        assert!(matches!(
            entity.load_ammo(shells_id),
            Err(ShambleError::InvalidConfiguration(_))
        ));

        let rounds = item(
            "rounds",
            ItemKind::Ammo {
                ammo_type: "9mm".to_string(),
                rounds: 10,
            },
        );
        let rounds_id = rounds.id;
        entity.inventory.push(rounds);
        assert_eq!(entity.load_ammo(rounds_id).unwrap(), 6);
        assert_eq!(entity.ranged_stats().unwrap().loaded, 6);
        let leftover = entity.inventory.iter().find(|i| i.id == rounds_id).unwrap();
        assert_eq!(
            leftover.kind,
            ItemKind::Ammo {
                ammo_type: "9mm".to_string(),
                rounds: 4
            }
        );
    }

    #[test]
    fn test_use_item_heals_up_to_max() {
        let mut entity = survivor();
        let medkit = item("medkit", ItemKind::Healing { amount: 8 });
        let medkit_id = medkit.id;
        entity.inventory.push(medkit);

        assert_eq!(entity.use_item(medkit_id).unwrap(), 5);
        assert_eq!(entity.hp, 10);
        assert!(entity.inventory.is_empty());
    }

    #[test]
    fn test_door_transitions() {
        let mut door = Furniture {
            id: new_object_id(),
            type_name: "wooden_door".to_string(),
            name: "wooden door".to_string(),
            position: Position::new(0, 0),
            glyph: '+',
            hp: Some(6),
            passable: false,
            blocks_los: true,
            is_wall: false,
            door: Some(DoorState {
                open: false,
                open_glyph: '\'',
                closed_glyph: '+',
                closed_blocks_los: true,
            }),
            dead: false,
            capabilities: Capabilities::new(),
        };

        door.set_open(true);
        assert!(door.is_open());
        assert!(door.passable);
        assert!(!door.blocks_los);
        assert_eq!(door.glyph, '\'');

        door.set_open(false);
        assert!(!door.passable);
        assert!(door.blocks_los);
        assert_eq!(door.glyph, '+');
    }

    #[test]
    fn test_glass_door_stays_see_through() {
        let mut door = Furniture {
            id: new_object_id(),
            type_name: "glass_door".to_string(),
            name: "glass door".to_string(),
            position: Position::new(0, 0),
            glyph: '"',
            hp: Some(2),
            passable: false,
            blocks_los: false,
            is_wall: false,
            door: Some(DoorState {
                open: false,
                open_glyph: '\'',
                closed_glyph: '"',
                closed_blocks_los: false,
            }),
            dead: false,
            capabilities: Capabilities::new(),
        };

        door.set_open(true);
        door.set_open(false);
        assert!(!door.passable);
        assert!(!door.blocks_los);
        assert_eq!(door.glyph, '"');
    }
}
