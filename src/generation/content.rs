//! # Built-in Content
//!
//! The default office floor: tile, furniture, entity and item types with
//! their capability tables, plus the floor and room templates.

use super::{FloorGenerator, FloorLayout, Generator, Side, Spawn, Template, TemplateLayer};
use super::floor::{DOOR_PLACEHOLDER, ROOM_PLACEHOLDER};
use crate::game::actions::{combat, interact};
use crate::game::{
    ActionKind, AreaEffect, Capabilities, Color, DoorState, EntityKind, EntityType, FurnitureType,
    GameState, ItemKind, ItemType, KnockBackOrigin, RangedStats, TileType, TypeRegistry,
    WeaponStats,
};
use crate::{config, GameConfig, RandomData, ShambleResult};
use std::sync::Arc;

// Tiles
pub const FLOOR: &str = "floor";
pub const CARPET: &str = "carpet";
pub const LINOLEUM: &str = "linoleum";
pub const WALL_TILE: &str = "outer_wall";
pub const ELEVATOR: &str = "elevator";
pub const ROOM_FOOTPRINT: &str = "room_footprint";

// Furniture
pub const OFFICE_WALL: &str = "office_wall";
pub const WOODEN_DOOR: &str = "wooden_door";
pub const GLASS_DOOR: &str = "glass_door";
pub const DESK: &str = "desk";
pub const OFFICE_CHAIR: &str = "office_chair";
pub const VENDING_MACHINE: &str = "vending_machine";

// Entities
pub const PLAYER: &str = "player";
pub const ZOMBIE: &str = "zombie";

// Items
pub const UMBRELLA: &str = "umbrella";
pub const FIRE_AXE: &str = "fire_axe";
pub const ZOMBIE_BITE: &str = "zombie_bite";
pub const NAIL_GUN: &str = "nail_gun";
pub const NAILS: &str = "nails";
pub const FIRE_EXTINGUISHER: &str = "fire_extinguisher";
pub const FIRST_AID_KIT: &str = "first_aid_kit";
pub const COFFEE: &str = "coffee";

fn tile(name: &str, glyph: char, color: Color, passable: bool) -> TileType {
    TileType {
        name: name.to_string(),
        glyph,
        color,
        passable,
        blocks_los: !passable,
        exit: false,
        room_placeholder: false,
    }
}

fn player_capabilities() -> Capabilities {
    Capabilities::new()
        .with_performable(ActionKind::Open, interact::open_performable())
        .with_performable(ActionKind::Close, interact::close_performable())
        .with_performable(ActionKind::Push, interact::push_performable())
        .with_performable(ActionKind::Grab, interact::grab_performable())
        .with_performable(ActionKind::Pickup, interact::pickup_performable())
        .with_performable(ActionKind::MeleeAttack, combat::melee_performable())
        .with_performable(ActionKind::RangedAttack, combat::ranged_performable())
        .with_resolvable(ActionKind::MeleeAttack, combat::melee_resolvable())
        .with_resolvable(ActionKind::RangedAttack, combat::ranged_resolvable())
}

fn zombie_capabilities() -> Capabilities {
    Capabilities::new()
        .with_performable(ActionKind::MeleeAttack, combat::zombie_melee_performable())
        .with_performable(ActionKind::HordePushBonus, combat::horde_push_performable())
        .with_resolvable(ActionKind::MeleeAttack, combat::melee_resolvable())
        .with_resolvable(ActionKind::RangedAttack, combat::ranged_resolvable())
        .with_resolvable(ActionKind::HordePushBonus, combat::horde_push_resolvable())
        .with_resolvable(ActionKind::Push, interact::push_resolvable())
        .with_resolvable(ActionKind::Grab, interact::grab_resolvable())
}

fn breakable() -> Capabilities {
    Capabilities::new()
        .with_resolvable(ActionKind::MeleeAttack, combat::melee_resolvable())
        .with_resolvable(ActionKind::RangedAttack, combat::ranged_resolvable())
}

fn movable() -> Capabilities {
    breakable()
        .with_resolvable(ActionKind::Push, interact::push_resolvable())
        .with_resolvable(ActionKind::Grab, interact::grab_resolvable())
}

fn door_capabilities() -> Capabilities {
    breakable()
        .with_resolvable(ActionKind::Open, interact::open_resolvable())
        .with_resolvable(ActionKind::Close, interact::close_resolvable())
}

fn carried() -> Capabilities {
    Capabilities::new().with_resolvable(ActionKind::Pickup, interact::pickup_resolvable())
}

fn furniture(
    name: &str,
    display_name: &str,
    glyph: char,
    hp: Option<i32>,
    passable: bool,
    blocks_los: bool,
    capabilities: Capabilities,
) -> FurnitureType {
    FurnitureType {
        name: name.to_string(),
        display_name: display_name.to_string(),
        glyph,
        hp,
        passable,
        blocks_los,
        is_wall: false,
        door: None,
        capabilities,
    }
}

fn item(name: &str, display_name: &str, glyph: char, kind: ItemKind) -> ItemType {
    ItemType {
        name: name.to_string(),
        display_name: display_name.to_string(),
        glyph,
        kind,
        capabilities: carried(),
    }
}

fn melee(damage: i32) -> WeaponStats {
    WeaponStats {
        damage,
        ..WeaponStats::default()
    }
}

/// Every type the default floor uses.
pub fn default_registry() -> ShambleResult<TypeRegistry> {
    let mut registry = TypeRegistry::new(FLOOR);

    let grey = Color::new(128, 128, 128);
    registry.register_tile(tile(FLOOR, '.', grey, true))?;
    registry.register_tile(tile(CARPET, ',', Color::new(70, 70, 140), true))?;
    registry.register_tile(tile(LINOLEUM, '_', Color::new(200, 200, 180), true))?;
    registry.register_tile(tile(WALL_TILE, '#', Color::new(90, 90, 90), false))?;
    registry.register_tile(TileType {
        exit: true,
        ..tile(ELEVATOR, '>', Color::new(220, 200, 60), true)
    })?;
    registry.register_tile(TileType {
        room_placeholder: true,
        ..tile(ROOM_FOOTPRINT, '?', grey, true)
    })?;

    registry.register_furniture(FurnitureType {
        is_wall: true,
        ..furniture(OFFICE_WALL, "wall", '#', None, false, true, Capabilities::new())
    })?;
    registry.register_furniture(FurnitureType {
        door: Some(DoorState {
            open: false,
            open_glyph: '\'',
            closed_glyph: '+',
            closed_blocks_los: true,
        }),
        ..furniture(WOODEN_DOOR, "wooden door", '+', Some(6), false, true, door_capabilities())
    })?;
    registry.register_furniture(FurnitureType {
        door: Some(DoorState {
            open: false,
            open_glyph: '\'',
            closed_glyph: '"',
            closed_blocks_los: false,
        }),
        ..furniture(GLASS_DOOR, "glass door", '"', Some(2), false, false, door_capabilities())
    })?;
    registry.register_furniture(furniture(DESK, "desk", 'n', Some(8), false, false, movable()))?;
    registry.register_furniture(furniture(OFFICE_CHAIR, "office chair", 'h', Some(3), false, false, movable()))?;
    registry.register_furniture(furniture(
        VENDING_MACHINE,
        "vending machine",
        'V',
        Some(12),
        false,
        true,
        movable(),
    ))?;

    registry.register_item(item(UMBRELLA, "umbrella", '/', ItemKind::Melee(melee(2))))?;
    registry.register_item(item(
        FIRE_AXE,
        "fire axe",
        'P',
        ItemKind::Melee(WeaponStats {
            damage: 4,
            knock_back: Some(1),
            ..WeaponStats::default()
        }),
    ))?;
    registry.register_item(item(ZOMBIE_BITE, "bite", '\'', ItemKind::Melee(melee(1))))?;
    registry.register_item(item(
        NAIL_GUN,
        "nail gun",
        '{',
        ItemKind::Ranged(RangedStats {
            weapon: melee(2),
            range: 5,
            ammo_type: Some(NAILS.to_string()),
            loaded: 4,
            capacity: 8,
        }),
    ))?;
    registry.register_item(item(
        NAILS,
        "box of nails",
        '=',
        ItemKind::Ammo {
            ammo_type: NAILS.to_string(),
            rounds: 8,
        },
    ))?;
    registry.register_item(item(
        FIRE_EXTINGUISHER,
        "fire extinguisher",
        '!',
        ItemKind::Ranged(RangedStats {
            weapon: WeaponStats {
                damage: 0,
                knock_back: None,
                knock_down: Some(1),
                area: Some(AreaEffect {
                    radius: 1,
                    damage: None,
                    knock_back: Some(1),
                    knock_down: Some(1),
                    knock_back_origin: KnockBackOrigin::Source,
                }),
            },
            range: 3,
            ammo_type: None,
            loaded: 0,
            capacity: 0,
        }),
    ))?;
    registry.register_item(item(FIRST_AID_KIT, "first aid kit", '+', ItemKind::Healing { amount: 5 }))?;
    registry.register_item(item(COFFEE, "cup of coffee", 'c', ItemKind::Healing { amount: 2 }))?;

    registry.register_entity(EntityType {
        name: PLAYER.to_string(),
        display_name: "Survivor".to_string(),
        kind: EntityKind::Player,
        glyph: '@',
        hp: config::DEFAULT_PLAYER_HEALTH,
        organic: true,
        melee_weapon: Some(UMBRELLA.to_string()),
        ranged_weapon: None,
        inventory: Vec::new(),
        capabilities: player_capabilities(),
    })?;
    registry.register_entity(EntityType {
        name: ZOMBIE.to_string(),
        display_name: "Zombie".to_string(),
        kind: EntityKind::Zombie,
        glyph: 'z',
        hp: 3,
        organic: true,
        melee_weapon: Some(ZOMBIE_BITE.to_string()),
        ranged_weapon: None,
        inventory: Vec::new(),
        capabilities: zombie_capabilities(),
    })?;

    Ok(registry)
}

fn one(name: &str) -> RandomData<Spawn> {
    RandomData::Literal(Spawn::of(name))
}

/// A room wall cell that may become a door.
fn door_wall(door_type: &str) -> RandomData<Spawn> {
    RandomData::All(vec![
        one(OFFICE_WALL),
        RandomData::Literal(Spawn::placeholder(DOOR_PLACEHOLDER, door_type)),
    ])
}

fn room_layers(floor_tile: &str) -> (TemplateLayer, TemplateLayer) {
    let tiles = TemplateLayer::new().with_default(one(floor_tile));
    let objects = TemplateLayer::new()
        .with('#', one(OFFICE_WALL))
        .with('D', door_wall(WOODEN_DOOR))
        .with('G', door_wall(GLASS_DOOR))
        .with('z', RandomData::Percent(vec![(60, one(ZOMBIE))]));
    (tiles, objects)
}

/// The floor shell: outer walls, an L-shaped hallway and four room slots.
pub fn floor_template() -> ShambleResult<Template> {
    let rows = [
        "############",
        "#@.........#",
        "#R???R????.#",
        "#?????????.#",
        "#?????????.#",
        "#?????????.#",
        "#R???R????.#",
        "#?????????.#",
        "#?????????.#",
        "#?????????.#",
        "#?????????.#",
        "############",
    ];
    let tiles = TemplateLayer::new()
        .with('#', one(WALL_TILE))
        .with('R', one(ROOM_FOOTPRINT))
        .with('?', one(ROOM_FOOTPRINT))
        .with_default(one(FLOOR));
    let objects = TemplateLayer::new()
        .with('@', one(PLAYER))
        .with(
            'R',
            RandomData::Literal(Spawn::placeholder(ROOM_PLACEHOLDER, ROOM_PLACEHOLDER)),
        );
    Template::new("office_floor", &rows, tiles, objects)
}

/// The required exit room.
pub fn elevator_room() -> ShambleResult<Template> {
    let rows = ["#DDD#", "D...D", "D.E.D", "D...D", "#DDD#"];
    let (tiles, objects) = room_layers(LINOLEUM);
    let tiles = tiles.with('E', one(ELEVATOR));
    Ok(Template::new("elevator", &rows, tiles, objects)?.with_random_doors(&Side::all()))
}

pub fn office_room() -> ShambleResult<Template> {
    let rows = ["#DDD#", "Gd.zG", "G.c.G", "Gz.dG", "#DDD#"];
    let (tiles, objects) = room_layers(CARPET);
    let objects = objects
        .with(
            'd',
            RandomData::Weighted(vec![(3, one(DESK)), (1, one(OFFICE_CHAIR))]),
        )
        .with(
            'c',
            RandomData::Percent(vec![(25, one(NAILS)), (15, one(NAIL_GUN)), (20, one(OFFICE_CHAIR))]),
        );
    Ok(Template::new("office", &rows, tiles, objects)?.with_random_doors(&Side::all()))
}

pub fn break_room() -> ShambleResult<Template> {
    let rows = ["#DDD#", "DV.kD", "D.z.D", "Dk.aD", "#DDD#"];
    let (tiles, objects) = room_layers(LINOLEUM);
    let objects = objects
        .with('V', one(VENDING_MACHINE))
        .with(
            'k',
            RandomData::Weighted(vec![(2, one(COFFEE)), (1, one(FIRST_AID_KIT))]),
        )
        .with(
            'a',
            RandomData::Weighted(vec![
                (2, one(FIRE_EXTINGUISHER)),
                (1, one(FIRE_AXE)),
                (1, RandomData::Repeat(2, Box::new(one(COFFEE)))),
            ]),
        );
    Ok(Template::new("break_room", &rows, tiles, objects)?.with_random_doors(&Side::all()))
}

/// Elevator required, offices and break rooms filling the rest.
pub fn default_generator() -> ShambleResult<FloorGenerator> {
    Ok(FloorGenerator::new(
        floor_template()?,
        vec![elevator_room()?],
        vec![office_room()?, office_room()?, break_room()?],
    ))
}

/// Generates and validates the default office floor.
pub fn generate_default_floor(config: GameConfig) -> ShambleResult<(GameState, FloorLayout)> {
    let registry = Arc::new(default_registry()?);
    let mut state = GameState::new(config, registry);
    let generator = default_generator()?;
    let layout = generator.generate(&mut state)?;
    generator.validate(&layout, &state)?;
    state.mark_explored();
    Ok((state, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builds() {
        let registry = default_registry().unwrap();
        let player = registry.make_entity(PLAYER, crate::Position::new(0, 0)).unwrap();
        assert_eq!(player.melee_damage(), Some(2));
        let zombie = registry.make_entity(ZOMBIE, crate::Position::new(0, 0)).unwrap();
        assert_eq!(zombie.hp, 3);
        assert!(zombie.capabilities.can_resolve(ActionKind::HordePushBonus));
    }

    #[test]
    fn test_templates_are_square_rooms() {
        for room in [elevator_room().unwrap(), office_room().unwrap(), break_room().unwrap()] {
            assert!(room.is_square());
            assert_eq!(room.grid(0).width(), config::ROOM_SIZE);
            assert_eq!(room.random_doors, [true; 4]);
        }
        let floor = floor_template().unwrap();
        assert_eq!(floor.grid(0).width(), config::DEFAULT_FLOOR_WIDTH);
        assert_eq!(floor.grid(0).height(), config::DEFAULT_FLOOR_HEIGHT);
    }
}
