//! Splash effects, knockback chains and knockdown.

use shamble::{
    content, ActionKind, ActionResult, ActionSettings, AreaEffect, GameConfig, GameEvent,
    GameState, KnockBackOrigin, ObjectId, ObjectRef, Position, ShambleResult,
};
use std::sync::Arc;

fn open_floor(width: usize, height: usize) -> ShambleResult<GameState> {
    let registry = Arc::new(content::default_registry()?);
    let mut state = GameState::new(GameConfig::for_testing(3), registry);
    state.set_size(width, height);
    for pos in state.tiles.positions().collect::<Vec<_>>() {
        let tile = state.registry.make_tile(content::FLOOR)?;
        state.tiles.set(pos, tile)?;
    }
    Ok(state)
}

fn arm_with(state: &mut GameState, item: &str) -> ShambleResult<()> {
    let weapon = state.registry.make_item(item, Position::new(0, 0))?;
    if let Some(player) = state.player_mut() {
        player.ranged_weapon = Some(weapon);
    }
    Ok(())
}

fn position_of(state: &GameState, object: ObjectRef) -> Option<Position> {
    state.object_position(object)
}

#[test]
fn test_extinguisher_blast_spares_the_attacker() -> ShambleResult<()> {
    let mut state = open_floor(10, 10)?;
    let player_id = state.spawn_player(content::PLAYER, Position::new(4, 5))?;
    let player = ObjectRef::Entity(player_id);
    let near = ObjectRef::Entity(state.spawn_entity(content::ZOMBIE, Position::new(5, 5))?);
    let far = ObjectRef::Entity(state.spawn_entity(content::ZOMBIE, Position::new(6, 5))?);
    let outside = ObjectRef::Entity(state.spawn_entity(content::ZOMBIE, Position::new(8, 8))?);
    arm_with(&mut state, content::FIRE_EXTINGUISHER)?;

    assert!(state.perform_action(player, ActionKind::RangedAttack, near, ActionSettings::new()));

    // Farther entities move first so the nearer one lands in the freed cell.
    assert_eq!(position_of(&state, far), Some(Position::new(7, 5)));
    assert_eq!(position_of(&state, near), Some(Position::new(6, 5)));
    assert_eq!(position_of(&state, outside), Some(Position::new(8, 8)));
    assert_eq!(position_of(&state, player), Some(Position::new(4, 5)));

    let knocked_down = |object: ObjectRef| {
        state
            .entities
            .get(object.id())
            .map_or(0, |entity| entity.knocked_down)
    };
    assert_eq!(knocked_down(near), 1);
    assert_eq!(knocked_down(far), 1);
    assert_eq!(knocked_down(outside), 0);
    assert_eq!(knocked_down(player), 0);
    assert_eq!(state.layers.knock_back.len(), 2);
    Ok(())
}

/// Player at (1, 2) with a zombie at each of (2, 2), (3, 2) and (4, 2).
fn zombie_line(state: &mut GameState) -> ShambleResult<(ObjectRef, Vec<ObjectId>)> {
    let player = ObjectRef::Entity(state.spawn_player(content::PLAYER, Position::new(1, 2))?);
    let zombies = (2..5)
        .map(|x| state.spawn_entity(content::ZOMBIE, Position::new(x, 2)))
        .collect::<ShambleResult<Vec<_>>>()?;
    Ok((player, zombies))
}

fn blast_from_source() -> ActionResult {
    ActionResult {
        area: Some(AreaEffect {
            radius: 2,
            knock_back: Some(1),
            knock_back_origin: KnockBackOrigin::Source,
            ..AreaEffect::default()
        }),
        impact: Some(Position::new(2, 2)),
        ..ActionResult::default()
    }
}

fn positions(state: &GameState, ids: &[ObjectId]) -> Vec<Position> {
    ids.iter()
        .filter_map(|&id| state.entities.get(id).map(|z| z.position))
        .collect()
}

#[test]
fn test_blast_pushes_a_whole_line_farthest_first() -> ShambleResult<()> {
    let mut state = open_floor(10, 5)?;
    let (player, zombies) = zombie_line(&mut state)?;

    state.resolve_area_effect(player, ObjectRef::Entity(zombies[0]), &blast_from_source());

    let moved = positions(&state, &zombies);
    assert_eq!(
        moved,
        vec![Position::new(3, 2), Position::new(4, 2), Position::new(5, 2)]
    );
    let mut distinct = moved.clone();
    distinct.dedup();
    assert_eq!(distinct.len(), zombies.len());
    assert_eq!(
        state.layers.knock_back,
        vec![
            (Position::new(4, 2), Position::new(5, 2)),
            (Position::new(3, 2), Position::new(4, 2)),
            (Position::new(2, 2), Position::new(3, 2)),
        ]
    );
    assert_eq!(position_of(&state, player), Some(Position::new(1, 2)));
    Ok(())
}

#[test]
fn test_blast_into_a_wall_leaves_the_crowd_in_place() -> ShambleResult<()> {
    let mut state = open_floor(10, 5)?;
    let (player, zombies) = zombie_line(&mut state)?;
    state.spawn_furniture(content::OFFICE_WALL, Position::new(5, 2))?;

    state.resolve_area_effect(player, ObjectRef::Entity(zombies[0]), &blast_from_source());

    assert_eq!(
        positions(&state, &zombies),
        vec![Position::new(2, 2), Position::new(3, 2), Position::new(4, 2)]
    );
    assert!(state.layers.knock_back.is_empty());
    assert!(!state
        .events()
        .iter()
        .any(|event| matches!(event, GameEvent::KnockedBack { .. })));
    Ok(())
}

#[test]
fn test_splash_damage_hits_furniture_and_entities() -> ShambleResult<()> {
    let mut state = open_floor(10, 10)?;
    let player = ObjectRef::Entity(state.spawn_player(content::PLAYER, Position::new(1, 5))?);
    let target_id = state.spawn_entity(content::ZOMBIE, Position::new(4, 5))?;
    let neighbour_id = state.spawn_entity(content::ZOMBIE, Position::new(4, 6))?;
    let chair_id = state.spawn_furniture(content::OFFICE_CHAIR, Position::new(4, 4))?;
    arm_with(&mut state, content::FIRE_EXTINGUISHER)?;

    if let Some(stats) = state.player_mut().and_then(|p| p.ranged_stats_mut()) {
        if let Some(area) = stats.weapon.area.as_mut() {
            area.damage = Some(1);
            area.knock_back = None;
            area.knock_down = None;
        }
        stats.weapon.knock_down = None;
    }

    assert!(state.perform_action(
        player,
        ActionKind::RangedAttack,
        ObjectRef::Entity(target_id),
        ActionSettings::new()
    ));

    assert_eq!(state.entities.get(target_id).map(|z| z.hp), Some(2));
    assert_eq!(state.entities.get(neighbour_id).map(|z| z.hp), Some(2));
    assert_eq!(state.furniture.get(chair_id).and_then(|c| c.hp), Some(2));
    assert_eq!(state.player().map(|p| p.hp), Some(10));
    Ok(())
}

#[test]
fn test_knockback_chain_shoves_the_line() -> ShambleResult<()> {
    let mut state = open_floor(10, 5)?;
    let first = state.spawn_entity(content::ZOMBIE, Position::new(3, 2))?;
    let second = state.spawn_entity(content::ZOMBIE, Position::new(4, 2))?;

    assert!(state.knock_back(first, Position::new(2, 2), 1));

    assert_eq!(state.entities.get(second).map(|z| z.position), Some(Position::new(5, 2)));
    assert_eq!(state.entities.get(first).map(|z| z.position), Some(Position::new(4, 2)));
    let knocked: usize = state
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::KnockedBack { .. }))
        .count();
    assert_eq!(knocked, 2);
    Ok(())
}

#[test]
fn test_knockback_stops_at_walls() -> ShambleResult<()> {
    let mut state = open_floor(10, 5)?;
    let first = state.spawn_entity(content::ZOMBIE, Position::new(3, 2))?;
    let second = state.spawn_entity(content::ZOMBIE, Position::new(4, 2))?;
    state.spawn_furniture(content::OFFICE_WALL, Position::new(5, 2))?;

    assert!(!state.knock_back(first, Position::new(2, 2), 2));

    assert_eq!(state.entities.get(first).map(|z| z.position), Some(Position::new(3, 2)));
    assert_eq!(state.entities.get(second).map(|z| z.position), Some(Position::new(4, 2)));
    assert!(state.layers.knock_back.is_empty());
    Ok(())
}

#[test]
fn test_knockback_travels_up_to_distance() -> ShambleResult<()> {
    let mut state = open_floor(10, 5)?;
    let zombie = state.spawn_entity(content::ZOMBIE, Position::new(3, 2))?;
    state.spawn_furniture(content::OFFICE_WALL, Position::new(6, 2))?;

    assert!(state.knock_back(zombie, Position::new(2, 2), 5));
    assert_eq!(state.entities.get(zombie).map(|z| z.position), Some(Position::new(5, 2)));
    assert_eq!(state.layers.knock_back, vec![(Position::new(3, 2), Position::new(5, 2))]);
    Ok(())
}

#[test]
fn test_chain_never_moves_an_entity_twice() -> ShambleResult<()> {
    let mut state = open_floor(12, 5)?;
    let ids: Vec<_> = (3..7)
        .map(|x| state.spawn_entity(content::ZOMBIE, Position::new(x, 2)))
        .collect::<ShambleResult<_>>()?;

    assert!(state.knock_back(ids[0], Position::new(2, 2), 2));

    let moves = state
        .events()
        .iter()
        .filter(|event| matches!(event, GameEvent::KnockedBack { .. }))
        .count();
    assert_eq!(moves, ids.len());
    let mut positions: Vec<Position> = ids
        .iter()
        .filter_map(|&id| state.entities.get(id).map(|z| z.position))
        .collect();
    positions.sort();
    positions.dedup();
    assert_eq!(positions.len(), ids.len());
    Ok(())
}
