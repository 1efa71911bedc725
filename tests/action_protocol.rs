//! Capability negotiation: denial, result gating, push collisions and the
//! grab toggle.

use shamble::{
    content, ActionKind, ActionSettings, Direction, GameConfig, GameEvent, GameState, Hook,
    ObjectRef, Performable, Position, Resolvable, ShambleError, ShambleResult,
};
use std::sync::Arc;

fn open_floor(width: usize, height: usize) -> ShambleResult<GameState> {
    let registry = Arc::new(content::default_registry()?);
    let mut state = GameState::new(GameConfig::for_testing(11), registry);
    state.set_size(width, height);
    for pos in state.tiles.positions().collect::<Vec<_>>() {
        let tile = state.registry.make_tile(content::FLOOR)?;
        state.tiles.set(pos, tile)?;
    }
    Ok(state)
}

fn notices(state: &GameState) -> Vec<String> {
    state
        .events()
        .iter()
        .filter_map(|event| match event {
            GameEvent::Notice(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_missing_capability_is_denial() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let zombie = ObjectRef::Entity(state.spawn_entity(content::ZOMBIE, Position::new(2, 2))?);
    let item = ObjectRef::Item(state.spawn_item(content::COFFEE, Position::new(2, 2))?);
    let settings = ActionSettings::new();

    // Zombies never pick anything up.
    assert!(!state.can_perform_action(zombie, ActionKind::Pickup, &settings));
    assert!(state
        .get_targets_for_action(zombie, ActionKind::Pickup, &settings)
        .is_none());
    assert!(!state.can_perform_action_on_target(zombie, ActionKind::Pickup, item, &settings));
    assert!(!state.perform_action(zombie, ActionKind::Pickup, item, ActionSettings::new()));

    // The denied attempt is still remembered.
    let last = state
        .capabilities(zombie)
        .and_then(|c| c.last_action)
        .ok_or_else(|| ShambleError::InvalidConfiguration("no last action".to_string()))?;
    assert_eq!(last.action, ActionKind::Pickup);
    assert_eq!(last.target, item);
    assert!(!last.success);
    assert!(state.items.contains(item.id()));
    Ok(())
}

#[test]
fn test_target_without_resolvable_is_filtered() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player = ObjectRef::Entity(state.spawn_player(content::PLAYER, Position::new(2, 2))?);
    let wall = ObjectRef::Furniture(state.spawn_furniture(content::OFFICE_WALL, Position::new(3, 2))?);

    assert!(!state.can_perform_action_on_target(player, ActionKind::Push, wall, &ActionSettings::new()));
    let targets = state
        .get_targets_for_action(player, ActionKind::Push, &ActionSettings::new())
        .unwrap_or_default();
    assert!(targets.is_empty());
    Ok(())
}

#[test]
fn test_no_result_means_no_resolution() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player = ObjectRef::Entity(state.spawn_player(content::PLAYER, Position::new(2, 2))?);
    let desk_id = state.spawn_furniture(content::DESK, Position::new(3, 2))?;
    let desk = ObjectRef::Furniture(desk_id);

    if let Some(capabilities) = state.capabilities_mut(player) {
        capabilities.grant_performable(
            ActionKind::Push,
            Performable {
                perform_action: Hook::Never,
                after_failure: Some(|state, _, _, settings| {
                    assert!(settings.result.is_none());
                    state.push_event(GameEvent::Notice("push failed".to_string()));
                }),
                ..Performable::always()
            },
        );
    }

    assert!(!state.perform_action(player, ActionKind::Push, desk, ActionSettings::new()));
    assert_eq!(state.furniture.get(desk_id).map(|d| d.position), Some(Position::new(3, 2)));
    assert_eq!(notices(&state), vec!["push failed".to_string()]);

    let last = state.capabilities(player).and_then(|c| c.last_action);
    assert_eq!(last.map(|l| l.success), Some(false));
    Ok(())
}

#[test]
fn test_target_veto_after_perform() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player = ObjectRef::Entity(state.spawn_player(content::PLAYER, Position::new(2, 2))?);
    let desk = ObjectRef::Furniture(state.spawn_furniture(content::DESK, Position::new(3, 2))?);

    if let Some(capabilities) = state.capabilities_mut(desk) {
        capabilities.grant_resolvable(
            ActionKind::Push,
            Resolvable {
                can_resolve_action: Hook::Never,
                resolve_action: Hook::Always,
            },
        );
    }

    assert!(!state.can_perform_action_on_target(player, ActionKind::Push, desk, &ActionSettings::new()));
    let forced = ActionSettings {
        skip_can_perform_action_on_target: true,
        ..ActionSettings::new()
    };
    assert!(!state.perform_action(player, ActionKind::Push, desk, forced));

    let skip_all = ActionSettings {
        skip_can_resolve_action: true,
        ..ActionSettings::prevalidated()
    };
    assert!(state.perform_action(player, ActionKind::Push, desk, skip_all));
    Ok(())
}

#[test]
fn test_push_moves_target_and_source_follows() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player_id = state.spawn_player(content::PLAYER, Position::new(1, 2))?;
    let desk_id = state.spawn_furniture(content::DESK, Position::new(2, 2))?;

    assert!(state.perform_action(
        ObjectRef::Entity(player_id),
        ActionKind::Push,
        ObjectRef::Furniture(desk_id),
        ActionSettings::new()
    ));
    assert_eq!(state.furniture.get(desk_id).map(|d| d.position), Some(Position::new(3, 2)));
    assert_eq!(state.entities.get(player_id).map(|p| p.position), Some(Position::new(2, 2)));
    Ok(())
}

#[test]
fn test_push_into_blocked_cell_fails() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player_id = state.spawn_player(content::PLAYER, Position::new(1, 2))?;
    let desk_id = state.spawn_furniture(content::DESK, Position::new(2, 2))?;
    let chair_id = state.spawn_furniture(content::OFFICE_CHAIR, Position::new(3, 2))?;
    let player = ObjectRef::Entity(player_id);
    let desk = ObjectRef::Furniture(desk_id);

    assert!(!state.can_perform_action_on_target(player, ActionKind::Push, desk, &ActionSettings::new()));
    assert!(!state.perform_action(player, ActionKind::Push, desk, ActionSettings::new()));

    assert_eq!(state.furniture.get(desk_id).map(|d| d.position), Some(Position::new(2, 2)));
    assert_eq!(state.furniture.get(chair_id).map(|c| c.position), Some(Position::new(3, 2)));
    assert_eq!(state.entities.get(player_id).map(|p| p.position), Some(Position::new(1, 2)));

    // A zombie in the way blocks just the same.
    state.furniture.remove(chair_id);
    state.spawn_entity(content::ZOMBIE, Position::new(3, 2))?;
    assert!(!state.perform_action(player, ActionKind::Push, desk, ActionSettings::new()));
    assert_eq!(state.furniture.get(desk_id).map(|d| d.position), Some(Position::new(2, 2)));
    Ok(())
}

#[test]
fn test_grab_toggles_and_drags() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player_id = state.spawn_player(content::PLAYER, Position::new(2, 2))?;
    let player = ObjectRef::Entity(player_id);
    let desk_id = state.spawn_furniture(content::DESK, Position::new(3, 2))?;
    let desk = ObjectRef::Furniture(desk_id);

    assert!(state.perform_action(player, ActionKind::Grab, desk, ActionSettings::new()));
    assert_eq!(state.entities.get(player_id).and_then(|p| p.grab_target), Some(desk));

    // While holding, the only grab target is the held object.
    let targets = state
        .get_targets_for_action(player, ActionKind::Grab, &ActionSettings::new())
        .unwrap_or_default();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].value, desk);

    assert!(state.walk(player_id, Direction::Left));
    assert_eq!(state.entities.get(player_id).map(|p| p.position), Some(Position::new(1, 2)));
    assert_eq!(state.furniture.get(desk_id).map(|d| d.position), Some(Position::new(2, 2)));

    // Grabbing the held object again lets go.
    assert!(!state.perform_action(player, ActionKind::Grab, desk, ActionSettings::new()));
    assert_eq!(state.entities.get(player_id).and_then(|p| p.grab_target), None);
    assert!(state
        .events()
        .iter()
        .any(|event| matches!(event, GameEvent::Released { .. })));
    Ok(())
}

#[test]
fn test_pickup_moves_item_into_inventory() -> ShambleResult<()> {
    let mut state = open_floor(6, 6)?;
    let player_id = state.spawn_player(content::PLAYER, Position::new(2, 2))?;
    let item_id = state.spawn_item(content::FIRST_AID_KIT, Position::new(2, 2))?;

    let targets = state
        .get_targets_for_action(ObjectRef::Entity(player_id), ActionKind::Pickup, &ActionSettings::new())
        .unwrap_or_default();
    assert_eq!(targets.len(), 1);

    assert!(state.perform_action(
        ObjectRef::Entity(player_id),
        ActionKind::Pickup,
        ObjectRef::Item(item_id),
        ActionSettings::new()
    ));
    assert!(!state.items.contains(item_id));
    let player = state.player().expect("player");
    assert_eq!(player.inventory_index(item_id), Some(0));
    Ok(())
}
