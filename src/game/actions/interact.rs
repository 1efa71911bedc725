//! # Interactions
//!
//! Door handling, pushing, grabbing and picking up items. Each action is a
//! pair of capability records that content types install on their sources and
//! targets.

use super::{
    ActionKind, ActionResult, ActionSettings, Hook, Performable, Resolvable, TargetCandidate,
    TargetStrategy,
};
use crate::game::{Direction, GameEvent, GameState, ObjectId, ObjectRef, Position};

fn actor_name(state: &GameState, settings: &ActionSettings) -> String {
    settings
        .source
        .map(|source| state.object_name(source))
        .unwrap_or_else(|| "Something".to_string())
}

fn furniture_id(target: ObjectRef) -> Option<ObjectId> {
    match target {
        ObjectRef::Furniture(id) => Some(id),
        _ => None,
    }
}

fn entity_id(object: ObjectRef) -> Option<ObjectId> {
    match object {
        ObjectRef::Entity(id) => Some(id),
        _ => None,
    }
}

// --- open / close ---------------------------------------------------------

/// Anyone may try to open an adjacent door.
pub fn open_performable() -> Performable {
    Performable::always()
}

pub fn open_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Computed(|state, target, _| {
            furniture_id(target)
                .and_then(|id| state.furniture.get(id))
                .map_or(false, |f| f.door.is_some() && !f.is_open())
        }),
        resolve_action: Hook::Computed(|state, target, settings| {
            let id = match furniture_id(target) {
                Some(id) => id,
                None => return false,
            };
            let name = match state.furniture.get_mut(id) {
                Some(door) => {
                    door.set_open(true);
                    door.name.clone()
                }
                None => return false,
            };
            let actor = actor_name(state, settings);
            state.push_event(GameEvent::Opened { actor, target: name });
            true
        }),
    }
}

pub fn close_performable() -> Performable {
    Performable::always()
}

fn door_is_clear(state: &GameState, target: ObjectRef) -> bool {
    furniture_id(target)
        .and_then(|id| state.furniture.get(id))
        .map_or(false, |f| f.is_open() && state.entities.is_empty_at(f.position))
}

pub fn close_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Computed(|state, target, _| door_is_clear(state, target)),
        resolve_action: Hook::Computed(|state, target, settings| {
            // Someone may have stepped into the doorway after validation.
            if !door_is_clear(state, target) {
                return false;
            }
            let id = match furniture_id(target) {
                Some(id) => id,
                None => return false,
            };
            let name = match state.furniture.get_mut(id) {
                Some(door) => {
                    door.set_open(false);
                    door.name.clone()
                }
                None => return false,
            };
            let actor = actor_name(state, settings);
            state.push_event(GameEvent::Closed { actor, target: name });
            true
        }),
    }
}

// --- push -----------------------------------------------------------------

fn push_vector(state: &GameState, source: ObjectRef, target: ObjectRef) -> Option<Position> {
    let from = state.object_position(source)?;
    let to = state.object_position(target)?;
    Direction::from_delta(to - from).map(Direction::to_delta)
}

fn push_destination(state: &GameState, target: ObjectRef, settings: &ActionSettings) -> Option<Position> {
    let vector = match settings.result.as_ref().and_then(|r| r.push) {
        Some(vector) => vector,
        None => push_vector(state, settings.source?, target)?,
    };
    Some(state.object_position(target)? + vector)
}

pub fn push_performable() -> Performable {
    Performable {
        perform_action: Hook::Computed(|state, source, target, _| {
            push_vector(state, source, target).map(|vector| ActionResult {
                push: Some(vector),
                ..ActionResult::default()
            })
        }),
        ..Performable::always()
    }
}

/// The target moves one cell away from the source; the source follows into
/// the vacated cell when it can.
pub fn push_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Computed(|state, target, settings| {
            push_destination(state, target, settings).map_or(false, |dest| state.is_free(dest))
        }),
        resolve_action: Hook::Computed(|state, target, settings| {
            let (from, dest) = match (
                state.object_position(target),
                push_destination(state, target, settings),
            ) {
                (Some(from), Some(dest)) => (from, dest),
                _ => return false,
            };
            if !state.is_free(dest) || !state.move_object(target, dest) {
                return false;
            }

            if let Some(source_id) = settings.source.and_then(entity_id) {
                if state.is_free(from) {
                    state.move_entity(source_id, from);
                }
            }
            let actor = actor_name(state, settings);
            let name = state.object_name(target);
            state.push_event(GameEvent::Pushed { actor, target: name });
            true
        }),
    }
}

// --- grab -----------------------------------------------------------------

fn grab_targets(
    state: &GameState,
    source: ObjectRef,
    action: ActionKind,
    settings: &ActionSettings,
) -> Vec<TargetCandidate> {
    let grabbed = entity_id(source)
        .and_then(|id| state.entities.get(id))
        .and_then(|entity| entity.grab_target);
    match grabbed {
        // While holding something the only choice is to let go.
        Some(grabbed) => match (state.object_position(source), state.object_position(grabbed)) {
            (Some(origin), Some(pos)) => vec![TargetCandidate {
                position: pos,
                range: origin.euclidean_distance(pos),
                value: grabbed,
            }],
            _ => Vec::new(),
        },
        None => state.adjacent_targets(source, action, settings),
    }
}

pub fn grab_performable() -> Performable {
    Performable {
        can_perform_action: Hook::Computed(|state, source, _| {
            entity_id(source).map_or(false, |id| state.entities.contains(id))
        }),
        perform_action: Hook::Computed(|state, source, target, settings| {
            let id = entity_id(source)?;
            let holding = state.entities.get(id)?.grab_target;
            if holding == Some(target) {
                if let Some(entity) = state.entities.get_mut(id) {
                    entity.grab_target = None;
                }
                let actor = actor_name(state, settings);
                let name = state.object_name(target);
                state.push_event(GameEvent::Released { actor, target: name });
                return None;
            }
            Some(ActionResult::default())
        }),
        targets: TargetStrategy::Custom(grab_targets),
        ..Performable::always()
    }
}

pub fn grab_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Always,
        resolve_action: Hook::Computed(|state, target, settings| {
            let source_id = match settings.source.and_then(entity_id) {
                Some(id) => id,
                None => return false,
            };
            match state.entities.get_mut(source_id) {
                Some(entity) => entity.grab_target = Some(target),
                None => return false,
            }
            let actor = actor_name(state, settings);
            let name = state.object_name(target);
            state.push_event(GameEvent::Grabbed { actor, target: name });
            true
        }),
    }
}

// --- pickup ---------------------------------------------------------------

pub fn pickup_performable() -> Performable {
    Performable {
        can_perform_action: Hook::Computed(|state, source, _| {
            entity_id(source).map_or(false, |id| state.entities.contains(id))
        }),
        targets: TargetStrategy::OwnCell,
        ..Performable::always()
    }
}

/// Moves the item off the grid into the source's inventory.
pub fn pickup_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Computed(|state, target, settings| {
            matches!(target, ObjectRef::Item(id) if state.items.contains(id))
                && settings
                    .source
                    .and_then(entity_id)
                    .map_or(false, |id| state.entities.contains(id))
        }),
        resolve_action: Hook::Computed(|state, target, settings| {
            let (item_id, source_id) = match (target, settings.source.and_then(entity_id)) {
                (ObjectRef::Item(item_id), Some(source_id)) => (item_id, source_id),
                _ => return false,
            };
            if !state.entities.contains(source_id) {
                return false;
            }
            let item = match state.items.remove(item_id) {
                Some(item) => item,
                None => return false,
            };
            let name = item.name.clone();
            let actor = match state.entities.get_mut(source_id) {
                Some(entity) => {
                    entity.inventory.push(item);
                    entity.name.clone()
                }
                None => return false,
            };
            state.push_event(GameEvent::PickedUp { actor, item: name });
            true
        }),
    }
}

impl GameState {
    /// Steps an entity one cell, dragging whatever it holds into the vacated
    /// cell. A grabbed object that cannot follow is released.
    pub fn walk(&mut self, id: ObjectId, direction: Direction) -> bool {
        let from = match self.entities.get(id) {
            Some(entity) => entity.position,
            None => return false,
        };
        if !self.move_entity(id, from + direction.to_delta()) {
            return false;
        }

        let grabbed = match self.entities.get(id).and_then(|entity| entity.grab_target) {
            Some(grabbed) => grabbed,
            None => return true,
        };
        let follows = self
            .object_position(grabbed)
            .map_or(false, |pos| pos.is_cardinal_neighbor(from))
            && self.move_object(grabbed, from);
        if !follows {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.grab_target = None;
            }
            let actor = self.object_name(ObjectRef::Entity(id));
            let target = self.object_name(grabbed);
            self.push_event(GameEvent::Released { actor, target });
        }
        true
    }
}
