//! # Input Module
//!
//! Turns abstract player inputs into completed turns.
//!
//! Key mapping belongs to the host; this module starts from [`PlayerInput`].
//! One input either resolves a whole turn (the player's action and every
//! zombie's reply) or moves the interactive target selection along.

use crate::game::{
    ActionKind, ActionSettings, Direction, GameEvent, GameState, ObjectId, ObjectRef, TargetKind,
    ValidTargets,
};
use crate::{ShambleError, ShambleResult};

/// Player input types that can be processed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Step, or bump into whatever is in the way
    Move(Direction),
    /// Wait for one turn
    Wait,
    /// Start an action; prompts for a target when there is a choice
    Act(ActionKind),
    /// Cycle forward through targets stacked on the selected cell
    Next,
    /// Cycle backward through targets stacked on the selected cell
    Prev,
    /// Jump the selection to the nearest cell on that side
    Select(Direction),
    Confirm,
    Cancel,
    /// Use an inventory item
    UseItem(ObjectId),
    /// Equip an inventory item into a named slot
    Equip(ObjectId, String),
    /// Load an ammo item into the ranged weapon
    Reload(ObjectId),
}

/// Whether the controller is waiting for a fresh command or a target.
#[derive(Debug, Clone)]
pub enum InputMode {
    Idle,
    SelectingTarget {
        action: ActionKind,
        targets: ValidTargets,
    },
}

/// Result of handling one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The player acted and every zombie replied
    TurnTaken,
    /// Nothing happened; the player may try something else
    NoTurn,
    /// Waiting for the player to pick among several targets
    Selecting { action: ActionKind, candidates: usize },
    /// Target selection aborted without touching the floor
    Cancelled,
    GameOver,
}

/// Player input state machine.
#[derive(Debug, Clone)]
pub struct InputController {
    mode: InputMode,
    /// Kind order used to sort target candidates
    pub priority: Vec<TargetKind>,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Idle,
            priority: TargetKind::default_priority(),
        }
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, InputMode::Idle)
    }

    /// The candidate currently highlighted, if selecting.
    pub fn selected(&self) -> Option<ObjectRef> {
        match &self.mode {
            InputMode::SelectingTarget { targets, .. } => targets.current().map(|c| c.value),
            InputMode::Idle => None,
        }
    }

    /// Processes one input.
    pub fn handle(&mut self, state: &mut GameState, input: PlayerInput) -> ShambleResult<InputOutcome> {
        if state.is_over() {
            return Ok(InputOutcome::GameOver);
        }
        let player_id = state
            .player()
            .filter(|player| state.entities.contains(player.id))
            .map(|player| player.id)
            .ok_or_else(|| ShambleError::InvalidState("No player on the floor".to_string()))?;

        match std::mem::replace(&mut self.mode, InputMode::Idle) {
            InputMode::Idle => {
                state.layers.clear();
                self.handle_idle(state, player_id, input)
            }
            InputMode::SelectingTarget { action, targets } => {
                self.handle_selecting(state, player_id, input, action, targets)
            }
        }
    }

    fn handle_idle(
        &mut self,
        state: &mut GameState,
        player_id: ObjectId,
        input: PlayerInput,
    ) -> ShambleResult<InputOutcome> {
        let player = ObjectRef::Entity(player_id);
        match input {
            PlayerInput::Move(direction) => {
                if state.walk(player_id, direction) || bump(state, player_id, direction) {
                    Ok(end_turn(state))
                } else {
                    state.push_event(GameEvent::Notice("Something is in the way.".to_string()));
                    Ok(InputOutcome::NoTurn)
                }
            }
            PlayerInput::Wait => Ok(end_turn(state)),
            PlayerInput::Act(action) => {
                let settings = ActionSettings::new();
                if !state.can_perform_action(player, action, &settings) {
                    state.push_event(GameEvent::Notice(format!("You can't {} right now.", action)));
                    return Ok(InputOutcome::NoTurn);
                }
                let candidates = state
                    .get_targets_for_action(player, action, &settings)
                    .unwrap_or_default();
                match candidates.len() {
                    0 => {
                        state.push_event(GameEvent::Notice(format!("Nothing to {} here.", action)));
                        Ok(InputOutcome::NoTurn)
                    }
                    1 => {
                        let target = candidates[0].value;
                        state.perform_action(player, action, target, ActionSettings::prevalidated());
                        Ok(end_turn(state))
                    }
                    count => {
                        self.mode = InputMode::SelectingTarget {
                            action,
                            targets: ValidTargets::new(candidates, &self.priority),
                        };
                        Ok(InputOutcome::Selecting {
                            action,
                            candidates: count,
                        })
                    }
                }
            }
            PlayerInput::UseItem(item_id) => {
                let healed = match state.player_mut() {
                    Some(entity) => entity.use_item(item_id)?,
                    None => return Ok(InputOutcome::NoTurn),
                };
                let actor = state.object_name(player);
                state.push_event(GameEvent::Healed {
                    actor,
                    amount: healed,
                });
                Ok(end_turn(state))
            }
            PlayerInput::Equip(item_id, slot) => {
                let item = match state.player_mut() {
                    Some(entity) => {
                        let index = entity.inventory_index(item_id);
                        let name = index.map(|i| entity.inventory[i].name.clone());
                        entity.equip(item_id, &slot)?;
                        name.unwrap_or_default()
                    }
                    None => return Ok(InputOutcome::NoTurn),
                };
                let actor = state.object_name(player);
                state.push_event(GameEvent::Equipped { actor, item });
                Ok(end_turn(state))
            }
            PlayerInput::Reload(item_id) => {
                let rounds = match state.player_mut() {
                    Some(entity) => entity.load_ammo(item_id)?,
                    None => return Ok(InputOutcome::NoTurn),
                };
                let actor = state.object_name(player);
                state.push_event(GameEvent::Reloaded { actor, rounds });
                Ok(end_turn(state))
            }
            PlayerInput::Next
            | PlayerInput::Prev
            | PlayerInput::Select(_)
            | PlayerInput::Confirm
            | PlayerInput::Cancel => Ok(InputOutcome::NoTurn),
        }
    }

    fn handle_selecting(
        &mut self,
        state: &mut GameState,
        player_id: ObjectId,
        input: PlayerInput,
        action: ActionKind,
        mut targets: ValidTargets,
    ) -> ShambleResult<InputOutcome> {
        match input {
            PlayerInput::Cancel => return Ok(InputOutcome::Cancelled),
            PlayerInput::Confirm => {
                let target = match targets.current() {
                    Some(candidate) => candidate.value,
                    None => return Ok(InputOutcome::Cancelled),
                };
                state.perform_action(
                    ObjectRef::Entity(player_id),
                    action,
                    target,
                    ActionSettings::prevalidated(),
                );
                return Ok(end_turn(state));
            }
            PlayerInput::Next => {
                targets.next();
            }
            PlayerInput::Prev => {
                targets.prev();
            }
            PlayerInput::Select(direction) => {
                targets.set_current_coord_in_direction(direction);
            }
            _ => {}
        }

        let candidates = targets.len();
        self.mode = InputMode::SelectingTarget { action, targets };
        Ok(InputOutcome::Selecting { action, candidates })
    }
}

/// Bumping opens closed doors and attacks whatever stands in the way.
fn bump(state: &mut GameState, player_id: ObjectId, direction: Direction) -> bool {
    let player = ObjectRef::Entity(player_id);
    let pos = match state.entities.get(player_id) {
        Some(entity) => entity.position + direction.to_delta(),
        None => return false,
    };
    let settings = ActionSettings::new();
    for action in [ActionKind::Open, ActionKind::MeleeAttack] {
        let target = state
            .objects_at(pos)
            .into_iter()
            .find(|&target| state.can_perform_action_on_target(player, action, target, &settings));
        if let Some(target) = target {
            if state.can_perform_action(player, action, &settings) {
                return state.perform_action(player, action, target, ActionSettings::new());
            }
        }
    }
    false
}

fn end_turn(state: &mut GameState) -> InputOutcome {
    if !state.is_over() {
        state.take_ai_turns();
    }
    state.mark_explored();
    if state.is_over() {
        InputOutcome::GameOver
    } else {
        InputOutcome::TurnTaken
    }
}
