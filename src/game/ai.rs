//! # Zombie AI
//!
//! A zombie turn is a single evaluation over the carried memory fields: stay
//! down if knocked over, maybe stumble, update what it remembers about the
//! player, then bite, chase, smash, shove or wander.

use super::{ActionKind, ActionSettings, EntityKind, GameEvent, GameState, ObjectId, ObjectRef, Position};

/// What a zombie did with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZombieTurn {
    KnockedDown,
    Stumbled,
    Attacked,
    /// Attacked furniture standing in its way
    Smashed,
    /// Shoved the zombie in front, handing over its horde bonus
    Pushed,
    Moved,
    Waited,
}

impl GameState {
    /// Every living zombie acts once, in stable insertion order.
    pub fn take_ai_turns(&mut self) -> Vec<(ObjectId, ZombieTurn)> {
        let mut turns = Vec::new();
        for id in self.entities.ids() {
            if self.is_over() {
                break;
            }
            let is_zombie = self
                .entities
                .get(id)
                .map_or(false, |entity| entity.kind == EntityKind::Zombie && entity.is_alive());
            if is_zombie {
                turns.push((id, self.zombie_turn(id)));
            }
        }
        self.turn_number += 1;
        turns
    }

    /// Runs one zombie turn.
    pub fn zombie_turn(&mut self, id: ObjectId) -> ZombieTurn {
        let (pos, knocked_down, since_stumble) = match self.entities.get(id) {
            Some(zombie) => (
                zombie.position,
                zombie.knocked_down,
                zombie.memory.turns_since_last_stumble,
            ),
            None => return ZombieTurn::Waited,
        };

        if knocked_down > 0 {
            if let Some(zombie) = self.entities.get_mut(id) {
                zombie.knocked_down -= 1;
            }
            return ZombieTurn::KnockedDown;
        }

        let max = self.config.max_turns_without_stumble;
        if max > 0 {
            let stumbles = self
                .random
                .chance(f64::from(since_stumble) / f64::from(max));
            let name = match self.entities.get_mut(id) {
                Some(zombie) if stumbles => {
                    zombie.memory.turns_since_last_stumble = 0;
                    Some(zombie.name.clone())
                }
                Some(zombie) => {
                    zombie.memory.turns_since_last_stumble += 1;
                    None
                }
                None => None,
            };
            if let Some(name) = name {
                self.push_event(GameEvent::Stumbled { name });
                return ZombieTurn::Stumbled;
            }
        }

        let player = self
            .player()
            .filter(|player| player.is_alive() && self.entities.contains(player.id))
            .map(|player| (player.id, player.position));
        self.update_memory(id, pos, player.map(|(_, player_pos)| player_pos));

        if let Some((player_id, player_pos)) = player {
            if pos.is_cardinal_neighbor(player_pos) {
                self.perform_action(
                    ObjectRef::Entity(id),
                    ActionKind::MeleeAttack,
                    ObjectRef::Entity(player_id),
                    ActionSettings::new(),
                );
                return ZombieTurn::Attacked;
            }
        }

        let remembered = self
            .entities
            .get(id)
            .and_then(|zombie| zombie.memory.player_last_seen);
        match remembered {
            Some(goal) => self.chase(id, pos, goal),
            None => self.wander(id, pos),
        }
    }

    fn update_memory(&mut self, id: ObjectId, pos: Position, player_pos: Option<Position>) {
        // Zombies borrow the player's field of view: seeing is mutual.
        let sees_player = player_pos.is_some() && self.fov().is_visible(pos);
        if let Some(zombie) = self.entities.get_mut(id) {
            if sees_player {
                zombie.memory.player_last_seen = player_pos;
            }
            if zombie.memory.player_last_seen == Some(pos) {
                zombie.memory.player_last_seen = None;
            }
        }
    }

    fn chase(&mut self, id: ObjectId, pos: Position, goal: Position) -> ZombieTurn {
        let open_step = self
            .pathfinder()
            .find_path(pos, goal, &|cell| self.is_free(cell))
            .and_then(|path| path.first().copied());
        if let Some(step) = open_step {
            if self.move_entity(id, step) {
                return ZombieTurn::Moved;
            }
        }

        // Blocked: plan through breakable furniture and other zombies and
        // deal with whatever stands on the next cell.
        let forced_step = self
            .pathfinder()
            .find_path(pos, goal, &|cell| {
                self.tile(cell).map_or(false, |tile| tile.passable)
                    && self
                        .furniture
                        .first_at(cell, |f| !f.passable && !f.is_destructible())
                        .is_none()
            })
            .and_then(|path| path.first().copied());
        let step = match forced_step {
            Some(step) => step,
            None => return ZombieTurn::Waited,
        };

        let obstacle = self
            .furniture
            .first_at(step, |f| !f.passable && f.is_destructible())
            .map(|f| f.id);
        if let Some(furniture_id) = obstacle {
            self.perform_action(
                ObjectRef::Entity(id),
                ActionKind::MeleeAttack,
                ObjectRef::Furniture(furniture_id),
                ActionSettings::new(),
            );
            return ZombieTurn::Smashed;
        }

        let blocker = self
            .entity_at(step)
            .filter(|entity| !entity.is_player())
            .map(|entity| entity.id);
        if let Some(other) = blocker {
            self.perform_action(
                ObjectRef::Entity(id),
                ActionKind::HordePushBonus,
                ObjectRef::Entity(other),
                ActionSettings::new(),
            );
            return ZombieTurn::Pushed;
        }

        if self.move_entity(id, step) {
            ZombieTurn::Moved
        } else {
            ZombieTurn::Waited
        }
    }

    fn wander(&mut self, id: ObjectId, pos: Position) -> ZombieTurn {
        let options: Vec<Position> = pos
            .cardinal_adjacent_positions()
            .into_iter()
            .filter(|&cell| self.is_free(cell))
            .collect();
        let choice = self.random.sample(&options).copied();
        match choice {
            Some(step) if self.move_entity(id, step) => ZombieTurn::Moved,
            _ => ZombieTurn::Waited,
        }
    }
}
