//! # Combat
//!
//! Melee and ranged attacks, the zombie horde bonus, and the damage pipeline
//! every attack resolves through.

use super::{
    ActionKind, ActionResult, ActionSettings, Hook, Performable, Resolvable, TargetStrategy,
};
use crate::game::{GameEvent, GameState, ObjectRef, WeaponStats};

fn weapon_result(stats: &WeaponStats) -> ActionResult {
    ActionResult {
        damage: Some(stats.damage),
        knock_back: stats.knock_back,
        knock_down: stats.knock_down,
        area: stats.area,
        ..ActionResult::default()
    }
}

fn after_attack(state: &mut GameState, source: ObjectRef, target: ObjectRef, settings: &ActionSettings) {
    if let Some(result) = settings.result.as_ref() {
        state.resolve_area_effect(source, target, result);
    }
}

fn mark_attack_sound(state: &mut GameState, source: ObjectRef) {
    if let Some(pos) = state.object_position(source) {
        state.layers.mark_sound(pos);
    }
}

fn is_destructible_furniture(state: &GameState, target: ObjectRef) -> bool {
    match target {
        ObjectRef::Furniture(id) => state.furniture.get(id).map_or(false, |f| f.is_destructible()),
        _ => false,
    }
}

// --- melee ----------------------------------------------------------------

fn has_melee_weapon(state: &GameState, source: ObjectRef, _: &ActionSettings) -> bool {
    match source {
        ObjectRef::Entity(id) => state
            .entities
            .get(id)
            .map_or(false, |entity| entity.melee_stats().is_some()),
        _ => false,
    }
}

fn melee_result(state: &GameState, source: ObjectRef, target: ObjectRef) -> Option<ActionResult> {
    let entity = match source {
        ObjectRef::Entity(id) => state.entities.get(id)?,
        _ => return None,
    };
    let mut result = weapon_result(entity.melee_stats()?);
    result.impact = state.object_position(target);
    Some(result)
}

/// Attack an adjacent target with the equipped melee weapon.
pub fn melee_performable() -> Performable {
    Performable {
        can_perform_action: Hook::Computed(has_melee_weapon),
        perform_action: Hook::Computed(|state, source, target, _| {
            let result = melee_result(state, source, target)?;
            mark_attack_sound(state, source);
            Some(result)
        }),
        after_success: Some(after_attack),
        ..Performable::always()
    }
}

/// Zombie melee: the accumulated horde bonus is spent on destructible furniture.
pub fn zombie_melee_performable() -> Performable {
    Performable {
        perform_action: Hook::Computed(|state, source, target, _| {
            let mut result = melee_result(state, source, target)?;
            if is_destructible_furniture(state, target) {
                if let ObjectRef::Entity(id) = source {
                    if let Some(zombie) = state.entities.get_mut(id) {
                        let bonus = std::mem::take(&mut zombie.horde_push_bonus);
                        result.damage = result.damage.map(|damage| damage + bonus);
                    }
                }
            }
            mark_attack_sound(state, source);
            Some(result)
        }),
        ..melee_performable()
    }
}

pub fn melee_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Always,
        resolve_action: Hook::Computed(|state, target, settings| {
            state.apply_damage(target, ActionKind::MeleeAttack, settings)
        }),
    }
}

// --- ranged ---------------------------------------------------------------

/// Shoot a visible target within weapon range. Each shot spends a round.
pub fn ranged_performable() -> Performable {
    Performable {
        can_perform_action: Hook::Computed(|state, source, _| match source {
            ObjectRef::Entity(id) => state
                .entities
                .get(id)
                .and_then(|entity| entity.ranged_stats())
                .map_or(false, |stats| stats.has_ammo()),
            _ => false,
        }),
        perform_action: Hook::Computed(|state, source, target, _| {
            let id = match source {
                ObjectRef::Entity(id) => id,
                _ => return None,
            };
            let impact = state.object_position(target);
            let stats = state.entities.get_mut(id)?.ranged_stats_mut()?;
            if !stats.has_ammo() {
                return None;
            }
            if stats.ammo_type.is_some() {
                stats.loaded -= 1;
            }
            let mut result = weapon_result(&stats.weapon);
            result.impact = impact;
            mark_attack_sound(state, source);
            Some(result)
        }),
        targets: TargetStrategy::Ranged,
        after_success: Some(after_attack),
        ..Performable::always()
    }
}

/// Ranged hits must be in view; splash damage skips that check.
pub fn ranged_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Computed(|state, target, _| {
            state
                .object_position(target)
                .map_or(false, |pos| state.fov().is_visible(pos))
        }),
        resolve_action: Hook::Computed(|state, target, settings| {
            let pos = state.object_position(target);
            let hit = state.apply_damage(target, ActionKind::RangedAttack, settings);
            if hit {
                if let Some(pos) = pos {
                    state.layers.mark_damage(pos);
                }
            }
            hit
        }),
    }
}

// --- horde push bonus -----------------------------------------------------

/// Hands the pusher's melee damage plus its own bonus to the zombie in front.
pub fn horde_push_performable() -> Performable {
    Performable {
        perform_action: Hook::Computed(|state, source, _, _| {
            let entity = match source {
                ObjectRef::Entity(id) => state.entities.get(id)?,
                _ => return None,
            };
            Some(ActionResult {
                horde_bonus: Some(entity.melee_damage().unwrap_or(0) + entity.horde_push_bonus),
                ..ActionResult::default()
            })
        }),
        after_success: Some(|state, source, _, _| {
            if let ObjectRef::Entity(id) = source {
                if let Some(entity) = state.entities.get_mut(id) {
                    entity.horde_push_bonus = 0;
                }
            }
        }),
        ..Performable::always()
    }
}

pub fn horde_push_resolvable() -> Resolvable {
    Resolvable {
        can_resolve_action: Hook::Always,
        resolve_action: Hook::Computed(|state, target, settings| {
            let bonus = match settings.result.as_ref().and_then(|r| r.horde_bonus) {
                Some(bonus) => bonus,
                None => return false,
            };
            match target {
                ObjectRef::Entity(id) => match state.entities.get_mut(id) {
                    Some(entity) => {
                        entity.horde_push_bonus += bonus;
                        true
                    }
                    None => false,
                },
                _ => false,
            }
        }),
    }
}

// --- damage pipeline ------------------------------------------------------

impl GameState {
    /// Applies `settings.result.damage` to the target.
    ///
    /// Organic targets bleed onto their tile. Entities reaching 0 hp die and
    /// leave the grid; destructible furniture is smashed and removed.
    pub fn apply_damage(
        &mut self,
        target: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> bool {
        let damage = match settings.result.as_ref().and_then(|r| r.damage) {
            Some(damage) => damage.max(0),
            None => return false,
        };
        let attacker = settings
            .source
            .map(|source| self.object_name(source))
            .unwrap_or_else(|| "Something".to_string());

        match target {
            ObjectRef::Entity(id) => {
                let (name, pos, organic, hp) = match self.entities.get_mut(id) {
                    Some(entity) if entity.is_alive() => {
                        entity.hp -= damage;
                        (entity.name.clone(), entity.position, entity.organic, entity.hp)
                    }
                    _ => return false,
                };
                self.push_event(GameEvent::Attacked {
                    attacker,
                    target: name.clone(),
                    damage,
                    action,
                });
                if organic && damage > 0 {
                    let blood = (damage as u32).saturating_mul(self.config.blood_per_damage);
                    self.splatter(pos, blood);
                }
                if hp <= 0 {
                    self.bury_entity(id);
                    self.push_event(GameEvent::Died { name, position: pos });
                }
                true
            }
            ObjectRef::Furniture(id) => {
                let (name, pos, hp) = match self.furniture.get_mut(id) {
                    Some(furniture) if !furniture.dead => match furniture.hp.as_mut() {
                        Some(hp) => {
                            *hp -= damage;
                            (furniture.name.clone(), furniture.position, *hp)
                        }
                        None => return false,
                    },
                    _ => return false,
                };
                self.push_event(GameEvent::Attacked {
                    attacker,
                    target: format!("the {}", name),
                    damage,
                    action,
                });
                if hp <= 0 {
                    if let Some(furniture) = self.furniture.get_mut(id) {
                        furniture.dead = true;
                    }
                    self.furniture.remove(id);
                    self.layers.mark_smash(pos);
                    self.push_event(GameEvent::Destroyed { name, position: pos });
                }
                true
            }
            ObjectRef::Item(_) => false,
        }
    }
}
