//! # Area Effects
//!
//! Secondary effects of a resolved attack: direct knockback and knockdown on
//! the primary target, then splash damage, knockback and knockdown on every
//! entity and piece of furniture around the impact point.

use super::{ActionKind, ActionResult, ActionSettings, KnockBackOrigin};
use crate::game::{GameEvent, GameState, ObjectId, ObjectRef, Position};
use crate::{distance_squared, ray_beyond};
use std::collections::HashSet;

impl GameState {
    /// Applies the secondary effects carried by an attack result.
    pub fn resolve_area_effect(&mut self, source: ObjectRef, target: ObjectRef, result: &ActionResult) {
        let source_pos = self.object_position(source);
        let impact = result.impact.or_else(|| self.object_position(target));

        if let ObjectRef::Entity(target_id) = target {
            if let (Some(distance), Some(origin)) = (result.knock_back, source_pos) {
                self.knock_back(target_id, origin, distance);
            }
            if let Some(turns) = result.knock_down {
                self.knock_down(target_id, turns);
            }
        }

        let (area, center) = match (result.area, impact) {
            (Some(area), Some(center)) if area.radius > 0 => (area, center),
            _ => return,
        };

        // The attacker is never caught in its own blast.
        let caught: Vec<ObjectRef> = self
            .radius_targets(center, area.radius)
            .into_iter()
            .map(|candidate| candidate.value)
            .filter(|&value| value != source)
            .collect();
        log::debug!("Area effect at {} catches {} objects", center, caught.len());

        if let Some(damage) = area.damage {
            let settings = ActionSettings {
                source: Some(source),
                result: Some(ActionResult {
                    damage: Some(damage),
                    ..ActionResult::default()
                }),
                skip_can_resolve_action: true,
                ..ActionSettings::default()
            };
            for &value in &caught {
                self.resolve_action(value, ActionKind::RangedAttack, &settings);
            }
        }

        let caught_entities: Vec<ObjectId> = caught
            .iter()
            .filter_map(|value| match value {
                ObjectRef::Entity(id) if self.entities.contains(*id) => Some(*id),
                _ => None,
            })
            .collect();

        if let Some(distance) = area.knock_back {
            let origin = match area.knock_back_origin {
                KnockBackOrigin::Source => source_pos.unwrap_or(center),
                KnockBackOrigin::Target => center,
            };
            let mut ordered: Vec<(i32, ObjectId)> = caught_entities
                .iter()
                .filter_map(|&id| {
                    self.entities
                        .get(id)
                        .map(|entity| (distance_squared(origin, entity.position), id))
                })
                .collect();
            // Farthest first so nearer entities land in cells already vacated.
            ordered.sort_by(|a, b| b.0.cmp(&a.0));
            for (_, id) in ordered {
                self.knock_back(id, origin, distance);
            }
        }

        if let Some(turns) = area.knock_down {
            for &id in &caught_entities {
                self.knock_down(id, turns);
            }
        }
    }

    /// Knocks an entity away from `origin` by up to `distance` cells.
    ///
    /// Entities in the way are knocked back from the mover's starting cell by
    /// the same rules. An entity is moved at most once per chain. Returns
    /// whether the entity moved.
    pub fn knock_back(&mut self, id: ObjectId, origin: Position, distance: u32) -> bool {
        let mut visited = HashSet::new();
        self.knock_back_chain(id, origin, distance, &mut visited)
    }

    fn knock_back_chain(
        &mut self,
        id: ObjectId,
        origin: Position,
        distance: u32,
        visited: &mut HashSet<ObjectId>,
    ) -> bool {
        if !visited.insert(id) {
            return false;
        }
        let start = match self.entities.get(id) {
            Some(entity) => entity.position,
            None => return false,
        };

        let mut destination = start;
        for cell in ray_beyond(origin, start, distance) {
            if !self.is_walkable(cell) {
                break;
            }
            if let Some(occupant) = self.entity_at(cell).map(|entity| entity.id) {
                if occupant == id {
                    break;
                }
                self.knock_back_chain(occupant, start, distance, visited);
                if !self.entities.is_empty_at(cell) {
                    break;
                }
            }
            destination = cell;
        }

        if destination == start || self.entities.move_to(id, destination).is_err() {
            return false;
        }
        self.layers.push_knock_back(start, destination);
        let name = self.object_name(ObjectRef::Entity(id));
        self.push_event(GameEvent::KnockedBack {
            name,
            distance: start.manhattan_distance(destination).max(1),
        });
        true
    }

    /// Keeps an entity on the floor for at least `turns` turns.
    pub fn knock_down(&mut self, id: ObjectId, turns: u32) {
        let name = match self.entities.get_mut(id) {
            Some(entity) if turns > 0 => {
                entity.knocked_down = entity.knocked_down.max(turns);
                entity.name.clone()
            }
            _ => return,
        };
        self.push_event(GameEvent::KnockedDown { name, turns });
    }
}
