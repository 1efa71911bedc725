//! Target enumeration strategies.

use super::{ActionKind, ActionSettings, TargetCandidate};
use crate::game::{GameState, ObjectRef, Position};
use crate::within_radius;

impl GameState {
    fn candidates_at(
        &self,
        source: ObjectRef,
        origin: Position,
        pos: Position,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> Vec<TargetCandidate> {
        self.objects_at(pos)
            .into_iter()
            .filter(|&target| target != source)
            .filter(|&target| self.can_perform_action_on_target(source, action, target, settings))
            .map(|value| TargetCandidate {
                position: pos,
                range: origin.euclidean_distance(pos),
                value,
            })
            .collect()
    }

    /// The four non-diagonal neighbours of the source.
    pub fn adjacent_targets(
        &self,
        source: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> Vec<TargetCandidate> {
        let origin = match self.object_position(source) {
            Some(pos) => pos,
            None => return Vec::new(),
        };
        origin
            .cardinal_adjacent_positions()
            .into_iter()
            .flat_map(|pos| self.candidates_at(source, origin, pos, action, settings))
            .collect()
    }

    /// Everything within the source's ranged weapon range that is in view.
    pub fn ranged_targets(
        &self,
        source: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> Vec<TargetCandidate> {
        let (origin, range) = match source {
            ObjectRef::Entity(id) => match self.entities.get(id) {
                Some(entity) => match entity.ranged_stats() {
                    Some(stats) => (entity.position, stats.range),
                    None => return Vec::new(),
                },
                None => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        let reach = range as i32;
        let mut targets = Vec::new();
        for y in (origin.y - reach)..=(origin.y + reach) {
            for x in (origin.x - reach)..=(origin.x + reach) {
                let pos = Position::new(x, y);
                if pos == origin
                    || !self.in_bounds(pos)
                    || !within_radius(origin, pos, range)
                    || !self.fov().is_visible(pos)
                {
                    continue;
                }
                targets.extend(self.candidates_at(source, origin, pos, action, settings));
            }
        }
        targets
    }

    /// Objects sharing the source's own cell.
    pub fn own_cell_targets(
        &self,
        source: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> Vec<TargetCandidate> {
        match self.object_position(source) {
            Some(origin) => self.candidates_at(source, origin, origin, action, settings),
            None => Vec::new(),
        }
    }

    /// Entities and furniture within a Euclidean radius, ignoring field of view
    /// and capabilities. Used for splash effects only.
    pub fn radius_targets(&self, center: Position, radius: u32) -> Vec<TargetCandidate> {
        let reach = radius as i32;
        let mut targets = Vec::new();
        for y in (center.y - reach)..=(center.y + reach) {
            for x in (center.x - reach)..=(center.x + reach) {
                let pos = Position::new(x, y);
                if !self.in_bounds(pos) || !within_radius(center, pos, radius) {
                    continue;
                }
                let range = center.euclidean_distance(pos);
                let here = self
                    .entities
                    .ids_at(pos)
                    .iter()
                    .map(|&id| ObjectRef::Entity(id))
                    .chain(self.furniture.ids_at(pos).iter().map(|&id| ObjectRef::Furniture(id)));
                targets.extend(here.map(|value| TargetCandidate {
                    position: pos,
                    range,
                    value,
                }));
            }
        }
        targets
    }
}
