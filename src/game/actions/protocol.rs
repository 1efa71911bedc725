//! Performable/resolvable negotiation.
//!
//! A missing capability on either side answers `false`, exactly like an
//! explicit denial, so callers can probe speculatively.

use super::{
    ActionKind, ActionResult, ActionSettings, Hook, LastAction, TargetCandidate, TargetStrategy,
};
use crate::game::{GameState, ObjectRef};

impl GameState {
    /// Source-only precondition, independent of any target.
    pub fn can_perform_action(
        &self,
        source: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> bool {
        let record = match self.capabilities(source).and_then(|c| c.performable(action)) {
            Some(record) => record,
            None => return false,
        };
        match record.can_perform_action {
            Hook::Always => true,
            Hook::Never => false,
            Hook::Computed(check) => check(self, source, &settings.with_source(source)),
        }
    }

    /// Enumerates valid targets, or `None` if the source does not know the action.
    pub fn get_targets_for_action(
        &self,
        source: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> Option<Vec<TargetCandidate>> {
        let record = self.capabilities(source)?.performable(action)?;
        let settings = settings.with_source(source);
        let targets = match record.targets {
            TargetStrategy::Adjacent => self.adjacent_targets(source, action, &settings),
            TargetStrategy::Ranged => self.ranged_targets(source, action, &settings),
            TargetStrategy::OwnCell => self.own_cell_targets(source, action, &settings),
            TargetStrategy::Custom(finder) => finder(self, source, action, &settings),
        };
        Some(targets)
    }

    /// Source-side filter AND the target's own acceptance.
    pub fn can_perform_action_on_target(
        &self,
        source: ObjectRef,
        action: ActionKind,
        target: ObjectRef,
        settings: &ActionSettings,
    ) -> bool {
        let record = match self.capabilities(source).and_then(|c| c.performable(action)) {
            Some(record) => record,
            None => return false,
        };
        if self
            .capabilities(target)
            .and_then(|c| c.resolvable(action))
            .is_none()
        {
            return false;
        }

        let settings = settings.with_source(source);
        let source_allows = match record.can_perform_action_on_target {
            Hook::Always => true,
            Hook::Never => false,
            Hook::Computed(check) => check(self, source, target, &settings),
        };
        source_allows && self.can_resolve_action(target, action, &settings)
    }

    /// Runs the full negotiation. The outcome is the target's resolution.
    ///
    /// The source's `last_action` is recorded on every call, including a
    /// denial because the source lacks the capability.
    pub fn perform_action(
        &mut self,
        source: ObjectRef,
        action: ActionKind,
        target: ObjectRef,
        settings: ActionSettings,
    ) -> bool {
        let record = match self.capabilities(source).and_then(|c| c.performable(action)) {
            Some(record) => record,
            None => {
                self.record_last_action(source, action, target, false);
                return false;
            }
        };
        let mut settings = settings.with_source(source);

        let allowed = (settings.skip_can_perform_action
            || self.can_perform_action(source, action, &settings))
            && (settings.skip_can_perform_action_on_target
                || self.can_perform_action_on_target(source, action, target, &settings));

        let success = if allowed {
            let result = match record.perform_action {
                Hook::Always => Some(ActionResult::default()),
                Hook::Never => None,
                Hook::Computed(handler) => handler(self, source, target, &settings),
            };
            match result {
                Some(result) => {
                    settings.result = Some(result);
                    self.resolve_action(target, action, &settings)
                }
                None => false,
            }
        } else {
            false
        };

        self.record_last_action(source, action, target, success);

        let after = if success {
            record.after_success
        } else {
            record.after_failure
        };
        if let Some(after) = after {
            after(self, source, target, &settings);
        }

        log::debug!("{} -> {:?} on {:?}: {}", action, source, target, success);
        success
    }

    /// Target-side acceptance check.
    pub fn can_resolve_action(
        &self,
        target: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> bool {
        let record = match self.capabilities(target).and_then(|c| c.resolvable(action)) {
            Some(record) => record,
            None => return false,
        };
        match record.can_resolve_action {
            Hook::Always => true,
            Hook::Never => false,
            Hook::Computed(check) => check(self, target, settings),
        }
    }

    /// Applies the action to the target, re-checking unless told to skip.
    pub fn resolve_action(
        &mut self,
        target: ObjectRef,
        action: ActionKind,
        settings: &ActionSettings,
    ) -> bool {
        let record = match self.capabilities(target).and_then(|c| c.resolvable(action)) {
            Some(record) => record,
            None => return false,
        };
        if !settings.skip_can_resolve_action && !self.can_resolve_action(target, action, settings) {
            return false;
        }
        match record.resolve_action {
            Hook::Always => true,
            Hook::Never => false,
            Hook::Computed(handler) => handler(self, target, settings),
        }
    }

    fn record_last_action(
        &mut self,
        source: ObjectRef,
        action: ActionKind,
        target: ObjectRef,
        success: bool,
    ) {
        if let Some(capabilities) = self.capabilities_mut(source) {
            capabilities.last_action = Some(LastAction {
                action,
                target,
                success,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Capabilities, Performable, Resolvable};
    use crate::generation::content;
    use crate::{GameConfig, Position};
    use std::sync::Arc;

    fn state() -> GameState {
        let registry = Arc::new(content::default_registry().unwrap());
        let mut state = GameState::new(GameConfig::for_testing(3), registry);
        state.set_size(5, 5);
        for pos in state.tiles.positions().collect::<Vec<_>>() {
            let tile = state.registry.make_tile(content::FLOOR).unwrap();
            state.tiles.set(pos, tile).unwrap();
        }
        state
    }

    fn with_caps(state: &mut GameState, id: crate::ObjectId, caps: Capabilities) {
        state.entities.get_mut(id).unwrap().capabilities = caps;
    }

    #[test]
    fn test_missing_capability_is_denial() {
        let mut state = state();
        let a = state.spawn_entity(content::ZOMBIE, Position::new(1, 1)).unwrap();
        let b = state.spawn_entity(content::ZOMBIE, Position::new(2, 1)).unwrap();
        with_caps(&mut state, a, Capabilities::new());
        let (a, b) = (ObjectRef::Entity(a), ObjectRef::Entity(b));

        let settings = ActionSettings::new();
        assert!(!state.can_perform_action(a, ActionKind::Open, &settings));
        assert!(state.get_targets_for_action(a, ActionKind::Open, &settings).is_none());
        assert!(!state.can_perform_action_on_target(a, ActionKind::Open, b, &settings));
        assert!(!state.perform_action(a, ActionKind::Open, b, settings));
        let last = state.capabilities(a).unwrap().last_action.unwrap();
        assert_eq!(last.action, ActionKind::Open);
        assert_eq!(last.target, b);
        assert!(!last.success);
    }

    #[test]
    fn test_target_veto_decides_outcome() {
        let mut state = state();
        let a = state.spawn_entity(content::ZOMBIE, Position::new(1, 1)).unwrap();
        let b = state.spawn_entity(content::ZOMBIE, Position::new(2, 1)).unwrap();
        with_caps(
            &mut state,
            a,
            Capabilities::new().with_performable(ActionKind::Grab, Performable::always()),
        );
        with_caps(
            &mut state,
            b,
            Capabilities::new().with_resolvable(
                ActionKind::Grab,
                Resolvable {
                    can_resolve_action: Hook::Always,
                    resolve_action: Hook::Never,
                },
            ),
        );
        let (a, b) = (ObjectRef::Entity(a), ObjectRef::Entity(b));

        assert!(state.can_perform_action_on_target(a, ActionKind::Grab, b, &ActionSettings::new()));
        assert!(!state.perform_action(a, ActionKind::Grab, b, ActionSettings::new()));
        let last = state.capabilities(a).unwrap().last_action.unwrap();
        assert_eq!(last.target, b);
        assert!(!last.success);
    }

    #[test]
    fn test_skip_flags_bypass_source_checks() {
        let mut state = state();
        let a = state.spawn_entity(content::ZOMBIE, Position::new(1, 1)).unwrap();
        let b = state.spawn_entity(content::ZOMBIE, Position::new(2, 1)).unwrap();
        let mut record = Performable::always();
        record.can_perform_action = Hook::Never;
        with_caps(
            &mut state,
            a,
            Capabilities::new().with_performable(ActionKind::Push, record),
        );
        with_caps(
            &mut state,
            b,
            Capabilities::new().with_resolvable(ActionKind::Push, Resolvable::always()),
        );
        let (a, b) = (ObjectRef::Entity(a), ObjectRef::Entity(b));

        assert!(!state.perform_action(a, ActionKind::Push, b, ActionSettings::new()));
        assert!(state.perform_action(a, ActionKind::Push, b, ActionSettings::prevalidated()));
    }
}
