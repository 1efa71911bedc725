//! # Action Protocol
//!
//! Any entity, furniture or item can be granted named action capabilities.
//! The source side installs a [`Performable`] record and the target side a
//! [`Resolvable`] record. Every hook is a [`Hook`]: always allowed, always
//! denied, or computed by a function that receives the game and the owner.
//!
//! Dispatch lives on [`GameState`](crate::GameState) in [`protocol`]; the
//! per-action strategies live in [`interact`] and [`combat`]; splash damage
//! and knockback chains live in [`area_effect`].

pub mod area_effect;
pub mod combat;
pub mod interact;
pub mod protocol;
pub mod targets;

pub use area_effect::*;
pub use protocol::*;
pub use targets::*;

use super::{GameState, ObjectRef, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Every action the protocol knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Open,
    Close,
    Push,
    Grab,
    MeleeAttack,
    RangedAttack,
    HordePushBonus,
    Pickup,
}

impl ActionKind {
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Open => "open",
            ActionKind::Close => "close",
            ActionKind::Push => "push",
            ActionKind::Grab => "grab",
            ActionKind::MeleeAttack => "melee_attack",
            ActionKind::RangedAttack => "ranged_attack",
            ActionKind::HordePushBonus => "horde_push_bonus",
            ActionKind::Pickup => "pickup",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tri-state hook: a constant answer or a function of the owning object.
#[derive(Clone, Copy)]
pub enum Hook<F> {
    /// Always allowed; a perform hook yields an empty result
    Always,
    /// Always denied
    Never,
    /// Evaluated with the owning object as context
    Computed(F),
}

impl<F> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Always => f.write_str("Always"),
            Hook::Never => f.write_str("Never"),
            Hook::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Source-only precondition.
pub type SourceCheck = fn(&GameState, ObjectRef, &ActionSettings) -> bool;
/// Source-side filter for a specific target.
pub type TargetCheck = fn(&GameState, ObjectRef, ObjectRef, &ActionSettings) -> bool;
/// Computes the result payload; `None` means the action was not performed.
pub type PerformHandler =
    fn(&mut GameState, ObjectRef, ObjectRef, &ActionSettings) -> Option<ActionResult>;
/// Custom target enumeration.
pub type TargetFinder = fn(&GameState, ObjectRef, ActionKind, &ActionSettings) -> Vec<TargetCandidate>;
/// Runs after resolution with the settings that were resolved.
pub type AfterHandler = fn(&mut GameState, ObjectRef, ObjectRef, &ActionSettings);
/// Target-side acceptance check; the owner is the second argument.
pub type ResolveCheck = fn(&GameState, ObjectRef, &ActionSettings) -> bool;
/// Target-side effect; the owner is the second argument.
pub type ResolveHandler = fn(&mut GameState, ObjectRef, &ActionSettings) -> bool;

/// How a source enumerates candidate targets.
#[derive(Clone, Copy)]
pub enum TargetStrategy {
    /// The four non-diagonal neighbours
    Adjacent,
    /// Everything within weapon range that the source can see
    Ranged,
    /// Objects sharing the source's own cell
    OwnCell,
    /// A stateful override
    Custom(TargetFinder),
}

impl fmt::Debug for TargetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetStrategy::Adjacent => f.write_str("Adjacent"),
            TargetStrategy::Ranged => f.write_str("Ranged"),
            TargetStrategy::OwnCell => f.write_str("OwnCell"),
            TargetStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Source-side capability record.
#[derive(Clone, Copy)]
pub struct Performable {
    pub can_perform_action: Hook<SourceCheck>,
    pub can_perform_action_on_target: Hook<TargetCheck>,
    pub perform_action: Hook<PerformHandler>,
    pub targets: TargetStrategy,
    pub after_success: Option<AfterHandler>,
    pub after_failure: Option<AfterHandler>,
}

impl Performable {
    /// A record where every hook always succeeds and targets are adjacent.
    pub fn always() -> Self {
        Self {
            can_perform_action: Hook::Always,
            can_perform_action_on_target: Hook::Always,
            perform_action: Hook::Always,
            targets: TargetStrategy::Adjacent,
            after_success: None,
            after_failure: None,
        }
    }
}

impl fmt::Debug for Performable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Performable")
            .field("can_perform_action", &self.can_perform_action)
            .field("can_perform_action_on_target", &self.can_perform_action_on_target)
            .field("perform_action", &self.perform_action)
            .field("targets", &self.targets)
            .field("after_success", &self.after_success.is_some())
            .field("after_failure", &self.after_failure.is_some())
            .finish()
    }
}

/// Target-side capability record.
#[derive(Debug, Clone, Copy)]
pub struct Resolvable {
    pub can_resolve_action: Hook<ResolveCheck>,
    pub resolve_action: Hook<ResolveHandler>,
}

impl Resolvable {
    pub fn always() -> Self {
        Self {
            can_resolve_action: Hook::Always,
            resolve_action: Hook::Always,
        }
    }
}

/// The outcome of the most recent perform attempt by an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastAction {
    pub action: ActionKind,
    pub target: ObjectRef,
    pub success: bool,
}

/// Capability table carried by every actionable object.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    performable: HashMap<ActionKind, Performable>,
    resolvable: HashMap<ActionKind, Resolvable>,
    pub last_action: Option<LastAction>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style grant of a source capability.
    pub fn with_performable(mut self, action: ActionKind, record: Performable) -> Self {
        self.grant_performable(action, record);
        self
    }

    /// Builder-style grant of a target capability.
    pub fn with_resolvable(mut self, action: ActionKind, record: Resolvable) -> Self {
        self.grant_resolvable(action, record);
        self
    }

    pub fn grant_performable(&mut self, action: ActionKind, record: Performable) {
        self.performable.insert(action, record);
    }

    pub fn grant_resolvable(&mut self, action: ActionKind, record: Resolvable) {
        self.resolvable.insert(action, record);
    }

    pub fn revoke_performable(&mut self, action: ActionKind) {
        self.performable.remove(&action);
    }

    pub fn revoke_resolvable(&mut self, action: ActionKind) {
        self.resolvable.remove(&action);
    }

    pub fn performable(&self, action: ActionKind) -> Option<Performable> {
        self.performable.get(&action).copied()
    }

    pub fn resolvable(&self, action: ActionKind) -> Option<Resolvable> {
        self.resolvable.get(&action).copied()
    }

    pub fn can_resolve(&self, action: ActionKind) -> bool {
        self.resolvable.contains_key(&action)
    }
}

/// Which position knockback from an area effect radiates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KnockBackOrigin {
    Source,
    #[default]
    Target,
}

/// Secondary effects radiating from a primary target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AreaEffect {
    pub radius: u32,
    pub damage: Option<i32>,
    pub knock_back: Option<u32>,
    pub knock_down: Option<u32>,
    pub knock_back_origin: KnockBackOrigin,
}

/// Payload computed by the source and adjudicated by the target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    pub damage: Option<i32>,
    pub knock_back: Option<u32>,
    pub knock_down: Option<u32>,
    pub area: Option<AreaEffect>,
    /// Unit vector a push moves its target along
    pub push: Option<Position>,
    /// Bonus handed along a chain of pushing zombies
    pub horde_bonus: Option<i32>,
    /// Where the target stood when the result was computed
    pub impact: Option<Position>,
}

/// Per-call options threaded through perform and resolve.
#[derive(Debug, Clone, Default)]
pub struct ActionSettings {
    /// Set by `perform_action` before the target resolves
    pub source: Option<ObjectRef>,
    /// Set by `perform_action` from the source's perform hook
    pub result: Option<ActionResult>,
    pub skip_can_perform_action: bool,
    pub skip_can_perform_action_on_target: bool,
    pub skip_can_resolve_action: bool,
}

impl ActionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips both source-side checks for callers that already validated.
    pub fn prevalidated() -> Self {
        Self {
            skip_can_perform_action: true,
            skip_can_perform_action_on_target: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_source(&self, source: ObjectRef) -> Self {
        Self {
            source: Some(source),
            ..self.clone()
        }
    }
}

/// A candidate target produced by a finder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub position: Position,
    /// Euclidean distance from the acting source
    pub range: f64,
    pub value: ObjectRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        assert_eq!(ActionKind::MeleeAttack.to_string(), "melee_attack");
        assert_eq!(
            serde_json::to_string(&ActionKind::HordePushBonus).unwrap(),
            "\"horde_push_bonus\""
        );
    }

    #[test]
    fn test_capability_grant_and_revoke() {
        let mut capabilities = Capabilities::new()
            .with_performable(ActionKind::Open, Performable::always())
            .with_resolvable(ActionKind::Grab, Resolvable::always());

        assert!(capabilities.performable(ActionKind::Open).is_some());
        assert!(capabilities.performable(ActionKind::Close).is_none());
        assert!(capabilities.can_resolve(ActionKind::Grab));

        capabilities.revoke_resolvable(ActionKind::Grab);
        assert!(!capabilities.can_resolve(ActionKind::Grab));
        capabilities.revoke_performable(ActionKind::Open);
        assert!(capabilities.performable(ActionKind::Open).is_none());
    }

    #[test]
    fn test_hook_debug_hides_functions() {
        let check: Hook<SourceCheck> = Hook::Computed(|_, _, _| true);
        assert_eq!(format!("{:?}", check), "Computed(..)");
        assert_eq!(format!("{:?}", Hook::<SourceCheck>::Never), "Never");
    }
}
