//! # Game Events
//!
//! One-line messages for the console sink. Every resolved action pushes zero
//! or more events; the host drains them after each turn.

use super::{ActionKind, Position};
use std::fmt;

/// Something worth telling the player about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Attacked {
        attacker: String,
        target: String,
        damage: i32,
        action: ActionKind,
    },
    Died {
        name: String,
        position: Position,
    },
    Destroyed {
        name: String,
        position: Position,
    },
    Opened {
        actor: String,
        target: String,
    },
    Closed {
        actor: String,
        target: String,
    },
    Pushed {
        actor: String,
        target: String,
    },
    Grabbed {
        actor: String,
        target: String,
    },
    Released {
        actor: String,
        target: String,
    },
    PickedUp {
        actor: String,
        item: String,
    },
    Equipped {
        actor: String,
        item: String,
    },
    Reloaded {
        actor: String,
        rounds: u32,
    },
    Healed {
        actor: String,
        amount: i32,
    },
    KnockedBack {
        name: String,
        distance: u32,
    },
    KnockedDown {
        name: String,
        turns: u32,
    },
    Stumbled {
        name: String,
    },
    ExitReached {
        name: String,
    },
    /// Free-form feedback for denied player actions
    Notice(String),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Attacked {
                attacker,
                target,
                damage,
                action,
            } => match action {
                ActionKind::RangedAttack => {
                    write!(f, "{} shoots {} for {} damage.", attacker, target, damage)
                }
                _ => write!(f, "{} hits {} for {} damage.", attacker, target, damage),
            },
            GameEvent::Died { name, .. } => write!(f, "{} dies.", name),
            GameEvent::Destroyed { name, .. } => write!(f, "The {} is smashed to pieces.", name),
            GameEvent::Opened { actor, target } => write!(f, "{} opens the {}.", actor, target),
            GameEvent::Closed { actor, target } => write!(f, "{} closes the {}.", actor, target),
            GameEvent::Pushed { actor, target } => write!(f, "{} pushes the {}.", actor, target),
            GameEvent::Grabbed { actor, target } => write!(f, "{} grabs the {}.", actor, target),
            GameEvent::Released { actor, target } => {
                write!(f, "{} lets go of the {}.", actor, target)
            }
            GameEvent::PickedUp { actor, item } => write!(f, "{} picks up the {}.", actor, item),
            GameEvent::Equipped { actor, item } => write!(f, "{} equips the {}.", actor, item),
            GameEvent::Reloaded { actor, rounds } => {
                write!(f, "{} loads {} rounds.", actor, rounds)
            }
            GameEvent::Healed { actor, amount } => write!(f, "{} recovers {} hp.", actor, amount),
            GameEvent::KnockedBack { name, distance } => {
                write!(f, "{} is knocked back {} tiles.", name, distance)
            }
            GameEvent::KnockedDown { name, turns } => {
                write!(f, "{} is knocked down for {} turns.", name, turns)
            }
            GameEvent::Stumbled { name } => write!(f, "{} stumbles.", name),
            GameEvent::ExitReached { name } => write!(f, "{} reaches the elevator and escapes!", name),
            GameEvent::Notice(message) => f.write_str(message),
        }
    }
}
