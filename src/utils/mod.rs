//! # Utilities Module
//!
//! Random helpers, line math and pathfinding shared by the game and generation code.

pub mod math;
pub mod pathfinding;
pub mod random;

pub use math::*;
pub use self::pathfinding::*;
pub use random::*;
