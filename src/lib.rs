//! # Shamble
//!
//! Turn-based action resolution and procedural floor generation for a tile-based
//! zombie roguelike set on an overrun office floor.
//!
//! ## Architecture Overview
//!
//! - **Spatial grids**: dense per-cell storage for tiles, furniture, items,
//!   entities, generation markers and transient effect layers
//! - **Action protocol**: any entity, furniture or item can be granted
//!   performable and resolvable capabilities per action kind
//! - **Effects**: damage, bleeding, knockback chains and area effects
//! - **Generation**: rotated character-grid templates composed into a floor,
//!   with door placement inferred from shared room edges
//! - **AI**: zombie turns with memory, pathing, stumbling and horde pushing
//!
//! Rendering, keyboard mapping, field-of-view computation and message
//! formatting are collaborators; the core only talks to them through the
//! traits and layers exposed here.

pub mod game;
pub mod generation;
pub mod input;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use utils::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Core error type for the Shamble engine.
///
/// Only configuration and programmer errors surface here. A denied action is
/// a plain `false`, never an error.
#[derive(thiserror::Error, Debug)]
pub enum ShambleError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Content or setup is inconsistent (authoring bug)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A type name is not present in any registry
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Coordinate outside the grid
    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),

    /// Single-occupant cell already taken
    #[error("Cell already occupied: {0}")]
    CellOccupied(Position),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Shamble codebase.
pub type ShambleResult<T> = Result<T, ShambleError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default floor width in tiles
    pub const DEFAULT_FLOOR_WIDTH: usize = 12;

    /// Default floor height in tiles
    pub const DEFAULT_FLOOR_HEIGHT: usize = 12;

    /// Edge length of the built-in square room templates
    pub const ROOM_SIZE: usize = 5;

    /// Upper bound for blood accumulated on a single tile
    pub const DEFAULT_BLOOD_MAX: u32 = 10;

    /// Blood added per point of damage dealt to an organic target
    pub const DEFAULT_BLOOD_PER_DAMAGE: u32 = 1;

    /// Turns after which a zombie is certain to stumble
    pub const DEFAULT_MAX_TURNS_WITHOUT_STUMBLE: u32 = 12;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: i32 = 10;
}

/// Runtime configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for generation and combat
    pub seed: u64,
    /// Maximum blood intensity a tile can hold
    pub blood_max: u32,
    /// Blood added per point of damage to organic targets
    pub blood_per_damage: u32,
    /// Stumble window for zombies
    pub max_turns_without_stumble: u32,
    /// Keep generation markers and placeholder tiles after floor generation
    pub keep_placeholders: bool,
    /// Display name of the player
    pub player_name: String,
}

impl GameConfig {
    /// Creates a configuration with default values and the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use shamble::GameConfig;
    ///
    /// let config = GameConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(!config.keep_placeholders);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            blood_max: config::DEFAULT_BLOOD_MAX,
            blood_per_damage: config::DEFAULT_BLOOD_PER_DAMAGE,
            max_turns_without_stumble: config::DEFAULT_MAX_TURNS_WITHOUT_STUMBLE,
            keep_placeholders: false,
            player_name: "Survivor".to_string(),
        }
    }

    /// Configuration for tests: zombies never stumble.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            max_turns_without_stumble: 0,
            ..Self::new(seed)
        }
    }

    /// Parses a configuration from JSON. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> ShambleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ShambleResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(42)
    }
}
