//! # Shamble Main Entry Point
//!
//! Generates an office floor, lets the zombies shamble for a few turns and
//! prints the result as ASCII.

use clap::Parser;
use shamble::{
    content, GameConfig, GameState, InputController, InputOutcome, PlayerInput, Position,
    ShambleResult,
};
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Command line arguments for Shamble.
#[derive(Parser, Debug)]
#[command(name = "shamble")]
#[command(about = "A turn-based zombie roguelike set on an overrun office floor")]
#[command(version)]
struct Args {
    /// Random seed for floor generation and combat
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of turns the player waits while the zombies act
    #[arg(short, long, default_value_t = 0)]
    turns: u32,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Keep generation markers and room footprints on the printed floor
    #[arg(long)]
    show_placeholders: bool,
}

fn main() -> ShambleResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    log::info!("Starting Shamble v{}", shamble::VERSION);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.show_placeholders {
        config.keep_placeholders = true;
    }

    log::info!("Generating office floor with seed {}", config.seed);
    let (mut state, layout) = content::generate_default_floor(config)?;
    println!(
        "Seed {}: {} rooms, {} doors",
        state.config.seed,
        layout.rooms.len(),
        layout.doors.len()
    );
    for room in &layout.rooms {
        println!(
            "  {} at {} (rotation {})",
            room.template, room.origin, room.rotation
        );
    }
    print_events(&mut state);

    let mut controller = InputController::new();
    for turn in 1..=args.turns {
        let outcome = controller.handle(&mut state, PlayerInput::Wait)?;
        log::debug!("Turn {}: {:?}", turn, outcome);
        print_events(&mut state);
        if outcome == InputOutcome::GameOver {
            break;
        }
    }

    println!();
    print!("{}", render(&state));
    println!("Status: {:?} after {} turns", state.status, state.turn_number);
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

fn print_events(state: &mut GameState) {
    for event in state.drain_events() {
        println!("{}", event);
    }
}

/// Draws the floor, entities over furniture over items over terrain.
fn render(state: &GameState) -> String {
    let mut out = String::with_capacity((state.width() + 1) * state.height());
    for y in 0..state.height() as i32 {
        for x in 0..state.width() as i32 {
            out.push(glyph_at(state, Position::new(x, y)));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(state: &GameState, pos: Position) -> char {
    if let Some(entity) = state.entity_at(pos) {
        return entity.glyph;
    }
    if let Some(furniture) = state.furniture.last_at(pos, |_| true) {
        return furniture.glyph;
    }
    if let Some(item) = state.items.last_at(pos, |_| true) {
        return item.glyph;
    }
    if state.markers.first_at(pos, |_| true).is_some() {
        return '?';
    }
    state.tile(pos).map_or(' ', |tile| tile.glyph)
}
