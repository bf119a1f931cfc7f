#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a run and plays it in the terminal.

mod config;
mod input;
mod logging;
mod terminal;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use maze_escape_core::Event;
use maze_escape_rendering::{compose, RenderingBackend};
use maze_escape_system_bootstrap::Bootstrap;
use maze_escape_world::{self as world, query, World};
use tracing::info;

use crate::{config::GameConfig, terminal::TerminalBackend};

/// Command-line arguments accepted by the Maze Escape binary.
#[derive(Debug, Parser)]
#[command(name = "maze-escape", about = "Escape a sequence of generated mazes")]
struct CliArgs {
    /// TOML file describing the seed, generation tunables and levels.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Run seed; overrides the config file.
    #[arg(long, value_name = "U64")]
    seed: Option<u64>,
    /// Directory receiving the log file.
    #[arg(long, value_name = "PATH", default_value = ".")]
    log_dir: PathBuf,
    /// Print the generated levels and exit without starting the game.
    #[arg(long)]
    dump_levels: bool,
}

/// Entry point for the Maze Escape command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let _log_guard = logging::init(&args.log_dir)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(seed, levels = config.levels.len(), "starting run");

    let mut world = Bootstrap::new(seed, config.carve_config())
        .new_game(&config.levels)
        .context("failed to generate levels")?;

    if args.dump_levels {
        dump_levels(seed, &world);
        return Ok(());
    }

    TerminalBackend::new().run(compose(&world), |command| {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        for event in &events {
            log_event(event);
        }
        if events.contains(&Event::QuitRequested) {
            None
        } else {
            Some(compose(&world))
        }
    })
}

fn dump_levels(seed: u64, world: &World) {
    println!("seed {seed}");
    let gates = query::key_requirements(world);
    for index in 0..query::level_count(world) {
        let Some(level) = query::level(world, index) else {
            continue;
        };
        let gated = gates.get(index).copied().unwrap_or(false);
        println!();
        println!("level {} (requires key: {gated})", index + 1);
        print!("{level}");
    }
}

fn log_event(event: &Event) {
    match event {
        Event::LevelEntered { level } => info!(level, "entered level"),
        Event::ExitLocked { level } => info!(level, "exit locked; key required"),
        Event::KeyCollected { cell } => {
            info!(column = cell.column(), row = cell.row(), "key collected")
        }
        Event::VictoryReached { companion_earned } => {
            info!(companion_earned, "all levels cleared")
        }
        Event::CompanionEarned => info!("companion earned"),
        Event::Restarted => info!("run restarted"),
        Event::QuitRequested => info!("quit requested"),
        Event::PlayerMoved { .. } | Event::MoveBlocked { .. } => {}
    }
}
