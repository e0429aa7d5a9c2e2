//! Quantity Catch entry point
//!
//! Headless native runner: loads a content pack (or the built-in catalog)
//! and lets the autoplay basket play one game to the end.
//!
//! Usage: `quantity-catch [PACK.json] [--game ID] [--seed N] [--max-ticks N]`

#[cfg(not(target_arch = "wasm32"))]
use std::{path::PathBuf, process::ExitCode};

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use quantity_catch::{
    consts::FRAME_MS,
    content::{ContentPack, builtin},
    sim::{GameEvent, GamePhase, GameState, TickInput, tick},
};

/// Autoplay one game headless
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Parser)]
#[command(name = "quantity-catch", version, about)]
struct Options {
    /// JSON content pack (defaults to the built-in catalog)
    pack_path: Option<PathBuf>,
    /// Game to play from the pack
    #[arg(long = "game", default_value_t = builtin::BUILTIN_GAME_ID)]
    game_id: u32,
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Stop the run after this many frames (about an hour of play)
    #[arg(long, default_value_t = 225_000)]
    max_ticks: u64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Quantity Catch (native) starting...");

    let options = Options::parse();

    let pack = match &options.pack_path {
        Some(path) => match ContentPack::load(path) {
            Ok(pack) => pack,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => builtin::catalog_pack(),
    };

    let mut state = match GameState::start(&pack, options.game_id, options.seed) {
        Ok(state) => state,
        Err(err) => {
            log::error!("cannot start game {}: {err}", options.game_id);
            return ExitCode::FAILURE;
        }
    };

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut ticks = 0;
    while !state.phase.is_terminal() && ticks < options.max_ticks {
        tick(&mut state, &pack, &input, FRAME_MS);
        ticks += 1;
        for event in state.drain_events() {
            match event {
                GameEvent::LevelStarted { level, target } => {
                    println!("level {level}: collect '{target}'");
                }
                GameEvent::LevelComplete { level } => {
                    println!("level {level} complete (score {})", state.score);
                }
                other => log::debug!("{other:?}"),
            }
        }
    }

    println!(
        "{:?} after {}s on level {}: score {}, lives {}",
        state.phase,
        state.clock_ms / 1000,
        state.level_number,
        state.score,
        state.lives
    );

    match state.phase {
        GamePhase::Won | GamePhase::GameOver => ExitCode::SUCCESS,
        GamePhase::LevelUnavailable => ExitCode::FAILURE,
        _ => {
            log::warn!("Stopped after {ticks} ticks without finishing");
            ExitCode::SUCCESS
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the wasm surface
}
