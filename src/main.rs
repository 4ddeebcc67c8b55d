//! Slingshot headless runner
//!
//! Plays the built-in levels with the seeded autoplayer and prints the final
//! snapshot as JSON. Usage:
//!
//! ```text
//! slingshot [SEED] [FRAMES]
//! ```
//!
//! `SLINGSHOT_TUNING` and `SLINGSHOT_LEVELS` may point at JSON files that
//! replace the default tuning and level table.

use slingshot::ConfigError;
use slingshot::autoplay::Autoplay;
use slingshot::sim::{GameState, LevelState, builtin_levels};
use slingshot::tuning::{self, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: usize = 60 * 120;

fn main() {
    env_logger::init();
    log::info!("Slingshot (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let frames = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let tuning = match std::env::var_os("SLINGSHOT_TUNING") {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let levels = match std::env::var_os("SLINGSHOT_LEVELS") {
        Some(path) => tuning::load_levels(path)?,
        None => builtin_levels(),
    };

    let mut state = GameState::new(levels, tuning)?;
    let mut bot = Autoplay::new(seed, FRAME_DT);
    log::info!("Autoplay seed {seed}, up to {frames} frames");

    for frame in 0..frames {
        let snap = state.snapshot();
        if state.is_last_level() && snap.level_state == LevelState::Completed {
            log::info!("All levels cleared after {frame} frames");
            break;
        }
        let input = bot.next_input(&snap);
        state.update(&input);
    }

    let snap = state.snapshot();
    log::info!(
        "Finished on {} ({:?}): total score {}",
        snap.level_name,
        snap.level_state,
        snap.total_score
    );
    println!("{}", serde_json::to_string_pretty(&snap)?);
    Ok(())
}
