//! Skyflap entry point
//!
//! Native builds run a headless demo: the autopilot plays one run and the
//! score goes onto the local leaderboard. The browser build is driven through
//! `platform::WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
use skyflap::{Game, Phase, Tuning, platform};

/// Simulated seconds before the demo gives up on the autopilot crashing
#[cfg(not(target_arch = "wasm32"))]
const DEMO_LIMIT_SECS: u32 = 300;

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("SKYFLAP_TUNING") else {
        return Tuning::default();
    };
    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
    {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    platform::init_logging();
    log::info!("Skyflap (native) starting...");

    let storage = match platform::FileStorage::from_project_dirs() {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!("Leaderboard directory: {}", storage.dir().display());

    let tuning = load_tuning();
    let frame_dt = tuning.tick_dt();
    let mut game = Game::new(tuning, storage).with_autopilot(true);

    if let Err(e) = game.start_countdown() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let max_frames = DEMO_LIMIT_SECS as f32 / frame_dt;
    let mut frames = 0.0;
    while game.phase() != Phase::GameOver && frames < max_frames {
        game.advance(frame_dt);
        frames += 1.0;
    }

    let frame = game.snapshot();
    if game.phase() != Phase::GameOver {
        log::info!(
            "Autopilot still flying after {}s with score {}, stopping",
            DEMO_LIMIT_SECS,
            frame.score
        );
        return;
    }

    let name = std::env::var("SKYFLAP_NAME").unwrap_or_else(|_| "autopilot".to_string());
    let score = frame.final_score.unwrap_or(0);
    match game.submit(&name) {
        Ok(board) => {
            println!("{} scored {} ({})", name, score, frame.difficulty);
            println!("\n  #  {:<16} {:>6}", "NAME", "SCORE");
            for (i, entry) in board.entries().iter().enumerate() {
                println!("{:>3}  {:<16} {:>6}", i + 1, entry.name(), entry.score());
            }
        }
        Err(e) => log::error!("Could not record score: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::WebGame, this is just to satisfy the compiler
}
