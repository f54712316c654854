//! Browser bindings
//!
//! A thin wasm-bindgen wrapper the page's render loop drives: call
//! `advance` from `requestAnimationFrame`, draw `frame_json`, and forward
//! button presses.

use wasm_bindgen::prelude::*;

use super::storage::{LocalStorage, MemoryStorage, Storage};
use crate::game::Game;
use crate::tuning::Tuning;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<Box<dyn Storage>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        super::init_logging();

        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; scores will not persist", e);
                Box::new(MemoryStorage::new())
            }
        };
        WebGame {
            game: Game::new(Tuning::default(), storage),
        }
    }

    /// Elapsed seconds since the previous frame
    pub fn advance(&mut self, dt: f32) {
        let report = self.game.advance(dt);
        if let Some(cause) = report.crashed {
            log::info!("Crashed: {:?}", cause);
        }
    }

    pub fn frame_json(&self) -> String {
        serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.game.start_countdown().map_err(to_js)
    }

    pub fn flap(&mut self) {
        self.game.flap();
    }

    pub fn submit(&mut self, name: &str) -> Result<(), JsValue> {
        self.game.submit(name).map(|_| ()).map_err(to_js)
    }

    pub fn dismiss(&mut self) -> Result<(), JsValue> {
        self.game.dismiss_leaderboard().map_err(to_js)
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
