//! Whoopee Chaos core crate.
//!
//! Click cushions before the round timer runs out; every round that sees at
//! least one click brings more cushions, a round with none ends the game.
//!
//! Game logic (`round`, `fx`, `session`, `data`) is plain Rust and runs and
//! tests natively. The browser host in `web` (wasm32 only) supplies the
//! interval clock, localStorage high score and HTML audio, and exposes the
//! session to JS.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod data;
pub mod error;
pub mod fx;
pub mod rng;
pub mod round;
pub mod session;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{FxConfig, GameConfig, SamplingPolicy};
pub use error::{CommandError, ConfigError, FxError, StorageError};
pub use fx::{FxPlayer, PlayOptions, SoundBackend, SoundId};
pub use round::{Command, GameHandle, GameState, InertGame, LastAction, Phase, RoundMachine, Target};
pub use session::{Dispatched, Session, TimedMessage};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second start (hot reload) finds the logger already installed; that is fine.
    let _ = console_log::init_with_level(log::Level::Info);
}
