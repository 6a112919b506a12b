//! Mimic Me! core crate.
//!
//! The page shows a target emoji; the player scores by holding the matching
//! facial expression in front of the webcam. Face analysis is done by the
//! Affectiva `affdex` JS SDK loaded next to this module. The crate binds to
//! it, draws the overlays, and runs the scoring state machine.
//!
//! JS calls `start_game()` (or `start_game_with_config(json)`) once and
//! keeps the returned `MimicMe` handle.

use wasm_bindgen::prelude::*;

// Browser console logging.
macro_rules! console_log {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

macro_rules! console_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

pub mod detector;
pub mod display;
pub mod draw;
pub mod game;
pub mod session;
pub mod unicode;

pub use game::{ConfigError, Game, GameConfig, Phase, Update};
pub use session::{MimicMe, Session};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Emoji dataset
// -----------------------------------------------------------------------------

/// Code points of every emoji the detector can report as dominant.
pub const DETECTABLE_EMOJIS: &[u32] = &[
    128528, // 😐 neutral
    9786,   // ☺ relaxed
    128515, // 😃 smiley
    128524, // 😌 relieved
    128527, // 😏 smirk
    128521, // 😉 wink
    128535, // 😗 kissing
    128539, // 😛 stuck-out tongue
    128540, // 😜 stuck-out tongue winking eye
    128542, // 😞 disappointed
    128545, // 😡 rage
    128563, // 😳 flushed
    128561, // 😱 scream
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<MimicMe, JsValue> {
    session::launch(GameConfig::default())
}

/// Same as `start_game` with settings from a JSON object
/// (`maxScore`, `candidateEmojis`, `holdDurationSeconds`).
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<MimicMe, JsValue> {
    let config = GameConfig::from_json(json)?;
    session::launch(config)
}
