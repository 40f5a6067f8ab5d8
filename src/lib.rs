//! Typing Rain core crate.
//!
//! Falling-word typing game compiled to WASM. Words descend toward the
//! baseline; typing one before it escapes scores points and builds combos,
//! misses cost lives, and collected power-ups bend the rules for a while.
//! Three modes: a progressive three-level mode, a configurable practice mode,
//! and a two-minute tournament mode ranked by a combined score.

use wasm_bindgen::prelude::*;

pub mod game;

pub use game::word_list::{EASY_WORDS, HARD_WORDS, MEDIUM_WORDS};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Start a run. `mode` is `"level"`, `"practice"`, or `"tournament"`.
#[wasm_bindgen]
pub fn start_game(mode: &str) -> Result<(), JsValue> {
    let mode = game::GameMode::parse(mode)
        .ok_or_else(|| JsValue::from_str("unknown mode; expected level|practice|tournament"))?;
    game::start(mode)
}

/// Store practice settings for the next practice run: duration in seconds,
/// difficulty selector 1..=3, and a speed multiplier.
#[wasm_bindgen]
pub fn set_practice_options(duration_secs: u32, difficulty: u8, speed: f64) {
    game::set_practice_options(duration_secs, difficulty, speed);
}

/// Throw away the current run and start a fresh one in the same mode.
#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    game::restart()
}

/// Activate the power-up in `slot` (0..=5). Empty or out-of-range slots are
/// no-ops. Digits 1-6 trigger the same path from the keyboard.
#[wasm_bindgen]
pub fn use_power_up(slot: usize) {
    game::activate_slot(slot);
}

/// Persist the finished run on the leaderboard under `name`.
#[wasm_bindgen]
pub fn submit_score(name: &str) {
    game::submit_score(name);
}

/// Flip sound on/off; returns the new state.
#[wasm_bindgen]
pub fn toggle_sound() -> bool {
    game::audio::toggle()
}
