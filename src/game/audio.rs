//! Fire-and-forget audio cues built on Web Audio oscillators.
//!
//! The context is created lazily on the first cue (cues always follow a user
//! keystroke, so autoplay policies are satisfied). Any failure is logged and
//! swallowed; sound never affects game state.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

/// Everything the simulation wants the player to hear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    /// Keypress; `hit` is whether any word still matches the buffer.
    Key { hit: bool },
    WordComplete,
    Miss,
    PowerUpObtained,
    PowerUpUsed,
}

thread_local! {
    static CONTEXT: RefCell<Option<AudioContext>> = RefCell::new(None);
    static ENABLED: Cell<bool> = Cell::new(true);
}

/// Flip the sound toggle; returns the new enabled state.
pub fn toggle() -> bool {
    ENABLED.with(|cell| {
        let enabled = !cell.get();
        cell.set(enabled);
        enabled
    })
}

pub fn play(cue: AudioCue) {
    if !ENABLED.with(|cell| cell.get()) {
        return;
    }
    CONTEXT.with(|cell| {
        let mut guard = cell.borrow_mut();
        if guard.is_none() {
            *guard = AudioContext::new().ok();
        }
        let Some(ctx) = guard.as_ref() else {
            return;
        };
        if let Err(err) = play_cue(ctx, cue) {
            web_sys::console::warn_1(&err);
        }
    });
}

fn play_cue(ctx: &AudioContext, cue: AudioCue) -> Result<(), JsValue> {
    match cue {
        AudioCue::Key { hit: true } => sweep(ctx, OscillatorType::Triangle, 800.0, 400.0, 0.1),
        AudioCue::Key { hit: false } => sweep(ctx, OscillatorType::Triangle, 200.0, 100.0, 0.1),
        AudioCue::WordComplete => sweep(ctx, OscillatorType::Sine, 400.0, 800.0, 0.2),
        AudioCue::Miss => sweep(ctx, OscillatorType::Sawtooth, 300.0, 150.0, 0.3),
        AudioCue::PowerUpObtained => {
            arpeggio(ctx, OscillatorType::Triangle, &[440.0, 554.0, 659.0, 880.0], 0.5)
        }
        AudioCue::PowerUpUsed => {
            arpeggio(ctx, OscillatorType::Sine, &[523.0, 659.0, 784.0], 0.4)?;
            arpeggio(ctx, OscillatorType::Sine, &[1047.0, 1319.0, 1568.0], 0.4)
        }
    }
}

/// Single oscillator gliding exponentially between two pitches.
fn sweep(
    ctx: &AudioContext,
    shape: OscillatorType,
    from_hz: f32,
    to_hz: f32,
    duration: f64,
) -> Result<(), JsValue> {
    let now = ctx.current_time();
    let osc = ctx.create_oscillator()?;
    osc.set_type(shape);
    osc.frequency().set_value_at_time(from_hz, now)?;
    osc.frequency()
        .exponential_ramp_to_value_at_time(to_hz, now + duration)?;
    route(ctx, &osc, now, duration)
}

/// Oscillator stepping through a pitch sequence at 100 ms intervals.
fn arpeggio(
    ctx: &AudioContext,
    shape: OscillatorType,
    steps: &[f32],
    duration: f64,
) -> Result<(), JsValue> {
    let now = ctx.current_time();
    let osc = ctx.create_oscillator()?;
    osc.set_type(shape);
    for (i, hz) in steps.iter().enumerate() {
        osc.frequency().set_value_at_time(*hz, now + i as f64 * 0.1)?;
    }
    route(ctx, &osc, now, duration)
}

/// Connect an oscillator through a fading gain node and schedule start/stop.
fn route(
    ctx: &AudioContext,
    osc: &web_sys::OscillatorNode,
    now: f64,
    duration: f64,
) -> Result<(), JsValue> {
    let gain = ctx.create_gain()?;
    gain.gain().set_value_at_time(0.2, now)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, now + duration)?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    osc.start()?;
    osc.stop_with_when(now + duration)?;
    Ok(())
}
