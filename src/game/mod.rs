//! Core game simulation: run state, the per-frame tick, and the browser
//! wiring (frame loop, keyboard listener, canvas/HUD bootstrap).
//!
//! The simulation proper never touches a browser API. Everything it needs
//! from the host (timestamps, canvas dimensions, randomness seed) is injected
//! through `GameState`, so the whole rule set runs natively under `cargo
//! test`. The wasm-facing functions at the bottom of this file own the
//! `thread_local!` cells, the `requestAnimationFrame` loop, and the DOM.

use std::collections::HashSet;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

pub mod audio;
pub mod input;
pub mod leaderboard;
pub mod powerups;
pub mod render;
pub mod rng;
pub mod word_list;
pub mod words;

use audio::AudioCue;
use powerups::{ActiveEffects, PowerUpKind};
use render::{BackgroundParticle, Particle};
use rng::SimpleRng;
use words::FallingWord;

/// Lives in level and tournament mode; practice is unbounded.
pub const MAX_MISSES: u32 = 5;
/// Tournament runs are a fixed two minutes.
pub const TOURNAMENT_DURATION_SECS: u32 = 120;
/// Level-intro card duration (spawning is blocked while it shows).
pub const LEVEL_INTRO_MS: f64 = 2000.0;
/// How long the congratulations card shows before the run-end hand-off.
pub const CONGRATS_MS: f64 = 5000.0;

const CANVAS_WIDTH: u32 = 960;
const CANVAS_HEIGHT: u32 = 600;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    Level,
    Practice,
    Tournament,
}

impl GameMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "level" => Some(GameMode::Level),
            "practice" => Some(GameMode::Practice),
            "tournament" => Some(GameMode::Tournament),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// UI difficulty selector values 1..=3.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn level(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Practice-mode settings, read from external UI controls before the run.
#[derive(Clone, Copy, Debug)]
pub struct PracticeOptions {
    pub duration_secs: u32,
    pub difficulty: Difficulty,
    pub speed: f64,
}

impl Default for PracticeOptions {
    fn default() -> Self {
        Self {
            duration_secs: 180,
            difficulty: Difficulty::Easy,
            speed: 1.0,
        }
    }
}

/// Actions that were scheduled for a later tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    BeginLevel,
    ExpireSlowTime,
    FinishRun,
}

/// A scheduled action, tagged with the run generation that created it.
/// Events from a generation other than the live one are discarded unseen,
/// which is what keeps an expired slow-time timer (or a congratulations
/// hand-off) from an earlier run out of the current one.
#[derive(Clone, Copy, Debug)]
pub struct DeferredEvent {
    pub fire_at_ms: f64,
    pub run_id: u64,
    pub action: DeferredAction,
}

/// Final figures of an ended run, captured once at the end transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub total_score: i64,
    pub wpm: u32,
    pub accuracy: u32,
}

/// The whole per-run simulation context. Created at run start, handed `&mut`
/// into every component entrypoint, replaced wholesale on restart.
#[derive(Clone, Debug)]
pub struct GameState {
    pub mode: GameMode,
    pub run_id: u64,
    pub score: u32,
    pub level: u32,
    pub words_typed: u32,
    pub total_chars: u32,
    pub correct_chars: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub missed_words: u32,
    pub max_misses: u32,
    pub start_ms: f64,
    pub end_time_ms: Option<f64>,
    pub game_running: bool,
    pub game_started: bool,
    pub level_started: bool,
    pub intro_scheduled: bool,
    pub game_completed: bool,
    pub congrats_scheduled: bool,
    pub used_easy: HashSet<&'static str>,
    pub used_medium: HashSet<&'static str>,
    pub used_hard: HashSet<&'static str>,
    pub slots: [Option<PowerUpKind>; 6],
    pub effects: ActiveEffects,
    pub words_since_power_up: u32,
    pub practice: PracticeOptions,
    pub typing: String,
    pub words: Vec<FallingWord>,
    pub particles: Vec<Particle>,
    pub background: Vec<BackgroundParticle>,
    pub deferred: Vec<DeferredEvent>,
    pub audio_cues: Vec<AudioCue>,
    pub rng: SimpleRng,
    pub canvas_w: f64,
    pub canvas_h: f64,
    pub summary: Option<RunSummary>,
}

impl GameState {
    pub fn new(
        mode: GameMode,
        practice: PracticeOptions,
        run_id: u64,
        now: f64,
        seed: u32,
        canvas_w: f64,
        canvas_h: f64,
    ) -> Self {
        let level = match mode {
            GameMode::Practice => practice.difficulty.level(),
            _ => 1,
        };
        let max_misses = match mode {
            GameMode::Practice => u32::MAX,
            _ => MAX_MISSES,
        };
        let end_time_ms = match mode {
            GameMode::Practice => Some(now + practice.duration_secs as f64 * 1000.0),
            GameMode::Tournament => Some(now + TOURNAMENT_DURATION_SECS as f64 * 1000.0),
            GameMode::Level => None,
        };
        Self {
            mode,
            run_id,
            score: 0,
            level,
            words_typed: 0,
            total_chars: 0,
            correct_chars: 0,
            combo: 0,
            max_combo: 0,
            missed_words: 0,
            max_misses,
            start_ms: now,
            end_time_ms,
            game_running: true,
            game_started: true,
            level_started: false,
            intro_scheduled: false,
            game_completed: false,
            congrats_scheduled: false,
            used_easy: HashSet::new(),
            used_medium: HashSet::new(),
            used_hard: HashSet::new(),
            slots: [None; 6],
            effects: ActiveEffects::default(),
            words_since_power_up: 0,
            practice,
            typing: String::new(),
            words: Vec::new(),
            particles: Vec::new(),
            background: Vec::new(),
            deferred: Vec::new(),
            audio_cues: Vec::new(),
            rng: SimpleRng::new(seed),
            canvas_w,
            canvas_h,
            summary: None,
        }
    }

    pub fn used_words(&self, difficulty: Difficulty) -> &HashSet<&'static str> {
        match difficulty {
            Difficulty::Easy => &self.used_easy,
            Difficulty::Medium => &self.used_medium,
            Difficulty::Hard => &self.used_hard,
        }
    }

    pub fn used_words_mut(&mut self, difficulty: Difficulty) -> &mut HashSet<&'static str> {
        match difficulty {
            Difficulty::Easy => &mut self.used_easy,
            Difficulty::Medium => &mut self.used_medium,
            Difficulty::Hard => &mut self.used_hard,
        }
    }

    /// Queue an action for a later tick under the current run generation.
    pub fn schedule(&mut self, fire_at_ms: f64, action: DeferredAction) {
        self.deferred.push(DeferredEvent {
            fire_at_ms,
            run_id: self.run_id,
            action,
        });
    }

    /// Words per minute since run start, rounded.
    pub fn wpm(&self, now: f64) -> u32 {
        if self.words_typed == 0 {
            return 0;
        }
        let elapsed_minutes = (now - self.start_ms) / 60_000.0;
        if elapsed_minutes <= 0.0 {
            return 0;
        }
        (self.words_typed as f64 / elapsed_minutes).round() as u32
    }

    /// Percentage of typed characters that landed in completed words.
    /// Reports 100 before anything has been typed.
    pub fn accuracy(&self) -> u32 {
        if self.total_chars == 0 {
            return 100;
        }
        (self.correct_chars as f64 / self.total_chars as f64 * 100.0).round() as u32
    }
}

/// Tournament ranking formula: weighted mix of raw score, speed, accuracy,
/// and a miss penalty. This combined value, not the raw score, is what the
/// leaderboard compares.
pub fn tournament_total(score: u32, wpm: u32, accuracy: u32, missed: u32) -> i64 {
    (score as f64 * 0.6 + wpm as f64 * 10.0 + accuracy as f64 * 5.0 - missed as f64 * 20.0).round()
        as i64
}

/// One simulation tick. Call order per frame: deferred events first, then the
/// ambient background, then the mode guards (start / intro / completed /
/// timed expiry), then spawning, word movement + miss sweeping, and finally
/// the transient-effect pool.
pub fn run_tick(state: &mut GameState, now: f64) {
    if !state.game_running {
        return;
    }
    process_deferred(state, now);
    if !state.game_running {
        // A deferred hand-off just ended the run.
        return;
    }
    render::advance_background(state);

    if !state.game_started {
        return;
    }

    if !state.level_started {
        if state.mode == GameMode::Level {
            if !state.intro_scheduled {
                state.schedule(now + LEVEL_INTRO_MS, DeferredAction::BeginLevel);
                state.intro_scheduled = true;
            }
        } else {
            state.level_started = true;
        }
        return;
    }

    if state.game_completed {
        if !state.congrats_scheduled {
            state.schedule(now + CONGRATS_MS, DeferredAction::FinishRun);
            state.congrats_scheduled = true;
        }
        return;
    }

    if let Some(end) = state.end_time_ms {
        if now >= end {
            end_run(state, now);
            return;
        }
    }

    words::spawn_word(state);
    advance_and_sweep_words(state, now);
    render::advance_particles(state);
}

/// Drain due events for the live run generation; drop stale generations.
fn process_deferred(state: &mut GameState, now: f64) {
    let run_id = state.run_id;
    let mut due = Vec::new();
    state.deferred.retain(|event| {
        if event.run_id != run_id {
            return false;
        }
        if event.fire_at_ms <= now {
            due.push(event.action);
            return false;
        }
        true
    });
    for action in due {
        match action {
            DeferredAction::BeginLevel => state.level_started = true,
            DeferredAction::ExpireSlowTime => state.effects.slow_time = false,
            DeferredAction::FinishRun => end_run(state, now),
        }
    }
}

/// Advance every word and resolve the ones that crossed the lower bound.
/// Iterates newest-first so removal indices stay valid.
pub fn advance_and_sweep_words(state: &mut GameState, now: f64) {
    let effects = state.effects.clone();
    let mut index = state.words.len();
    while index > 0 {
        index -= 1;
        state.words[index].advance(&effects);
        if state.words[index].y > state.canvas_h {
            let word = state.words.remove(index);
            powerups::handle_missed_word(state, &word);
            if state.missed_words >= state.max_misses {
                end_run(state, now);
                return;
            }
        }
    }
}

/// Terminal transition. Computes the mode's final score; for tournament that
/// is the combined formula, otherwise the raw score.
pub fn end_run(state: &mut GameState, now: f64) {
    if !state.game_running {
        return;
    }
    state.game_running = false;
    let wpm = state.wpm(now);
    let accuracy = state.accuracy();
    let total_score = match state.mode {
        GameMode::Tournament => tournament_total(state.score, wpm, accuracy, state.missed_words),
        _ => state.score as i64,
    };
    state.summary = Some(RunSummary {
        total_score,
        wpm,
        accuracy,
    });
}

// ---------------------------------------------------------------------------
// Browser wiring
// ---------------------------------------------------------------------------

struct Screen {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

// RefCell::new isn't const-friendly for these payloads; initialized lazily.
thread_local! {
    static STATE: std::cell::RefCell<Option<GameState>> = std::cell::RefCell::new(None);
    static SCREEN: std::cell::RefCell<Option<Screen>> = std::cell::RefCell::new(None);
    static PENDING_PRACTICE: std::cell::RefCell<PracticeOptions> =
        std::cell::RefCell::new(PracticeOptions::default());
    static LISTENERS_INSTALLED: std::cell::Cell<bool> = std::cell::Cell::new(false);
    static LOOP_RUNNING: std::cell::Cell<bool> = std::cell::Cell::new(false);
    static NEXT_RUN_ID: std::cell::Cell<u64> = std::cell::Cell::new(1);
}

pub(crate) fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Store practice settings for the next `start_game("practice")` call.
pub(crate) fn set_practice_options(duration_secs: u32, difficulty: u8, speed: f64) {
    let difficulty = Difficulty::from_index(difficulty).unwrap_or(Difficulty::Easy);
    let speed = if speed.is_finite() && speed > 0.0 { speed } else { 1.0 };
    PENDING_PRACTICE.with(|cell| {
        *cell.borrow_mut() = PracticeOptions {
            duration_secs: duration_secs.max(1),
            difficulty,
            speed,
        };
    });
}

/// Begin a run: bootstrap canvas + HUD, install listeners, build fresh state,
/// and start the frame loop.
pub(crate) fn start(mode: GameMode) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse canvas with id tr-canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("tr-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("tr-canvas");
        c.set_width(CANVAS_WIDTH);
        c.set_height(CANVAS_HEIGHT);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:12px; border:2px solid #222; background:#0a0a14; z-index:20;").ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    render::ensure_hud(&doc)?;
    install_listeners(&doc)?;

    let now = now_ms();
    let seed = now.to_bits() as u32 ^ (now.to_bits() >> 32) as u32;
    let run_id = NEXT_RUN_ID.with(|cell| {
        let id = cell.get();
        cell.set(id + 1);
        id
    });
    let practice = PENDING_PRACTICE.with(|cell| *cell.borrow());

    let mut state = GameState::new(
        mode,
        practice,
        run_id,
        now,
        seed,
        canvas.width() as f64,
        canvas.height() as f64,
    );
    render::init_background(&mut state);
    words::initialize_words(&mut state);

    SCREEN.with(|cell| cell.replace(Some(Screen { canvas, ctx })));
    STATE.with(|cell| cell.replace(Some(state)));

    start_frame_loop();
    Ok(())
}

/// Wholesale state replacement: a fresh run of the same mode under a new run
/// generation, so anything the old run left scheduled is dead on arrival.
pub(crate) fn restart() -> Result<(), JsValue> {
    let mode = STATE.with(|cell| cell.borrow().as_ref().map(|s| s.mode));
    start(mode.unwrap_or(GameMode::Level))
}

/// Power-up activation entrypoint shared by hotkeys and clickable UI.
pub(crate) fn activate_slot(slot: usize) {
    let now = now_ms();
    STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            if state.game_running && state.game_started {
                powerups::use_power_up(state, slot, now);
            }
        }
    });
}

/// Persist the ended run under `name`. Does nothing while a run is live.
pub(crate) fn submit_score(name: &str) {
    STATE.with(|cell| {
        if let Some(state) = cell.borrow().as_ref() {
            if state.game_running {
                return;
            }
            if let Some(summary) = state.summary {
                leaderboard::add_entry(
                    name,
                    summary.total_score,
                    state.level,
                    summary.wpm,
                    summary.accuracy,
                    state.missed_words,
                );
            }
        }
    });
}

fn install_listeners(doc: &web_sys::Document) -> Result<(), JsValue> {
    if LISTENERS_INSTALLED.with(|cell| cell.get()) {
        return Ok(());
    }

    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        STATE.with(|cell| {
            let Ok(mut guard) = cell.try_borrow_mut() else {
                return;
            };
            let Some(state) = guard.as_mut() else {
                return;
            };
            if !state.game_running || !state.game_started {
                return;
            }
            let key = evt.key();
            match key.as_str() {
                "Escape" => {
                    state.typing.clear();
                    input::apply_text_change(state);
                }
                "Backspace" => {
                    state.typing.pop();
                    input::apply_text_change(state);
                }
                "Enter" | " " => {
                    evt.prevent_default();
                    input::submit_word(state);
                }
                _ => {
                    let mut chars = key.chars();
                    if let (Some(c), None) = (chars.next(), chars.next()) {
                        if c.is_ascii_digit() && ('1'..='6').contains(&c) {
                            let slot = c as usize - '1' as usize;
                            if state.slots[slot].is_some() {
                                evt.prevent_default();
                                let now = now_ms();
                                powerups::use_power_up(state, slot, now);
                            }
                        } else if c.is_ascii_alphabetic() {
                            state.typing.push(c.to_ascii_lowercase());
                            let hit = input::apply_text_change(state);
                            state.audio_cues.push(AudioCue::Key { hit });
                        }
                    }
                }
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();

    LISTENERS_INSTALLED.with(|cell| cell.set(true));
    Ok(())
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    if LOOP_RUNNING.with(|cell| cell.get()) {
        return;
    }
    LOOP_RUNNING.with(|cell| cell.set(true));

    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let keep_going = frame(ts);
        if keep_going {
            if let Some(w) = window() {
                let _ = w
                    .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
            }
        } else {
            LOOP_RUNNING.with(|cell| cell.set(false));
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// One frame: simulate, draw, flush audio cues. Returns false once the run
/// has ended and its final card is on screen, which parks the loop until the
/// next `start`.
fn frame(now: f64) -> bool {
    let mut keep_going = false;
    STATE.with(|state_cell| {
        if let Some(state) = state_cell.borrow_mut().as_mut() {
            SCREEN.with(|screen_cell| {
                if let Some(screen) = screen_cell.borrow().as_ref() {
                    state.canvas_w = screen.canvas.width() as f64;
                    state.canvas_h = screen.canvas.height() as f64;
                    run_tick(state, now);
                    render::draw(&screen.ctx, state, now);
                    render::update_hud(state, now);
                }
            });
            for cue in state.audio_cues.drain(..) {
                audio::play(cue);
            }
            keep_going = state.game_running;
        }
    });
    keep_going
}
