//! Power-up engine: fixed six-slot inventory, acquisition triggers,
//! activation effects, and the decay pass over active numeric effects.

use super::audio::AudioCue;
use super::render;
use super::words::{self, FallingWord};
use super::{DeferredAction, Difficulty, GameMode, GameState};

/// How long the slow-time effect lasts once activated.
pub const SLOW_TIME_DURATION_MS: f64 = 5000.0;
/// Completions between guaranteed power-up rolls.
pub const WORDS_PER_POWER_UP: u32 = 20;
/// Combo values that roll a power-up the moment they are reached.
pub const COMBO_TRIGGERS: [u32; 3] = [5, 10, 15];

const PRECISION_CHARGES: u32 = 5;
const DOUBLE_SCORE_CHARGES: u32 = 10;
const SHIELD_CHARGES: u32 = 1;
const COMBO_PROTECT_CHARGES: u32 = 3;
const REFRESH_WORD_COUNT: usize = 3;

/// The six power-up kinds. Each kind owns the inventory slot matching its
/// discriminant, so slot index and kind are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    SlowTime,
    PrecisionMode,
    DoubleScore,
    Shield,
    ComboProtect,
    RefreshWords,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::SlowTime,
        PowerUpKind::PrecisionMode,
        PowerUpKind::DoubleScore,
        PowerUpKind::Shield,
        PowerUpKind::ComboProtect,
        PowerUpKind::RefreshWords,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn icon(self) -> &'static str {
        match self {
            PowerUpKind::SlowTime => "\u{23f0}",
            PowerUpKind::PrecisionMode => "\u{1f3af}",
            PowerUpKind::DoubleScore => "\u{1f48e}",
            PowerUpKind::Shield => "\u{1f6e1}",
            PowerUpKind::ComboProtect => "\u{1f31f}",
            PowerUpKind::RefreshWords => "\u{1f504}",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::SlowTime => "Slow Time",
            PowerUpKind::PrecisionMode => "Precision Mode",
            PowerUpKind::DoubleScore => "Double Score",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::ComboProtect => "Combo Protect",
            PowerUpKind::RefreshWords => "Word Refresh",
        }
    }
}

/// Currently active effects, keyed by kind. A counter of 0 means the effect is
/// absent, so the remove-at-zero invariant holds by construction. `slow_time`
/// is duration-based and cleared by a deferred event rather than the decay
/// pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    pub slow_time: bool,
    pub precision_mode: u32,
    pub double_score: u32,
    pub shield: u32,
    pub combo_protect: u32,
}

/// Roll one of the six kinds uniformly and place it in its slot. An occupied
/// slot drops the roll silently: availability never stacks.
pub fn generate_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.next_index(PowerUpKind::ALL.len())];
    let slot = kind.slot();
    if state.slots[slot].is_some() {
        return;
    }
    state.slots[slot] = Some(kind);
    state.audio_cues.push(AudioCue::PowerUpObtained);
}

/// Activate the power-up in `slot`, if any. Out-of-range or empty slots are
/// no-ops. Activation clears the slot.
pub fn use_power_up(state: &mut GameState, slot: usize, now: f64) {
    let Some(kind) = state.slots.get(slot).copied().flatten() else {
        return;
    };
    state.audio_cues.push(AudioCue::PowerUpUsed);
    match kind {
        PowerUpKind::SlowTime => {
            state.effects.slow_time = true;
            state.schedule(now + SLOW_TIME_DURATION_MS, DeferredAction::ExpireSlowTime);
        }
        PowerUpKind::PrecisionMode => state.effects.precision_mode = PRECISION_CHARGES,
        PowerUpKind::DoubleScore => state.effects.double_score = DOUBLE_SCORE_CHARGES,
        PowerUpKind::Shield => state.effects.shield = SHIELD_CHARGES,
        PowerUpKind::ComboProtect => state.effects.combo_protect = COMBO_PROTECT_CHARGES,
        PowerUpKind::RefreshWords => refresh_words(state),
    }
    state.slots[slot] = None;
}

/// Decay pass over the numeric effects. Runs once per completion (the
/// power-up engine's tick), decrementing precision, double-score, and
/// combo-protect; shield is consumed only by shielded misses and slow-time
/// only by its expiry event.
pub fn update_power_ups(state: &mut GameState) {
    let effects = &mut state.effects;
    effects.precision_mode = effects.precision_mode.saturating_sub(1);
    effects.double_score = effects.double_score.saturating_sub(1);
    effects.combo_protect = effects.combo_protect.saturating_sub(1);
}

/// Evaluate the acquisition trigger after a completion: every
/// `WORDS_PER_POWER_UP` completions, or the instant combo hits 5, 10, or 15.
/// The completion counter resets even when the roll is dropped.
pub fn maybe_generate_power_up(state: &mut GameState) {
    if state.words_since_power_up >= WORDS_PER_POWER_UP || COMBO_TRIGGERS.contains(&state.combo) {
        generate_power_up(state);
        state.words_since_power_up = 0;
    }
}

/// Instant effect: wipe the active set and repopulate with three easy words at
/// staggered start offsets. Does not touch the used sets or active effects.
fn refresh_words(state: &mut GameState) {
    state.words.clear();
    for i in 0..REFRESH_WORD_COUNT {
        let pool = words::bank(Difficulty::Easy);
        let text = pool[state.rng.next_index(pool.len())];
        let mut word = FallingWord::with_text(state, text);
        word.y = words::SPAWN_Y - i as f64 * words::SPAWN_STAGGER;
        state.words.push(word);
    }
}

/// Resolve a word crossing the lower bound. Shield absorbs the miss (one
/// charge each); practice mode carries no penalty; otherwise the miss counts,
/// breaks the combo unless protected, and can end the run.
pub fn handle_missed_word(state: &mut GameState, word: &FallingWord) {
    if state.effects.shield > 0 {
        state.effects.shield -= 1;
        render::create_explosion(state, word.x, state.canvas_h - 20.0, "#4ecdc4");
        return;
    }
    if state.mode == GameMode::Practice {
        return;
    }
    state.missed_words += 1;
    if state.effects.combo_protect == 0 {
        state.combo = 0;
    }
    render::create_explosion(state, word.x, state.canvas_h - 20.0, "#ff6b6b");
    state.audio_cues.push(AudioCue::Miss);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameMode, GameState, PracticeOptions};

    fn state(mode: GameMode) -> GameState {
        GameState::new(mode, PracticeOptions::default(), 1, 0.0, 42, 960.0, 600.0)
    }

    #[test]
    fn generation_never_stacks_an_occupied_slot() {
        let mut s = state(GameMode::Level);
        for _ in 0..200 {
            generate_power_up(&mut s);
        }
        // All six slots filled, each with its own kind, and no roll ever
        // replaced or duplicated an available power-up.
        for (i, slot) in s.slots.iter().enumerate() {
            assert_eq!(*slot, Some(PowerUpKind::ALL[i]));
        }
    }

    #[test]
    fn using_an_empty_slot_changes_nothing() {
        let mut s = state(GameMode::Level);
        use_power_up(&mut s, 2, 0.0);
        use_power_up(&mut s, 99, 0.0);
        assert_eq!(s.slots, [None; 6]);
        assert_eq!(s.effects, ActiveEffects::default());
        assert!(s.deferred.is_empty());
        assert!(s.audio_cues.is_empty());
    }

    #[test]
    fn slow_time_sets_flag_and_schedules_expiry() {
        let mut s = state(GameMode::Level);
        let slot = PowerUpKind::SlowTime.slot();
        s.slots[slot] = Some(PowerUpKind::SlowTime);
        use_power_up(&mut s, slot, 1000.0);
        assert!(s.effects.slow_time);
        assert_eq!(s.slots[slot], None);
        assert_eq!(s.deferred.len(), 1);
        let event = s.deferred[0];
        assert_eq!(event.action, crate::game::DeferredAction::ExpireSlowTime);
        assert!((event.fire_at_ms - (1000.0 + SLOW_TIME_DURATION_MS)).abs() < 1e-9);
    }

    #[test]
    fn counter_effects_start_with_their_charges() {
        let mut s = state(GameMode::Level);
        for kind in [
            PowerUpKind::PrecisionMode,
            PowerUpKind::DoubleScore,
            PowerUpKind::Shield,
            PowerUpKind::ComboProtect,
        ] {
            s.slots[kind.slot()] = Some(kind);
            use_power_up(&mut s, kind.slot(), 0.0);
        }
        assert_eq!(s.effects.precision_mode, 5);
        assert_eq!(s.effects.double_score, 10);
        assert_eq!(s.effects.shield, 1);
        assert_eq!(s.effects.combo_protect, 3);
    }

    #[test]
    fn decay_pass_skips_shield_and_slow_time() {
        let mut s = state(GameMode::Level);
        s.effects = ActiveEffects {
            slow_time: true,
            precision_mode: 2,
            double_score: 1,
            shield: 1,
            combo_protect: 1,
        };
        update_power_ups(&mut s);
        assert!(s.effects.slow_time);
        assert_eq!(s.effects.precision_mode, 1);
        assert_eq!(s.effects.double_score, 0);
        assert_eq!(s.effects.shield, 1);
        assert_eq!(s.effects.combo_protect, 0);
        // A second pass bottoms out the counters without underflow.
        update_power_ups(&mut s);
        assert_eq!(s.effects.precision_mode, 0);
    }

    #[test]
    fn trigger_resets_counter_even_when_the_roll_is_dropped() {
        let mut s = state(GameMode::Level);
        s.slots = [
            Some(PowerUpKind::SlowTime),
            Some(PowerUpKind::PrecisionMode),
            Some(PowerUpKind::DoubleScore),
            Some(PowerUpKind::Shield),
            Some(PowerUpKind::ComboProtect),
            Some(PowerUpKind::RefreshWords),
        ];
        s.words_since_power_up = WORDS_PER_POWER_UP;
        maybe_generate_power_up(&mut s);
        assert_eq!(s.words_since_power_up, 0);
    }

    #[test]
    fn combo_trigger_is_edge_triggered() {
        let mut s = state(GameMode::Level);
        s.combo = 5;
        maybe_generate_power_up(&mut s);
        assert!(s.slots.iter().any(|slot| slot.is_some()));

        let mut s = state(GameMode::Level);
        s.combo = 6;
        maybe_generate_power_up(&mut s);
        assert!(s.slots.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn refresh_replaces_the_active_set_with_three_easy_words() {
        let mut s = state(GameMode::Level);
        let planted = crate::game::words::FallingWord::with_text(&mut s, "cat");
        s.words.push(planted);
        s.used_easy.insert("cat");
        let slot = PowerUpKind::RefreshWords.slot();
        s.slots[slot] = Some(PowerUpKind::RefreshWords);
        use_power_up(&mut s, slot, 0.0);
        assert_eq!(s.words.len(), 3);
        for (i, w) in s.words.iter().enumerate() {
            assert!(crate::game::word_list::EASY_WORDS.contains(&w.text));
            let expected_y = crate::game::words::SPAWN_Y - i as f64 * crate::game::words::SPAWN_STAGGER;
            assert!((w.y - expected_y).abs() < 1e-9);
        }
        // Instant effect: no active-effect change, used sets untouched.
        assert_eq!(s.effects, ActiveEffects::default());
        assert_eq!(s.used_easy.len(), 1);
    }

    #[test]
    fn shielded_miss_spends_one_charge_and_counts_nothing() {
        let mut s = state(GameMode::Level);
        s.effects.shield = 1;
        s.combo = 4;
        let word = crate::game::words::FallingWord::with_text(&mut s, "cat");
        handle_missed_word(&mut s, &word);
        assert_eq!(s.effects.shield, 0);
        assert_eq!(s.missed_words, 0);
        assert_eq!(s.combo, 4);
    }

    #[test]
    fn practice_miss_carries_no_penalty() {
        let mut s = state(GameMode::Practice);
        let word = crate::game::words::FallingWord::with_text(&mut s, "cat");
        handle_missed_word(&mut s, &word);
        assert_eq!(s.missed_words, 0);
    }

    #[test]
    fn unshielded_miss_breaks_combo_unless_protected() {
        let mut s = state(GameMode::Level);
        s.combo = 7;
        let word = crate::game::words::FallingWord::with_text(&mut s, "cat");
        handle_missed_word(&mut s, &word);
        assert_eq!(s.missed_words, 1);
        assert_eq!(s.combo, 0);

        let mut s = state(GameMode::Level);
        s.combo = 7;
        s.effects.combo_protect = 2;
        let word = crate::game::words::FallingWord::with_text(&mut s, "cat");
        handle_missed_word(&mut s, &word);
        assert_eq!(s.missed_words, 1);
        assert_eq!(s.combo, 7);
    }
}
