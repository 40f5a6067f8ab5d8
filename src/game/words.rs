//! Word selection policy, the falling-word entity, and the spawn scheduler.

use super::powerups::ActiveEffects;
use super::word_list::{EASY_WORDS, HARD_WORDS, MEDIUM_WORDS};
use super::{Difficulty, GameMode, GameState};

/// Target bounds for the number of words on screen at once.
pub const MIN_ACTIVE_WORDS: usize = 3;
pub const MAX_ACTIVE_WORDS: usize = 5;

/// Horizontal margin kept clear on both sides of the playfield when spawning.
pub const SPAWN_MARGIN: f64 = 100.0;
/// Fresh spawns start this far above the playfield.
pub const SPAWN_Y: f64 = -50.0;
/// Vertical stagger between words spawned as a batch.
pub const SPAWN_STAGGER: f64 = 150.0;

const WORD_COLORS: [&str; 6] = [
    "#00f5ff", "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#ffeaa7",
];

/// Outcome of matching the typing buffer against one word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Complete,
    Partial,
    NoMatch,
}

/// One word descending toward the baseline.
#[derive(Clone, Debug)]
pub struct FallingWord {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub color: &'static str,
    /// Length of the currently matching typed prefix, in `[0, text.len()]`.
    pub progress: usize,
    pub matched: bool,
}

impl FallingWord {
    /// Draw a word from the bank and place it just above the playfield.
    /// Returns `None` when level mode has exhausted the hard pool (the draw
    /// that marks the run completed).
    pub fn spawn(state: &mut GameState) -> Option<Self> {
        let text = pick_word(state)?;
        Some(Self::with_text(state, text))
    }

    /// Build a word entity for already-chosen text.
    pub fn with_text(state: &mut GameState, text: &'static str) -> Self {
        let span = (state.canvas_w - 2.0 * SPAWN_MARGIN).max(1.0);
        let x = state.rng.next_f64() * span + SPAWN_MARGIN;
        let mut speed = state.rng.next_f64() * 0.5 + 0.3 + (state.level - 1) as f64 * 0.1;
        if state.mode == GameMode::Practice {
            speed *= state.practice.speed;
        }
        let color = WORD_COLORS[state.rng.next_index(WORD_COLORS.len())];
        Self {
            text,
            x,
            y: SPAWN_Y,
            speed,
            color,
            progress: 0,
            matched: false,
        }
    }

    /// Advance one tick. Slow-time halves the descent while active.
    pub fn advance(&mut self, effects: &ActiveEffects) {
        let multiplier = if effects.slow_time { 0.5 } else { 1.0 };
        self.y += self.speed * multiplier;
    }

    /// Match the typing buffer against this word.
    ///
    /// With precision mode active and at least 3 characters typed, a 3-letter
    /// prefix match completes the word outright. Otherwise a full prefix match
    /// records partial progress and an exact match completes. A non-prefix
    /// leaves `progress` untouched; the text-change path owns resetting it.
    pub fn check_match(&mut self, typed: &str, effects: &ActiveEffects) -> MatchResult {
        if effects.precision_mode > 0 && typed.len() >= 3 {
            if let Some(prefix) = typed.get(..3) {
                if self.text.starts_with(prefix) {
                    self.matched = true;
                    return MatchResult::Complete;
                }
            }
        }

        if self.text.starts_with(typed) {
            self.progress = typed.len();
            if typed == self.text {
                self.matched = true;
                return MatchResult::Complete;
            }
            return MatchResult::Partial;
        }
        MatchResult::NoMatch
    }
}

pub fn bank(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY_WORDS,
        Difficulty::Medium => MEDIUM_WORDS,
        Difficulty::Hard => HARD_WORDS,
    }
}

/// Pick the next word according to the mode's selection policy.
///
/// Level mode samples without replacement per difficulty and advances the
/// level when a pool runs dry; exhausting the hard pool marks the run
/// completed and yields `None`. Practice draws only from its configured bank,
/// repeats allowed. Tournament mixes 30% easy / 50% medium / 20% hard with no
/// exhaustion tracking.
pub fn pick_word(state: &mut GameState) -> Option<&'static str> {
    match state.mode {
        GameMode::Tournament => {
            let roll = state.rng.next_f64();
            let pool = if roll < 0.3 {
                EASY_WORDS
            } else if roll < 0.8 {
                MEDIUM_WORDS
            } else {
                HARD_WORDS
            };
            Some(pool[state.rng.next_index(pool.len())])
        }
        GameMode::Practice => {
            let pool = bank(state.practice.difficulty);
            Some(pool[state.rng.next_index(pool.len())])
        }
        GameMode::Level => pick_level_word(state),
    }
}

fn pick_level_word(state: &mut GameState) -> Option<&'static str> {
    match state.level {
        1 => {
            if state.rng.chance(0.1) && state.used_medium.len() < MEDIUM_WORDS.len() {
                Some(take_unused(state, Difficulty::Medium))
            } else if state.used_easy.len() >= EASY_WORDS.len() {
                advance_level(state, 2);
                pick_level_word(state)
            } else {
                Some(take_unused(state, Difficulty::Easy))
            }
        }
        2 => {
            if state.rng.chance(0.1) && state.used_hard.len() < HARD_WORDS.len() {
                Some(take_unused(state, Difficulty::Hard))
            } else if state.used_medium.len() >= MEDIUM_WORDS.len() {
                advance_level(state, 3);
                pick_level_word(state)
            } else {
                Some(take_unused(state, Difficulty::Medium))
            }
        }
        _ => {
            if state.used_hard.len() >= HARD_WORDS.len() {
                state.game_completed = true;
                None
            } else {
                Some(take_unused(state, Difficulty::Hard))
            }
        }
    }
}

fn advance_level(state: &mut GameState, level: u32) {
    state.level = level;
    // Re-show the intro card for the new level.
    state.level_started = false;
    state.intro_scheduled = false;
}

/// Uniform draw from the unused portion of a difficulty pool, recording the
/// pick in the run's used set. Caller guarantees the pool is not exhausted.
fn take_unused(state: &mut GameState, difficulty: Difficulty) -> &'static str {
    let pool = bank(difficulty);
    let used = state.used_words(difficulty);
    let remaining: Vec<&'static str> = pool
        .iter()
        .copied()
        .filter(|w| !used.contains(w))
        .collect();
    let word = remaining[state.rng.next_index(remaining.len())];
    state.used_words_mut(difficulty).insert(word);
    word
}

/// Keep the on-screen word count inside `[MIN_ACTIVE_WORDS, MAX_ACTIVE_WORDS]`.
/// Below the minimum a word always spawns; between the bounds one spawns with
/// probability `0.025 + level * 0.008` per tick; at the maximum never. A draw
/// that completes the run (level-mode exhaustion) adds nothing.
pub fn spawn_word(state: &mut GameState) {
    if state.game_completed {
        return;
    }

    if state.words.len() < MIN_ACTIVE_WORDS {
        if let Some(word) = FallingWord::spawn(state) {
            state.words.push(word);
        }
        return;
    }

    if state.words.len() < MAX_ACTIVE_WORDS {
        let spawn_rate = 0.025 + state.level as f64 * 0.008;
        if state.rng.chance(spawn_rate) {
            if let Some(word) = FallingWord::spawn(state) {
                state.words.push(word);
            }
        }
    }
}

/// Populate the starting word set: three words staggered above the playfield.
pub fn initialize_words(state: &mut GameState) {
    state.words.clear();
    for i in 0..MIN_ACTIVE_WORDS {
        if let Some(mut word) = FallingWord::spawn(state) {
            word.y = -100.0 - i as f64 * SPAWN_STAGGER;
            state.words.push(word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PracticeOptions;

    fn state(mode: GameMode) -> GameState {
        GameState::new(mode, PracticeOptions::default(), 1, 0.0, 42, 960.0, 600.0)
    }

    fn word(state: &mut GameState, text: &'static str) -> FallingWord {
        FallingWord::with_text(state, text)
    }

    #[test]
    fn prefix_match_records_progress() {
        let mut s = state(GameMode::Level);
        let mut w = word(&mut s, "garden");
        let effects = ActiveEffects::default();
        assert_eq!(w.check_match("gar", &effects), MatchResult::Partial);
        assert_eq!(w.progress, 3);
        assert_eq!(w.check_match("garden", &effects), MatchResult::Complete);
        assert!(w.matched);
    }

    #[test]
    fn non_prefix_leaves_progress_untouched() {
        let mut s = state(GameMode::Level);
        let mut w = word(&mut s, "garden");
        let effects = ActiveEffects::default();
        w.check_match("gar", &effects);
        assert_eq!(w.check_match("xyz", &effects), MatchResult::NoMatch);
        assert_eq!(w.progress, 3);
    }

    #[test]
    fn precision_mode_completes_on_three_letter_prefix() {
        let mut s = state(GameMode::Level);
        let mut w = word(&mut s, "garden");
        let effects = ActiveEffects {
            precision_mode: 1,
            ..ActiveEffects::default()
        };
        assert_eq!(w.check_match("gar", &effects), MatchResult::Complete);
    }

    #[test]
    fn precision_mode_needs_three_typed_characters() {
        let mut s = state(GameMode::Level);
        let mut w = word(&mut s, "garden");
        let effects = ActiveEffects {
            precision_mode: 1,
            ..ActiveEffects::default()
        };
        assert_eq!(w.check_match("ga", &effects), MatchResult::Partial);
    }

    #[test]
    fn slow_time_halves_descent() {
        let mut s = state(GameMode::Level);
        let mut w = word(&mut s, "cat");
        w.speed = 1.0;
        let y0 = w.y;
        w.advance(&ActiveEffects {
            slow_time: true,
            ..ActiveEffects::default()
        });
        assert!((w.y - y0 - 0.5).abs() < 1e-9);
        w.advance(&ActiveEffects::default());
        assert!((w.y - y0 - 1.5).abs() < 1e-9);
    }

    #[test]
    fn level_mode_draws_each_pool_entry_once_then_completes() {
        let mut s = state(GameMode::Level);
        let mut picks = Vec::new();
        let pool_total = EASY_WORDS.len() + MEDIUM_WORDS.len() + HARD_WORDS.len();
        for _ in 0..pool_total {
            match pick_word(&mut s) {
                Some(w) => picks.push(w),
                None => break,
            }
        }
        assert_eq!(picks.len(), pool_total, "every pool entry should be drawn");
        let unique: std::collections::HashSet<_> = picks.iter().collect();
        assert_eq!(unique.len(), picks.len(), "no repeats within the run");
        // One more draw: the hard pool is dry, so the run completes.
        assert_eq!(pick_word(&mut s), None);
        assert!(s.game_completed);
        assert_eq!(s.level, 3);
    }

    #[test]
    fn exhausting_easy_advances_to_level_two_with_fresh_intro() {
        let mut s = state(GameMode::Level);
        s.level_started = true;
        s.intro_scheduled = true;
        for w in EASY_WORDS {
            s.used_easy.insert(w);
        }
        let picked = pick_word(&mut s).expect("medium pool is not empty");
        assert_eq!(s.level, 2);
        assert!(!s.level_started);
        assert!(!s.intro_scheduled);
        assert!(MEDIUM_WORDS.contains(&picked) || HARD_WORDS.contains(&picked));
    }

    #[test]
    fn practice_draws_only_from_selected_bank() {
        let mut s = state(GameMode::Practice);
        s.practice.difficulty = Difficulty::Hard;
        for _ in 0..100 {
            let w = pick_word(&mut s).expect("practice never exhausts");
            assert!(HARD_WORDS.contains(&w));
        }
    }

    #[test]
    fn tournament_mixes_all_banks() {
        let mut s = state(GameMode::Tournament);
        let mut from_easy = 0;
        let mut from_medium = 0;
        let mut from_hard = 0;
        for _ in 0..300 {
            let w = pick_word(&mut s).expect("tournament never exhausts");
            if EASY_WORDS.contains(&w) {
                from_easy += 1;
            } else if MEDIUM_WORDS.contains(&w) {
                from_medium += 1;
            } else {
                assert!(HARD_WORDS.contains(&w));
                from_hard += 1;
            }
        }
        assert!(from_easy > 0 && from_medium > 0 && from_hard > 0);
    }

    #[test]
    fn spawner_fills_to_minimum_and_respects_maximum() {
        let mut s = state(GameMode::Tournament);
        s.level_started = true;
        for _ in 0..MIN_ACTIVE_WORDS {
            spawn_word(&mut s);
        }
        assert_eq!(s.words.len(), MIN_ACTIVE_WORDS);
        for _ in 0..2000 {
            spawn_word(&mut s);
        }
        assert!(s.words.len() <= MAX_ACTIVE_WORDS);
    }

    #[test]
    fn initial_population_is_staggered_above_the_field() {
        let mut s = state(GameMode::Tournament);
        initialize_words(&mut s);
        assert_eq!(s.words.len(), MIN_ACTIVE_WORDS);
        for (i, w) in s.words.iter().enumerate() {
            assert!((w.y - (-100.0 - i as f64 * SPAWN_STAGGER)).abs() < 1e-9);
        }
    }
}
