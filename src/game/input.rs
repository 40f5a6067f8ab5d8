//! Match & score engine: per-keystroke progress tracking and per-submit
//! completion resolution.

use super::audio::AudioCue;
use super::powerups;
use super::render;
use super::words::MatchResult;
use super::GameState;

/// React to the typing buffer changing. Every word whose text starts with the
/// buffer shows that much progress; every other word drops back to zero.
/// Returns whether any word currently matches so the keypress cue can say so.
pub fn apply_text_change(state: &mut GameState) -> bool {
    let typed = state.typing.clone();
    let mut has_match = false;
    for word in &mut state.words {
        if !typed.is_empty() && word.text.starts_with(typed.as_str()) {
            word.progress = typed.len();
            has_match = true;
        } else {
            word.progress = 0;
        }
    }
    has_match
}

/// Resolve a submit (Enter/Space). The most recently spawned completing word
/// wins. A successful completion scores, extends the combo, feeds the
/// power-up engine, and removes the word; a failed non-empty submit breaks
/// the combo (unless protected) and counts the typed characters as misses
/// against accuracy. Either way the buffer clears.
pub fn submit_word(state: &mut GameState) {
    let typed = state.typing.trim().to_string();

    let effects = state.effects.clone();
    let mut completed: Option<usize> = None;
    for i in (0..state.words.len()).rev() {
        if state.words[i].check_match(&typed, &effects) == MatchResult::Complete {
            completed = Some(i);
            break;
        }
    }

    if let Some(i) = completed {
        let word = state.words.remove(i);
        let mut points = word.text.len() as u32 * 10 * state.level;
        if state.effects.double_score > 0 {
            points *= 2;
        }
        state.score += points + state.combo * 5;
        state.words_typed += 1;
        state.combo += 1;
        state.max_combo = state.max_combo.max(state.combo);
        state.correct_chars += word.text.len() as u32;
        state.total_chars += word.text.len() as u32;
        state.words_since_power_up += 1;
        powerups::update_power_ups(state);
        powerups::maybe_generate_power_up(state);
        render::create_explosion(state, word.x, word.y, "#00ff88");
        state.audio_cues.push(AudioCue::WordComplete);
    } else if !typed.is_empty() {
        if state.effects.combo_protect == 0 {
            state.combo = 0;
        }
        state.total_chars += typed.len() as u32;
    }

    state.typing.clear();
    apply_text_change(state);
}
