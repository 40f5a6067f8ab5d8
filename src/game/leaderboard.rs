//! Top-10 leaderboard persisted as JSON in `localStorage`.
//!
//! Storage being unavailable (or holding garbage) is not an error: loading
//! falls back to an empty board and saving is best-effort. Gameplay calls in
//! here only at run end.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::window;

const STORAGE_KEY: &str = "typingRainLeaderboard";
const MAX_ENTRIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub score: i64,
    pub level: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub missed: u32,
    pub date: String,
}

/// Whether `score` would make it onto the board: room left, or strictly above
/// the current last place.
pub fn qualifies(entries: &[Entry], score: i64) -> bool {
    entries.len() < MAX_ENTRIES || entries.last().map(|e| score > e.score).unwrap_or(true)
}

/// Insert keeping the board sorted by score descending and capped.
pub fn insert(entries: &mut Vec<Entry>, entry: Entry) {
    entries.push(entry);
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
}

fn storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok().flatten()
}

pub fn load() -> Vec<Entry> {
    storage()
        .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

pub fn save(entries: &[Entry]) {
    let Some(store) = storage() else {
        return;
    };
    if let Ok(raw) = serde_json::to_string(entries) {
        let _ = store.set_item(STORAGE_KEY, &raw);
    }
}

pub fn is_high_score(score: i64) -> bool {
    qualifies(&load(), score)
}

/// Record a run on the board and return the stored entry.
pub fn add_entry(
    name: &str,
    score: i64,
    level: u32,
    wpm: u32,
    accuracy: u32,
    missed: u32,
) -> Entry {
    let name = match name.trim() {
        "" => "Anonymous".to_string(),
        trimmed => trimmed.to_string(),
    };
    let date = String::from(
        js_sys::Date::new_0().to_locale_date_string("en-US", &JsValue::UNDEFINED),
    );
    let entry = Entry {
        name,
        score,
        level,
        wpm,
        accuracy,
        missed,
        date,
    };
    let mut entries = load();
    insert(&mut entries, entry.clone());
    save(&entries);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: i64) -> Entry {
        Entry {
            name: name.to_string(),
            score,
            level: 1,
            wpm: 30,
            accuracy: 95,
            missed: 1,
            date: String::new(),
        }
    }

    #[test]
    fn any_score_qualifies_on_a_short_board() {
        let board: Vec<Entry> = (0..5).map(|i| entry("p", 100 - i)).collect();
        assert!(qualifies(&board, 0));
    }

    #[test]
    fn full_board_requires_beating_last_place() {
        let board: Vec<Entry> = (0..10).map(|i| entry("p", 1000 - i * 10)).collect();
        assert!(!qualifies(&board, 910));
        assert!(qualifies(&board, 911));
    }

    #[test]
    fn insert_keeps_descending_order_and_cap() {
        let mut board: Vec<Entry> = (0..10).map(|i| entry("p", 1000 - i * 10)).collect();
        insert(&mut board, entry("new", 955));
        assert_eq!(board.len(), 10);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(board.iter().any(|e| e.name == "new"));
        assert!(board.iter().all(|e| e.score > 905));
    }
}
