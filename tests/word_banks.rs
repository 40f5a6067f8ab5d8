// Word-bank invariants. Native-friendly: no wasm/browser APIs involved.

use std::collections::HashSet;

use typing_rain::{EASY_WORDS, HARD_WORDS, MEDIUM_WORDS};

fn assert_bank_is_clean(bank: &[&str], name: &str) {
    assert!(!bank.is_empty(), "{name} bank must not be empty");
    let mut seen = HashSet::new();
    for word in bank {
        assert!(seen.insert(*word), "duplicate word '{word}' in {name} bank");
        assert!(!word.is_empty(), "empty word in {name} bank");
        for c in word.chars() {
            assert!(
                c.is_ascii_lowercase(),
                "invalid char '{c}' in word '{word}' ({name} bank)"
            );
        }
    }
}

#[test]
fn banks_contain_unique_lowercase_ascii_words() {
    assert_bank_is_clean(EASY_WORDS, "easy");
    assert_bank_is_clean(MEDIUM_WORDS, "medium");
    assert_bank_is_clean(HARD_WORDS, "hard");
}

#[test]
fn banks_are_length_graded() {
    for word in EASY_WORDS {
        assert!(word.len() <= 5, "easy word '{word}' is too long");
    }
    for word in MEDIUM_WORDS {
        assert!(
            (6..=8).contains(&word.len()),
            "medium word '{word}' is out of band"
        );
    }
    for word in HARD_WORDS {
        assert!(word.len() >= 9, "hard word '{word}' is too short");
    }
}

#[test]
fn banks_do_not_share_words() {
    let easy: HashSet<&str> = EASY_WORDS.iter().copied().collect();
    let medium: HashSet<&str> = MEDIUM_WORDS.iter().copied().collect();
    for word in MEDIUM_WORDS {
        assert!(!easy.contains(word), "'{word}' is in both easy and medium");
    }
    for word in HARD_WORDS {
        assert!(
            !easy.contains(word) && !medium.contains(word),
            "'{word}' appears in more than one bank"
        );
    }
}
