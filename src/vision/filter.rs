use regex::Regex;
use std::sync::OnceLock;

fn extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\.\w+$").expect("static regex"))
}

/// Decides whether an OCR token is worth keeping as a word.
///
/// Rejects tokens shorter than two characters, tokens without any ASCII
/// letter, and bare extensions such as `.exe`.
pub fn is_valid_word(text: &str) -> bool {
    if text.chars().count() < 2 {
        return false;
    }
    if !text.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if extension_pattern().is_match(text) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert!(is_valid_word("ok"));
        assert!(!is_valid_word("a"));
        assert!(!is_valid_word(".exe"));
        assert!(!is_valid_word("123"));
        assert!(is_valid_word("Hi5"));
    }

    #[test]
    fn short_tokens_rejected() {
        for t in ["", "x", "Z", "."] {
            assert!(!is_valid_word(t), "{t:?}");
        }
    }

    #[test]
    fn symbols_and_numbers_rejected() {
        for t in ["--", "3.14", "(1)", "$$$", "©©"] {
            assert!(!is_valid_word(t), "{t:?}");
        }
    }

    #[test]
    fn dotted_words_with_more_text_kept() {
        assert!(is_valid_word("main.rs"));
        assert!(is_valid_word(".exe,"));
        assert!(is_valid_word("..config"));
    }

    #[test]
    fn length_counts_characters() {
        assert!(!is_valid_word("é"));
        assert!(is_valid_word("éa"));
    }
}
