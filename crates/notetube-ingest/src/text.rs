//! Text normalization applied before any keyword extraction.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Replace punctuation and digits with spaces, lower-case, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let text = NON_WORD.replace_all(text, " ");
    let text = DIGITS.replace_all(&text, " ");
    let text = text.to_lowercase();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation_and_digits() {
        assert_eq!(
            normalize("La CPU (v2.0) esegue 3 istruzioni!"),
            "la cpu v esegue istruzioni"
        );
    }

    #[test]
    fn test_normalize_keeps_accents() {
        assert_eq!(normalize("Perché  la   Memoria?"), "perché la memoria");
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize("line one\n\n\tline two "), "line one line two");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize("  !!! 42 ..."), "");
    }
}
