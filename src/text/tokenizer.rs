//! Word tokenization and n-gram expansion.

use regex::Regex;
use std::sync::OnceLock;

use super::stop_words::is_stop_word;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Runs of two or more word characters
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"))
}

/// Lowercase `text` and split it into word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_regex()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Build word n-grams of length `1..=ngram_max` from `text`.
///
/// When `remove_stop_words` is set, stop words are dropped from the token
/// stream before n-grams are formed, so an n-gram may span a removed word.
pub fn word_ngrams(text: &str, ngram_max: usize, remove_stop_words: bool) -> Vec<String> {
    let mut tokens = tokenize(text);
    if remove_stop_words {
        tokens.retain(|t| !is_stop_word(t));
    }

    let mut ngrams = Vec::new();
    for n in 1..=ngram_max.max(1) {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            ngrams.push(window.join(" "));
        }
    }
    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_short_tokens() {
        assert_eq!(
            tokenize("HR Team manages a Payroll-Run"),
            vec!["hr", "team", "manages", "payroll", "run"]
        );
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(tokenize("(invoices), & receipts!"), vec!["invoices", "receipts"]);
        assert!(tokenize("a & b").is_empty());
    }

    #[test]
    fn test_word_ngrams_order() {
        let grams = word_ngrams("sales team manages", 3, false);
        assert_eq!(
            grams,
            vec![
                "sales",
                "team",
                "manages",
                "sales team",
                "team manages",
                "sales team manages",
            ]
        );
    }

    #[test]
    fn test_word_ngrams_skip_stop_words() {
        let grams = word_ngrams("owner of the invoices", 2, true);
        assert_eq!(grams, vec!["owner", "invoices", "owner invoices"]);
    }

    #[test]
    fn test_word_ngrams_short_input() {
        assert_eq!(word_ngrams("logs", 3, true), vec!["logs"]);
        assert!(word_ngrams("", 3, false).is_empty());
    }
}
