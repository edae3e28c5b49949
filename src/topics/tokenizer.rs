// Word tokenizer.
//
// A token is a run of Unicode letters that may contain punctuation in the
// middle but starts and ends on a letter: "don't" and "state-of-the-art" stay
// whole, while quotes, trailing commas and bare digits are dropped. Text is
// lowercased before matching.

use std::sync::LazyLock;

use regex::Regex;

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{L}[\p{L}\p{P}]*\p{L}").expect("word pattern is a valid regex")
});

/// Extract lowercase word tokens from raw text, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}
