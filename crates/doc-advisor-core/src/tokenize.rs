//! Word tokenizer.
//!
//! Splits text into lowercase runs of `[a-z0-9_]`. There is no stemming,
//! stop-word removal, or Unicode normalization beyond case folding, so
//! `"Oracle DB,"` becomes `["oracle", "db"]`.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9_]+").unwrap());

/// Tokenize `text` into lowercase word tokens, in order of appearance.
///
/// Empty or punctuation-only input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}
