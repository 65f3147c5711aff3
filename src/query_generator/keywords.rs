//! Keyword extraction from free-text descriptions.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Anything that is neither a word character nor whitespace
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "and", "or", "for", "in", "on", "at", "by", "to", "with", "about", "as",
        "into", "like", "through", "after", "over", "between", "out", "against", "during",
        "without", "before", "under", "around", "among", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "do", "does", "did", "but", "if", "of", "from", "get",
        "all", "show", "find", "can", "i", "me", "my", "myself", "we", "our", "us", "ourselves",
        "you", "your", "yourself", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "whose",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Lower-case the description, replace punctuation with spaces, then keep
/// every word that is not a stop word and is longer than one character.
///
/// Word order and duplicates are preserved.
pub fn extract_keywords(description: &str) -> Vec<String> {
    let lowered = description.to_lowercase();
    let sanitized = PUNCTUATION.replace_all(&lowered, " ");

    let keywords: Vec<String> = sanitized
        .split_whitespace()
        .filter(|word| !is_stop_word(word) && word.chars().count() > 1)
        .map(str::to_string)
        .collect();

    log::debug!("Extracted keywords: {:?}", keywords);
    keywords
}
