//! Lexical keyword extraction.
//!
//! Frequency-based salient-term extraction used by the contradiction
//! detector, the implicit-dependency inference, and the prompt
//! classifier. Not semantic analysis; a counting heuristic.

use std::collections::HashMap;

/// Number of keywords returned.
const TOP_KEYWORDS: usize = 5;
/// Tokens shorter than this are discarded.
const MIN_TOKEN_LEN: usize = 5;

/// Common long-ish words that carry no topical signal.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "because", "before", "being", "below",
    "between", "could", "every", "first", "might", "other", "shall", "should",
    "since", "still", "their", "there", "these", "thing", "things", "think",
    "those", "through", "under", "until", "where", "which", "while", "would",
];

/// Extract the top salient terms of a text.
///
/// Lowercases, strips punctuation, splits on whitespace, drops short
/// tokens and stopwords, counts frequency, and returns the top five
/// tokens by descending count. Ties keep first-occurrence order (the
/// sort is stable). Pure and deterministic.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in cleaned.split_whitespace() {
        if token.len() < MIN_TOKEN_LEN || STOPWORDS.contains(&token) {
            continue;
        }
        let entry = counts.entry(token.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(token.to_string());
        }
        *entry += 1;
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(TOP_KEYWORDS);
    order
}
