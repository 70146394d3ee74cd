//! Heuristic contradiction detection.
//!
//! Flags a likely logical conflict when a new thought covers the same
//! topic as a prior one (shared keywords) with opposite polarity (one
//! side negated). Annotations are advisory and never block ingestion.

use crate::session::ThoughtRecord;

/// Shared-keyword count at which two thoughts are considered to be about
/// the same topic.
const MIN_SHARED_KEYWORDS: usize = 2;

/// Negation markers, compared against punctuation-stripped tokens.
const NEGATION_MARKERS: &[&str] = &[
    "not", "no", "never", "cannot", "cant", "wont", "shouldnt", "dont", "isnt", "doesnt", "didnt",
];

/// Outcome of comparing a new thought against session history.
#[derive(Debug, Clone, Default)]
pub struct ContradictionReport {
    /// Whether any prior thought conflicts.
    pub has_contradictions: bool,
    /// Human-readable notes, each naming the conflicting prior sequence
    /// number.
    pub details: Vec<String>,
}

/// Compare a new thought against every prior record.
///
/// Runs in O(history) per submission.
pub fn detect_contradictions(
    text: &str,
    keywords: &[String],
    history: &[ThoughtRecord],
) -> ContradictionReport {
    let new_negated = has_negation(text);
    let mut details = Vec::new();

    for prior in history {
        let shared: Vec<&String> = keywords
            .iter()
            .filter(|k| prior.keywords.contains(k))
            .collect();
        if shared.len() < MIN_SHARED_KEYWORDS {
            continue;
        }
        if new_negated != has_negation(&prior.text) {
            let terms: Vec<&str> = shared.iter().map(|s| s.as_str()).collect();
            details.push(format!(
                "Possible conflict with thought #{}: same topic ({}) with opposite polarity",
                prior.sequence_number,
                terms.join(", ")
            ));
        }
    }

    ContradictionReport {
        has_contradictions: !details.is_empty(),
        details,
    }
}

fn has_negation(text: &str) -> bool {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .any(|token| NEGATION_MARKERS.contains(&token.as_str()))
}
