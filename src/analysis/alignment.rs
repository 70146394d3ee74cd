//! Prompt-alignment scoring.
//!
//! Lexical-overlap scoring of a thought against the session's prompt
//! metadata: a 0-10 alignment score, a per-goal relevance map, and an
//! advisory drift warning when alignment falls low.

use std::collections::{BTreeMap, HashSet};

use crate::session::PromptMetadata;

/// Weight of the mean per-goal overlap in the combined score.
const GOAL_WEIGHT: f64 = 0.5;
/// Weight of the domain-token overlap.
const DOMAIN_WEIGHT: f64 = 0.2;
/// Weight of the prompt-keyword overlap.
const KEYWORD_WEIGHT: f64 = 0.3;
/// Top of the alignment band.
const MAX_ALIGNMENT: f64 = 10.0;
/// Scores below this carry a drift warning.
pub const DRIFT_THRESHOLD: u8 = 4;
/// A goal counts as covered by a thought above this relevance.
pub const GOAL_RELEVANCE_THRESHOLD: f64 = 0.5;

/// Tokens shorter than this are ignored for overlap purposes.
const MIN_OVERLAP_TOKEN_LEN: usize = 3;

/// Alignment annotation attached to a thought.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentAnnotation {
    /// Combined 0-10 score.
    pub score: u8,
    /// `goal_<i>` -> 0..1 lexical overlap with goal i.
    pub relevance: BTreeMap<String, f64>,
    /// Advisory warning, present when the score is below
    /// [`DRIFT_THRESHOLD`].
    pub drift_warning: Option<String>,
}

/// Score a thought's text against the prompt metadata.
///
/// Callers invoke this only once metadata exists; there is no sentinel
/// for the uninitialized case.
pub fn score_alignment(text: &str, metadata: &PromptMetadata) -> AlignmentAnnotation {
    let thought_tokens = token_set(text);

    let mut relevance = BTreeMap::new();
    let mut goal_sum = 0.0;
    for (i, goal) in metadata.goals.iter().enumerate() {
        let overlap = overlap_fraction(&token_set(goal), &thought_tokens);
        relevance.insert(format!("goal_{}", i), round2(overlap));
        goal_sum += overlap;
    }
    let goal_score = if metadata.goals.is_empty() {
        0.0
    } else {
        goal_sum / metadata.goals.len() as f64
    };

    let domain_tokens: HashSet<String> = metadata
        .domains
        .iter()
        .flat_map(|d| token_set(d))
        .collect();
    let domain_score = overlap_fraction(&domain_tokens, &thought_tokens);

    let keyword_tokens: HashSet<String> = metadata.keywords.iter().cloned().collect();
    let keyword_score = overlap_fraction(&keyword_tokens, &thought_tokens);

    let combined =
        (GOAL_WEIGHT * goal_score + DOMAIN_WEIGHT * domain_score + KEYWORD_WEIGHT * keyword_score)
            * MAX_ALIGNMENT;
    let score = combined.round().clamp(0.0, MAX_ALIGNMENT) as u8;

    let drift_warning = (score < DRIFT_THRESHOLD).then(|| {
        format!(
            "Alignment with the original prompt is low ({}/10); revisit the stated goals",
            score
        )
    });

    AlignmentAnnotation {
        score,
        relevance,
        drift_warning,
    }
}

/// Fraction of `reference` tokens also present in `candidate`.
/// Empty references overlap nothing.
fn overlap_fraction(reference: &HashSet<String>, candidate: &HashSet<String>) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let hits = reference.iter().filter(|t| candidate.contains(*t)).count();
    hits as f64 / reference.len() as f64
}

fn token_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= MIN_OVERLAP_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
