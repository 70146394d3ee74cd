//! Upstream prompt classifier.
//!
//! Produces the [`PromptMetadata`] singleton from the first submitted
//! thought's text. Purely lexical: sentence-split goals, marker-word
//! constraints, a small domain lexicon, and keyword dispatch for the task
//! type. The alignment scorer treats the output as an opaque fixed shape.

use super::{Complexity, Priority, PromptMetadata};
use crate::analysis::keywords::extract_keywords;

/// Max goal statements kept from the prompt.
const MAX_GOALS: usize = 3;
/// Word counts at or below this classify as a simple task.
const SIMPLE_MAX_WORDS: usize = 15;
/// Word counts at or below this (and above simple) classify as medium.
const MEDIUM_MAX_WORDS: usize = 60;

/// Clause markers that signal a constraint rather than a goal.
const CONSTRAINT_MARKERS: &[&str] = &[
    "must", "should", "cannot", "can't", "only", "without", "avoid", "never",
];

/// Urgency markers for priority inference.
const HIGH_PRIORITY_MARKERS: &[&str] = &["urgent", "critical", "asap", "immediately", "blocker"];
const LOW_PRIORITY_MARKERS: &[&str] = &["minor", "whenever", "eventually", "someday"];

/// Domain lexicon: label plus the trigger tokens that vote for it.
const DOMAIN_LEXICON: &[(&str, &[&str])] = &[
    (
        "algorithms",
        &["sort", "search", "algorithm", "complexity", "recursion", "optimize", "compute"],
    ),
    (
        "data-structures",
        &["list", "array", "tree", "graph", "hash", "queue", "stack", "heap"],
    ),
    (
        "web",
        &["http", "api", "server", "request", "endpoint", "client", "rest"],
    ),
    (
        "database",
        &["database", "query", "sql", "schema", "migration", "index"],
    ),
    (
        "testing",
        &["test", "tests", "verify", "assert", "validate", "coverage"],
    ),
    (
        "concurrency",
        &["thread", "async", "lock", "race", "concurrent", "parallel"],
    ),
];

/// Classify a prompt into session metadata.
///
/// Deterministic; the same text always produces the same metadata.
pub fn classify_prompt(text: &str) -> PromptMetadata {
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let clauses: Vec<&str> = text
        .split(['.', '!', '?', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let (constraints, goal_clauses): (Vec<&str>, Vec<&str>) =
        clauses.iter().copied().partition(|clause| {
        let lowered = clause.to_lowercase();
        CONSTRAINT_MARKERS
            .iter()
            .any(|marker| lowered.split_whitespace().any(|w| w == *marker))
    });

    let goals: Vec<String> = goal_clauses
        .iter()
        .take(MAX_GOALS)
        .map(|s| s.to_string())
        .collect();
    // A prompt that is all constraints still needs one goal to track.
    let goals = if goals.is_empty() {
        clauses.iter().take(1).map(|s| s.to_string()).collect()
    } else {
        goals
    };

    let domains: Vec<String> = DOMAIN_LEXICON
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| tokens.iter().any(|tok| tok == t)))
        .map(|(label, _)| label.to_string())
        .collect();

    PromptMetadata {
        goals,
        constraints: constraints.iter().map(|s| s.to_string()).collect(),
        domains,
        task_type: infer_task_type(&tokens),
        complexity: infer_complexity(tokens.len()),
        priority: infer_priority(&tokens),
        keywords: extract_keywords(text),
    }
}

fn infer_task_type(tokens: &[String]) -> String {
    let has = |words: &[&str]| words.iter().any(|w| tokens.iter().any(|t| t == w));

    if has(&["debug", "fix", "error", "bug", "broken"]) {
        "debugging"
    } else if has(&["design", "architect", "architecture"]) {
        "design"
    } else if has(&["implement", "build", "create", "write", "add"]) {
        "implementation"
    } else if has(&["analyze", "investigate", "understand", "explain", "review"]) {
        "analysis"
    } else if has(&["plan", "approach", "strategy"]) {
        "planning"
    } else {
        "general"
    }
    .to_string()
}

fn infer_complexity(word_count: usize) -> Complexity {
    if word_count <= SIMPLE_MAX_WORDS {
        Complexity::Simple
    } else if word_count <= MEDIUM_MAX_WORDS {
        Complexity::Medium
    } else {
        Complexity::Complex
    }
}

fn infer_priority(tokens: &[String]) -> Priority {
    if HIGH_PRIORITY_MARKERS
        .iter()
        .any(|m| tokens.iter().any(|t| t == m))
    {
        Priority::High
    } else if LOW_PRIORITY_MARKERS
        .iter()
        .any(|m| tokens.iter().any(|t| t == m))
    {
        Priority::Low
    } else {
        Priority::Normal
    }
}
