//! Strategy recommendation heuristics.
//!
//! Keyword dispatch over the thought text, the declared phase, and the
//! session's tool-usage counters yields a trimmed recommendation: a top
//! strategy, a reasoning type, and a focus area. Purely lexical routing,
//! no model calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::session::Phase;

/// Trimmed recommendation carried in the tool response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// The suggested problem-solving strategy.
    pub strategy: String,
    /// The reasoning style that fits the content.
    pub reasoning_type: String,
    /// Where attention should go next.
    pub focus_area: String,
}

impl Recommendation {
    /// One-line guidance form of the strategy, for the guidance list.
    pub fn strategy_hint(&self) -> String {
        format!("Consider a {} approach here", self.strategy)
    }
}

/// Strategy dispatch table: marker tokens and the strategy plus
/// reasoning type they vote for. First match wins; order is by
/// specificity.
const STRATEGY_RULES: &[(&[&str], &str, &str)] = &[
    (
        &["compare", "options", "alternatives", "choose", "tradeoff", "versus"],
        "comparative evaluation",
        "analogical",
    ),
    (
        &["why", "cause", "debug", "error", "failure", "broken"],
        "root-cause analysis",
        "abductive",
    ),
    (
        &["brainstorm", "creative", "novel", "unconventional", "ideas"],
        "divergent exploration",
        "inductive",
    ),
    (
        &["verify", "check", "test", "confirm", "prove"],
        "systematic verification",
        "deductive",
    ),
    (
        &["steps", "breakdown", "decompose", "plan", "stages"],
        "stepwise decomposition",
        "deductive",
    ),
];

/// Fallback strategies keyed by phase when no marker matches.
fn phase_strategy(phase: Phase) -> (&'static str, &'static str) {
    match phase {
        Phase::Planning => ("stepwise decomposition", "deductive"),
        Phase::Analysis => ("hypothesis testing", "abductive"),
        Phase::Execution => ("incremental refinement", "deductive"),
        Phase::Verification => ("systematic verification", "deductive"),
    }
}

fn phase_focus(phase: Phase) -> &'static str {
    match phase {
        Phase::Planning => "problem decomposition",
        Phase::Analysis => "evidence gathering",
        Phase::Execution => "incremental implementation",
        Phase::Verification => "edge-case coverage",
    }
}

/// Produce a recommendation for the current thought.
pub fn recommend(text: &str, phase: Phase, tool_usage: &HashMap<String, u32>) -> Recommendation {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let matched = STRATEGY_RULES
        .iter()
        .find(|(markers, _, _)| markers.iter().any(|m| tokens.contains(m)));

    let (strategy, reasoning_type) = match matched {
        Some((_, strategy, reasoning)) => (*strategy, *reasoning),
        None => phase_strategy(phase),
    };

    // A tool the caller leans on is worth deepening; otherwise focus
    // follows the phase.
    let focus_area = tool_usage
        .iter()
        .filter(|(_, count)| **count > 1)
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(tool, _)| format!("deeper use of {}", tool))
        .unwrap_or_else(|| phase_focus(phase).to_string());

    Recommendation {
        strategy: strategy.to_string(),
        reasoning_type: reasoning_type.to_string(),
        focus_area,
    }
}
