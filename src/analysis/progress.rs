//! Phase and progress engine.
//!
//! Position-driven phase suggestions, the blended 0-100 progress score,
//! the remaining-thought estimate, the alignment trend, and strategic
//! guidance assembly. Phase suggestions are advisory; the caller's
//! declared phase is never overwritten.

use crate::analysis::alignment::{DRIFT_THRESHOLD, GOAL_RELEVANCE_THRESHOLD};
use crate::session::{Phase, SessionState, ThoughtRecord};

/// Position past which any non-verification phase should wrap up.
const VERIFICATION_PUSH_POSITION: f64 = 0.75;
/// Per-phase positions past which the next phase is suggested.
const PLANNING_TO_ANALYSIS: f64 = 0.2;
const ANALYSIS_TO_EXECUTION: f64 = 0.4;
const EXECUTION_TO_VERIFICATION: f64 = 0.8;

/// Blend weights of the overall progress score.
const POSITION_WEIGHT: f64 = 0.3;
const ALIGNMENT_WEIGHT: f64 = 0.3;
const COVERAGE_WEIGHT: f64 = 0.3;
const PHASE_WEIGHT: f64 = 0.1;

/// Below this overall score, the remaining estimate falls back to the
/// fixed per-complexity table.
const MEASURABLE_PROGRESS_MIN: f64 = 10.0;

/// Thoughts considered by the alignment trend.
const TREND_WINDOW: usize = 5;
/// Point difference that counts as a trend.
const TREND_DELTA: i16 = 1;

/// Guidance is capped to the highest-priority items.
const GUIDANCE_LIMIT: usize = 2;

/// Direction of recent alignment scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentTrend {
    Improving,
    Declining,
    Stable,
    /// Fewer than two alignment-scored thoughts exist.
    InsufficientData,
}

impl std::fmt::Display for AlignmentTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlignmentTrend::Improving => write!(f, "Improving"),
            AlignmentTrend::Declining => write!(f, "Declining"),
            AlignmentTrend::Stable => write!(f, "Stable"),
            AlignmentTrend::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// Progress metrics derived from the session after a record lands.
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Plain position ratio as a whole percentage; this is what the
    /// response reports.
    pub position_percent: u8,
    /// Blended 0-100 score feeding the remaining estimate.
    pub overall_score: f64,
    /// Projected thoughts left.
    pub estimated_remaining: u32,
    /// Advisory next phase, if the position warrants one.
    pub suggested_next_phase: Option<Phase>,
    /// Direction of recent alignment scores.
    pub alignment_trend: AlignmentTrend,
}

/// Summarize session progress as of the given (already stored) record.
pub fn summarize(session: &SessionState, current: &ThoughtRecord) -> ProgressSummary {
    let position = current.sequence_number as f64 / session.declared_total() as f64;
    let position_percent = (position * 100.0).round() as u8;

    let alignments = session.alignment_history();
    let mean_alignment = if alignments.is_empty() {
        0.0
    } else {
        alignments.iter().map(|&a| f64::from(a)).sum::<f64>() / alignments.len() as f64
    };

    let overall_score = POSITION_WEIGHT * position * 100.0
        + ALIGNMENT_WEIGHT * mean_alignment * 10.0
        + COVERAGE_WEIGHT * mean_goal_coverage(session)
        + PHASE_WEIGHT * current.phase.progress_weight() * 100.0;

    let estimated_remaining = if overall_score < MEASURABLE_PROGRESS_MIN {
        current.complexity.fallback_remaining()
    } else {
        let sequence = i64::from(current.sequence_number);
        let projected = (current.sequence_number as f64 * 100.0 / overall_score).ceil() as i64;
        (projected - sequence).max(0) as u32
    };

    ProgressSummary {
        position_percent,
        overall_score,
        estimated_remaining,
        suggested_next_phase: suggest_next_phase(current.phase, position),
        alignment_trend: alignment_trend(&alignments),
    }
}

/// Mean per-goal coverage percentage.
///
/// A goal is covered by each thought whose relevance for it exceeds
/// [`GOAL_RELEVANCE_THRESHOLD`]; full coverage is the expected thought
/// count for the session complexity.
fn mean_goal_coverage(session: &SessionState) -> f64 {
    let Some(metadata) = session.prompt_metadata() else {
        return 0.0;
    };
    if metadata.goals.is_empty() {
        return 0.0;
    }

    let expected = f64::from(metadata.complexity.expected_thoughts());
    let total: f64 = (0..metadata.goals.len())
        .map(|i| {
            let key = format!("goal_{}", i);
            let covering = session
                .thoughts()
                .iter()
                .filter(|t| {
                    t.prompt_relevance
                        .as_ref()
                        .and_then(|r| r.get(&key))
                        .is_some_and(|&rel| rel > GOAL_RELEVANCE_THRESHOLD)
                })
                .count();
            (covering as f64 / expected * 100.0).round().min(100.0)
        })
        .sum();
    total / metadata.goals.len() as f64
}

/// Advisory phase-transition suggestion for the current position.
fn suggest_next_phase(phase: Phase, position: f64) -> Option<Phase> {
    if position > VERIFICATION_PUSH_POSITION && phase != Phase::Verification {
        return Some(Phase::Verification);
    }
    match phase {
        Phase::Planning if position > PLANNING_TO_ANALYSIS => Some(Phase::Analysis),
        Phase::Analysis if position > ANALYSIS_TO_EXECUTION => Some(Phase::Execution),
        Phase::Execution if position > EXECUTION_TO_VERIFICATION => Some(Phase::Verification),
        _ => None,
    }
}

/// First-versus-last comparison over the most recent scored thoughts.
fn alignment_trend(alignments: &[u8]) -> AlignmentTrend {
    let window = if alignments.len() > TREND_WINDOW {
        &alignments[alignments.len() - TREND_WINDOW..]
    } else {
        alignments
    };
    if window.len() < 2 {
        return AlignmentTrend::InsufficientData;
    }
    let delta = i16::from(window[window.len() - 1]) - i16::from(window[0]);
    if delta > TREND_DELTA {
        AlignmentTrend::Improving
    } else if delta < -TREND_DELTA {
        AlignmentTrend::Declining
    } else {
        AlignmentTrend::Stable
    }
}

/// Assemble the advisory guidance list, highest priority first, capped
/// to [`GUIDANCE_LIMIT`] items.
pub fn build_guidance(
    summary: &ProgressSummary,
    phase: Phase,
    prompt_alignment: Option<u8>,
    strategy_hint: Option<String>,
) -> Vec<String> {
    let mut guidance = Vec::new();

    if let Some(next) = summary.suggested_next_phase {
        guidance.push(format!(
            "Progress suggests moving from {} to {}",
            phase, next
        ));
    }
    if prompt_alignment.is_some_and(|a| a < DRIFT_THRESHOLD) {
        guidance.push(
            "Recent thinking aligns weakly with the original prompt; revisit its goals".to_string(),
        );
    }
    if let Some(hint) = strategy_hint {
        guidance.push(hint);
    }

    guidance.truncate(GUIDANCE_LIMIT);
    guidance
}
