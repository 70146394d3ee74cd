//! Heuristic quality assessment.
//!
//! Derives coherence / depth / relevance sub-scores, an aggregate
//! quality score, and an insight value from structural features of a
//! thought. All thresholds are fixed design constants; feedback strings
//! are advisory only and never affect control flow.

use crate::session::{Phase, QualityAssessment, ThoughtRecord};

/// Baseline for every sub-score.
const BASE_SCORE: u8 = 5;
/// Ceiling coherence reaches through declared dependencies.
const COHERENCE_MAX: u8 = 8;
/// Coherence when a non-first thought declares no dependencies.
const COHERENCE_DISCONNECTED: u8 = 3;
/// Word counts below this are shallow.
const DEPTH_SHALLOW_WORDS: usize = 30;
/// Word counts above this are deep.
const DEPTH_DEEP_WORDS: usize = 100;
const DEPTH_SHALLOW: u8 = 3;
const DEPTH_DEEP: u8 = 8;
/// Relevance when planning has run past its usual span.
const RELEVANCE_OVERPLANNING: u8 = 4;
/// Planning thoughts after this sequence number look like stalling.
const PLANNING_SPAN: u32 = 3;

/// Insight-value blend weights and the dependency bonus.
const INSIGHT_DEPTH_WEIGHT: f64 = 0.4;
const INSIGHT_COHERENCE_WEIGHT: f64 = 0.3;
const INSIGHT_RELEVANCE_WEIGHT: f64 = 0.3;
const INSIGHT_DEPENDENCY_BONUS: f64 = 1.2;

/// Assess a thought before storage. Returns the quality sub-scores plus
/// the derived insight value.
///
/// Deterministic in the record's text, phase, sequence number, and
/// declared dependencies.
pub fn assess_quality(record: &ThoughtRecord) -> (QualityAssessment, u8) {
    let mut feedback = Vec::new();

    let coherence = if record.dependencies.is_empty() {
        if record.sequence_number > 1 {
            feedback.push(
                "This thought barely connects to previous thinking; reference the steps it builds on"
                    .to_string(),
            );
            COHERENCE_DISCONNECTED
        } else {
            BASE_SCORE
        }
    } else {
        COHERENCE_MAX.min(BASE_SCORE + record.dependencies.len() as u8)
    };

    let words = record.word_count();
    let depth = if words < DEPTH_SHALLOW_WORDS {
        feedback.push("Consider exploring this idea in more depth".to_string());
        DEPTH_SHALLOW
    } else if words > DEPTH_DEEP_WORDS {
        DEPTH_DEEP
    } else {
        BASE_SCORE
    };

    let relevance = if record.phase == Phase::Planning && record.sequence_number > PLANNING_SPAN {
        feedback.push("Planning has run past its usual span; move to execution".to_string());
        RELEVANCE_OVERPLANNING
    } else {
        BASE_SCORE
    };

    let score = (f64::from(coherence + depth + relevance) / 3.0).round() as u8;

    let bonus = if record.dependencies.is_empty() {
        1.0
    } else {
        INSIGHT_DEPENDENCY_BONUS
    };
    let insight = ((INSIGHT_DEPTH_WEIGHT * f64::from(depth)
        + INSIGHT_COHERENCE_WEIGHT * f64::from(coherence)
        + INSIGHT_RELEVANCE_WEIGHT * f64::from(relevance))
        * bonus)
        .round() as u8;

    (
        QualityAssessment {
            coherence,
            depth,
            relevance,
            score,
            feedback,
        },
        insight,
    )
}
