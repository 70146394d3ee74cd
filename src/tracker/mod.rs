//! Thought-tracking pipeline.
//!
//! One submission flows: validation -> keyword extraction ->
//! contradiction check -> prompt-alignment scoring -> quality assessment
//! -> implicit-dependency inference -> store append -> progress and
//! guidance derivation -> response assembly. A failed submission stores
//! nothing; derived fields are computed exactly once, from the state of
//! the store prior to insertion.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::analysis::{
    assess_quality, build_guidance, detect_contradictions, extract_keywords, infer_dependencies,
    score_alignment, summarize, DependencyGraph,
};
use crate::config::{Config, SessionConfig};
use crate::error::{AppResult, ToolError};
use crate::intelligence::{recommend, Recommendation};
use crate::session::{
    classify_prompt, Complexity, Phase, SessionState, ThoughtRecord, ThoughtStatus,
};

/// Validated input parameters for one thought submission.
#[derive(Debug, Clone)]
pub struct TrackThoughtParams {
    /// The reasoning step content.
    pub thought: String,
    /// Caller-declared position in the trace.
    pub thought_number: u32,
    /// Caller's current estimate of total steps.
    pub total_thoughts: u32,
    /// Whether more steps follow.
    pub next_thought_needed: bool,
    /// Whether this thought supersedes a prior one.
    pub is_revision: bool,
    /// Sequence number of the superseded thought.
    pub revises_thought: Option<u32>,
    /// Sequence number this branch diverges from.
    pub branch_from_thought: Option<u32>,
    /// Named branch this thought continues.
    pub branch_id: Option<String>,
    /// Whether the caller suspects the total estimate is too small.
    pub needs_more_thoughts: bool,
    /// Declared phase, if any.
    pub phase: Option<Phase>,
    /// Declared dependency sequence numbers.
    pub dependencies: Vec<u32>,
    /// External tools used while producing this step.
    pub tools_used: Vec<String>,
    /// Declared complexity, if any.
    pub complexity: Option<Complexity>,
    /// Declared status, if any.
    pub status: Option<ThoughtStatus>,
}

/// Compact progress summary returned for a stored thought.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackThoughtResult {
    /// Echo of the submitted position.
    pub thought_number: u32,
    /// Session total after auto-adjustment; never below `thought_number`.
    pub total_thoughts: u32,
    /// Echo of the continuation flag.
    pub next_thought_needed: bool,
    /// Active branch ids, in first-appearance order.
    pub branches: Vec<String>,
    /// Declared or defaulted phase of the stored thought.
    pub phase: Phase,
    /// Resolved complexity of the stored thought.
    pub complexity: Complexity,
    /// Plain position ratio, e.g. "20%".
    pub progress: String,
    /// Projected thoughts left.
    pub estimated_remaining_thoughts: u32,
    /// Direction of recent alignment scores.
    pub alignment_trend: String,
    /// At most two advisory strings, highest priority first.
    pub strategic_guidance: Vec<String>,
    /// Prompt-alignment score; absent before metadata exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_alignment: Option<u8>,
    /// Advisory drift warning for low alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_warning: Option<String>,
    /// Trimmed strategy / reasoning-type / focus-area hints.
    pub recommendations: Recommendation,
}

/// The tracking pipeline and the session state it guards.
///
/// One logical caller per process: the mutex serializes submissions so a
/// record is fully enriched and stored before the next is accepted.
pub struct ThoughtTracker {
    limits: SessionConfig,
    session: Mutex<SessionState>,
}

impl ThoughtTracker {
    /// Create a tracker with an empty session.
    pub fn new(config: &Config) -> Self {
        Self {
            limits: config.session.clone(),
            session: Mutex::new(SessionState::new()),
        }
    }

    /// Run one submission through the full pipeline.
    pub async fn process(&self, arguments: Value) -> AppResult<TrackThoughtResult> {
        let start = Instant::now();
        let params = validate_params(&arguments)?;

        let mut session = self.session.lock().await;

        if params.thought.chars().count() > self.limits.max_thought_chars {
            return Err(ToolError::invalid_field("thought", "exceeds the maximum length").into());
        }
        if session.len() >= self.limits.max_history {
            return Err(
                ToolError::Session("thought history limit reached for this session".to_string())
                    .into(),
            );
        }

        // The first thought doubles as the prompt; it seeds the session
        // metadata before its own enrichment runs.
        if params.thought_number == 1 && session.prompt_metadata().is_none() {
            let metadata = classify_prompt(&params.thought);
            info!(
                goals = metadata.goals.len(),
                task_type = %metadata.task_type,
                complexity = %metadata.complexity,
                "Prompt metadata initialized"
            );
            session.init_prompt_metadata(metadata);
        }

        let record = self.enrich(&session, &params);
        debug!(
            thought_number = record.sequence_number,
            keywords = ?record.keywords,
            "Thought enriched"
        );
        if !record.contradictions.is_empty() {
            warn!(
                thought_number = record.sequence_number,
                count = record.contradictions.len(),
                "Possible contradictions detected"
            );
        }

        session.insert(record.clone());

        let summary = summarize(&session, &record);
        let recommendation = recommend(&record.text, record.phase, session.tool_usage());
        let guidance = build_guidance(
            &summary,
            record.phase,
            record.prompt_alignment,
            Some(recommendation.strategy_hint()),
        );

        info!(
            thought_number = record.sequence_number,
            total_thoughts = session.declared_total(),
            progress = summary.position_percent,
            latency_ms = start.elapsed().as_millis() as i64,
            "Thought tracked"
        );

        Ok(TrackThoughtResult {
            thought_number: record.sequence_number,
            total_thoughts: session.declared_total(),
            next_thought_needed: params.next_thought_needed,
            branches: session.branch_ids(),
            phase: record.phase,
            complexity: record.complexity,
            progress: format!("{}%", summary.position_percent),
            estimated_remaining_thoughts: summary.estimated_remaining,
            alignment_trend: summary.alignment_trend.to_string(),
            strategic_guidance: guidance,
            prompt_alignment: record.prompt_alignment,
            drift_warning: record.drift_warning,
            recommendations: recommendation,
        })
    }

    /// Build the fully annotated record from validated params and the
    /// pre-insertion session state.
    fn enrich(&self, session: &SessionState, params: &TrackThoughtParams) -> ThoughtRecord {
        let complexity = params.complexity.unwrap_or_else(|| {
            session
                .prompt_metadata()
                .map(|m| m.complexity)
                .unwrap_or_default()
        });

        let mut record = ThoughtRecord::new(
            params.thought.clone(),
            params.thought_number,
            params.total_thoughts,
            params.next_thought_needed,
        )
        .with_dependencies(params.dependencies.clone())
        .with_tools(params.tools_used.clone())
        .with_complexity(complexity);

        if let Some(phase) = params.phase {
            record = record.with_phase(phase);
        }
        if let Some(status) = params.status {
            record = record.with_status(status);
        }
        record.is_revision = params.is_revision || params.revises_thought.is_some();
        record.revises_sequence_number = params.revises_thought;
        record.branch_origin = params.branch_from_thought;
        record.branch_id = params.branch_id.clone();

        record.keywords = extract_keywords(&record.text);

        let report = detect_contradictions(&record.text, &record.keywords, session.thoughts());
        record.contradictions = report.details;

        if let Some(metadata) = session.prompt_metadata() {
            let annotation = score_alignment(&record.text, metadata);
            record.prompt_alignment = Some(annotation.score);
            record.prompt_relevance = Some(annotation.relevance);
            record.drift_warning = annotation.drift_warning;
        }

        let (quality, insight) = assess_quality(&record);
        record.quality = quality;
        record.insight_value = insight;

        record.inferred_dependencies = infer_dependencies(
            &record.keywords,
            &record.dependencies,
            record.sequence_number,
            session.thoughts(),
        );

        record
    }

    /// Snapshot the dependency adjacency for visualization consumers.
    pub async fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::from_session(&*self.session.lock().await)
    }

    /// The visible record for a sequence number (a stored revision
    /// shadows the record it supersedes).
    pub async fn thought_by_sequence(&self, sequence_number: u32) -> Option<ThoughtRecord> {
        self.session
            .lock()
            .await
            .get_by_sequence(sequence_number)
            .cloned()
    }
}

/// Structurally validate a raw payload.
///
/// Required fields are checked in declaration order and the first
/// missing or mistyped one is named in the error. Optional fields are
/// typed-cast passthrough: a mistyped optional is dropped rather than
/// rejected, and enum correctness is advisory (unknown phase,
/// complexity, or status strings fall back to defaults).
pub fn validate_params(arguments: &Value) -> Result<TrackThoughtParams, ToolError> {
    let thought = match arguments.get("thought") {
        None => return Err(ToolError::invalid_field("thought", "required field is missing")),
        Some(v) => match v.as_str() {
            None => return Err(ToolError::invalid_field("thought", "must be a string")),
            Some(s) if s.trim().is_empty() => {
                return Err(ToolError::invalid_field("thought", "cannot be empty"))
            }
            Some(s) => s.to_string(),
        },
    };

    let thought_number = required_sequence(arguments, "thoughtNumber")?;
    let total_thoughts = required_sequence(arguments, "totalThoughts")?;

    let next_thought_needed = match arguments.get("nextThoughtNeeded") {
        None => {
            return Err(ToolError::invalid_field(
                "nextThoughtNeeded",
                "required field is missing",
            ))
        }
        Some(v) => v.as_bool().ok_or_else(|| {
            ToolError::invalid_field("nextThoughtNeeded", "must be a boolean")
        })?,
    };

    Ok(TrackThoughtParams {
        thought,
        thought_number,
        total_thoughts,
        next_thought_needed,
        is_revision: optional_bool(arguments, "isRevision"),
        revises_thought: optional_sequence(arguments, "revisesThought"),
        branch_from_thought: optional_sequence(arguments, "branchFromThought"),
        branch_id: arguments
            .get("branchId")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        needs_more_thoughts: optional_bool(arguments, "needsMoreThoughts"),
        phase: optional_enum(arguments, "phase"),
        dependencies: arguments
            .get("dependencies")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_u64)
                    .filter_map(|v| u32::try_from(v).ok())
                    .filter(|&v| v >= 1)
                    .collect()
            })
            .unwrap_or_default(),
        tools_used: arguments
            .get("toolsUsed")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        complexity: optional_enum(arguments, "complexity"),
        status: optional_enum(arguments, "status"),
    })
}

fn required_sequence(arguments: &Value, field: &str) -> Result<u32, ToolError> {
    match arguments.get(field) {
        None => Err(ToolError::invalid_field(field, "required field is missing")),
        Some(v) => v
            .as_u64()
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ToolError::invalid_field(field, "must be a positive integer")),
    }
}

fn optional_sequence(arguments: &Value, field: &str) -> Option<u32> {
    arguments
        .get(field)
        .and_then(Value::as_u64)
        .filter(|&n| n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

fn optional_bool(arguments: &Value, field: &str) -> bool {
    arguments
        .get(field)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn optional_enum<T: std::str::FromStr>(arguments: &Value, field: &str) -> Option<T> {
    arguments
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_validate_minimal_payload() {
        let params = validate_params(&json!({
            "thought": "Plan the approach",
            "thoughtNumber": 1,
            "totalThoughts": 5,
            "nextThoughtNeeded": true
        }))
        .unwrap();

        assert_eq!(params.thought, "Plan the approach");
        assert_eq!(params.thought_number, 1);
        assert_eq!(params.total_thoughts, 5);
        assert!(params.next_thought_needed);
        assert!(!params.is_revision);
        assert!(params.dependencies.is_empty());
        assert!(params.phase.is_none());
    }

    #[test]
    fn test_validate_missing_fields_named_in_order() {
        let err = validate_params(&json!({})).unwrap_err();
        assert!(err.to_string().contains("thought"));

        let err = validate_params(&json!({"thought": "x"})).unwrap_err();
        assert!(err.to_string().contains("thoughtNumber"));

        let err =
            validate_params(&json!({"thought": "x", "thoughtNumber": 1})).unwrap_err();
        assert!(err.to_string().contains("totalThoughts"));

        let err = validate_params(
            &json!({"thought": "x", "thoughtNumber": 1, "totalThoughts": 2}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("nextThoughtNeeded"));
    }

    #[test]
    fn test_validate_empty_thought_rejected() {
        let err = validate_params(&json!({
            "thought": "   ",
            "thoughtNumber": 1,
            "totalThoughts": 5,
            "nextThoughtNeeded": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("thought"));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_mistyped_required_fields() {
        let err = validate_params(&json!({
            "thought": "x",
            "thoughtNumber": "one",
            "totalThoughts": 5,
            "nextThoughtNeeded": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("thoughtNumber"));
        assert!(err.to_string().contains("positive integer"));

        let err = validate_params(&json!({
            "thought": "x",
            "thoughtNumber": 0,
            "totalThoughts": 5,
            "nextThoughtNeeded": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("thoughtNumber"));

        let err = validate_params(&json!({
            "thought": "x",
            "thoughtNumber": 1,
            "totalThoughts": 5,
            "nextThoughtNeeded": "yes"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("nextThoughtNeeded"));
        assert!(err.to_string().contains("boolean"));
    }

    #[test]
    fn test_validate_optional_passthrough() {
        let params = validate_params(&json!({
            "thought": "branch out",
            "thoughtNumber": 3,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "branchFromThought": 2,
            "branchId": "alt",
            "revisesThought": 1,
            "phase": "analysis",
            "dependencies": [1, 2],
            "toolsUsed": ["search"],
            "complexity": "complex",
            "status": "needs-revision"
        }))
        .unwrap();

        assert_eq!(params.branch_from_thought, Some(2));
        assert_eq!(params.branch_id.as_deref(), Some("alt"));
        assert_eq!(params.revises_thought, Some(1));
        assert_eq!(params.phase, Some(Phase::Analysis));
        assert_eq!(params.dependencies, vec![1, 2]);
        assert_eq!(params.tools_used, vec!["search".to_string()]);
        assert_eq!(params.complexity, Some(Complexity::Complex));
        assert_eq!(params.status, Some(ThoughtStatus::NeedsRevision));
    }

    #[test]
    fn test_validate_mistyped_optionals_dropped() {
        let params = validate_params(&json!({
            "thought": "tolerant",
            "thoughtNumber": 2,
            "totalThoughts": 5,
            "nextThoughtNeeded": false,
            "phase": "daydreaming",
            "complexity": 7,
            "dependencies": "all of them",
            "branchId": 42,
            "isRevision": "maybe"
        }))
        .unwrap();

        assert!(params.phase.is_none());
        assert!(params.complexity.is_none());
        assert!(params.dependencies.is_empty());
        assert!(params.branch_id.is_none());
        assert!(!params.is_revision);
    }

    #[test]
    fn test_validate_dependencies_filter_invalid_entries() {
        let params = validate_params(&json!({
            "thought": "deps",
            "thoughtNumber": 4,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "dependencies": [0, 1, "two", 3, -4]
        }))
        .unwrap();
        assert_eq!(params.dependencies, vec![1, 3]);
    }
}
