//! Session state for reasoning-trace tracking.
//!
//! This module provides the in-memory thought store, branch index, and
//! prompt-metadata singleton that make up one tracking session, plus the
//! record types the enrichment pipeline attaches its annotations to.

mod prompt;

pub use prompt::classify_prompt;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Problem-solving phase of a thought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Framing the problem and sketching an approach.
    Planning,
    /// Examining the problem space and gathering understanding.
    Analysis,
    /// Carrying out the planned approach.
    Execution,
    /// Checking results against the goal.
    Verification,
}

impl Phase {
    /// Default phase when the caller declares none: the first thought is
    /// planning, everything after is execution.
    pub fn default_for_sequence(sequence_number: u32) -> Self {
        if sequence_number == 1 {
            Phase::Planning
        } else {
            Phase::Execution
        }
    }

    /// The phase that ordinarily follows this one.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Planning => Some(Phase::Analysis),
            Phase::Analysis => Some(Phase::Execution),
            Phase::Execution => Some(Phase::Verification),
            Phase::Verification => None,
        }
    }

    /// Fixed progress weight of the phase, used by the blended progress
    /// score.
    pub fn progress_weight(self) -> f64 {
        match self {
            Phase::Planning => 0.1,
            Phase::Analysis => 0.3,
            Phase::Execution => 0.5,
            Phase::Verification => 0.9,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Planning => write!(f, "planning"),
            Phase::Analysis => write!(f, "analysis"),
            Phase::Execution => write!(f, "execution"),
            Phase::Verification => write!(f, "verification"),
        }
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(Phase::Planning),
            "analysis" => Ok(Phase::Analysis),
            "execution" => Ok(Phase::Execution),
            "verification" => Ok(Phase::Verification),
            _ => Err(format!("Unknown phase: {}", s)),
        }
    }
}

/// Estimated complexity of the task or of a single thought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// A task expected to resolve in a handful of steps.
    Simple,
    /// The common case.
    #[default]
    Medium,
    /// A task expected to need extended reasoning.
    Complex,
}

impl Complexity {
    /// Expected number of thoughts a task of this complexity takes,
    /// used as the goal-coverage denominator.
    pub fn expected_thoughts(self) -> u32 {
        match self {
            Complexity::Simple => 3,
            Complexity::Medium => 5,
            Complexity::Complex => 8,
        }
    }

    /// Fallback remaining-thought estimate used before progress is
    /// measurable.
    pub fn fallback_remaining(self) -> u32 {
        match self {
            Complexity::Simple => 5,
            Complexity::Medium => 8,
            Complexity::Complex => 12,
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::Complex => write!(f, "complex"),
        }
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "medium" => Ok(Complexity::Medium),
            "complex" => Ok(Complexity::Complex),
            _ => Err(format!("Unknown complexity: {}", s)),
        }
    }
}

/// Completion status of a thought.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThoughtStatus {
    /// The step is finished.
    #[serde(rename = "complete")]
    Complete,
    /// The step is still being worked.
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    /// The step needs to be revised.
    #[serde(rename = "needs-revision")]
    NeedsRevision,
}

impl std::fmt::Display for ThoughtStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThoughtStatus::Complete => write!(f, "complete"),
            ThoughtStatus::InProgress => write!(f, "in-progress"),
            ThoughtStatus::NeedsRevision => write!(f, "needs-revision"),
        }
    }
}

impl std::str::FromStr for ThoughtStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "complete" => Ok(ThoughtStatus::Complete),
            "in-progress" | "in_progress" => Ok(ThoughtStatus::InProgress),
            "needs-revision" | "needs_revision" => Ok(ThoughtStatus::NeedsRevision),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Task priority inferred from the originating prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default.
    #[default]
    Normal,
    /// Urgent or blocking.
    High,
}

/// Quality sub-scores attached to a thought by the assessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// How well the thought connects to prior thinking (1-8).
    pub coherence: u8,
    /// How thoroughly the thought develops its content (1-8).
    pub depth: u8,
    /// How on-task the thought is for its phase (1-8).
    pub relevance: u8,
    /// Rounded mean of the sub-scores.
    pub score: u8,
    /// Advisory feedback; never affects control flow.
    pub feedback: Vec<String>,
}

/// One submitted reasoning step with its pipeline annotations.
///
/// Records are created only through the ingestion pipeline and are
/// immutable once stored; a revision is a new record referencing the old
/// one, never an edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtRecord {
    /// Unique record identifier.
    pub id: String,
    /// The thought content.
    pub text: String,
    /// Caller-declared position in the trace.
    pub sequence_number: u32,
    /// Caller's estimate of the total step count at submission time.
    pub declared_total: u32,
    /// Whether the caller signals more steps follow.
    pub continuation_expected: bool,
    /// Whether this record supersedes a prior one.
    #[serde(default)]
    pub is_revision: bool,
    /// Sequence number of the superseded record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revises_sequence_number: Option<u32>,
    /// Sequence number this branch diverges from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_origin: Option<u32>,
    /// Named branch this record continues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Declared or defaulted phase.
    pub phase: Phase,
    /// Caller-declared dependency sequence numbers.
    #[serde(default)]
    pub dependencies: Vec<u32>,
    /// Dependencies inferred from keyword overlap with prior thoughts.
    /// Kept apart from the declared set so consumers can tell a stated
    /// relationship from a guessed one.
    #[serde(default)]
    pub inferred_dependencies: Vec<u32>,
    /// External tools used while producing this step.
    #[serde(default)]
    pub tools_used: Vec<String>,
    /// Caller-supplied or engine-estimated complexity.
    pub complexity: Complexity,
    /// Completion status.
    pub status: ThoughtStatus,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,

    // Pipeline annotations, never caller-supplied.
    /// Top salient terms of the text.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Quality sub-scores and feedback.
    pub quality: QualityAssessment,
    /// Weighted insight value derived from the quality sub-scores.
    pub insight_value: u8,
    /// Prompt-alignment score (0-10); absent when no prompt metadata
    /// existed at ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_alignment: Option<u8>,
    /// Per-goal lexical relevance (`goal_<i>` -> 0..1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_relevance: Option<BTreeMap<String, f64>>,
    /// Advisory warning when alignment fell below the drift threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drift_warning: Option<String>,
    /// Human-readable contradiction notes referencing prior sequence
    /// numbers.
    #[serde(default)]
    pub contradictions: Vec<String>,
}

impl ThoughtRecord {
    /// Create a new record with the required fields; everything else
    /// starts at its defaults and is filled by builders or the pipeline.
    pub fn new(
        text: impl Into<String>,
        sequence_number: u32,
        declared_total: u32,
        continuation_expected: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sequence_number,
            declared_total,
            continuation_expected,
            is_revision: false,
            revises_sequence_number: None,
            branch_origin: None,
            branch_id: None,
            phase: Phase::default_for_sequence(sequence_number),
            dependencies: Vec::new(),
            inferred_dependencies: Vec::new(),
            tools_used: Vec::new(),
            complexity: Complexity::default(),
            status: ThoughtStatus::default(),
            created_at: Utc::now(),
            keywords: Vec::new(),
            quality: QualityAssessment::default(),
            insight_value: 0,
            prompt_alignment: None,
            prompt_relevance: None,
            drift_warning: None,
            contradictions: Vec::new(),
        }
    }

    /// Mark this record as a revision of a prior sequence number.
    pub fn with_revision_of(mut self, sequence_number: u32) -> Self {
        self.is_revision = true;
        self.revises_sequence_number = Some(sequence_number);
        self
    }

    /// Place this record on a named branch diverging from a prior
    /// sequence number.
    pub fn with_branch(mut self, origin: u32, branch_id: impl Into<String>) -> Self {
        self.branch_origin = Some(origin);
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Set the phase.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Set the declared dependencies, dropping duplicates while keeping
    /// caller order.
    pub fn with_dependencies(mut self, dependencies: Vec<u32>) -> Self {
        let mut seen = Vec::new();
        for dep in dependencies {
            if !seen.contains(&dep) {
                seen.push(dep);
            }
        }
        self.dependencies = seen;
        self
    }

    /// Set the tools used.
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools_used = tools;
        self
    }

    /// Set the complexity.
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: ThoughtStatus) -> Self {
        self.status = status;
        self
    }

    /// Declared and inferred dependencies combined, deduplicated and
    /// sorted, for consumers that want the whole graph neighborhood.
    pub fn all_dependencies(&self) -> Vec<u32> {
        let mut all: Vec<u32> = self
            .dependencies
            .iter()
            .chain(self.inferred_dependencies.iter())
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Whitespace word count of the text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Prompt metadata produced by the upstream classifier from the first
/// submitted thought. Initialized once per session, read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMetadata {
    /// Ordered goal statements extracted from the prompt.
    pub goals: Vec<String>,
    /// Constraint clauses (must / cannot / only ...).
    pub constraints: Vec<String>,
    /// Matched domain labels.
    pub domains: Vec<String>,
    /// Coarse task classification (e.g. "implementation", "debugging").
    pub task_type: String,
    /// Session complexity estimate.
    pub complexity: Complexity,
    /// Inferred priority.
    pub priority: Priority,
    /// Salient prompt keywords.
    pub keywords: Vec<String>,
}

/// Mutable state of one tracking session: the ordered thought store, the
/// branch index, the prompt-metadata singleton, and tool-usage counters.
///
/// All pipeline stages receive this context explicitly; a multi-tenant
/// deployment would key one `SessionState` per caller.
#[derive(Debug, Default)]
pub struct SessionState {
    thoughts: Vec<ThoughtRecord>,
    by_sequence: HashMap<u32, usize>,
    branch_order: Vec<String>,
    branches: HashMap<String, Vec<usize>>,
    declared_total: u32,
    prompt_metadata: Option<PromptMetadata>,
    tool_usage: HashMap<String, u32>,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored thoughts.
    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    /// Whether the session has any thoughts.
    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// All stored thoughts in append order.
    pub fn thoughts(&self) -> &[ThoughtRecord] {
        &self.thoughts
    }

    /// The visible record for a sequence number (last write wins, so a
    /// stored revision shadows the record it supersedes).
    pub fn get_by_sequence(&self, sequence_number: u32) -> Option<&ThoughtRecord> {
        self.by_sequence
            .get(&sequence_number)
            .map(|&idx| &self.thoughts[idx])
    }

    /// The session's running total estimate; never less than the highest
    /// sequence number seen.
    pub fn declared_total(&self) -> u32 {
        self.declared_total
    }

    /// Active branch ids in the order they first appeared.
    pub fn branch_ids(&self) -> Vec<String> {
        self.branch_order.clone()
    }

    /// Thoughts on a branch, in append order.
    pub fn branch_thoughts(&self, branch_id: &str) -> Vec<&ThoughtRecord> {
        self.branches
            .get(branch_id)
            .map(|indices| indices.iter().map(|&i| &self.thoughts[i]).collect())
            .unwrap_or_default()
    }

    /// The prompt metadata, if the session has been initialized.
    pub fn prompt_metadata(&self) -> Option<&PromptMetadata> {
        self.prompt_metadata.as_ref()
    }

    /// Initialize the prompt metadata. The first init wins; later calls
    /// are ignored and return false.
    pub fn init_prompt_metadata(&mut self, metadata: PromptMetadata) -> bool {
        if self.prompt_metadata.is_some() {
            return false;
        }
        self.prompt_metadata = Some(metadata);
        true
    }

    /// Per-tool usage counts accumulated across the session.
    pub fn tool_usage(&self) -> &HashMap<String, u32> {
        &self.tool_usage
    }

    /// Alignment scores of stored thoughts in append order, skipping
    /// records ingested before metadata existed.
    pub fn alignment_history(&self) -> Vec<u8> {
        self.thoughts
            .iter()
            .filter_map(|t| t.prompt_alignment)
            .collect()
    }

    /// Append a fully enriched record, updating the sequence index, the
    /// branch bucket, the running total, and tool-usage counters.
    pub fn insert(&mut self, record: ThoughtRecord) {
        self.declared_total = self
            .declared_total
            .max(record.declared_total)
            .max(record.sequence_number);

        let idx = self.thoughts.len();
        self.by_sequence.insert(record.sequence_number, idx);

        if let Some(branch_id) = &record.branch_id {
            if !self.branches.contains_key(branch_id) {
                self.branch_order.push(branch_id.clone());
            }
            self.branches.entry(branch_id.clone()).or_default().push(idx);
        }

        for tool in &record.tools_used {
            *self.tool_usage.entry(tool.clone()).or_insert(0) += 1;
        }

        self.thoughts.push(record);
    }
}
