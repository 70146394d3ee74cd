//! Integration tests for the thought-tracking pipeline.
//!
//! Drives the tracker end to end through raw JSON payloads, the way the
//! tool handler does.

use serde_json::{json, Value};

use mcp_reasoning_tracker::{Config, ThoughtTracker};

fn tracker() -> ThoughtTracker {
    ThoughtTracker::new(&Config::default())
}

fn submission(thought: &str, number: u32, total: u32) -> Value {
    json!({
        "thought": thought,
        "thoughtNumber": number,
        "totalThoughts": total,
        "nextThoughtNeeded": true
    })
}

#[tokio::test]
async fn test_first_thought_is_planning_at_twenty_percent() {
    let tracker = tracker();
    let result = tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();

    assert_eq!(result.thought_number, 1);
    assert_eq!(result.total_thoughts, 5);
    assert_eq!(result.progress, "20%");
    assert_eq!(result.phase.to_string(), "planning");
    assert!(result.next_thought_needed);
    assert!(result.branches.is_empty());
    // The first thought seeds the prompt metadata, so alignment exists
    // immediately and scores high against itself.
    assert!(result.prompt_alignment.unwrap() >= 7);
    assert!(result.drift_warning.is_none());
    assert_eq!(result.alignment_trend, "Insufficient data");
}

#[tokio::test]
async fn test_shallow_disconnected_thought_gets_feedback() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    tracker
        .process(submission(
            // Ten words, no dependencies.
            "Use the standard sort for the list of integer values",
            2,
            5,
        ))
        .await
        .unwrap();

    let record = tracker.thought_by_sequence(2).await.unwrap();
    assert_eq!(record.quality.depth, 3);
    assert_eq!(record.quality.coherence, 3);
    assert!(record.quality.feedback.iter().any(|f| f.contains("more depth")));
    assert!(record
        .quality
        .feedback
        .iter()
        .any(|f| f.contains("connects to previous")));
}

#[tokio::test]
async fn test_total_thoughts_auto_adjusts() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    let result = tracker
        .process(submission("One more pass over the remaining edge cases", 6, 5))
        .await
        .unwrap();

    assert_eq!(result.total_thoughts, 6);
    assert_eq!(result.progress, "100%");
}

#[tokio::test]
async fn test_total_is_monotonic_across_submissions() {
    let tracker = tracker();
    let mut previous_total = 0;
    for (number, total) in [(1u32, 5u32), (2, 5), (7, 5), (3, 4)] {
        let result = tracker
            .process(submission("Step through the plan once more", number, total))
            .await
            .unwrap();
        assert!(result.total_thoughts >= result.thought_number);
        assert!(result.total_thoughts >= previous_total);
        previous_total = result.total_thoughts;
    }
}

#[tokio::test]
async fn test_branch_appears_in_response() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    tracker
        .process(submission("Consider merge sort for stability", 2, 5))
        .await
        .unwrap();

    let result = tracker
        .process(json!({
            "thought": "Alternatively try a radix-based approach",
            "thoughtNumber": 3,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "branchFromThought": 2,
            "branchId": "alt"
        }))
        .await
        .unwrap();

    assert!(result.branches.contains(&"alt".to_string()));

    let record = tracker.thought_by_sequence(3).await.unwrap();
    assert_eq!(record.branch_id.as_deref(), Some("alt"));
    assert_eq!(record.branch_origin, Some(2));
}

#[tokio::test]
async fn test_missing_next_thought_needed_is_rejected() {
    let tracker = tracker();
    let err = tracker
        .process(json!({
            "thought": "Plan the approach",
            "thoughtNumber": 1,
            "totalThoughts": 5
        }))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("nextThoughtNeeded"));

    // Nothing partial was stored.
    assert!(tracker.thought_by_sequence(1).await.is_none());
}

#[tokio::test]
async fn test_progress_is_monotone_for_increasing_sequence() {
    let tracker = tracker();
    let mut previous = 0u32;
    for number in 1..=5 {
        let result = tracker
            .process(submission("Work the sorting plan step by step", number, 5))
            .await
            .unwrap();
        let percent: u32 = result.progress.trim_end_matches('%').parse().unwrap();
        assert!(percent >= previous, "{} < {}", percent, previous);
        previous = percent;
    }
    assert_eq!(previous, 100);
}

#[tokio::test]
async fn test_revision_shadows_original_without_mutation() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    tracker
        .process(submission("Quicksort will do fine here", 2, 5))
        .await
        .unwrap();

    tracker
        .process(json!({
            "thought": "Heapsort is the safer pick for worst-case bounds",
            "thoughtNumber": 2,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "isRevision": true,
            "revisesThought": 2
        }))
        .await
        .unwrap();

    let visible = tracker.thought_by_sequence(2).await.unwrap();
    assert!(visible.is_revision);
    assert_eq!(visible.revises_sequence_number, Some(2));
    assert!(visible.text.contains("Heapsort"));
}

#[tokio::test]
async fn test_contradiction_flagged_against_prior_thought() {
    let tracker = tracker();
    tracker
        .process(submission(
            "Track allocation failures across worker restarts",
            1,
            4,
        ))
        .await
        .unwrap();
    tracker
        .process(submission(
            "The allocator recovers cleanly after worker restarts",
            2,
            4,
        ))
        .await
        .unwrap();

    tracker
        .process(submission(
            "The allocator does not recover after worker restarts",
            3,
            4,
        ))
        .await
        .unwrap();

    let record = tracker.thought_by_sequence(3).await.unwrap();
    assert!(!record.contradictions.is_empty());
    assert!(record.contradictions.iter().any(|d| d.contains("#2")));
}

#[tokio::test]
async fn test_implicit_dependencies_inferred_not_declared() {
    let tracker = tracker();
    tracker
        .process(submission(
            "Measure allocator throughput under fragmentation pressure",
            1,
            4,
        ))
        .await
        .unwrap();
    tracker
        .process(submission(
            "Allocator throughput improves once fragmentation drops",
            2,
            4,
        ))
        .await
        .unwrap();

    let record = tracker.thought_by_sequence(2).await.unwrap();
    assert!(record.dependencies.is_empty());
    assert_eq!(record.inferred_dependencies, vec![1]);
    assert_eq!(record.all_dependencies(), vec![1]);

    let graph = tracker.dependency_graph().await;
    assert_eq!(graph.dependents_of(1), &[2]);
}

#[tokio::test]
async fn test_declared_dependency_raises_coherence_and_graph() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the benchmark matrix for the cache", 1, 3))
        .await
        .unwrap();
    tracker
        .process(json!({
            "thought": "Run the first benchmark column and collect latency numbers for the cache under a cold start, then repeat the same column with a warm cache so the matrix has both baseline rows filled in before any tuning work begins",
            "thoughtNumber": 2,
            "totalThoughts": 3,
            "nextThoughtNeeded": true,
            "dependencies": [1]
        }))
        .await
        .unwrap();

    let record = tracker.thought_by_sequence(2).await.unwrap();
    assert_eq!(record.quality.coherence, 6);
    assert!(record.quality.feedback.is_empty());

    let graph = tracker.dependency_graph().await;
    assert!(graph.dependents_of(1).contains(&2));
}

#[tokio::test]
async fn test_drift_warning_for_off_prompt_thought() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();

    let result = tracker
        .process(submission("Lunch options near the office are limited", 2, 5))
        .await
        .unwrap();

    assert!(result.prompt_alignment.unwrap() < 4);
    let warning = result.drift_warning.expect("drift warning expected");
    assert!(warning.contains("revisit the stated goals"));
    assert!(result
        .strategic_guidance
        .iter()
        .any(|g| g.contains("revisit its goals")));
}

#[tokio::test]
async fn test_guidance_capped_at_two_items() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();

    // Off-prompt planning thought late in the trace: phase suggestion,
    // drift warning, and strategy hint all compete for two slots.
    let result = tracker
        .process(json!({
            "thought": "Lunch options near the office are limited",
            "thoughtNumber": 4,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "phase": "planning"
        }))
        .await
        .unwrap();

    assert_eq!(result.strategic_guidance.len(), 2);
    assert!(result.strategic_guidance[0].contains("moving from planning"));
}

#[tokio::test]
async fn test_recommendations_always_present() {
    let tracker = tracker();
    let result = tracker
        .process(submission("Compare the two sorting options for stability", 1, 3))
        .await
        .unwrap();

    assert_eq!(result.recommendations.strategy, "comparative evaluation");
    assert!(!result.recommendations.reasoning_type.is_empty());
    assert!(!result.recommendations.focus_area.is_empty());
}

#[tokio::test]
async fn test_repeated_tool_use_steers_focus_area() {
    let tracker = tracker();
    for number in 1..=2 {
        tracker
            .process(json!({
                "thought": "Profile the slow path again with fresh samples",
                "thoughtNumber": number,
                "totalThoughts": 4,
                "nextThoughtNeeded": true,
                "toolsUsed": ["profiler"]
            }))
            .await
            .unwrap();
    }

    let result = tracker
        .process(submission("Summarize what the samples show so far", 3, 4))
        .await
        .unwrap();
    assert_eq!(result.recommendations.focus_area, "deeper use of profiler");
}

#[tokio::test]
async fn test_caller_phase_is_never_overwritten() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();

    let result = tracker
        .process(json!({
            "thought": "Re-check the pivot selection against duplicates",
            "thoughtNumber": 4,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "phase": "verification"
        }))
        .await
        .unwrap();

    assert_eq!(result.phase.to_string(), "verification");
    // Verification at 80% position gets no transition nudge.
    assert!(!result
        .strategic_guidance
        .iter()
        .any(|g| g.contains("moving from")));
}

#[tokio::test]
async fn test_complexity_defaults_to_session_estimate() {
    let tracker = tracker();
    let result = tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    // A short prompt classifies as a simple task.
    assert_eq!(result.complexity.to_string(), "simple");

    let result = tracker
        .process(json!({
            "thought": "The comparison matrix needs a complex pass",
            "thoughtNumber": 2,
            "totalThoughts": 5,
            "nextThoughtNeeded": true,
            "complexity": "complex"
        }))
        .await
        .unwrap();
    assert_eq!(result.complexity.to_string(), "complex");
}

#[tokio::test]
async fn test_alignment_trend_reported_after_enough_history() {
    let tracker = tracker();
    tracker
        .process(submission("Plan the approach to sort a list", 1, 6))
        .await
        .unwrap();
    let result = tracker
        .process(submission("Sort the list with the planned approach", 2, 6))
        .await
        .unwrap();

    assert_ne!(result.alignment_trend, "Insufficient data");
    assert!(["Improving", "Declining", "Stable"]
        .contains(&result.alignment_trend.as_str()));
}

#[tokio::test]
async fn test_wire_shape_uses_camel_case() {
    let tracker = tracker();
    let result = tracker
        .process(submission("Plan the approach to sort a list", 1, 5))
        .await
        .unwrap();
    let value = serde_json::to_value(&result).unwrap();

    for field in [
        "thoughtNumber",
        "totalThoughts",
        "nextThoughtNeeded",
        "branches",
        "phase",
        "complexity",
        "progress",
        "estimatedRemainingThoughts",
        "alignmentTrend",
        "strategicGuidance",
        "promptAlignment",
        "recommendations",
    ] {
        assert!(value.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(value["phase"], "planning");
}
