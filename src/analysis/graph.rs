//! Dependency and semantic graph.
//!
//! Builds the directed adjacency structure (dependency -> dependents)
//! over declared and inferred dependencies, and infers implicit links
//! from keyword overlap with prior thoughts. Visualization consumers
//! read the adjacency and the per-record dependency sets; the tracker
//! itself only needs the inference step.

use std::collections::BTreeMap;

use crate::session::{SessionState, ThoughtRecord};

/// Shared-keyword count at which a prior thought becomes an implicit
/// dependency.
const MIN_KEYWORD_OVERLAP: usize = 2;

/// Directed dependency adjacency keyed by sequence number.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// dependency sequence number -> dependent sequence numbers.
    dependents: BTreeMap<u32, Vec<u32>>,
}

impl DependencyGraph {
    /// Build the graph from every stored record's combined dependency
    /// set.
    pub fn from_session(session: &SessionState) -> Self {
        let mut dependents: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for record in session.thoughts() {
            for dep in record.all_dependencies() {
                let bucket = dependents.entry(dep).or_default();
                if !bucket.contains(&record.sequence_number) {
                    bucket.push(record.sequence_number);
                }
            }
        }
        Self { dependents }
    }

    /// Sequence numbers that depend on the given one.
    pub fn dependents_of(&self, sequence_number: u32) -> &[u32] {
        self.dependents
            .get(&sequence_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of nodes that appear as a dependency of something.
    pub fn node_count(&self) -> usize {
        self.dependents.len()
    }
}

/// Infer implicit dependencies for a new thought.
///
/// A prior thought sharing at least [`MIN_KEYWORD_OVERLAP`] keywords
/// whose sequence number is neither the new thought's own nor already
/// declared becomes an inferred dependency. The declared set is never
/// touched.
pub fn infer_dependencies(
    keywords: &[String],
    declared: &[u32],
    own_sequence: u32,
    history: &[ThoughtRecord],
) -> Vec<u32> {
    let mut inferred = Vec::new();
    for prior in history {
        let seq = prior.sequence_number;
        if seq == own_sequence || declared.contains(&seq) || inferred.contains(&seq) {
            continue;
        }
        let shared = keywords.iter().filter(|k| prior.keywords.contains(k)).count();
        if shared >= MIN_KEYWORD_OVERLAP {
            inferred.push(seq);
        }
    }
    inferred
}
