//! Heuristic enrichment stages of the ingestion pipeline.
//!
//! Each stage is a pure function of the incoming thought and the session
//! state prior to insertion: keyword extraction, contradiction
//! detection, prompt-alignment scoring, quality assessment, dependency
//! inference, and the phase/progress engine. Thresholds live here as
//! named constants, not configuration.

pub mod alignment;
pub mod contradiction;
pub mod graph;
pub mod keywords;
pub mod progress;
pub mod quality;

pub use alignment::{score_alignment, AlignmentAnnotation};
pub use contradiction::{detect_contradictions, ContradictionReport};
pub use graph::{infer_dependencies, DependencyGraph};
pub use keywords::extract_keywords;
pub use progress::{build_guidance, summarize, AlignmentTrend, ProgressSummary};
pub use quality::assess_quality;
