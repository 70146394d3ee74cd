//! # MCP Reasoning Tracker Server
//!
//! A Model Context Protocol (MCP) server that tracks a reasoning trace:
//! callers submit successive thought records and receive a compact
//! progress summary with advisory guidance.
//!
//! ## Features
//!
//! - **Thought history**: append-only store with revision pointers and
//!   named branches
//! - **Keyword extraction**: frequency-based salient-term heuristic
//! - **Contradiction flags**: polarity checks against prior thoughts
//! - **Prompt alignment**: lexical scoring against goals extracted from
//!   the first thought, with drift warnings
//! - **Quality assessment**: coherence / depth / relevance sub-scores
//!   and an insight value
//! - **Phase & progress engine**: phase suggestions, blended progress,
//!   remaining-thought estimates, alignment trends
//! - **Recommendations**: strategy, reasoning-type, and focus-area hints
//!
//! ## Architecture
//!
//! ```text
//! MCP Client → MCP Server (stdio JSON-RPC) → Tracking pipeline
//!                                                  ↓
//!                                        In-memory session state
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mcp_reasoning_tracker::{AppState, Config, McpServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let state = Arc::new(AppState::new(config));
//!     let server = McpServer::new(state);
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Heuristic enrichment stages of the ingestion pipeline.
pub mod analysis;
/// Configuration management for the MCP server.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Strategy recommendation heuristics.
pub mod intelligence;
/// MCP server implementation and request handling.
pub mod server;
/// Session state: thought store, branch index, prompt metadata.
pub mod session;
/// The thought-tracking pipeline.
pub mod tracker;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, McpServer, SharedState};
pub use tracker::ThoughtTracker;
