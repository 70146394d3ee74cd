//! Server module for MCP protocol handling.
//!
//! This module provides:
//! - MCP server implementation over stdio
//! - Tool call handlers and routing
//! - Shared application state management

mod handlers;
mod mcp;

pub use handlers::*;
pub use mcp::*;

use std::sync::Arc;

use crate::config::Config;
use crate::tracker::ThoughtTracker;

/// Application state shared across handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The thought-tracking pipeline and its session state.
    pub tracker: ThoughtTracker,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        let tracker = ThoughtTracker::new(&config);
        Self { config, tracker }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_app_state_new() {
        let state = AppState::new(Config::default());
        assert_eq!(state.config.session.max_history, 1000);
    }

    #[test]
    fn test_shared_state_type() {
        let state = AppState::new(Config::default());
        let shared: SharedState = Arc::new(state);

        let shared2 = Arc::clone(&shared);
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(shared2);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[tokio::test]
    async fn test_app_state_tracker_access() {
        let state = AppState::new(Config::default());
        let result = state
            .tracker
            .process(json!({
                "thought": "Exercise the tracker through shared state",
                "thoughtNumber": 1,
                "totalThoughts": 2,
                "nextThoughtNeeded": true
            }))
            .await
            .unwrap();
        assert_eq!(result.thought_number, 1);
    }
}
