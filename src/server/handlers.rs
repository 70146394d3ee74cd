use serde_json::Value;
use tracing::info;

use super::SharedState;
use crate::error::{McpError, McpResult};

/// Route tool calls to appropriate handlers
pub async fn handle_tool_call(
    state: &SharedState,
    tool_name: &str,
    arguments: Option<Value>,
) -> McpResult<Value> {
    info!(tool = %tool_name, "Routing tool call");

    match tool_name {
        "track_thought" => handle_track_thought(state, arguments).await,
        _ => Err(McpError::UnknownTool {
            tool_name: tool_name.to_string(),
        }),
    }
}

/// Handle the track_thought tool call.
///
/// Missing arguments fall through to the validator so the error names
/// the first required field rather than reporting a generic parse
/// failure.
async fn handle_track_thought(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let arguments = arguments.unwrap_or(Value::Null);

    let result = state
        .tracker
        .process(arguments)
        .await
        .map_err(|e| McpError::ExecutionFailed {
            message: e.to_string(),
        })?;

    serde_json::to_value(result).map_err(McpError::Json)
}
