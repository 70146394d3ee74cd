use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {0}")]
    Tool(#[from] ToolError),

    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// MCP protocol errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid parameters for {tool_name}: {message}")]
    InvalidParameters { tool_name: String, message: String },

    #[error("Tool execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tool-specific errors with structured details.
///
/// `Validation` is the recoverable input-rejection class: the offending
/// submission is reported back to the caller and nothing is stored.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Session error: {0}")]
    Session(String),
}

impl ToolError {
    /// Validation error for a missing or mistyped field.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        McpError::ExecutionFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;
