use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Session limits.
///
/// These bound the in-memory history so a runaway caller cannot grow the
/// process without limit; heuristic thresholds are compile-time constants
/// in the analysis modules, not configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_history: usize,
    pub max_thought_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let session = SessionConfig {
            max_history: env::var("SESSION_MAX_HISTORY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
            max_thought_chars: env::var("SESSION_MAX_THOUGHT_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20_000),
        };

        if session.max_history == 0 {
            return Err(AppError::Config {
                message: "SESSION_MAX_HISTORY must be at least 1".to_string(),
            });
        }

        Ok(Config { logging, session })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history: 1000,
            max_thought_chars: 20_000,
        }
    }
}
