//! Shapes of log batches posted by the frontend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// One log line from a page or widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    /// Page path or widget name that emitted the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// Batch of client logs
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientLogBatch {
    pub logs: Vec<ClientLogEntry>,
}

/// Log response
#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
    pub received: usize,
    pub processed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_parses_lowercase_level() {
        let entry: ClientLogEntry = serde_json::from_value(serde_json::json!({
            "timestamp": "2024-11-02T09:12:00Z",
            "level": "warn",
            "message": "calculator slider out of range",
            "source": "pricing-calculator"
        }))
        .unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.level.to_string(), "warn");
        assert!(entry.context.is_none());
    }

    #[test]
    fn test_entry_rejects_unknown_level() {
        let result = serde_json::from_value::<ClientLogEntry>(serde_json::json!({
            "timestamp": "t",
            "level": "fatal",
            "message": "m"
        }));
        assert!(result.is_err());
    }
}
