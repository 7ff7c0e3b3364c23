//! Typed errors and backend error-envelope decoding.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("database configuration is not set; call ConfigHolder::set first")]
    NotConfigured,
    #[error("table '{name}' has id \"{id}\", which is not a valid UUID")]
    InvalidTableId { name: String, id: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("table {0} not found")]
    UnknownTable(String),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with status {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("decode: {0}")]
    Decode(String),
    #[error("empty response from {0}")]
    EmptyResponse(&'static str),
}

impl DatabaseError {
    /// Failures that a resubmitted read may not hit again. Precondition failures never qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DatabaseError::Transport(_)
                | DatabaseError::Status { .. }
                | DatabaseError::Decode(_)
                | DatabaseError::EmptyResponse(_)
        )
    }
}

/// Error envelope returned by the table service: `{"error": {"code", "message", "details"}}`.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl DatabaseError {
    /// Build a status error from a non-2xx response body. Uses the envelope message when the body
    /// carries one, the raw text otherwise.
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(envelope) => DatabaseError::Status {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => {
                let text = body.trim();
                DatabaseError::Status {
                    status,
                    code: None,
                    message: if text.is_empty() {
                        format!("HTTP {}", status)
                    } else {
                        text.to_string()
                    },
                }
            }
        }
    }
}
