//! Error taxonomy of the client.
//!
//! Every variant is `Clone` so a single in-flight sign-in can hand the same
//! outcome to every caller awaiting it. Foreign errors are kept behind `Arc`.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NfieldError {
    /// Integration bug: unknown schema, broken schema or settings definition,
    /// unresolvable path template. Never recoverable at runtime.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required request parameter is absent or unusable.
    #[error("missing required parameter '{name}' (got {value})")]
    MissingParameter { name: String, value: Value },

    /// Sign-in was rejected by the service. The pending operation was not sent.
    #[error("authentication failed: {status}: {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// Network-level failure, passed through untouched.
    #[error("transport error: {0}")]
    Transport(Arc<reqwest::Error>),

    #[error("serialization error: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// The service handed out a token that cannot travel in an HTTP header.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl NfieldError {
    pub fn missing(name: impl Into<String>, value: Value) -> Self {
        NfieldError::MissingParameter { name: name.into(), value }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        NfieldError::Configuration(msg.into())
    }

    /// Short label used for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            NfieldError::Configuration(_) => "configuration",
            NfieldError::MissingParameter { .. } => "missing_parameter",
            NfieldError::AuthenticationFailed { .. } => "authentication_failed",
            NfieldError::Transport(_) => "transport",
            NfieldError::Serialization(_) => "serialization",
            NfieldError::InvalidToken(_) => "invalid_token",
        }
    }
}

impl From<reqwest::Error> for NfieldError {
    fn from(err: reqwest::Error) -> Self {
        NfieldError::Transport(Arc::new(err))
    }
}

impl From<serde_json::Error> for NfieldError {
    fn from(err: serde_json::Error) -> Self {
        NfieldError::Serialization(Arc::new(err))
    }
}

pub type Result<T, E = NfieldError> = std::result::Result<T, E>;
