//! Transport module
//!
//! The HTTP seam of the client: a per-call request descriptor, the raw response
//! handed back to callers, and the `Transport` trait with its reqwest-backed default.

use std::future::Future;

use http::{HeaderMap, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

pub mod http_transport;

pub use http_transport::HttpTransport;

/// One outgoing call. Built per request and consumed by the transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Relative to the transport's base URL, e.g. `v1/Surveys/1/Fieldwork/Status`.
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Whatever the service answered, success or not.
#[derive(Debug, Clone, Serialize)]
pub struct TransportResponse {
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,
    #[serde(with = "http_serde::header_map")]
    pub headers: HeaderMap,
    /// Parsed JSON; `Value::String` for non-JSON payloads, `Value::Null` for empty ones.
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: RequestDescriptor,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// Interpret a response payload: JSON when it parses, raw text otherwise.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_parsing_falls_back_to_text() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body(r#"{"Message":"x"}"#), json!({"Message": "x"}));
        assert_eq!(parse_body("Not Found"), json!("Not Found"));
    }

    #[test]
    fn response_serializes_status_as_number() {
        let response = TransportResponse::new(StatusCode::NOT_FOUND, json!({"Message": "gone"}));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], json!(404));
        assert_eq!(value["body"]["Message"], json!("gone"));
        assert!(!response.is_success());
    }
}
