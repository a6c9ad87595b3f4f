// Response formatter
// Serializes execution outcomes into GraphQL JSON response bodies

//! # Response Formatter
//!
//! - `Success`: the executor's result, serialized compactly. It already has the
//!   `{data, errors, extensions}` shape of the GraphQL response format.
//! - `Failure`: `{"data": {}, "errors": [{message, locations, errorType}]}`,
//!   pretty-printed with two-space indentation.
//!
//! Both are served with HTTP 200 and `Content-Type: application/json`.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{ExecutionFault, ExecutionOutcome};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A serialized response body together with its content type
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedResponse {
    pub content_type: &'static str,
    pub body: Bytes,
}

/// Degraded envelope written when no execution result exists
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Always an empty object, never `null`
    pub data: Map<String, Value>,
    pub errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub message: String,
    /// Always `null`: synthetic errors have no source location
    pub locations: Option<Vec<Value>>,
    #[serde(rename = "errorType")]
    pub error_type: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            data: Map::new(),
            errors: vec![ErrorEntry {
                message: message.into(),
                locations: None,
                error_type: error_type.into(),
            }],
        }
    }

    /// Two-space indented JSON
    pub fn to_pretty_bytes(&self) -> Bytes {
        // Only strings, nulls and maps of strings: serialization cannot fail
        Bytes::from(serde_json::to_vec_pretty(self).unwrap_or_default())
    }
}

impl From<&ExecutionFault> for ErrorEnvelope {
    fn from(fault: &ExecutionFault) -> Self {
        ErrorEnvelope::new(fault.to_string(), fault.error_type())
    }
}

/// Serialize an execution outcome into a response body
pub fn format(outcome: &ExecutionOutcome) -> FormattedResponse {
    let body = match outcome {
        ExecutionOutcome::Success(response) => match serde_json::to_vec(response) {
            Ok(body) => Bytes::from(body),
            Err(e) => ErrorEnvelope::new(
                format!("Result could not be serialized: {}", e),
                "SerializationException",
            )
            .to_pretty_bytes(),
        },
        ExecutionOutcome::Failure(fault) => ErrorEnvelope::from(fault).to_pretty_bytes(),
    };

    FormattedResponse {
        content_type: JSON_CONTENT_TYPE,
        body,
    }
}
