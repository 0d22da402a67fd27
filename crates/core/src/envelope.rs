//! Normalized response envelope used uniformly across the proxy surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single error detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Normalized API envelope
///
/// Exactly one of `data` / `errors` is populated: a succeeded envelope
/// carries `data` and no `errors`, a failed envelope carries a non-empty
/// `errors` list and no `data`. `succeeded` always agrees with
/// `status_code` being in the 2xx range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T = JsonValue> {
    pub succeeded: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
}

impl<T> ApiEnvelope<T> {
    /// Build a success envelope wrapping `data`
    pub fn success(data: T) -> Self {
        Self::success_with(data, 200, "OK")
    }

    /// Build a success envelope with an explicit status and message
    pub fn success_with(data: T, status: u16, message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            status_code: Some(status),
            timestamp: Utc::now(),
            data: Some(data),
            errors: None,
        }
    }

    /// Build a failure envelope with a single error detail
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            succeeded: false,
            status_code: Some(status),
            timestamp: Utc::now(),
            data: None,
            errors: Some(vec![ErrorDetail::new(message.clone())]),
            message,
        }
    }

    /// Build a failure envelope with explicit error details
    ///
    /// An empty `errors` list is seeded with the message so a failed
    /// envelope never ships without details.
    pub fn failure_with(
        status: u16,
        message: impl Into<String>,
        errors: Vec<ErrorDetail>,
    ) -> Self {
        let message = message.into();
        let errors = if errors.is_empty() {
            vec![ErrorDetail::new(message.clone())]
        } else {
            errors
        };
        Self {
            succeeded: false,
            status_code: Some(status),
            timestamp: Utc::now(),
            data: None,
            errors: Some(errors),
            message,
        }
    }

    /// HTTP status this envelope mirrors, defaulting by outcome
    pub fn status(&self) -> u16 {
        self.status_code
            .unwrap_or(if self.succeeded { 200 } else { 500 })
    }

    /// Reshape the payload, preserving outcome and metadata
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ApiEnvelope<U> {
        ApiEnvelope {
            succeeded: self.succeeded,
            message: self.message,
            status_code: self.status_code,
            timestamp: self.timestamp,
            data: self.data.map(f),
            errors: self.errors,
        }
    }
}
