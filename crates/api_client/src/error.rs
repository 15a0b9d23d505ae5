//! API client error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the server.
///
/// Authentication endpoints answer with `{"detail": ...}`; the analysis and
/// project endpoints with `{"error": {"message": ..., "details": ...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Nested error object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorPayload {
    /// Human readable message carried by the payload, if any.
    ///
    /// `detail` wins over `error.message`. A validation `detail` (a list of
    /// objects with `msg`) yields its first message.
    pub fn message(&self) -> Option<String> {
        let detail = self.detail.as_ref().and_then(|detail| match detail {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .map(str::to_string),
            _ => None,
        });

        detail.or_else(|| self.error.as_ref().and_then(|e| e.message.clone()))
    }
}

/// API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned status {status}")]
    Status {
        status: u16,
        payload: Option<ErrorPayload>,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Creates a status error carrying a `{"detail": ...}` payload.
    pub fn with_detail(status: u16, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            payload: Some(ErrorPayload {
                detail: Some(serde_json::Value::String(detail.into())),
                error: None,
            }),
        }
    }

    /// Creates a status error carrying an `{"error": {"message": ...}}` payload.
    pub fn with_message(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            payload: Some(ErrorPayload {
                detail: None,
                error: Some(ErrorBody {
                    message: Some(message.into()),
                    details: None,
                }),
            }),
        }
    }

    /// Message the server attached to this failure, if any.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Status {
                payload: Some(payload),
                ..
            } => payload.message(),
            _ => None,
        }
    }

    /// HTTP status code, for failures that got a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;
