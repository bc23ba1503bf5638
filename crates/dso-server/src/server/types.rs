//! Error payloads returned by the HTTP server.

use serde::{Deserialize, Serialize};

use dso_types::RequestError;

/// Error codes for transport-level failures.
///
/// Validation failures pass through the request model's own codes (V001..).
pub mod error_codes {
    /// Body is not valid JSON or does not match the request shape
    pub const INVALID_JSON: &str = "HTTP_001";
    /// No route for the path
    pub const NOT_FOUND: &str = "HTTP_002";
    /// Route exists but not for this method
    pub const METHOD_NOT_ALLOWED: &str = "HTTP_003";
    /// Request could not be read as HTTP
    pub const MALFORMED_REQUEST: &str = "HTTP_004";
    /// Response serialization failed
    pub const SERIALIZE: &str = "HTTP_005";
    /// Synthesis failed
    pub const SYNTHESIS: &str = "HTTP_006";
    /// Worker task failed
    pub const INTERNAL: &str = "HTTP_007";
}

/// A structured error entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "V002", "HTTP_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request field the error refers to (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
        }
    }

    /// Sets the request field for this error.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl From<&RequestError> for JsonError {
    fn from(err: &RequestError) -> Self {
        let json = JsonError::new(err.code(), err.message());
        match err.field() {
            Some(field) => json.with_field(field),
            None => json,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Whether the request succeeded (always false for errors).
    pub success: bool,
    /// Error details.
    pub errors: Vec<JsonError>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self::from_error(JsonError::new(code, message))
    }

    pub fn from_error(error: JsonError) -> Self {
        Self {
            success: false,
            errors: vec![error],
        }
    }

    /// Serializes to JSON, falling back to a fixed body if that fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"errors":[{"code":"HTTP_005","message":"Failed to serialize error response"}]}"#.to_string()
        })
    }
}
