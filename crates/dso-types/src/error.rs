//! Error types for request parsing and validation.

use thiserror::Error;

/// Result type for request operations.
pub type RequestResult<T> = Result<T, RequestError>;

/// Stable validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// V001: Bitstream is empty
    EmptyBitstream,
    /// V002: Bitstream contains a character other than '0' or '1'
    InvalidBitCharacter,
    /// V003: Bitstream exceeds the configured bit limit
    BitstreamTooLong,
    /// V004: Numeric field could not be read as a number
    NonNumericValue,
    /// V005: Numeric field is zero or negative
    NonPositiveValue,
    /// V006: Numeric field is NaN or infinite
    NonFiniteValue,
    /// V007: Modulation type is not one of the supported schemes
    UnknownModulationType,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "V001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::EmptyBitstream => "V001",
            ErrorCode::InvalidBitCharacter => "V002",
            ErrorCode::BitstreamTooLong => "V003",
            ErrorCode::NonNumericValue => "V004",
            ErrorCode::NonPositiveValue => "V005",
            ErrorCode::NonFiniteValue => "V006",
            ErrorCode::UnknownModulationType => "V007",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and the offending request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Request field that failed validation (e.g., "bitstream").
    pub field: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    /// Creates a new validation error attached to a request field.
    pub fn with_field(code: ErrorCode, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "{}: {} (at {})", self.code, self.message, field)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Top-level error type for request handling.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The requested modulation scheme is not supported.
    #[error("unknown modulation type '{0}' (expected one of ASK, FSK, PSK, PAM, PWM, PPM)")]
    UnknownModulationType(String),
}

impl RequestError {
    /// Returns the stable error code string.
    pub fn code(&self) -> &'static str {
        match self {
            RequestError::Validation(e) => e.code.code(),
            RequestError::UnknownModulationType(_) => ErrorCode::UnknownModulationType.code(),
        }
    }

    /// Returns the request field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            RequestError::Validation(e) => e.field.as_deref(),
            RequestError::UnknownModulationType(_) => Some("type"),
        }
    }

    /// Returns the human-readable message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            RequestError::Validation(e) => e.message.clone(),
            other => other.to_string(),
        }
    }
}
