//! # Error Types
//!
//! Structured error types for footprint_core. Failures fall into two
//! families with different consequences for the caller:
//!
//! - [`ValidationError`] - the request was malformed. Nothing was computed and
//!   nothing was recorded; the caller can fix the input and resubmit.
//! - [`StorageError`] - the result recorder failed to append an event. The
//!   emissions figure that was being recorded is still valid and is returned.
//!
//! [`ConfigError`] covers loading configuration and factor tables at startup.
//! [`FootprintError`] wraps all three for APIs that can fail in more than one way.
//!
//! ## Example
//!
//! ```rust
//! use footprint_core::errors::{ValidationError, ValidationResult};
//!
//! fn parse_distance(raw: f64) -> ValidationResult<f64> {
//!     if raw < 0.0 {
//!         return Err(ValidationError::invalid_number(
//!             "air_distance",
//!             raw.to_string(),
//!             "Value cannot be negative",
//!         ));
//!     }
//!     Ok(raw)
//! }
//!
//! assert_eq!(parse_distance(-1.0).unwrap_err().error_code(), "INVALID_NUMBER");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for input validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type alias for recorder operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for engine operations
pub type FootprintResult<T> = Result<T, FootprintError>;

/// Malformed, missing, or out-of-domain input.
///
/// Always recoverable by resubmitting corrected input. Never recorded as a
/// computed event.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ValidationError {
    /// A field the calculator needs is absent or null
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An enumerated field holds a token outside its accepted set
    #[error("Invalid value for '{field}': '{value}' (accepted: {})", .accepted.join(", "))]
    InvalidToken {
        field: String,
        value: String,
        accepted: Vec<String>,
    },

    /// A numeric field did not parse or is negative
    #[error("Invalid number for '{field}': {value} - {reason}")]
    InvalidNumber {
        field: String,
        value: String,
        reason: String,
    },

    /// The requested category does not exist
    #[error("Unknown category: {value}")]
    UnknownCategory { value: String },
}

impl ValidationError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidToken error from any iterator of accepted tokens
    pub fn invalid_token<I, S>(field: impl Into<String>, value: impl Into<String>, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationError::InvalidToken {
            field: field.into(),
            value: value.into(),
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an InvalidNumber error
    pub fn invalid_number(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidNumber {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidToken { field, .. }
            | ValidationError::InvalidNumber { field, .. } => Some(field),
            ValidationError::UnknownCategory { .. } => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::InvalidToken { .. } => "INVALID_TOKEN",
            ValidationError::InvalidNumber { .. } => "INVALID_NUMBER",
            ValidationError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
        }
    }
}

/// The result recorder failed to append an event.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum StorageError {
    /// File I/O error on the event log
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Event could not be encoded
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The backing store refused the write
    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StorageError {
    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        StorageError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::FileError { .. } => "FILE_ERROR",
            StorageError::SerializationError { .. } => "SERIALIZATION_ERROR",
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }
}

/// Configuration or factor table files could not be loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    #[error("Parse error in {source_name}: {reason}")]
    ParseError { source_name: String, reason: String },

    /// A factor table violates a structural rule (negative factor, gap, duplicate)
    #[error("Invalid factor table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },
}

impl ConfigError {
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// Any failure the engine can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FootprintError {
    /// True for client errors (the HTTP 400 equivalent)
    pub fn is_validation(&self) -> bool {
        matches!(self, FootprintError::Validation(_))
    }

    /// Check if this is a recoverable error (caller can resubmit or retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FootprintError::Validation(_) | FootprintError::Storage(_))
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FootprintError::Validation(e) => e.error_code(),
            FootprintError::Storage(e) => e.error_code(),
            FootprintError::Config(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ValidationError::invalid_token("gas_meter_type", "cubic", ["imperial", "metric"]);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidToken\""));
        let roundtrip: ValidationError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_invalid_token_message_lists_accepted_values() {
        let error = ValidationError::invalid_token("gender", "other", ["female", "male"]);
        assert_eq!(
            error.to_string(),
            "Invalid value for 'gender': 'other' (accepted: female, male)"
        );
        assert_eq!(error.field(), Some("gender"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            StorageError::file_error("append", "/tmp/x", "denied").error_code(),
            "FILE_ERROR"
        );
        let wrapped: FootprintError = ValidationError::missing_field("gender").into();
        assert!(wrapped.is_validation());
        assert_eq!(wrapped.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_config_errors_are_not_recoverable() {
        let err: FootprintError = ConfigError::invalid_table("travel", "duplicate mode").into();
        assert!(!err.is_recoverable());
        assert!(!err.is_validation());
    }
}
