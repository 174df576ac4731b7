//! Error types for recordbook.
//!
//! Validation failures carry a [`ValidationReason`] so callers can pick
//! user-facing text by matching on the reason instead of the message.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a record was rejected before being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// Phone number does not match `N-N-NNNN` (1-3, 1-3, 4-10 digits).
    InvalidPhoneFormat,
    /// Another client already uses this phone number.
    DuplicatePhone,
    /// Flight date/time is not `YYYY-MM-DD HH:MM` or is not a real date.
    InvalidDateTime,
    /// Another airline already uses this company name (case-insensitive).
    DuplicateAirlineName,
    /// Another flight has the same client, airline and date/time.
    DuplicateFlight,
    /// A record with this identifier is already stored.
    DuplicateId,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidPhoneFormat => "invalid phone format",
            Self::DuplicatePhone => "duplicate phone",
            Self::InvalidDateTime => "invalid date/time",
            Self::DuplicateAirlineName => "duplicate airline name",
            Self::DuplicateFlight => "duplicate flight",
            Self::DuplicateId => "duplicate id",
        };
        f.write_str(name)
    }
}

/// The main error type for recordbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A record failed an entity-specific precondition. Nothing was written.
    #[error("{detail}")]
    Validation {
        /// Machine-readable reason.
        reason: ValidationReason,
        /// Human-readable message suitable for the end user.
        detail: String,
    },

    // === Input Errors ===
    /// Raw input could not be converted, e.g. a non-numeric identifier.
    #[error("{field} {message}")]
    MalformedInput {
        /// The field being converted.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// Raw input named a field the record type does not have.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// The offending key.
        field: String,
    },

    /// Raw input for a new record lacked a required field.
    #[error("missing required field '{field}'")]
    MissingField {
        /// The absent key.
        field: &'static str,
    },

    // === Storage Errors ===
    /// A store file exists but could not be parsed (strict load policy only).
    #[error("store file {path} is corrupt: {source}")]
    CorruptStore {
        /// Path to the store file.
        path: PathBuf,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Writing or replacing a store file failed.
    #[error("failed to persist {path}: {source}")]
    Persist {
        /// Path to the store file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The largest stored identifier leaves no room for a new one.
    #[error("no free {kind} identifier after {max}")]
    IdExhausted {
        /// Record kind of the store.
        kind: &'static str,
        /// The largest identifier in the store.
        max: u64,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for recordbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error.
    #[must_use]
    pub fn validation(reason: ValidationReason, detail: impl Into<String>) -> Self {
        Self::Validation {
            reason,
            detail: detail.into(),
        }
    }

    /// Create a malformed input error for `field`.
    #[must_use]
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// The validation reason, if this is a validation failure.
    #[must_use]
    pub fn validation_reason(&self) -> Option<ValidationReason> {
        match self {
            Self::Validation { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Check if this error came from converting raw user input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput { .. } | Self::UnknownField { .. } | Self::MissingField { .. }
        )
    }
}
