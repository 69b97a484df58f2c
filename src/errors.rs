//! Unified error type for the server handlers, the HTTP surface and the client layer.

use sea_orm::DbErr;
use thiserror::Error;

/// Every failure the crate can produce.
///
/// The variants map one-to-one onto the HTTP error taxonomy; see
/// [`crate::api::response`] for the status codes.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Required fields are missing or unusable.
    #[error("{message}")]
    Validation {
        /// Message shown to the caller
        message: String,
    },

    /// No row matches the requested primary key.
    #[error("{resource} not found")]
    NotFound {
        /// Display name of the resource, e.g. `"Product"`
        resource: &'static str,
    },

    /// A delete was refused because other rows still reference the target.
    #[error("{message}")]
    Conflict {
        /// Message shown to the caller
        message: String,
        /// Number of referencing rows at the time of the refusal
        references: u64,
    },

    /// The HTTP verb is not supported on a known endpoint.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The `endpoint` query parameter names no known resource.
    #[error("Endpoint not found")]
    UnknownEndpoint,

    /// Storage failure (connection loss, query error, constraint violation).
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// I/O failure, e.g. while binding the listener.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure talking to the API from the client layer.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code returned by the server
        status: u16,
        /// Server-provided `error`/`message` text, or a fallback
        message: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true when this is a storage error caused by a foreign-key constraint.
    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Database(e) => is_foreign_key_violation(e),
            _ => false,
        }
    }
}

/// Classifies a raw storage error as a foreign-key violation.
///
/// SeaORM recognises the driver error codes for SQLite and MySQL; the message
/// check catches drivers that report the violation without a usable code.
#[must_use]
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    if matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_))
    ) {
        return true;
    }
    let msg = err.to_string().to_lowercase();
    msg.contains("foreign key constraint")
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
