//! Unified error type for sitai.
//!
//! Callers need to tell three outcomes apart: the input was wrong
//! ([`Error::Validation`], [`Error::MissingId`]), the record does not exist
//! (usually `Ok(None)` / `Ok(false)`, or [`Error::NotFound`] when a caller
//! escalates it), and the store itself is broken ([`Error::Database`],
//! [`Error::Io`]). [`Error::is_fault`] answers the last question.

use std::fmt;

/// A numeric field of a point that was rejected at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A coordinate fell outside its inclusive range.
    #[error("{field} must be between {min} and {max} degrees (got {value})")]
    OutOfRange {
        /// `latitude` or `longitude`.
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinity where a measurement was expected.
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. } | Self::NotFinite { field, .. } => field,
        }
    }
}

/// Unified error type covering all failure modes in sitai.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record failed construction-time validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An update was attempted on a record that was never persisted.
    #[error("Missing identifier: point has no id to update")]
    MissingId,

    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "point").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The backing store could not be reached or returned garbage.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error means the store is unavailable or corrupt, as
    /// opposed to a problem with the caller's input.
    pub fn is_fault(&self) -> bool {
        matches!(self, Error::Database { .. } | Error::Io { .. })
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
