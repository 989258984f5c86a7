//! Error types for docindex.
//!
//! This module defines all error types used throughout the docindex crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for docindex operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Index Structure Errors ===
    /// The top-level object has no `docs` key.
    #[error("search index has no \"docs\" key")]
    MissingDocs,

    /// The `docs` value is not an array.
    #[error("search index \"docs\" value is not an array")]
    DocsNotArray,

    /// The JavaScript wrapper around the index could not be recognised.
    #[error("unrecognized index wrapper: {0}")]
    InvalidWrapper(String),

    /// A record could not be read as a doc fragment.
    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord {
        /// Position of the record in the `docs` array.
        index: usize,
        /// Description of what is wrong with the record.
        reason: String,
    },

    /// A `category` value outside of `page` / `section`.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// Two records share the same location.
    #[error("duplicate location {location:?} at records {first} and {second}")]
    DuplicateLocation {
        /// The repeated location.
        location: String,
        /// Index of the first occurrence.
        first: usize,
        /// Index of the repeated occurrence.
        second: usize,
    },

    /// The index contains no records.
    #[error("search index contains no records")]
    EmptyIndex,

    /// Validation found error-severity issues.
    #[error("search index failed validation with {errors} error(s)")]
    ValidationFailed {
        /// Number of error-severity issues.
        errors: usize,
    },

    // === Lookup Errors ===
    /// No search index file was found at the given path.
    #[error("no search index found at {path}")]
    IndexNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// No index path was configured or given on the command line.
    #[error("no search index path given; pass --index or set index.path in the config")]
    NoIndexPath,

    /// No fragment has the requested location.
    #[error("no fragment with location {location:?}")]
    FragmentNotFound {
        /// The location that was looked up.
        location: String,
    },

    /// The query could not be compiled.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Description of the problem.
        message: String,
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
    /// Failed to read an index file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an index file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for docindex operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new malformed record error.
    #[must_use]
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Create a new invalid query error.
    #[must_use]
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Check if this error means something could not be found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IndexNotFound { .. } | Self::FragmentNotFound { .. } | Self::NoIndexPath
        )
    }

    /// Check if this error is about the content of a single record.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::UnknownCategory(_) | Self::DuplicateLocation { .. }
        )
    }
}
