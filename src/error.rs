//! Error types for the PDF writer.
//!
//! This module defines all error types that can occur while building a
//! document object graph and serializing it.

use crate::object::ObjectRef;

/// Result type alias for PDF writer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The object table is internally inconsistent. Always fatal.
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    /// A dictionary value cannot be expressed in PDF syntax.
    #[error("Unsupported value for /{key}: {reason}")]
    UnsupportedValue {
        /// Dictionary key holding the value
        key: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Invalid writer or page configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error from the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Internal-consistency failures detected before any output is committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// Two objects share an object number
    #[error("Duplicate object number found: {0}")]
    DuplicateObjectNumber(u32),

    /// Object numbers must start at 1
    #[error("Invalid object number: {0}")]
    InvalidObjectNumber(u32),

    /// The object numbers do not form the contiguous range 1..=N
    #[error("Gap in object numbers detected. Missing numbers: {missing:?}")]
    ObjectNumberGap {
        /// Numbers absent from the emission list
        missing: Vec<u32>,
    },

    /// A reachable object is missing from the emission list
    #[error("Object {0} is reachable from the catalog but not listed for emission")]
    UnlistedObject(ObjectRef),

    /// A reference points at an object number that was never allocated
    #[error("Reference to unknown object {0}")]
    DanglingReference(ObjectRef),
}

impl Error {
    /// Build an [`Error::UnsupportedValue`].
    pub fn unsupported(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::UnsupportedValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
