//! Error types for acadlink
//!
//! Only structural violations surface as errors; everything recoverable is
//! reported through [`crate::notification`] and processing continues.

use std::io;
use thiserror::Error;

use crate::types::{DocumentId, Handle};

/// Main error type for acadlink operations
#[derive(Debug, Error)]
pub enum CadError {
    /// IO error raised by a record sink
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The object is already registered in a different document
    #[error("Object {handle} already belongs to {owner}")]
    ForeignObject { handle: Handle, owner: DocumentId },

    /// The handle seed passed the limit of the target format even after renumbering
    #[error("Handle seed {seed:#X} exceeds the limit {limit:#X}")]
    HandleLimitExceeded { seed: u64, limit: u64 },

    /// Object not found in document
    #[error("Object not found: handle {0}")]
    ObjectNotFound(Handle),

    /// An object of a different kind was found under the handle
    #[error("Object {handle} is a {found}, expected {expected}")]
    TypeMismatch {
        handle: Handle,
        expected: &'static str,
        found: &'static str,
    },

    /// A named collection already holds an entry with this name
    #[error("Entry '{name}' already exists in {collection}")]
    DuplicateName {
        collection: &'static str,
        name: String,
    },

    /// An object kind that has no record decomposition
    #[error("No record decomposition for object kind {0}")]
    UnsupportedKind(String),

    /// Any other violation of the document structure
    #[error("Structural violation: {0}")]
    StructuralViolation(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for acadlink operations
pub type Result<T> = std::result::Result<T, CadError>;

impl From<String> for CadError {
    fn from(s: String) -> Self {
        CadError::Custom(s)
    }
}

impl From<&str> for CadError {
    fn from(s: &str) -> Self {
        CadError::Custom(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CadError::DuplicateName {
            collection: "LAYER",
            name: "Walls".to_string(),
        };
        assert_eq!(err.to_string(), "Entry 'Walls' already exists in LAYER");
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = CadError::TypeMismatch {
            handle: Handle::new(0x1F),
            expected: "LAYER",
            found: "LINE",
        };
        assert_eq!(err.to_string(), "Object 0x1F is a LINE, expected LAYER");
    }

    #[test]
    fn test_limit_display() {
        let err = CadError::HandleLimitExceeded {
            seed: 0x100,
            limit: 0xFF,
        };
        assert!(err.to_string().contains("0x100"));
        assert!(err.to_string().contains("0xFF"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "sink closed");
        let err: CadError = io_err.into();
        assert!(matches!(err, CadError::Io(_)));
    }
}
