//! Error types for node metadata operations.

use thiserror::Error;

use crate::core::ValueKind;

/// Main error type for metadata operations.
///
/// Type mismatches, unset slots and missing keys are ordinary outcomes of a
/// lookup and come back as values of this type. Out-of-range slot indices are
/// caller bugs and panic instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested type differs from the stored one
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: ValueKind, actual: ValueKind },

    /// Slot exists but holds no value
    #[error("Metadata slot {index} is unset")]
    Unset { index: usize },

    /// No slot carries the key
    #[error("Metadata key not found: {0}")]
    KeyNotFound(String),

    /// Kind tag outside the known set
    #[error("Unknown metadata kind tag: {0}")]
    UnknownKind(u16),

    /// Text could not be parsed as a value of the given kind
    #[error("Invalid {kind} value: {text:?}")]
    InvalidValue { kind: ValueKind, text: String },

    /// Malformed encoded data
    #[error("Invalid metadata structure: {0}")]
    InvalidStructure(String),

    /// Encoded data ends early
    #[error("Unexpected end of data at position {0}")]
    UnexpectedEof(u64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// True if a value was found but has another kind.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// True if nothing was stored under the requested key or slot.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_) | Self::Unset { .. })
    }
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::TypeMismatch {
            expected: ValueKind::Int32,
            actual: ValueKind::Float32,
        };
        assert!(e.to_string().contains("int32"));
        assert!(e.to_string().contains("float32"));

        let e = Error::KeyNotFound("scale".into());
        assert!(e.to_string().contains("scale"));
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::TypeMismatch {
            expected: ValueKind::Bool,
            actual: ValueKind::Vector3,
        }
        .is_mismatch());
        assert!(Error::Unset { index: 2 }.is_not_found());
        assert!(Error::KeyNotFound("x".into()).is_not_found());
        assert!(!Error::UnknownKind(9).is_not_found());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
