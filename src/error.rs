//! Error types for bitknn.
//!
//! Errors follow a status-code pattern: every error carries an `ErrorCode`
//! and a human readable message. They are only produced while validating a
//! scan request, never from inside the distance loop.

use std::fmt;
use thiserror::Error;

/// Error codes for rejected scan requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument provided.
    InvalidArgument,
    /// Failed precondition, e.g. scanning into finalized heaps.
    FailedPrecondition,
    /// Value out of range.
    OutOfRange,
    /// Operation not implemented, e.g. a metric the kernel cannot compute.
    Unimplemented,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::FailedPrecondition => write!(f, "FAILED_PRECONDITION"),
            ErrorCode::OutOfRange => write!(f, "OUT_OF_RANGE"),
            ErrorCode::Unimplemented => write!(f, "UNIMPLEMENTED"),
            ErrorCode::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Main error type for bitknn operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct BitKnnError {
    code: ErrorCode,
    message: String,
}

impl BitKnnError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, msg)
    }

    /// Create a failed precondition error.
    pub fn failed_precondition(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FailedPrecondition, msg)
    }

    /// Create an out of range error.
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::OutOfRange, msg)
    }

    /// Create an unimplemented error.
    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unimplemented, msg)
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for BitKnnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result type alias for bitknn operations.
pub type Result<T> = std::result::Result<T, BitKnnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BitKnnError::invalid_argument("bad width");
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert_eq!(err.message(), "bad width");
    }

    #[test]
    fn test_error_display() {
        let err = BitKnnError::unimplemented("metric L2");
        let display = format!("{}", err);
        assert!(display.contains("UNIMPLEMENTED"));
        assert!(display.contains("metric L2"));
    }

    #[test]
    fn test_result_question_mark() {
        fn inner() -> Result<u32> {
            Err(BitKnnError::out_of_range("k"))
        }
        fn outer() -> Result<u32> {
            let v = inner()?;
            Ok(v + 1)
        }
        assert_eq!(outer().unwrap_err().code(), ErrorCode::OutOfRange);
    }
}
