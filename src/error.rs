//! Status codes and the crate error type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status codes shared with readers, writers and other stream producers.
///
/// The numeric values are stable and match the order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Status {
    /// No error
    Success = 0,
    /// Non-fatal failure
    Failure = 1,
    /// Unknown error
    ErrUnknown = 2,
    /// Invalid syntax
    ErrBadSyntax = 3,
    /// Invalid argument
    ErrBadArg = 4,
    /// Use of invalidated iterator
    ErrBadIter = 5,
    /// Not found
    ErrNotFound = 6,
    /// Encountered clashing blank node IDs
    ErrIdClash = 7,
    /// Invalid CURIE (e.g. prefix does not exist)
    ErrBadCurie = 8,
    /// Unexpected internal error
    ErrInternal = 9,
    /// Stack overflow
    ErrOverflow = 10,
    /// Invalid data
    ErrInvalid = 11,
    /// Unexpected end of input
    ErrNoData = 12,
    /// Error writing to file/stream
    ErrBadWrite = 13,
}

impl Status {
    /// Look up a status by its numeric code
    pub fn from_code(code: i32) -> Option<Self> {
        let status = match code {
            0 => Self::Success,
            1 => Self::Failure,
            2 => Self::ErrUnknown,
            3 => Self::ErrBadSyntax,
            4 => Self::ErrBadArg,
            5 => Self::ErrBadIter,
            6 => Self::ErrNotFound,
            7 => Self::ErrIdClash,
            8 => Self::ErrBadCurie,
            9 => Self::ErrInternal,
            10 => Self::ErrOverflow,
            11 => Self::ErrInvalid,
            12 => Self::ErrNoData,
            13 => Self::ErrBadWrite,
            _ => return None,
        };
        Some(status)
    }

    /// Numeric code of this status
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Human-readable description
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Non-fatal failure",
            Self::ErrUnknown => "Unknown error",
            Self::ErrBadSyntax => "Invalid syntax",
            Self::ErrBadArg => "Invalid argument",
            Self::ErrBadIter => "Invalid iterator",
            Self::ErrNotFound => "Not found",
            Self::ErrIdClash => "Blank node ID clash",
            Self::ErrBadCurie => "Invalid CURIE",
            Self::ErrInternal => "Internal error",
            Self::ErrOverflow => "Stack overflow",
            Self::ErrInvalid => "Invalid data",
            Self::ErrNoData => "Unexpected end of input",
            Self::ErrBadWrite => "Error writing to file",
        }
    }

    /// Describe a raw status code, tolerating codes outside the known range
    pub fn describe(code: i32) -> &'static str {
        Self::from_code(code).map(Self::message).unwrap_or("Unknown error")
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors that can occur in trellis operations
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("invalid argument: {0}")]
    BadArg(String),

    #[error("use of invalidated iterator")]
    BadIter,

    #[error("clashing blank node id: {0}")]
    IdClash(String),

    #[error("invalid CURIE: {0}")]
    BadCurie(String),

    #[error("invalid data: {0}")]
    Invalid(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// A status passed through unchanged from a sink or stream producer
    #[error("{0}")]
    Status(Status),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrellisError {
    pub(crate) fn bad_arg(msg: impl Into<String>) -> Self {
        Self::BadArg(msg.into())
    }

    /// The status code this error reports across the stream boundary
    pub fn status(&self) -> Status {
        match self {
            Self::BadArg(_) | Self::Config(_) => Status::ErrBadArg,
            Self::BadIter => Status::ErrBadIter,
            Self::IdClash(_) => Status::ErrIdClash,
            Self::BadCurie(_) => Status::ErrBadCurie,
            Self::Invalid(_) => Status::ErrInvalid,
            Self::Internal(_) => Status::ErrInternal,
            Self::Status(status) => *status,
            Self::Io(_) => Status::ErrBadWrite,
        }
    }
}

impl From<Status> for TrellisError {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

/// Result type for trellis operations
pub type TrellisResult<T> = Result<T, TrellisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message() {
        assert_eq!(Status::Success.message(), "Success");
        assert_eq!(Status::describe(0), "Success");
    }

    #[test]
    fn test_every_error_has_a_distinct_non_success_message() {
        for code in Status::Failure.code()..=Status::ErrBadWrite.code() {
            let status = Status::from_code(code).unwrap();
            assert_eq!(status.code(), code);
            assert_ne!(status.message(), "Success");
        }
    }

    #[test]
    fn test_unknown_code_describes_as_unknown() {
        assert_eq!(Status::describe(-1), "Unknown error");
        assert_eq!(Status::describe(14), "Unknown error");
        assert!(Status::from_code(99).is_none());
    }

    #[test]
    fn test_status_without_variant_passes_through() {
        let err = TrellisError::from(Status::ErrNotFound);
        assert!(matches!(err, TrellisError::Status(Status::ErrNotFound)));
        assert_eq!(err.status(), Status::ErrNotFound);
        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_error_maps_to_status() {
        assert_eq!(TrellisError::BadIter.status(), Status::ErrBadIter);
        assert_eq!(TrellisError::bad_arg("x").status(), Status::ErrBadArg);
        assert_eq!(
            TrellisError::from(Status::ErrNoData).status(),
            Status::ErrNoData
        );
    }
}
