//! Error types for the codec crate.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while reading or writing field streams.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The underlying reader or writer failed.
    #[error("I/O failure: {message}")]
    Io {
        /// Description of the I/O error.
        message: String,
    },

    /// The stream ended in the middle of a field.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A field declared a length beyond the configured maximum.
    #[error("field 0x{type_byte:02x} declares {len} bytes, limit is {max}")]
    FieldTooLarge {
        /// Type byte of the offending field.
        type_byte: u8,
        /// Declared length.
        len: u64,
        /// Maximum accepted length.
        max: u64,
    },

    /// A fixed-width field carried the wrong number of bytes.
    #[error("field 0x{type_byte:02x} expects {expected} bytes, got {actual}")]
    InvalidWidth {
        /// Type byte of the offending field.
        type_byte: u8,
        /// Accepted width description.
        expected: &'static str,
        /// Actual width.
        actual: usize,
    },

    /// A timestamp does not fit the width of the target format.
    #[error("time {value} does not fit in {width} bytes")]
    TimeOutOfRange {
        /// The timestamp.
        value: i64,
        /// Encoded width in bytes.
        width: usize,
    },

    /// Text field bytes were not valid UTF-8.
    #[error("invalid UTF-8 in text field")]
    InvalidUtf8,

    /// Wide-character text was malformed.
    #[error("invalid UTF-16 sequence in text field")]
    InvalidUtf16,

    /// A record was not terminated by an END marker.
    #[error("record ended without END marker")]
    MissingEnd,

    /// The read loop exceeded its field budget.
    #[error("record exceeds {limit} fields, stream is likely corrupt")]
    TooManyFields {
        /// Maximum fields per record.
        limit: usize,
    },

    /// Generic structural corruption.
    #[error("corrupt stream: {message}")]
    Corrupt {
        /// Description of the corruption.
        message: String,
    },
}

impl CodecError {
    /// Create a corruption error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Create a width error for a fixed-width field.
    pub fn invalid_width(type_byte: u8, expected: &'static str, actual: usize) -> Self {
        Self::InvalidWidth {
            type_byte,
            expected,
            actual,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io {
                message: err.to_string(),
            }
        }
    }
}
