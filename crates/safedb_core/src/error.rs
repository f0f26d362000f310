//! Error types for SafeDB core.

use safedb_codec::FieldType;
use std::io;
use thiserror::Error;
use uuid::Uuid;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in SafeDB core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// TLV codec error.
    #[error("codec error: {0}")]
    Codec(#[from] safedb_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// XML writer error.
    #[error("XML error: {message}")]
    Xml {
        /// Description of the failure.
        message: String,
    },

    /// Invalid record stream or record contents.
    #[error("invalid format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// A fixed-width field was given a value of the wrong size.
    #[error("field {field} expects {expected} bytes, got {actual}")]
    InvalidFieldWidth {
        /// The field being set.
        field: FieldType,
        /// Required width.
        expected: usize,
        /// Supplied width.
        actual: usize,
    },

    /// A field value could not be parsed or is out of range.
    #[error("invalid value for {field}: {message}")]
    InvalidFieldValue {
        /// The field being set.
        field: FieldType,
        /// Description of the problem.
        message: String,
    },

    /// Entry not found.
    #[error("entry not found: {uuid}")]
    EntryNotFound {
        /// The UUID that was not found.
        uuid: Uuid,
    },

    /// An entry with the same UUID already exists.
    #[error("duplicate entry: {uuid}")]
    DuplicateEntry {
        /// The conflicting UUID.
        uuid: Uuid,
    },

    /// Alias or shortcut relationship is not allowed.
    #[error("invalid dependency: {message}")]
    InvalidDependency {
        /// Description of the violation.
        message: String,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },

    /// A step of a composite command failed; earlier steps were rolled back.
    #[error("composite step {index} failed: {source}")]
    CompositeFailed {
        /// Zero-based index of the failing step.
        index: usize,
        /// The step's error.
        source: Box<CoreError>,
    },

    /// Encryption failed.
    #[error("encryption failed: {message}")]
    EncryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Decryption failed.
    #[error("decryption failed: {message}")]
    DecryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Invalid key size.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// Key derivation failed.
    #[error("key derivation failed: {message}")]
    KeyDerivationFailed {
        /// Description of the failure.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an invalid field value error.
    pub fn invalid_value(field: FieldType, message: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            message: message.into(),
        }
    }

    /// Creates an invalid dependency error.
    pub fn invalid_dependency(message: impl Into<String>) -> Self {
        Self::InvalidDependency {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates an entry not found error.
    pub fn entry_not_found(uuid: Uuid) -> Self {
        Self::EntryNotFound { uuid }
    }

    /// Creates an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Creates an encryption failed error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            message: message.into(),
        }
    }

    /// Creates a decryption failed error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }

    /// Creates a key derivation failed error.
    pub fn key_derivation_failed(message: impl Into<String>) -> Self {
        Self::KeyDerivationFailed {
            message: message.into(),
        }
    }
}

impl From<quick_xml::Error> for CoreError {
    fn from(err: quick_xml::Error) -> Self {
        Self::xml(err.to_string())
    }
}
