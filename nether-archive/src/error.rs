//! Archive error types

use std::io;

use crate::category::Role;

/// Result alias used by every archive operation
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors raised while writing or reading an archive
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The stream was written with a different protocol version
    #[error("incompatible archive version: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// A pointer target could not be allocated before being populated
    #[error("failed to allocate {type_name}")]
    Allocation { type_name: &'static str },

    /// The stream ended before the requested value was complete
    #[error("stream exhausted")]
    StreamExhausted,

    /// The text stream does not match the token the reader expected
    #[error("format desync at line {line}: expected {expected}, found {found:?}")]
    FormatDesync {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// A fixed-size destination does not match the stored element count
    #[error("collection length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: u32, found: u32 },

    /// A stored token or byte pattern is not a valid value of the target type
    #[error("invalid {type_name} value: {token:?}")]
    InvalidValue {
        type_name: &'static str,
        token: String,
    },

    /// A character payload is not valid UTF-8 or UTF-16
    #[error("invalid character data in string payload")]
    InvalidText,

    /// More elements than a collection envelope can count
    #[error("collection of {0} elements exceeds the u32 envelope")]
    CollectionTooLarge(usize),

    /// An operation of the opposite role was invoked on this archive
    #[error("operation not available on a {role} archive")]
    RoleMismatch { role: Role },

    /// Configuration could not be parsed
    #[error("invalid archive configuration: {0}")]
    Config(String),

    /// Underlying stream failure
    #[error("archive I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for ArchiveError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ArchiveError::StreamExhausted
        } else {
            ArchiveError::Io(e)
        }
    }
}

impl ArchiveError {
    /// Whether this error aborts a load because the stream is unusable as a whole
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ArchiveError::VersionMismatch { .. } | ArchiveError::Allocation { .. }
        )
    }
}
