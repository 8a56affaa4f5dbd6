//! Error types for I/O operations.
//!
//! Decoding distinguishes "could not read the file" ([`IoError::Io`]) from
//! "read it, but it is not a format we handle" ([`IoError::UnsupportedFormat`])
//! and "right format, broken content" ([`IoError::DecodeError`]).

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported format (unknown magic, binary variants, unknown extension).
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Malformed header or truncated pixel stream.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Frame buffer could not be created for the decoded geometry.
    #[error(transparent)]
    Core(#[from] hwpipe_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

impl IoError {
    /// Returns `true` for filesystem-level failures.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Returns `true` when the input was recognised as something we do not decode.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}
