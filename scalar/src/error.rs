//! Error types for scalar decoding.

use std::fmt;

/// Result type for scalar decoding.
pub type ScalarResult<T> = Result<T, ScalarError>;

/// Errors that can occur while decoding a scalar from a byte slice.
///
/// Absent values (date sentinels, empty strings) are never errors; only a
/// read that would leave the supplied slice is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    /// Attempted to read past the end of the slice.
    Truncated {
        /// Byte offset the read started at.
        offset: usize,
        /// Number of bytes requested.
        needed: usize,
        /// Number of bytes in the slice.
        available: usize,
    },
}

impl ScalarError {
    pub(crate) const fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }
}

impl fmt::Display for ScalarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated read: {needed} bytes at offset {offset} but slice holds {available}"
                )
            }
        }
    }
}

impl std::error::Error for ScalarError {}
