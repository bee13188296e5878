//! Error types for store decoding.

use std::fmt;

use scalar::ScalarError;

/// Result type for store decoding.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while building a store from its streams.
///
/// Every variant is fatal for the stream being decoded and nothing else:
/// stores already built from other streams stay usable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// Header magic did not match.
    BadMagic { expected: u32, found: u32 },

    /// A read ran past the end of the stream.
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The stream structure contradicts itself.
    MalformedContainer(MalformedReason),

    /// A configured limit was exceeded.
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Why a stream was rejected as malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The directory declares more entries than its stream holds.
    DirectoryShort { declared: usize, available: usize },
    /// The header declares more payload than the data stream holds.
    DataShort { declared: usize, available: usize },
    /// A record width of zero was requested.
    ZeroWidth,
    /// The header declares a negative count or size.
    NegativeField { value: i32 },
}

/// Store limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    StreamBytes,
    Items,
    Properties,
}

impl From<ScalarError> for StoreError {
    fn from(err: ScalarError) -> Self {
        match err {
            ScalarError::Truncated {
                offset,
                needed,
                available,
            } => Self::Truncated {
                offset,
                needed,
                available,
            },
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic { expected, found } => {
                write!(
                    f,
                    "bad magic: expected 0x{expected:08X}, found 0x{found:08X}"
                )
            }
            Self::Truncated {
                offset,
                needed,
                available,
            } => {
                write!(
                    f,
                    "truncated stream: need {needed} bytes at offset {offset}, stream holds {available}"
                )
            }
            Self::MalformedContainer(reason) => write!(f, "malformed stream: {reason}"),
            Self::LimitExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryShort {
                declared,
                available,
            } => write!(
                f,
                "directory declares {declared} entries but holds {available}"
            ),
            Self::DataShort {
                declared,
                available,
            } => write!(
                f,
                "header declares {declared} data bytes but stream holds {available}"
            ),
            Self::ZeroWidth => write!(f, "record width is zero"),
            Self::NegativeField { value } => write!(f, "negative header field {value}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StreamBytes => "stream bytes",
            Self::Items => "item count",
            Self::Properties => "property count",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_bad_magic() {
        let err = StoreError::BadMagic {
            expected: 0xFADF_ADBA,
            found: 0xDEAD_BEEF,
        };
        let msg = err.to_string();
        assert!(msg.contains("FADFADBA"));
        assert!(msg.contains("DEADBEEF"));
    }

    #[test]
    fn display_malformed() {
        let err = StoreError::MalformedContainer(MalformedReason::DirectoryShort {
            declared: 10,
            available: 3,
        });
        let msg = err.to_string();
        assert!(msg.contains("malformed"));
        assert!(msg.contains("10 entries"));
    }

    #[test]
    fn display_limit() {
        let err = StoreError::LimitExceeded {
            kind: LimitKind::Items,
            limit: 4,
            actual: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("item count"));
        assert!(msg.contains("9 > 4"));
    }

    #[test]
    fn scalar_truncation_converts() {
        let err: StoreError = ScalarError::Truncated {
            offset: 2,
            needed: 4,
            available: 3,
        }
        .into();
        assert_eq!(
            err,
            StoreError::Truncated {
                offset: 2,
                needed: 4,
                available: 3
            }
        );
    }
}
