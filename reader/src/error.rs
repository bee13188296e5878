//! Error types for reading a project file.

use std::fmt;

use store::StoreError;

/// Result type for reading operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// Errors that can occur while reading a project file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadError {
    /// The identity document names a format no pipeline handles.
    UnsupportedFormat { application: String, format: String },

    /// A required stream is not in the container.
    MissingStream { path: String },

    /// The container failed to produce a stream.
    Container { path: String, message: String },

    /// A stream could not be decoded.
    Store { stream: String, source: StoreError },

    /// A legacy block fits two record widths and neither checked out.
    AmbiguousLayout {
        directory: String,
        candidates: [usize; 2],
        chosen: usize,
    },
}

impl ReadError {
    pub(crate) fn store(stream: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            stream: stream.into(),
            source,
        }
    }

    /// Returns `true` if reading cannot continue past this error even in
    /// lenient mode.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::MissingStream { .. } | Self::Container { .. }
        )
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat {
                application,
                format,
            } => {
                write!(f, "unsupported format {format:?} written by {application:?}")
            }
            Self::MissingStream { path } => write!(f, "missing stream {path}"),
            Self::Container { path, message } => {
                write!(f, "container error reading {path}: {message}")
            }
            Self::Store { stream, source } => write!(f, "stream {stream}: {source}"),
            Self::AmbiguousLayout {
                directory,
                candidates,
                chosen,
            } => write!(
                f,
                "{directory}: records fit widths {} and {}, using {chosen}",
                candidates[0], candidates[1]
            ),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            _ => None,
        }
    }
}
