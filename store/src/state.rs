//! Per-stream decoding state.

use std::fmt;

/// Lifecycle of one stream through decoding.
///
/// `Unopened -> HeaderValidated -> ItemsDecoded -> {Complete | PartiallyDecoded}`.
/// `PartiallyDecoded` is terminal but usable: everything decoded before the
/// failure point stays queryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamState {
    #[default]
    Unopened,
    HeaderValidated,
    ItemsDecoded,
    Complete,
    PartiallyDecoded,
}

impl StreamState {
    /// Returns `true` for the two terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::PartiallyDecoded)
    }

    /// Returns `true` if decoded items may be queried.
    #[must_use]
    pub const fn is_usable(self) -> bool {
        matches!(
            self,
            Self::ItemsDecoded | Self::Complete | Self::PartiallyDecoded
        )
    }

    /// Returns the state reached after a successful step, or `self` if the
    /// transition is not allowed.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Unopened => Self::HeaderValidated,
            Self::HeaderValidated => Self::ItemsDecoded,
            Self::ItemsDecoded => Self::Complete,
            other => other,
        }
    }

    /// Finishes decoding, choosing the terminal state from `complete`.
    #[must_use]
    pub const fn finish(self, complete: bool) -> Self {
        match self {
            Self::Complete | Self::PartiallyDecoded => self,
            _ if complete => Self::Complete,
            _ => Self::PartiallyDecoded,
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unopened => "unopened",
            Self::HeaderValidated => "header validated",
            Self::ItemsDecoded => "items decoded",
            Self::Complete => "complete",
            Self::PartiallyDecoded => "partially decoded",
        };
        write!(f, "{name}")
    }
}
