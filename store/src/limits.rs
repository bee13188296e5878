//! Configurable limits for bounded store decoding.

use crate::error::{LimitKind, StoreError, StoreResult};

/// Limits enforced while building stores.
///
/// Stream lengths are known up front, so these bound memory before any
/// item is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLimits {
    /// Maximum length of a single stream in bytes.
    pub max_stream_bytes: usize,

    /// Maximum number of items (directory entries or records) per stream.
    pub max_items: usize,

    /// Maximum number of property bag entries.
    pub max_properties: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            // Real project files stay well under this per stream
            max_stream_bytes: 256 * 1024 * 1024,
            max_items: 1_000_000,
            max_properties: 16 * 1024,
        }
    }
}

impl StoreLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_stream_bytes: 64 * 1024,
            max_items: 1024,
            max_properties: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_stream_bytes: usize::MAX,
            max_items: usize::MAX,
            max_properties: usize::MAX,
        }
    }

    pub(crate) const fn check_stream(&self, len: usize) -> StoreResult<()> {
        check(LimitKind::StreamBytes, self.max_stream_bytes, len)
    }

    pub(crate) const fn check_items(&self, count: usize) -> StoreResult<()> {
        check(LimitKind::Items, self.max_items, count)
    }
}

const fn check(kind: LimitKind, limit: usize, actual: usize) -> StoreResult<()> {
    if actual > limit {
        return Err(StoreError::LimitExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_limits_smaller() {
        let test_limits = StoreLimits::for_testing();
        let default_limits = StoreLimits::default();
        assert!(test_limits.max_stream_bytes < default_limits.max_stream_bytes);
        assert!(test_limits.max_items < default_limits.max_items);
        assert!(test_limits.max_properties < default_limits.max_properties);
    }

    #[test]
    fn unlimited_limits() {
        let limits = StoreLimits::unlimited();
        assert_eq!(limits.max_stream_bytes, usize::MAX);
        assert_eq!(limits.max_items, usize::MAX);
    }

    #[test]
    fn check_stream_rejects_oversize() {
        let limits = StoreLimits::for_testing();
        assert!(limits.check_stream(64 * 1024).is_ok());
        let err = limits.check_stream(64 * 1024 + 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::LimitExceeded {
                kind: LimitKind::StreamBytes,
                ..
            }
        ));
    }

    #[test]
    fn check_items_rejects_oversize() {
        let limits = StoreLimits::for_testing();
        assert!(limits.check_items(1025).is_err());
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: StoreLimits = StoreLimits::for_testing();
        assert_eq!(LIMITS.max_items, 1024);
    }
}
