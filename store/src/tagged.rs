//! Common lookup surface over per-entity tagged blobs.

use scalar::{get_f64, get_i16, get_i32, get_long6, get_timestamp, get_utf16};

/// A source of `(entity, tag) -> bytes` lookups.
///
/// Both generations keep sparse per-entity fields behind a tag: the newer
/// one in a directory-indexed store, the legacy one in extended-data blobs.
/// Hydration only sees this trait. Missing keys are `None`, never errors,
/// and a value too short for the requested type is also `None`.
pub trait TaggedSource {
    /// Returns the raw payload for `(entity, tag)`.
    fn blob(&self, entity: i32, tag: i16) -> Option<&[u8]>;

    /// Returns the string stored for `(entity, tag)`.
    fn text(&self, entity: i32, tag: i16) -> Option<String> {
        self.blob(entity, tag).and_then(|b| get_utf16(b, 0).ok())
    }

    /// Returns a 16-bit value.
    fn short(&self, entity: i32, tag: i16) -> Option<i16> {
        self.blob(entity, tag).and_then(|b| get_i16(b, 0).ok())
    }

    /// Returns a 32-bit value.
    fn int(&self, entity: i32, tag: i16) -> Option<i32> {
        self.blob(entity, tag).and_then(|b| get_i32(b, 0).ok())
    }

    /// Returns a six-byte value.
    fn long6(&self, entity: i32, tag: i16) -> Option<i64> {
        self.blob(entity, tag).and_then(|b| get_long6(b, 0).ok())
    }

    /// Returns a double.
    fn double(&self, entity: i32, tag: i16) -> Option<f64> {
        self.blob(entity, tag).and_then(|b| get_f64(b, 0).ok())
    }

    /// Returns a timestamp, `None` when absent or the day is the sentinel.
    fn timestamp(&self, entity: i32, tag: i16) -> Option<chrono::NaiveDateTime> {
        self.blob(entity, tag)
            .and_then(|b| get_timestamp(b, 0).ok())
            .flatten()
    }
}

/// A tagged source with no entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TaggedSource for NoTags {
    fn blob(&self, _entity: i32, _tag: i16) -> Option<&[u8]> {
        None
    }
}
