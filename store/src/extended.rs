//! Legacy extended data: per-entity `(size, type, payload)` item lists stored
//! inside the deferred area.

use std::collections::BTreeMap;

use scalar::{get_i32, ByteCursor};

use crate::legacy::FixDeferFix;
use crate::offset::Offset;
use crate::tagged::TaggedSource;

/// One legacy entity's extended items keyed by item type.
///
/// Some item types hold a pointer into the deferred area rather than the
/// value itself; see [`ExtendedData::offset`].
#[derive(Debug, Clone, Default)]
pub struct ExtendedData {
    items: BTreeMap<i16, Vec<u8>>,
    complete: bool,
}

impl ExtendedData {
    /// Parses the item list held by the deferred chunk at `offset`.
    ///
    /// A missing chunk yields an empty set. Parsing stops at the first item
    /// whose size runs past the chunk; items before it are kept.
    #[must_use]
    pub fn load(deferred: &FixDeferFix, offset: Option<Offset>) -> Self {
        offset
            .and_then(|o| deferred.get(o))
            .map_or_else(|| Self::parse(&[]), Self::parse)
    }

    /// Parses an item list from raw bytes.
    #[must_use]
    pub fn parse(blob: &[u8]) -> Self {
        let mut items = BTreeMap::new();
        let mut cursor = ByteCursor::new(blob);
        let mut complete = true;
        while cursor.remaining() >= 6 {
            let Ok(size) = cursor.read_i32() else { break };
            let Ok(kind) = cursor.read_i16() else { break };
            let payload = usize::try_from(size)
                .ok()
                .and_then(|size| cursor.read_bytes(size).ok());
            match payload {
                Some(payload) => {
                    items.insert(kind, payload.to_vec());
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        Self { items, complete }
    }

    /// Returns `true` if every item parsed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the payload of item `kind`.
    #[must_use]
    pub fn get(&self, kind: i16) -> Option<&[u8]> {
        self.items.get(&kind).map(Vec::as_slice)
    }

    /// Returns the pointer stored in item `kind`.
    #[must_use]
    pub fn offset(&self, kind: i16) -> Option<Offset> {
        self.get(kind)
            .and_then(|b| get_i32(b, 0).ok())
            .and_then(Offset::from_stored)
    }

    /// Iterates over `(kind, payload)` in ascending kind order.
    pub fn iter(&self) -> impl Iterator<Item = (i16, &[u8])> + '_ {
        self.items.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// One entity's extended data viewed as a [`TaggedSource`].
///
/// The entity argument of lookups is ignored: the view is already scoped to
/// one entity. String items are pointers into the deferred area.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedView<'a> {
    ext: &'a ExtendedData,
    deferred: &'a FixDeferFix,
}

impl<'a> ExtendedView<'a> {
    /// Creates a view over `ext`, resolving pointers through `deferred`.
    #[must_use]
    pub const fn new(ext: &'a ExtendedData, deferred: &'a FixDeferFix) -> Self {
        Self { ext, deferred }
    }
}

impl TaggedSource for ExtendedView<'_> {
    fn blob(&self, _entity: i32, tag: i16) -> Option<&[u8]> {
        self.ext.get(tag)
    }

    fn text(&self, _entity: i32, tag: i16) -> Option<String> {
        self.ext.offset(tag).and_then(|o| self.deferred.text(o))
    }
}

/// Builds an extended-data item list.
#[derive(Debug, Clone, Default)]
pub struct ExtendedDataWriter {
    data: Vec<u8>,
}

impl ExtendedDataWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item.
    pub fn item(&mut self, kind: i16, payload: &[u8]) -> &mut Self {
        let size = i32::try_from(payload.len()).unwrap_or(i32::MAX);
        self.data.extend_from_slice(&size.to_le_bytes());
        self.data.extend_from_slice(&kind.to_le_bytes());
        self.data.extend_from_slice(payload);
        self
    }

    /// Appends an item holding a pointer.
    pub fn pointer(&mut self, kind: i16, offset: Offset) -> &mut Self {
        self.item(kind, &offset.to_stored().to_le_bytes())
    }

    /// Returns the encoded list.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        self.data.clone()
    }
}
