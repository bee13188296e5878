//! Fixed-width indexed store (`FixedMeta` + `FixedData`).

use std::collections::HashMap;
use std::ops::Range;

use scalar::get_i32;
use tracing::{debug, warn};

use crate::error::{MalformedReason, StoreError, StoreResult};
use crate::header::{MetaHeader, HEADER_SIZE};
use crate::limits::StoreLimits;
use crate::state::StreamState;

/// Byte position of the data offset inside a meta record.
pub const META_OFFSET_POS: usize = 4;

/// Per-item meta records following a [`MetaHeader`].
///
/// The item count is recomputed from the stream length; the header count is
/// kept for diagnostics only because writers are known to get it wrong.
#[derive(Debug, Clone)]
pub struct FixedMeta {
    header: MetaHeader,
    width: usize,
    count: usize,
    data: Vec<u8>,
}

impl FixedMeta {
    /// Decodes a meta stream whose records are `width` bytes wide.
    pub fn decode(buf: &[u8], width: usize, limits: &StoreLimits) -> StoreResult<Self> {
        if width == 0 {
            return Err(StoreError::MalformedContainer(MalformedReason::ZeroWidth));
        }
        limits.check_stream(buf.len())?;
        let header = MetaHeader::decode(buf)?;
        let count = (buf.len() - HEADER_SIZE) / width;
        limits.check_items(count)?;
        if count != header.declared_items {
            debug!(
                declared = header.declared_items,
                recomputed = count,
                "fixed meta count recomputed"
            );
        }
        Ok(Self {
            header,
            width,
            count,
            data: buf[HEADER_SIZE..HEADER_SIZE + count * width].to_vec(),
        })
    }

    /// Returns the decoded header.
    #[must_use]
    pub const fn header(&self) -> &MetaHeader {
        &self.header
    }

    /// Returns the record width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the recomputed item count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the meta record for item `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns the data-stream offset recorded for item `index`.
    #[must_use]
    pub fn data_offset(&self, index: usize) -> Option<i32> {
        self.item(index)
            .and_then(|item| get_i32(item, META_OFFSET_POS).ok())
    }
}

/// Payload records addressed by index.
///
/// Per-item sizes come either from a fixed record width or from the delta
/// between consecutive meta offsets. Sizes that are negative or run past the
/// stream are clamped to the bytes remaining.
#[derive(Debug, Clone, Default)]
pub struct FixedStore {
    data: Vec<u8>,
    items: Vec<Option<Range<usize>>>,
    /// Item start offset to the first item starting there.
    starts: HashMap<usize, usize>,
    state: StreamState,
}

impl FixedStore {
    fn new(data: &[u8], items: Vec<Option<Range<usize>>>, state: StreamState) -> Self {
        let mut starts = HashMap::with_capacity(items.len());
        for (index, range) in items.iter().enumerate() {
            if let Some(range) = range {
                starts.entry(range.start).or_insert(index);
            }
        }
        Self {
            data: data.to_vec(),
            items,
            starts,
            state,
        }
    }

    /// Builds a store whose item sizes are derived from meta offsets.
    pub fn from_meta(meta: &FixedMeta, data: &[u8], limits: &StoreLimits) -> StoreResult<Self> {
        Self::build(meta, data, None, limits)
    }

    /// Builds a store taking each item at its meta offset with a fixed size.
    pub fn from_meta_sized(
        meta: &FixedMeta,
        data: &[u8],
        item_size: usize,
        limits: &StoreLimits,
    ) -> StoreResult<Self> {
        Self::build(meta, data, Some(item_size), limits)
    }

    /// Builds a store by splitting `data` into `width`-byte records.
    pub fn chunked(data: &[u8], width: usize, limits: &StoreLimits) -> StoreResult<Self> {
        if width == 0 {
            return Err(StoreError::MalformedContainer(MalformedReason::ZeroWidth));
        }
        limits.check_stream(data.len())?;
        let count = data.len() / width;
        limits.check_items(count)?;
        let items = (0..count)
            .map(|i| Some(i * width..(i + 1) * width))
            .collect();
        Ok(Self::new(
            data,
            items,
            StreamState::Unopened.advance().advance().finish(true),
        ))
    }

    fn build(
        meta: &FixedMeta,
        data: &[u8],
        item_size: Option<usize>,
        limits: &StoreLimits,
    ) -> StoreResult<Self> {
        limits.check_stream(data.len())?;
        let available = data.len();
        let count = meta.len();
        let mut complete = true;
        let mut items = Vec::with_capacity(count);

        for index in 0..count {
            let start = meta
                .data_offset(index)
                .and_then(|o| usize::try_from(o).ok())
                .filter(|&o| o < available);
            let Some(start) = start else {
                items.push(None);
                continue;
            };
            let remaining = available - start;
            let size = match item_size {
                Some(size) => size,
                None if index + 1 == count => remaining,
                None => {
                    let next = meta.data_offset(index + 1).map_or(0, i64::from);
                    let delta = next - i64::try_from(start).unwrap_or(i64::MAX);
                    usize::try_from(delta).unwrap_or(usize::MAX)
                }
            };
            let size = if size > remaining {
                if item_size.is_none() {
                    warn!(index, start, size, remaining, "fixed item size clamped");
                    complete = false;
                }
                remaining
            } else {
                size
            };
            items.push(Some(start..start + size));
        }

        let state = StreamState::HeaderValidated.advance().finish(complete);
        debug!(items = items.len(), %state, "fixed store decoded");
        Ok(Self::new(data, items, state))
    }

    /// Returns the stream state reached by decoding.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the item count (including items with no payload).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns item `index`, or `None` if its offset pointed outside the data.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&[u8]> {
        self.items
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|range| self.data.get(range.clone()))
    }

    /// Returns the index of the item starting at `offset`.
    #[must_use]
    pub fn index_of_offset(&self, offset: usize) -> Option<usize> {
        self.starts.get(&offset).copied()
    }

    /// Iterates over `(index, item)` for items with a payload.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        (0..self.items.len()).filter_map(|i| self.item(i).map(|item| (i, item)))
    }
}

/// Builds `FixedMeta` and `FixedData` streams from whole records.
#[derive(Debug, Clone)]
pub struct FixedStoreWriter {
    meta_width: usize,
    declared_items: Option<usize>,
    metas: Vec<Vec<u8>>,
    data: Vec<u8>,
}

impl FixedStoreWriter {
    /// Creates a writer producing meta records of `meta_width` bytes.
    #[must_use]
    pub const fn new(meta_width: usize) -> Self {
        Self {
            meta_width,
            declared_items: None,
            metas: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Overrides the item count written to the header.
    pub fn declare_items(&mut self, count: usize) -> &mut Self {
        self.declared_items = Some(count);
        self
    }

    /// Appends a record. `meta` supplies the leading meta bytes; the data
    /// offset is written at [`META_OFFSET_POS`] and the rest zero-filled.
    pub fn push(&mut self, meta: &[u8], record: &[u8]) -> &mut Self {
        let mut entry = vec![0u8; self.meta_width.max(META_OFFSET_POS + 4)];
        let lead = meta.len().min(entry.len());
        entry[..lead].copy_from_slice(&meta[..lead]);
        let offset = i32::try_from(self.data.len()).unwrap_or(i32::MAX);
        entry[META_OFFSET_POS..META_OFFSET_POS + 4].copy_from_slice(&offset.to_le_bytes());
        entry.truncate(self.meta_width);
        self.metas.push(entry);
        self.data.extend_from_slice(record);
        self
    }

    /// Returns `(meta, data)` streams.
    #[must_use]
    pub fn finish(&self) -> (Vec<u8>, Vec<u8>) {
        let header = MetaHeader {
            declared_items: self.declared_items.unwrap_or(self.metas.len()),
            declared_data_size: self.data.len(),
            ..MetaHeader::default()
        };
        let mut meta = header.encode().to_vec();
        for entry in &self.metas {
            meta.extend_from_slice(entry);
        }
        (meta, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> StoreLimits {
        StoreLimits::for_testing()
    }

    #[test]
    fn sizes_from_offset_deltas() {
        let mut writer = FixedStoreWriter::new(12);
        writer
            .push(&[], &[1; 10])
            .push(&[], &[2; 6])
            .push(&[], &[3; 3]);
        let (meta, data) = writer.finish();
        let meta = FixedMeta::decode(&meta, 12, &limits()).unwrap();
        let store = FixedStore::from_meta(&meta, &data, &limits()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.item(0), Some(&[1u8; 10][..]));
        assert_eq!(store.item(1), Some(&[2u8; 6][..]));
        assert_eq!(store.item(2), Some(&[3u8; 3][..]));
        assert_eq!(store.state(), StreamState::Complete);
    }

    #[test]
    fn wrong_header_count_is_recomputed() {
        let mut writer = FixedStoreWriter::new(10);
        writer.declare_items(99).push(&[], &[0; 4]).push(&[], &[0; 4]);
        let (meta, _) = writer.finish();
        let meta = FixedMeta::decode(&meta, 10, &limits()).unwrap();
        assert_eq!(meta.header().declared_items, 99);
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn partial_trailing_meta_record_ignored() {
        let mut writer = FixedStoreWriter::new(10);
        writer.push(&[], &[0; 4]);
        let (mut meta, _) = writer.finish();
        meta.extend_from_slice(&[0; 7]);
        let meta = FixedMeta::decode(&meta, 10, &limits()).unwrap();
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn backwards_offset_clamps_to_remaining() {
        let mut writer = FixedStoreWriter::new(8);
        writer.push(&[], &[1; 4]).push(&[], &[2; 4]);
        let (mut meta, data) = writer.finish();
        // first item's offset now lies after the second one's
        let first = HEADER_SIZE + META_OFFSET_POS;
        meta[first..first + 4].copy_from_slice(&6i32.to_le_bytes());
        let meta = FixedMeta::decode(&meta, 8, &limits()).unwrap();
        let store = FixedStore::from_meta(&meta, &data, &limits()).unwrap();
        assert_eq!(store.item(0), Some(&[2u8, 2][..]));
        assert_eq!(store.item(1).map(<[u8]>::len), Some(4));
        assert_eq!(store.state(), StreamState::PartiallyDecoded);
    }

    #[test]
    fn out_of_range_offset_has_no_item() {
        let mut writer = FixedStoreWriter::new(8);
        writer.push(&[], &[1; 4]);
        let (mut meta, data) = writer.finish();
        let pos = HEADER_SIZE + META_OFFSET_POS;
        meta[pos..pos + 4].copy_from_slice(&400i32.to_le_bytes());
        let meta = FixedMeta::decode(&meta, 8, &limits()).unwrap();
        let store = FixedStore::from_meta(&meta, &data, &limits()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.item(0).is_none());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn fixed_item_size_mode() {
        let mut writer = FixedStoreWriter::new(10);
        writer.push(&[], &[5; 12]).push(&[], &[6; 8]);
        let (meta, data) = writer.finish();
        let meta = FixedMeta::decode(&meta, 10, &limits()).unwrap();
        let store = FixedStore::from_meta_sized(&meta, &data, 12, &limits()).unwrap();
        assert_eq!(store.item(0), Some(&[5u8; 12][..]));
        assert_eq!(store.item(1), Some(&[6u8; 8][..]), "clamped to remaining");
    }

    #[test]
    fn chunked_records_and_offset_index() {
        let data: Vec<u8> = (0..45).collect();
        let store = FixedStore::chunked(&data, 20, &limits()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.item(1).map(|b| b[0]), Some(20));
        assert_eq!(store.index_of_offset(20), Some(1));
        assert_eq!(store.index_of_offset(10), None);
    }

    #[test]
    fn offset_index_prefers_first_item_at_a_start() {
        let mut writer = FixedStoreWriter::new(8);
        writer
            .push(&[], &[1; 4])
            .push(&[], &[2; 4])
            .push(&[], &[3; 4]);
        let (mut meta, data) = writer.finish();
        // the third record repeats the second one's offset
        let third = HEADER_SIZE + 2 * 8 + META_OFFSET_POS;
        meta[third..third + 4].copy_from_slice(&4i32.to_le_bytes());
        let meta = FixedMeta::decode(&meta, 8, &limits()).unwrap();
        let store = FixedStore::from_meta_sized(&meta, &data, 4, &limits()).unwrap();
        assert_eq!(store.index_of_offset(0), Some(0));
        assert_eq!(store.index_of_offset(4), Some(1));
        assert_eq!(store.index_of_offset(8), None);
        assert_eq!(store.item(2), Some(&[2u8; 4][..]));
    }

    #[test]
    fn zero_width_rejected() {
        assert!(matches!(
            FixedStore::chunked(&[1, 2], 0, &limits()),
            Err(StoreError::MalformedContainer(MalformedReason::ZeroWidth))
        ));
        let (meta, _) = FixedStoreWriter::new(4).finish();
        assert!(FixedMeta::decode(&meta, 0, &limits()).is_err());
    }

    #[test]
    fn meta_prefix_bytes_preserved() {
        let mut writer = FixedStoreWriter::new(12);
        writer.push(&[0x02, 0, 0, 0], &[0; 4]);
        let (meta, _) = writer.finish();
        let meta = FixedMeta::decode(&meta, 12, &limits()).unwrap();
        assert_eq!(meta.item(0).map(|m| m[0]), Some(0x02));
        assert_eq!(meta.data_offset(0), Some(0));
    }
}
