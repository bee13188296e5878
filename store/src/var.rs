//! Directory-indexed tagged store (`VarMeta` + `Var2Data`).

use std::collections::BTreeMap;

use scalar::{get_i32, ByteCursor};
use tracing::{debug, warn};

use crate::error::{MalformedReason, StoreError, StoreResult};
use crate::header::{MetaHeader, HEADER_SIZE};
use crate::limits::StoreLimits;
use crate::state::StreamState;
use crate::tagged::TaggedSource;

/// Size of one directory entry: entity(2) + pad(1) + tag(1) + offset(4).
pub const VAR_ENTRY_SIZE: usize = 8;

/// Key of one tagged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaggedKey {
    /// Unique id of the owning entity.
    pub entity: i32,
    /// Field tag within the entity.
    pub tag: i16,
}

impl TaggedKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(entity: i32, tag: i16) -> Self {
        Self { entity, tag }
    }
}

/// A decoded tagged store.
///
/// Built once from a directory stream and a data stream, then read-only.
/// Iteration is ordered by `(entity, tag)`.
#[derive(Debug, Clone, Default)]
pub struct VarStore {
    header: MetaHeader,
    directory: BTreeMap<TaggedKey, usize>,
    blobs: BTreeMap<usize, Vec<u8>>,
    state: StreamState,
}

impl VarStore {
    /// Decodes a store from its directory (`meta`) and data streams.
    ///
    /// A directory shorter than its declared entry count, or a data stream
    /// shorter than its declared size, is [`StoreError::MalformedContainer`].
    /// Individual entries pointing at unreadable blobs are skipped and leave
    /// the store [`StreamState::PartiallyDecoded`].
    pub fn decode(meta: &[u8], data: &[u8], limits: &StoreLimits) -> StoreResult<Self> {
        limits.check_stream(meta.len())?;
        limits.check_stream(data.len())?;

        let header = MetaHeader::decode(meta)?;
        let mut state = StreamState::Unopened.advance();

        let available = meta.len().saturating_sub(HEADER_SIZE) / VAR_ENTRY_SIZE;
        if header.declared_items > available {
            return Err(StoreError::MalformedContainer(
                MalformedReason::DirectoryShort {
                    declared: header.declared_items,
                    available,
                },
            ));
        }
        if header.declared_data_size > data.len() {
            return Err(StoreError::MalformedContainer(MalformedReason::DataShort {
                declared: header.declared_data_size,
                available: data.len(),
            }));
        }
        limits.check_items(header.declared_items)?;

        let mut directory = BTreeMap::new();
        let mut blobs = BTreeMap::new();
        let mut complete = true;
        let mut cursor = ByteCursor::new(meta);
        cursor.seek(HEADER_SIZE)?;

        for _ in 0..header.declared_items {
            let entity = cursor.read_u16()?;
            cursor.skip(1)?;
            let tag = cursor.read_u8()?;
            let stored = cursor.read_i32()?;
            let key = TaggedKey::new(i32::from(entity), i16::from(tag));

            let Some(offset) = usize::try_from(stored).ok() else {
                warn!(entity, tag, offset = stored, "negative tagged offset skipped");
                complete = false;
                continue;
            };
            if !blobs.contains_key(&offset) {
                match read_blob(data, offset) {
                    Some(blob) => {
                        blobs.insert(offset, blob.to_vec());
                    }
                    None => {
                        warn!(entity, tag, offset, "unreadable tagged blob skipped");
                        complete = false;
                        continue;
                    }
                }
            }
            directory.insert(key, offset);
        }

        state = state.advance().finish(complete);
        debug!(
            entries = directory.len(),
            blobs = blobs.len(),
            %state,
            "tagged store decoded"
        );

        Ok(Self {
            header,
            directory,
            blobs,
            state,
        })
    }

    /// Returns the decoded header.
    #[must_use]
    pub const fn header(&self) -> &MetaHeader {
        &self.header
    }

    /// Returns the stream state reached by decoding.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the number of directory entries kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Returns `true` if no entries were kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Returns the payload for a key.
    #[must_use]
    pub fn get(&self, key: TaggedKey) -> Option<&[u8]> {
        self.directory
            .get(&key)
            .and_then(|offset| self.blobs.get(offset))
            .map(Vec::as_slice)
    }

    /// Returns the payload stored at a data-stream offset.
    #[must_use]
    pub fn blob_at(&self, offset: usize) -> Option<&[u8]> {
        self.blobs.get(&offset).map(Vec::as_slice)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (TaggedKey, &[u8])> + '_ {
        self.directory
            .iter()
            .filter_map(|(key, offset)| self.blobs.get(offset).map(|b| (*key, b.as_slice())))
    }

    /// Returns the distinct entity ids in ascending order.
    #[must_use]
    pub fn entities(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.directory.keys().map(|k| k.entity).collect();
        ids.dedup();
        ids
    }

    /// Returns the tags present for one entity in ascending order.
    #[must_use]
    pub fn tags(&self, entity: i32) -> Vec<i16> {
        self.directory
            .range(TaggedKey::new(entity, i16::MIN)..=TaggedKey::new(entity, i16::MAX))
            .map(|(key, _)| key.tag)
            .collect()
    }
}

impl TaggedSource for VarStore {
    fn blob(&self, entity: i32, tag: i16) -> Option<&[u8]> {
        self.get(TaggedKey::new(entity, tag))
    }
}

fn read_blob(data: &[u8], offset: usize) -> Option<&[u8]> {
    let size = usize::try_from(get_i32(data, offset).ok()?).ok()?;
    let start = offset.checked_add(4)?;
    data.get(start..start.checked_add(size)?)
}

/// Builds the two streams of a tagged store.
///
/// Used to produce synthetic inputs; identical payloads are not shared.
#[derive(Debug, Clone, Default)]
pub struct VarStoreWriter {
    entries: Vec<(u16, u8, usize)>,
    data: Vec<u8>,
}

impl VarStoreWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a payload for `(entity, tag)`.
    pub fn insert(&mut self, entity: u16, tag: u8, payload: &[u8]) -> &mut Self {
        let offset = self.data.len();
        let size = i32::try_from(payload.len()).unwrap_or(i32::MAX);
        self.data.extend_from_slice(&size.to_le_bytes());
        self.data.extend_from_slice(payload);
        self.entries.push((entity, tag, offset));
        self
    }

    /// Appends a UTF-16 string payload with a terminator.
    pub fn insert_text(&mut self, entity: u16, tag: u8, text: &str) -> &mut Self {
        let mut payload: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        payload.extend_from_slice(&[0, 0]);
        self.insert(entity, tag, &payload)
    }

    /// Returns `(meta, data)` streams.
    #[must_use]
    pub fn finish(&self) -> (Vec<u8>, Vec<u8>) {
        let header = MetaHeader {
            declared_items: self.entries.len(),
            declared_data_size: self.data.len(),
            ..MetaHeader::default()
        };
        let mut meta = header.encode().to_vec();
        for &(entity, tag, offset) in &self.entries {
            meta.extend_from_slice(&entity.to_le_bytes());
            meta.push(0);
            meta.push(tag);
            meta.extend_from_slice(&i32::try_from(offset).unwrap_or(i32::MAX).to_le_bytes());
        }
        (meta, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VarStore {
        let mut writer = VarStoreWriter::new();
        writer
            .insert_text(2, 11, "Build")
            .insert(2, 45, &1.5f64.to_bits().to_le_bytes())
            .insert_text(1, 11, "Design");
        let (meta, data) = writer.finish();
        VarStore::decode(&meta, &data, &StoreLimits::for_testing()).unwrap()
    }

    #[test]
    fn lookup_present_and_absent() {
        let store = sample();
        assert_eq!(store.len(), 3);
        assert_eq!(store.text(1, 11).as_deref(), Some("Design"));
        assert_eq!(store.double(2, 45), Some(1.5));
        assert!(store.get(TaggedKey::new(3, 11)).is_none());
        assert!(store.text(1, 12).is_none());
        assert_eq!(store.state(), StreamState::Complete);
    }

    #[test]
    fn iteration_is_sorted() {
        let store = sample();
        let keys: Vec<TaggedKey> = store.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                TaggedKey::new(1, 11),
                TaggedKey::new(2, 11),
                TaggedKey::new(2, 45)
            ]
        );
        assert_eq!(store.entities(), vec![1, 2]);
        assert_eq!(store.tags(2), vec![11, 45]);
    }

    #[test]
    fn tags_above_127_are_kept_positive() {
        let mut writer = VarStoreWriter::new();
        writer.insert_text(5, 144, "notes");
        let (meta, data) = writer.finish();
        let store = VarStore::decode(&meta, &data, &StoreLimits::for_testing()).unwrap();
        assert_eq!(store.text(5, 144).as_deref(), Some("notes"));
    }

    #[test]
    fn short_directory_is_malformed() {
        let mut writer = VarStoreWriter::new();
        writer.insert(1, 1, &[1, 2]);
        let (meta, data) = writer.finish();
        let err = VarStore::decode(&meta[..meta.len() - 1], &data, &StoreLimits::for_testing())
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedContainer(MalformedReason::DirectoryShort { .. })
        ));
    }

    #[test]
    fn short_data_is_malformed() {
        let mut writer = VarStoreWriter::new();
        writer.insert(1, 1, &[1, 2, 3, 4]);
        let (meta, data) = writer.finish();
        let err = VarStore::decode(&meta, &data[..4], &StoreLimits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedContainer(MalformedReason::DataShort { .. })
        ));
    }

    #[test]
    fn bad_magic_is_fatal() {
        let (mut meta, data) = VarStoreWriter::new().finish();
        meta[3] = 0;
        let err = VarStore::decode(&meta, &data, &StoreLimits::for_testing()).unwrap_err();
        assert!(matches!(err, StoreError::BadMagic { .. }));
    }

    #[test]
    fn corrupt_blob_size_partially_decodes() {
        let mut writer = VarStoreWriter::new();
        writer.insert(1, 1, &[7; 4]).insert(1, 2, &[8; 4]);
        let (meta, mut data) = writer.finish();
        // second blob claims far more bytes than exist
        data[8..12].copy_from_slice(&1000i32.to_le_bytes());
        let store = VarStore::decode(&meta, &data, &StoreLimits::for_testing()).unwrap();
        assert_eq!(store.blob(1, 1), Some(&[7u8; 4][..]));
        assert!(store.blob(1, 2).is_none());
        assert_eq!(store.state(), StreamState::PartiallyDecoded);
    }

    #[test]
    fn item_limit_enforced() {
        let mut writer = VarStoreWriter::new();
        for i in 0..5 {
            writer.insert(i, 1, &[0]);
        }
        let (meta, data) = writer.finish();
        let limits = StoreLimits {
            max_items: 4,
            ..StoreLimits::for_testing()
        };
        assert!(matches!(
            VarStore::decode(&meta, &data, &limits),
            Err(StoreError::LimitExceeded { .. })
        ));
    }

    #[test]
    fn shared_offsets_resolve_once() {
        let (mut meta, data) = {
            let mut writer = VarStoreWriter::new();
            writer.insert(1, 1, &[9, 9]).insert(2, 1, &[0]);
            writer.finish()
        };
        // point the second entry at the first blob
        let entry2 = HEADER_SIZE + VAR_ENTRY_SIZE + 4;
        meta[entry2..entry2 + 4].copy_from_slice(&0i32.to_le_bytes());
        let store = VarStore::decode(&meta, &data, &StoreLimits::for_testing()).unwrap();
        assert_eq!(store.blob(2, 1), Some(&[9u8, 9][..]));
        assert_eq!(store.blob_at(0), Some(&[9u8, 9][..]));
    }
}
