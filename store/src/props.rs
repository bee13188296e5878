//! Property bag: a small tag-to-bytes dictionary of file-level settings.
//!
//! Two wire shapes exist, one per generation. Both decode into the same
//! [`PropertyBag`]. Decoding never fails: on the first entry it cannot make
//! sense of it stops, keeps what it has, and marks the bag incomplete.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scalar::{
    get_date, get_f64, get_i16, get_i32, get_time, get_timestamp, get_utf16, ByteCursor,
};
use tracing::{debug, warn};

use crate::limits::StoreLimits;
use crate::state::StreamState;

/// Header size of the current shape.
pub const CURRENT_HEADER_SIZE: usize = 16;

/// Header size of the legacy shape: file size(4) + count(2) + reserved(2).
pub const LEGACY_HEADER_SIZE: usize = 8;

/// Legacy entry type meaning "payload is exactly four bytes".
pub const FIXED4_TYPE: u8 = 0x40;

/// Wire shape of a property bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropsShape {
    /// Legacy generation: file-size header, per-entry type/flag bytes.
    Legacy,
    /// Newer generation: 16-byte header, `(size, key, unused)` entries.
    Current,
}

/// Decoded property bag.
#[derive(Debug, Clone)]
pub struct PropertyBag {
    shape: PropsShape,
    entries: BTreeMap<i32, Vec<u8>>,
    declared: usize,
    complete: bool,
}

impl PropertyBag {
    /// Decodes `data` in the given shape.
    #[must_use]
    pub fn decode(data: &[u8], shape: PropsShape, limits: &StoreLimits) -> Self {
        let mut bag = Self {
            shape,
            entries: BTreeMap::new(),
            declared: 0,
            complete: false,
        };
        if data.len() > limits.max_stream_bytes {
            warn!(len = data.len(), "property stream over limit, not decoded");
            return bag;
        }
        let mut cursor = ByteCursor::new(data);
        let outcome = match shape {
            PropsShape::Current => bag.decode_current(&mut cursor, limits),
            PropsShape::Legacy => bag.decode_legacy(&mut cursor, limits),
        };
        bag.complete = outcome.is_some() && bag.entries.len() == bag.declared;
        if bag.complete {
            debug!(entries = bag.entries.len(), ?shape, "property bag decoded");
        } else {
            warn!(
                decoded = bag.entries.len(),
                declared = bag.declared,
                ?shape,
                "property bag incomplete"
            );
        }
        bag
    }

    fn decode_current(&mut self, cursor: &mut ByteCursor<'_>, limits: &StoreLimits) -> Option<()> {
        cursor.skip(12).ok()?;
        self.declared = usize::from(cursor.read_u16().ok()?);
        cursor.skip(2).ok()?;
        for _ in 0..self.declared {
            if self.entries.len() >= limits.max_properties {
                return None;
            }
            let size = cursor.read_i32().ok()?;
            let key = cursor.read_i32().ok()?;
            cursor.skip(4).ok()?;
            let size = usize::try_from(size).ok().filter(|&s| s >= 1)?;
            let payload = cursor.read_bytes(size).ok()?;
            self.entries.insert(key, payload.to_vec());
            cursor.align_to(2);
        }
        Some(())
    }

    fn decode_legacy(&mut self, cursor: &mut ByteCursor<'_>, limits: &StoreLimits) -> Option<()> {
        let file_size = usize::try_from(cursor.read_u32().ok()?).ok()?;
        if file_size != cursor.data().len() {
            warn!(
                declared = file_size,
                actual = cursor.data().len(),
                "property stream size mismatch"
            );
            return None;
        }
        self.declared = usize::from(cursor.read_u16().ok()?);
        cursor.skip(2).ok()?;
        for _ in 0..self.declared {
            if self.entries.len() >= limits.max_properties {
                return None;
            }
            let size = cursor.read_i32().ok()?;
            let key = cursor.read_i32().ok()?;
            let kind = cursor.read_u8().ok()?;
            let _flag = cursor.read_u8().ok()?;
            cursor.skip(2).ok()?;
            let len = if kind == FIXED4_TYPE {
                4
            } else if size > 0 {
                usize::try_from(size).ok()?
            } else if size == 0 {
                usize::try_from(cursor.read_i32().ok()?).ok()?
            } else {
                warn!(key, size, kind, "unrecognized property entry shape");
                return None;
            };
            let payload = cursor.read_bytes(len).ok()?;
            self.entries.insert(key, payload.to_vec());
            cursor.align_to(2);
        }
        Some(())
    }

    /// Returns the wire shape the bag was decoded from.
    #[must_use]
    pub const fn shape(&self) -> PropsShape {
        self.shape
    }

    /// Returns `true` if every declared entry was decoded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns the terminal stream state.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        if self.complete {
            StreamState::Complete
        } else {
            StreamState::PartiallyDecoded
        }
    }

    /// Returns the number of decoded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the raw payload for `key`.
    #[must_use]
    pub fn get(&self, key: i32) -> Option<&[u8]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Iterates over `(key, payload)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[u8])> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn short(&self, key: i32) -> Option<i16> {
        self.get(key).and_then(|b| get_i16(b, 0).ok())
    }

    pub fn int(&self, key: i32) -> Option<i32> {
        self.get(key).and_then(|b| get_i32(b, 0).ok())
    }

    pub fn double(&self, key: i32) -> Option<f64> {
        self.get(key).and_then(|b| get_f64(b, 0).ok())
    }

    /// A boolean is any non-zero 16-bit value.
    pub fn flag(&self, key: i32) -> Option<bool> {
        self.short(key).map(|v| v != 0)
    }

    pub fn text(&self, key: i32) -> Option<String> {
        self.get(key).and_then(|b| get_utf16(b, 0).ok())
    }

    pub fn time(&self, key: i32) -> Option<NaiveTime> {
        self.get(key).and_then(|b| get_time(b, 0).ok())
    }

    pub fn date(&self, key: i32) -> Option<NaiveDate> {
        self.get(key).and_then(|b| get_date(b, 0).ok()).flatten()
    }

    pub fn timestamp(&self, key: i32) -> Option<NaiveDateTime> {
        self.get(key).and_then(|b| get_timestamp(b, 0).ok()).flatten()
    }
}

/// Legacy entry header variant chosen by [`PropertyBagWriter::legacy_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyEntryShape {
    /// Size field holds the payload length.
    Sized,
    /// Type byte is [`FIXED4_TYPE`]; payload must be four bytes.
    Fixed4,
    /// Size field is zero and a second size field follows the header.
    Fallback,
}

/// Builds property bag streams in either shape.
#[derive(Debug, Clone)]
pub struct PropertyBagWriter {
    shape: PropsShape,
    count: u16,
    body: Vec<u8>,
}

impl PropertyBagWriter {
    /// Creates a writer for `shape`.
    #[must_use]
    pub const fn new(shape: PropsShape) -> Self {
        Self {
            shape,
            count: 0,
            body: Vec::new(),
        }
    }

    /// Appends an entry, using the sized legacy header when legacy.
    pub fn entry(&mut self, key: i32, payload: &[u8]) -> &mut Self {
        match self.shape {
            PropsShape::Current => {
                self.body.extend_from_slice(&len_i32(payload.len()).to_le_bytes());
                self.body.extend_from_slice(&key.to_le_bytes());
                self.body.extend_from_slice(&0i32.to_le_bytes());
                self.body.extend_from_slice(payload);
                self.pad();
                self.count += 1;
                self
            }
            PropsShape::Legacy => self.legacy_entry(key, payload, LegacyEntryShape::Sized),
        }
    }

    /// Appends a legacy entry with an explicit header variant.
    pub fn legacy_entry(&mut self, key: i32, payload: &[u8], shape: LegacyEntryShape) -> &mut Self {
        let (size, kind) = match shape {
            LegacyEntryShape::Sized => (len_i32(payload.len()), 0u8),
            LegacyEntryShape::Fixed4 => (0, FIXED4_TYPE),
            LegacyEntryShape::Fallback => (0, 0u8),
        };
        self.body.extend_from_slice(&size.to_le_bytes());
        self.body.extend_from_slice(&key.to_le_bytes());
        self.body.extend_from_slice(&[kind, 0, 0, 0]);
        if shape == LegacyEntryShape::Fallback {
            self.body
                .extend_from_slice(&len_i32(payload.len()).to_le_bytes());
        }
        self.body.extend_from_slice(payload);
        self.pad();
        self.count += 1;
        self
    }

    /// Appends raw bytes without counting an entry.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    fn pad(&mut self) {
        if self.body.len() % 2 != 0 {
            self.body.push(0);
        }
    }

    /// Returns the finished stream.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self.shape {
            PropsShape::Current => {
                out.extend_from_slice(&[0u8; 12]);
                out.extend_from_slice(&self.count.to_le_bytes());
                out.extend_from_slice(&[0, 0]);
            }
            PropsShape::Legacy => {
                let total = LEGACY_HEADER_SIZE + self.body.len();
                out.extend_from_slice(&u32::try_from(total).unwrap_or(u32::MAX).to_le_bytes());
                out.extend_from_slice(&self.count.to_le_bytes());
                out.extend_from_slice(&[0, 0]);
            }
        }
        out.extend_from_slice(&self.body);
        out
    }
}

fn len_i32(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> StoreLimits {
        StoreLimits::for_testing()
    }

    fn utf16z(s: &str) -> Vec<u8> {
        let mut v: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
        v.extend_from_slice(&[0, 0]);
        v
    }

    #[test]
    fn current_shape_decodes() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        writer
            .entry(37_748_752, &utf16z("$"))
            .entry(37_748_754, &2i16.to_le_bytes())
            .entry(37_748_767, &12.5f64.to_bits().to_le_bytes());
        let bag = PropertyBag::decode(&writer.finish(), PropsShape::Current, &limits());
        assert!(bag.is_complete());
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.text(37_748_752).as_deref(), Some("$"));
        assert_eq!(bag.short(37_748_754), Some(2));
        assert_eq!(bag.double(37_748_767), Some(12.5));
        assert_eq!(bag.state(), StreamState::Complete);
    }

    #[test]
    fn current_odd_payload_is_aligned() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        writer.entry(1, &[7, 7, 7]).entry(2, &[1, 0]);
        let bag = PropertyBag::decode(&writer.finish(), PropsShape::Current, &limits());
        assert!(bag.is_complete());
        assert_eq!(bag.get(1), Some(&[7u8, 7, 7][..]));
        assert_eq!(bag.flag(2), Some(true));
    }

    #[test]
    fn current_count_is_sixteen_bits() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        writer.entry(5, &480i32.to_le_bytes());
        let mut stream = writer.finish();
        stream[14..16].copy_from_slice(&0x7FFFu16.to_le_bytes());
        let bag = PropertyBag::decode(&stream, PropsShape::Current, &limits());
        assert!(bag.is_complete());
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.int(5), Some(480));
    }

    #[test]
    fn legacy_three_header_shapes() {
        let mut writer = PropertyBagWriter::new(PropsShape::Legacy);
        writer
            .legacy_entry(10, &480i32.to_le_bytes(), LegacyEntryShape::Fixed4)
            .legacy_entry(11, &utf16z("Standard"), LegacyEntryShape::Sized)
            .legacy_entry(12, &[1, 2, 3], LegacyEntryShape::Fallback);
        let bag = PropertyBag::decode(&writer.finish(), PropsShape::Legacy, &limits());
        assert!(bag.is_complete());
        assert_eq!(bag.int(10), Some(480));
        assert_eq!(bag.text(11).as_deref(), Some("Standard"));
        assert_eq!(bag.get(12), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn legacy_unrecognized_shape_keeps_prefix() {
        let mut writer = PropertyBagWriter::new(PropsShape::Legacy);
        writer.legacy_entry(1, &[1, 0], LegacyEntryShape::Sized);
        // negative size with no sentinel type
        writer.raw(&(-5i32).to_le_bytes()).raw(&2i32.to_le_bytes()).raw(&[0; 4]);
        let mut stream = writer.finish();
        // header count must cover the bad entry
        stream[4..6].copy_from_slice(&2u16.to_le_bytes());
        let bag = PropertyBag::decode(&stream, PropsShape::Legacy, &limits());
        assert!(!bag.is_complete());
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.flag(1), Some(true));
        assert_eq!(bag.state(), StreamState::PartiallyDecoded);
    }

    #[test]
    fn legacy_file_size_mismatch_is_incomplete() {
        let mut writer = PropertyBagWriter::new(PropsShape::Legacy);
        writer.entry(1, &[1, 0]);
        let mut stream = writer.finish();
        stream.push(0);
        let bag = PropertyBag::decode(&stream, PropsShape::Legacy, &limits());
        assert!(!bag.is_complete());
        assert!(bag.is_empty());
    }

    #[test]
    fn truncated_entry_keeps_prefix() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        writer.entry(1, &[1, 0]).entry(2, &[0; 8]);
        let stream = writer.finish();
        let bag = PropertyBag::decode(&stream[..stream.len() - 3], PropsShape::Current, &limits());
        assert!(!bag.is_complete());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn zero_size_current_entry_stops() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        writer.entry(1, &[]);
        let bag = PropertyBag::decode(&writer.finish(), PropsShape::Current, &limits());
        assert!(!bag.is_complete());
    }

    #[test]
    fn empty_stream_is_incomplete_not_error() {
        let bag = PropertyBag::decode(&[], PropsShape::Current, &limits());
        assert!(bag.is_empty());
        assert!(!bag.is_complete());
    }

    #[test]
    fn property_limit_stops_decoding() {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        for key in 0..4 {
            writer.entry(key, &[0, 0]);
        }
        let limits = StoreLimits {
            max_properties: 2,
            ..StoreLimits::for_testing()
        };
        let bag = PropertyBag::decode(&writer.finish(), PropsShape::Current, &limits);
        assert_eq!(bag.len(), 2);
        assert!(!bag.is_complete());
    }

    #[test]
    fn absent_keys_are_none() {
        let bag = PropertyBag::decode(
            &PropertyBagWriter::new(PropsShape::Current).finish(),
            PropsShape::Current,
            &limits(),
        );
        assert!(bag.is_complete());
        assert!(bag.int(5).is_none());
        assert!(bag.timestamp(5).is_none());
        assert!(bag.date(5).is_none());
        assert!(bag.time(5).is_none());
    }
}
