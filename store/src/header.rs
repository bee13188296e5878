//! Meta stream header shared by the tagged and fixed-width directories.

use scalar::ByteCursor;

use crate::error::{MalformedReason, StoreError, StoreResult};

/// Magic number opening every directory (meta) stream.
pub const MAGIC: u32 = 0xFADF_ADBA;

/// Header size in bytes (20 total).
pub const HEADER_SIZE: usize = 4 + 4 + 4 + 4 + 4;

/// Decoded meta header.
///
/// The magic number is validated during decoding and not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetaHeader {
    /// First reserved word, kept for dumps.
    pub reserved1: u32,
    /// Second reserved word, kept for dumps.
    pub reserved2: u32,
    /// Item count as declared by the writer.
    pub declared_items: usize,
    /// Size of the companion data stream as declared by the writer.
    pub declared_data_size: usize,
}

impl MetaHeader {
    /// Decodes and validates the header at the start of `buf`.
    pub fn decode(buf: &[u8]) -> StoreResult<Self> {
        let mut cursor = ByteCursor::new(buf);
        let found = cursor.read_u32()?;
        if found != MAGIC {
            return Err(StoreError::BadMagic {
                expected: MAGIC,
                found,
            });
        }
        let reserved1 = cursor.read_u32()?;
        let reserved2 = cursor.read_u32()?;
        let declared_items = non_negative(cursor.read_i32()?)?;
        let declared_data_size = non_negative(cursor.read_i32()?)?;
        Ok(Self {
            reserved1,
            reserved2,
            declared_items,
            declared_data_size,
        })
    }

    /// Encodes the header, used to build synthetic streams.
    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        out[4..8].copy_from_slice(&self.reserved1.to_le_bytes());
        out[8..12].copy_from_slice(&self.reserved2.to_le_bytes());
        out[12..16].copy_from_slice(&clamp_i32(self.declared_items).to_le_bytes());
        out[16..20].copy_from_slice(&clamp_i32(self.declared_data_size).to_le_bytes());
        out
    }
}

fn non_negative(value: i32) -> StoreResult<usize> {
    usize::try_from(value)
        .map_err(|_| StoreError::MalformedContainer(MalformedReason::NegativeField { value }))
}

fn clamp_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_is_correct() {
        // magic(4) + reserved(4) + reserved(4) + item_count(4) + data_size(4)
        assert_eq!(HEADER_SIZE, 20);
    }

    #[test]
    fn magic_bytes_on_disk() {
        assert_eq!(MAGIC.to_le_bytes(), [0xBA, 0xAD, 0xDF, 0xFA]);
    }

    #[test]
    fn header_roundtrip() {
        let header = MetaHeader {
            reserved1: 1,
            reserved2: 2,
            declared_items: 7,
            declared_data_size: 300,
        };
        assert_eq!(MetaHeader::decode(&header.encode()).unwrap(), header);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = MetaHeader::default().encode();
        bytes[0] = 0;
        let err = MetaHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, StoreError::BadMagic { .. }));
    }

    #[test]
    fn short_header_truncated() {
        let bytes = MetaHeader::default().encode();
        let err = MetaHeader::decode(&bytes[..12]).unwrap_err();
        assert!(matches!(err, StoreError::Truncated { .. }));
    }

    #[test]
    fn negative_count_is_malformed() {
        let mut bytes = MetaHeader::default().encode();
        bytes[12..16].copy_from_slice(&(-3i32).to_le_bytes());
        let err = MetaHeader::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            StoreError::MalformedContainer(MalformedReason::NegativeField { value: -3 })
        );
    }
}
