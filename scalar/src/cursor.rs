//! Sequential byte cursor with bounded operations.

use crate::bytes;
use crate::error::{ScalarError, ScalarResult};

/// A forward cursor over a byte slice.
///
/// All reads are bounds-checked and advance the position only on success.
/// The cursor never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Creates a cursor at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the underlying slice.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Moves to an absolute position (which may equal the slice length).
    pub fn seek(&mut self, pos: usize) -> ScalarResult<()> {
        if pos > self.data.len() {
            return Err(ScalarError::truncated(pos, 0, self.data.len()));
        }
        self.pos = pos;
        Ok(())
    }

    /// Skips `len` bytes.
    pub fn skip(&mut self, len: usize) -> ScalarResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> ScalarResult<&'a [u8]> {
        let out = bytes::get_bytes(self.data, self.pos, len)?;
        self.pos += len;
        Ok(out)
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> ScalarResult<u8> {
        self.step(1, bytes::get_u8)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> ScalarResult<u16> {
        self.step(2, bytes::get_u16)
    }

    /// Reads a little-endian `i16`.
    pub fn read_i16(&mut self) -> ScalarResult<i16> {
        self.step(2, bytes::get_i16)
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> ScalarResult<u32> {
        self.step(4, bytes::get_u32)
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> ScalarResult<i32> {
        self.step(4, bytes::get_i32)
    }

    /// Advances to the next multiple of `align` bytes, or to the end of the
    /// slice if the boundary lies beyond it.
    pub fn align_to(&mut self, align: usize) {
        if align == 0 {
            return;
        }
        let rem = self.pos % align;
        if rem != 0 {
            self.pos = (self.pos + align - rem).min(self.data.len());
        }
    }

    fn step<T>(&mut self, width: usize, f: fn(&[u8], usize) -> ScalarResult<T>) -> ScalarResult<T> {
        let value = f(self.data, self.pos)?;
        self.pos += width;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cursor() {
        let cursor = ByteCursor::new(&[]);
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn sequential_reads() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFE, 0xFF];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert!(cursor.is_empty());
    }

    #[test]
    fn failed_read_does_not_advance() {
        let mut cursor = ByteCursor::new(&[1, 2, 3]);
        cursor.skip(1).unwrap();
        assert!(cursor.read_i32().is_err());
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 0x0302);
    }

    #[test]
    fn seek_bounds() {
        let mut cursor = ByteCursor::new(&[0; 4]);
        cursor.seek(4).unwrap();
        assert!(cursor.is_empty());
        assert!(cursor.seek(5).is_err());
    }

    #[test]
    fn align_to_boundary() {
        let mut cursor = ByteCursor::new(&[0; 40]);
        cursor.skip(5).unwrap();
        cursor.align_to(32);
        assert_eq!(cursor.position(), 32);
        cursor.align_to(32);
        assert_eq!(cursor.position(), 32);
        cursor.skip(1).unwrap();
        cursor.align_to(32);
        assert_eq!(cursor.position(), 40);
    }

    #[test]
    fn read_bytes_borrows_slice() {
        let data = [9, 8, 7, 6];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(1).unwrap();
        assert_eq!(cursor.read_bytes(2).unwrap(), &[8, 7]);
        assert_eq!(cursor.remaining(), 1);
    }
}
