//! Positional little-endian integer and float decoders.
//!
//! Every function takes `(slice, offset)` and either returns the value or
//! [`ScalarError::Truncated`]. Nothing here ever indexes past the slice.

use crate::error::{ScalarError, ScalarResult};

/// Returns `len` bytes starting at `offset`.
pub fn get_bytes(buf: &[u8], offset: usize, len: usize) -> ScalarResult<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| ScalarError::truncated(offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| ScalarError::truncated(offset, len, buf.len()))
}

fn get_array<const N: usize>(buf: &[u8], offset: usize) -> ScalarResult<[u8; N]> {
    let bytes = get_bytes(buf, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Reads a single byte.
pub fn get_u8(buf: &[u8], offset: usize) -> ScalarResult<u8> {
    buf.get(offset)
        .copied()
        .ok_or_else(|| ScalarError::truncated(offset, 1, buf.len()))
}

/// Reads an unsigned 16-bit value.
pub fn get_u16(buf: &[u8], offset: usize) -> ScalarResult<u16> {
    get_array::<2>(buf, offset).map(u16::from_le_bytes)
}

/// Reads a signed 16-bit value.
pub fn get_i16(buf: &[u8], offset: usize) -> ScalarResult<i16> {
    get_array::<2>(buf, offset).map(i16::from_le_bytes)
}

/// Reads an unsigned 32-bit value.
pub fn get_u32(buf: &[u8], offset: usize) -> ScalarResult<u32> {
    get_array::<4>(buf, offset).map(u32::from_le_bytes)
}

/// Reads a signed 32-bit value.
pub fn get_i32(buf: &[u8], offset: usize) -> ScalarResult<i32> {
    get_array::<4>(buf, offset).map(i32::from_le_bytes)
}

/// Reads an unsigned 64-bit value.
pub fn get_u64(buf: &[u8], offset: usize) -> ScalarResult<u64> {
    get_array::<8>(buf, offset).map(u64::from_le_bytes)
}

/// Reads a signed 48-bit value stored in six bytes.
///
/// Legacy records pack cost and work amounts this way.
pub fn get_long6(buf: &[u8], offset: usize) -> ScalarResult<i64> {
    let raw = get_array::<6>(buf, offset)?;
    let mut wide = [0u8; 8];
    wide[..6].copy_from_slice(&raw);
    if raw[5] & 0x80 != 0 {
        wide[6] = 0xFF;
        wide[7] = 0xFF;
    }
    Ok(i64::from_le_bytes(wide))
}

/// Reads an IEEE-754 double from its 64-bit pattern.
pub fn get_f64(buf: &[u8], offset: usize) -> ScalarResult<f64> {
    get_u64(buf, offset).map(f64::from_bits)
}

/// Converts a fixed-point integer to a float by dividing by `scale`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fixed_point(raw: i64, scale: u32) -> f64 {
    if scale == 0 {
        return raw as f64;
    }
    raw as f64 / f64::from(scale)
}
