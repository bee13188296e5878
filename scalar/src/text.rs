//! Null-terminated string decoders.

use crate::error::{ScalarError, ScalarResult};

/// Reads a two-byte-per-character string starting at `offset`.
///
/// Decoding stops at the first zero code unit or at the end of the slice,
/// whichever comes first. A trailing odd byte is ignored. An offset equal to
/// the slice length yields an empty string; an offset past it is truncated.
pub fn get_utf16(buf: &[u8], offset: usize) -> ScalarResult<String> {
    let tail = buf
        .get(offset..)
        .ok_or_else(|| ScalarError::truncated(offset, 0, buf.len()))?;
    let units: Vec<u16> = tail
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

/// Reads a single-byte string starting at `offset`, stopping at a zero byte
/// or the end of the slice. Bytes map to the first 256 code points.
pub fn get_ansi(buf: &[u8], offset: usize) -> ScalarResult<String> {
    let tail = buf
        .get(offset..)
        .ok_or_else(|| ScalarError::truncated(offset, 0, buf.len()))?;
    Ok(tail
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect())
}

/// Removes menu accelerator markers (`&`) from a label.
#[must_use]
pub fn strip_ampersands(label: &str) -> String {
    label.chars().filter(|&c| c != '&').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn utf16_stops_at_zero_unit() {
        let mut buf = utf16("Task");
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&utf16("junk"));
        assert_eq!(get_utf16(&buf, 0).unwrap(), "Task");
    }

    #[test]
    fn utf16_unterminated_reads_whole_slice() {
        let buf = utf16("Design");
        assert_eq!(get_utf16(&buf, 0).unwrap(), "Design");
    }

    #[test]
    fn utf16_odd_trailing_byte_ignored() {
        let mut buf = utf16("ab");
        buf.push(b'c');
        assert_eq!(get_utf16(&buf, 0).unwrap(), "ab");
    }

    #[test]
    fn utf16_at_offset() {
        let mut buf = vec![0xAA, 0xBB];
        buf.extend_from_slice(&utf16("x"));
        assert_eq!(get_utf16(&buf, 2).unwrap(), "x");
    }

    #[test]
    fn utf16_offset_at_end_is_empty() {
        let buf = utf16("x");
        assert_eq!(get_utf16(&buf, 2).unwrap(), "");
    }

    #[test]
    fn utf16_offset_past_end_is_truncated() {
        let buf = utf16("x");
        assert!(matches!(
            get_utf16(&buf, 3),
            Err(ScalarError::Truncated { offset: 3, .. })
        ));
    }

    #[test]
    fn ansi_stops_at_nul() {
        let buf = b"MSProject.MPP9\0tail";
        assert_eq!(get_ansi(buf, 0).unwrap(), "MSProject.MPP9");
        assert_eq!(get_ansi(buf, 10).unwrap(), "MPP9");
    }

    #[test]
    fn ansi_high_bytes_map_to_latin1() {
        assert_eq!(get_ansi(&[0xE9], 0).unwrap(), "\u{e9}");
    }

    #[test]
    fn ampersands_removed() {
        assert_eq!(strip_ampersands("&Entry"), "Entry");
        assert_eq!(strip_ampersands("Cost && Work"), "Cost  Work");
    }
}
