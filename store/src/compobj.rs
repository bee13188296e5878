//! Identity stream parsing.
//!
//! The container's `CompObj` stream names the writing application and the
//! file format. Only the format string matters for dispatch.

use scalar::{get_ansi, ByteCursor};

use crate::error::{MalformedReason, StoreError, StoreResult};

/// Bytes of fixed preamble before the first string.
pub const PREAMBLE_SIZE: usize = 28;

/// Parsed identity stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompObj {
    /// Human readable application name, e.g. `Microsoft Project 9.0`.
    pub application_name: String,
    /// Format tag, e.g. `MSProject.MPP9`.
    pub format: String,
    /// Program id; older writers omit it.
    pub application_id: Option<String>,
}

impl CompObj {
    /// Parses the identity stream.
    ///
    /// The application name and format are required; the application id is
    /// read only if bytes remain.
    pub fn decode(data: &[u8]) -> StoreResult<Self> {
        let mut cursor = ByteCursor::new(data);
        cursor.skip(PREAMBLE_SIZE)?;
        let application_name = read_string(&mut cursor)?;
        let format = read_string(&mut cursor)?;
        let application_id = if cursor.remaining() >= 4 {
            Some(read_string(&mut cursor)?).filter(|s| !s.is_empty())
        } else {
            None
        };
        Ok(Self {
            application_name,
            format,
            application_id,
        })
    }

    /// Encodes in the same layout, for synthetic containers.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; PREAMBLE_SIZE];
        write_string(&mut out, &self.application_name);
        write_string(&mut out, &self.format);
        if let Some(id) = &self.application_id {
            write_string(&mut out, id);
        }
        out
    }
}

fn read_string(cursor: &mut ByteCursor<'_>) -> StoreResult<String> {
    let len = cursor.read_i32()?;
    let len = usize::try_from(len)
        .map_err(|_| StoreError::MalformedContainer(MalformedReason::NegativeField { value: len }))?;
    let raw = cursor.read_bytes(len)?;
    // length includes the trailing NUL; get_ansi stops there
    Ok(get_ansi(raw, 0)?)
}

fn write_string(out: &mut Vec<u8>, value: &str) {
    let bytes: Vec<u8> = value
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    let len = i32::try_from(bytes.len() + 1).unwrap_or(i32::MAX);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&bytes);
    out.push(0);
}
