//! Legacy single-stream stores: fixed record arrays (`FixFix`) and the
//! deferred variable area (`FixDeferFix`).

use scalar::{get_i32, get_utf16};
use tracing::{debug, warn};

use crate::error::{MalformedReason, StoreError, StoreResult};
use crate::limits::StoreLimits;
use crate::offset::Offset;
use crate::state::StreamState;

/// Chunk alignment inside the deferred area.
pub const DEFER_ALIGN: usize = 32;

/// A header-less array of `width`-byte records.
///
/// The stream length stands in for the declared size; a non-zero
/// [`remainder`](Self::remainder) signals that the writer used another
/// record width.
#[derive(Debug, Clone)]
pub struct FixFix {
    width: usize,
    count: usize,
    remainder: usize,
    data: Vec<u8>,
}

impl FixFix {
    /// Splits `data` into `width`-byte records.
    pub fn decode(data: &[u8], width: usize, limits: &StoreLimits) -> StoreResult<Self> {
        if width == 0 {
            return Err(StoreError::MalformedContainer(MalformedReason::ZeroWidth));
        }
        limits.check_stream(data.len())?;
        let count = data.len() / width;
        limits.check_items(count)?;
        Ok(Self {
            width,
            count,
            remainder: data.len() % width,
            data: data.to_vec(),
        })
    }

    /// Decodes with `primary`, retrying with `alternate` when the stream
    /// length is not a multiple of `primary`.
    pub fn decode_with_alternate(
        data: &[u8],
        primary: usize,
        alternate: usize,
        limits: &StoreLimits,
    ) -> StoreResult<Self> {
        let first = Self::decode(data, primary, limits)?;
        if first.remainder == 0 {
            return Ok(first);
        }
        debug!(
            primary,
            alternate,
            remainder = first.remainder,
            "legacy record width mismatch, retrying"
        );
        Self::decode(data, alternate, limits)
    }

    /// Returns the record width used.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of whole records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the bytes left over after the last whole record.
    #[must_use]
    pub const fn remainder(&self) -> usize {
        self.remainder
    }

    /// Returns `true` if the stream length is also a multiple of `width`.
    #[must_use]
    pub fn divisible_by(&self, width: usize) -> bool {
        width != 0 && self.data.len() % width == 0
    }

    /// Returns the raw stream, for re-decoding at another width.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns `StreamState::Complete` for an exact fit, otherwise
    /// `PartiallyDecoded` (trailing bytes were ignored).
    #[must_use]
    pub const fn state(&self) -> StreamState {
        StreamState::HeaderValidated
            .advance()
            .finish(self.remainder == 0)
    }

    /// Returns record `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&[u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.width;
        self.data.get(start..start + self.width)
    }

    /// Iterates over records in stream order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.width)
    }
}

/// The deferred variable area: `(len:i32, payload, pad)` chunks addressed
/// purely by byte offset.
#[derive(Debug, Clone, Default)]
pub struct FixDeferFix {
    data: Vec<u8>,
    chunks: usize,
    state: StreamState,
}

impl FixDeferFix {
    /// Takes ownership of the stream and walks its chunk chain once to
    /// establish the stream state. Lookups never depend on the walk.
    pub fn decode(data: &[u8], limits: &StoreLimits) -> StoreResult<Self> {
        limits.check_stream(data.len())?;
        let (chunks, complete) = walk(data);
        if !complete {
            warn!(chunks, len = data.len(), "deferred area chain broken");
        }
        Ok(Self {
            data: data.to_vec(),
            chunks,
            state: StreamState::HeaderValidated.advance().finish(complete),
        })
    }

    /// Returns the stream state reached by the chunk walk.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Returns the number of chunks found by the walk.
    #[must_use]
    pub const fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Returns the payload of the chunk at `offset`.
    #[must_use]
    pub fn get(&self, offset: Offset) -> Option<&[u8]> {
        chunk_at(&self.data, offset.get())
    }

    /// Returns the payload at `offset` decoded as a UTF-16 string.
    #[must_use]
    pub fn text(&self, offset: Offset) -> Option<String> {
        self.get(offset).and_then(|b| get_utf16(b, 0).ok())
    }

    /// Iterates over `(offset, payload)` along the chunk chain.
    pub fn chunks(&self) -> impl Iterator<Item = (Offset, &[u8])> + '_ {
        let mut pos = 0usize;
        std::iter::from_fn(move || {
            let payload = chunk_at(&self.data, pos)?;
            let here = pos;
            pos = next_chunk(here, payload.len());
            Some((Offset::new(here), payload))
        })
    }
}

fn chunk_at(data: &[u8], offset: usize) -> Option<&[u8]> {
    let len = usize::try_from(get_i32(data, offset).ok()?).ok()?;
    let start = offset.checked_add(4)?;
    data.get(start..start.checked_add(len)?)
}

fn next_chunk(offset: usize, len: usize) -> usize {
    let end = offset + 4 + len;
    end.div_ceil(DEFER_ALIGN) * DEFER_ALIGN
}

fn walk(data: &[u8]) -> (usize, bool) {
    let mut pos = 0usize;
    let mut chunks = 0usize;
    while pos < data.len() {
        match chunk_at(data, pos) {
            Some(payload) => {
                chunks += 1;
                pos = next_chunk(pos, payload.len());
            }
            None => return (chunks, false),
        }
    }
    (chunks, true)
}

/// Builds a deferred area chunk by chunk.
#[derive(Debug, Clone, Default)]
pub struct FixDeferFixWriter {
    data: Vec<u8>,
}

impl FixDeferFixWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns its offset.
    pub fn push(&mut self, payload: &[u8]) -> Offset {
        let offset = self.data.len();
        let len = i32::try_from(payload.len()).unwrap_or(i32::MAX);
        self.data.extend_from_slice(&len.to_le_bytes());
        self.data.extend_from_slice(payload);
        let padded = next_chunk(offset, payload.len());
        self.data.resize(padded, 0);
        Offset::new(offset)
    }

    /// Appends a UTF-16 string chunk with a terminator.
    pub fn push_text(&mut self, text: &str) -> Offset {
        let mut payload: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        payload.extend_from_slice(&[0, 0]);
        self.push(&payload)
    }

    /// Returns the finished stream.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        self.data.clone()
    }
}
