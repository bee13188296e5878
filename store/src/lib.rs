//! Record stores for project file streams.
//!
//! A project file keeps its entities in a handful of stream shapes. This
//! crate decodes each shape into a read-only store and knows nothing about
//! what the records mean:
//!
//! - [`VarStore`]: directory-indexed tagged blobs (`VarMeta` + `Var2Data`).
//! - [`FixedMeta`] / [`FixedStore`]: fixed-width record arrays with a
//!   separate metadata stream.
//! - [`FixFix`] / [`FixDeferFix`]: the legacy single-stream record array and
//!   its offset-addressed deferred area, plus [`ExtendedData`] item lists.
//! - [`PropertyBag`]: file-level settings in either generation's shape.
//! - [`CompObj`]: the identity stream used to pick a generation.
//!
//! # Design Principles
//!
//! - **Bounded decoding** - Declared counts and sizes are checked against
//!   both the stream length and [`StoreLimits`] before anything is built.
//! - **Fail per stream** - A malformed stream is an error for that stream
//!   only; partially readable streams decode what they can and report
//!   [`StreamState::PartiallyDecoded`].
//! - **Absent is not an error** - Missing keys and out-of-range indexes
//!   return `None`.
//! - **Read-only after construction** - Stores are built once and shared.

mod compobj;
mod error;
mod extended;
mod fixed;
mod header;
mod legacy;
mod limits;
mod offset;
mod props;
mod state;
mod tagged;
mod var;

pub use compobj::{CompObj, PREAMBLE_SIZE};
pub use error::{LimitKind, MalformedReason, StoreError, StoreResult};
pub use extended::{ExtendedData, ExtendedDataWriter, ExtendedView};
pub use fixed::{FixedMeta, FixedStore, FixedStoreWriter, META_OFFSET_POS};
pub use header::{MetaHeader, HEADER_SIZE, MAGIC};
pub use legacy::{FixDeferFix, FixDeferFixWriter, FixFix, DEFER_ALIGN};
pub use limits::StoreLimits;
pub use offset::Offset;
pub use props::{
    LegacyEntryShape, PropertyBag, PropertyBagWriter, PropsShape, CURRENT_HEADER_SIZE,
    FIXED4_TYPE, LEGACY_HEADER_SIZE,
};
pub use state::StreamState;
pub use tagged::{NoTags, TaggedSource};
pub use var::{TaggedKey, VarStore, VarStoreWriter, VAR_ENTRY_SIZE};
