//! Row access over either generation's record stores.
//!
//! A [`Row`] bundles everything a field locator can point at: the fixed
//! record, its metadata record, the entity's tagged fields and the legacy
//! deferred area. Hydration reads every field through [`Row::read`] and
//! never looks at the store shape.

use layout::{mpp8, Decode, Locator, RawValue, RecordWidth};
use scalar::get_i32;
use store::{
    ExtendedData, ExtendedView, FixDeferFix, FixFix, FixedMeta, FixedStore, NoTags, Offset,
    StoreLimits, StreamState, TaggedSource, VarStore,
};
use tracing::{debug, trace};

use crate::container::{display_path, Container};
use crate::error::{ReadError, ReadResult};

pub(crate) const VAR_META: &str = "VarMeta";
pub(crate) const VAR_DATA: &str = "Var2Data";
pub(crate) const FIXED_META: &str = "FixedMeta";
pub(crate) const FIXED_DATA: &str = "FixedData";

const NO_TAGS: NoTags = NoTags;

/// One record and the sources its fields may live in.
#[derive(Clone, Copy)]
pub(crate) struct Row<'a> {
    pub index: usize,
    pub fixed: &'a [u8],
    pub meta: Option<&'a [u8]>,
    pub tagged: &'a dyn TaggedSource,
    pub deferred: Option<&'a FixDeferFix>,
}

impl<'a> Row<'a> {
    /// The same row with `fixed` standing in for the fixed record.
    pub fn narrowed(self, fixed: &'a [u8]) -> Self {
        Self { fixed, ..self }
    }

    /// Returns the bytes `locator` points at.
    ///
    /// `entity` keys tagged lookups. Pointer locators follow the stored
    /// offset into the deferred area.
    pub fn bytes(&self, entity: i32, locator: Locator) -> Option<&'a [u8]> {
        match locator {
            Locator::Fixed(_) => Some(self.fixed),
            Locator::Meta(_) => self.meta,
            Locator::Tagged(tag) => self.tagged.blob(entity, tag),
            Locator::TaggedPointer(tag) => {
                let blob = self.tagged.blob(entity, tag)?;
                self.follow(get_i32(blob, 0).ok()?)
            }
            Locator::Deferred(offset) => self.follow(get_i32(self.fixed, offset).ok()?),
            Locator::Property(_) => None,
        }
    }

    fn follow(&self, stored: i32) -> Option<&'a [u8]> {
        let offset = Offset::from_stored(stored)?;
        self.deferred?.get(offset)
    }

    /// Reads one raw value. Absent and truncated values are both `None`.
    pub fn read(&self, entity: i32, locator: Locator, decode: Decode) -> Option<RawValue> {
        if let (Locator::Tagged(tag), Decode::Text) = (locator, decode) {
            return self
                .tagged
                .text(entity, tag)
                .filter(|t| !t.is_empty())
                .map(RawValue::Text);
        }
        let bytes = self.bytes(entity, locator)?;
        match decode.read(bytes, locator.offset()) {
            Ok(value) => value,
            Err(err) => {
                trace!(row = self.index, ?locator, %err, "field out of range");
                None
            }
        }
    }
}

/// Which rows to visit and how to find their fixed records.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RowPlan {
    pub leading_rows: usize,
    /// Metadata int holding the data offset of the row's fixed record.
    pub meta_offset: Option<usize>,
    /// Fixed-record offset of the legacy extended-data pointer.
    pub extended: Option<usize>,
}

/// The stores backing one entity directory.
#[derive(Debug, Clone)]
pub(crate) enum Records {
    Indexed {
        tagged: Option<VarStore>,
        /// Why `tagged` is empty although its streams exist.
        tag_error: Option<ReadError>,
        meta: FixedMeta,
        fixed: FixedStore,
    },
    Legacy {
        fixed: FixFix,
        deferred: FixDeferFix,
    },
}

impl Records {
    pub fn state(&self) -> StreamState {
        match self {
            Self::Indexed { fixed, .. } => fixed.state(),
            Self::Legacy { fixed, .. } => fixed.state(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Indexed { meta, .. } => meta.len(),
            Self::Legacy { fixed, .. } => fixed.len(),
        }
    }

    /// Decode failure of the tagged store. Rows of such a store carry
    /// their fixed fields only.
    pub fn tag_error(&self) -> Option<&ReadError> {
        match self {
            Self::Indexed { tag_error, .. } => tag_error.as_ref(),
            Self::Legacy { .. } => None,
        }
    }

    /// Width of legacy records, `None` for indexed stores.
    pub fn legacy_width(&self) -> Option<usize> {
        match self {
            Self::Indexed { .. } => None,
            Self::Legacy { fixed, .. } => Some(fixed.width()),
        }
    }

    /// Re-splits a legacy record array at another width.
    pub fn rewidth(&self, width: usize, limits: &StoreLimits, stream: &str) -> ReadResult<Self> {
        match self {
            Self::Legacy { fixed, deferred } => Ok(Self::Legacy {
                fixed: FixFix::decode(fixed.raw(), width, limits)
                    .map_err(|e| ReadError::store(stream, e))?,
                deferred: deferred.clone(),
            }),
            Self::Indexed { .. } => Ok(self.clone()),
        }
    }

    /// Returns `true` if the stream length divides by `width`. Always
    /// `false` for indexed stores.
    pub fn divisible_by(&self, width: usize) -> bool {
        match self {
            Self::Indexed { .. } => false,
            Self::Legacy { fixed, .. } => !fixed.raw().is_empty() && fixed.divisible_by(width),
        }
    }

    /// Calls `visit` for every row the plan selects, in store order.
    ///
    /// Rows whose fixed record cannot be located are passed over.
    pub fn for_each_row(&self, plan: RowPlan, mut visit: impl FnMut(Row<'_>)) {
        match self {
            Self::Indexed {
                tagged,
                meta,
                fixed,
                ..
            } => {
                let tagged: &dyn TaggedSource = match tagged {
                    Some(store) => store,
                    None => &NO_TAGS,
                };
                for index in plan.leading_rows..meta.len() {
                    let meta_item = meta.item(index);
                    let item = match plan.meta_offset {
                        Some(at) => meta_item
                            .and_then(|m| get_i32(m, at).ok())
                            .and_then(|o| usize::try_from(o).ok())
                            .and_then(|o| fixed.index_of_offset(o))
                            .and_then(|i| fixed.item(i)),
                        None => fixed.item(index),
                    };
                    let Some(item) = item else {
                        trace!(index, "row has no fixed record");
                        continue;
                    };
                    visit(Row {
                        index,
                        fixed: item,
                        meta: meta_item,
                        tagged,
                        deferred: None,
                    });
                }
            }
            Self::Legacy { fixed, deferred } => {
                for (index, item) in fixed.iter().enumerate().skip(plan.leading_rows) {
                    let pointer = plan
                        .extended
                        .and_then(|at| get_i32(item, at).ok())
                        .and_then(Offset::from_stored);
                    let ext = ExtendedData::load(deferred, pointer);
                    let view = ExtendedView::new(&ext, deferred);
                    visit(Row {
                        index,
                        fixed: item,
                        meta: None,
                        tagged: &view,
                        deferred: Some(deferred),
                    });
                }
            }
        }
    }
}

/// Opens streams below one root directory of the container.
pub(crate) struct Streams<'c> {
    container: &'c dyn Container,
    limits: &'c StoreLimits,
}

impl<'c> Streams<'c> {
    pub fn new(container: &'c dyn Container, limits: &'c StoreLimits) -> Self {
        Self { container, limits }
    }

    pub const fn limits(&self) -> &'c StoreLimits {
        self.limits
    }

    /// Reads the stream at `path`, `None` if absent.
    pub fn open(&self, path: &[&str]) -> ReadResult<Option<Vec<u8>>> {
        let data = self.container.open_stream(path)?;
        if let Some(data) = &data {
            debug!(path = %display_path(path), bytes = data.len(), "stream opened");
        }
        Ok(data)
    }

    /// Reads the stream at `path`, failing if absent.
    pub fn require(&self, path: &[&str]) -> ReadResult<Vec<u8>> {
        self.open(path)?.ok_or_else(|| ReadError::MissingStream {
            path: display_path(path),
        })
    }

    /// Opens the stores of `root/directory`.
    ///
    /// Returns `None` when the directory's primary stream is absent. A
    /// legacy array with two candidate widths is split at the primary
    /// width unless only the alternate divides the stream.
    pub fn records(
        &self,
        root: &str,
        directory: &str,
        width: RecordWidth,
    ) -> ReadResult<Option<Records>> {
        let limits = self.limits;
        match width {
            RecordWidth::Legacy(width) => {
                let fixed_path = [root, directory, mpp8::FIXED_STREAM];
                let Some(data) = self.open(&fixed_path)? else {
                    return Ok(None);
                };
                let fixed = match width.alternate {
                    Some(alternate) => {
                        FixFix::decode_with_alternate(&data, width.primary, alternate, limits)
                    }
                    None => FixFix::decode(&data, width.primary, limits),
                }
                .map_err(|e| ReadError::store(display_path(&fixed_path), e))?;

                let deferred_path = [root, directory, mpp8::DEFERRED_STREAM];
                let deferred = match self.open(&deferred_path)? {
                    Some(data) => FixDeferFix::decode(&data, limits)
                        .map_err(|e| ReadError::store(display_path(&deferred_path), e))?,
                    None => FixDeferFix::default(),
                };
                Ok(Some(Records::Legacy { fixed, deferred }))
            }
            RecordWidth::Meta { meta }
            | RecordWidth::MetaSized { meta, .. }
            | RecordWidth::MetaChunked { meta, .. } => {
                let meta_path = [root, directory, FIXED_META];
                let Some(meta_data) = self.open(&meta_path)? else {
                    return Ok(None);
                };
                let meta_store = FixedMeta::decode(&meta_data, meta, limits)
                    .map_err(|e| ReadError::store(display_path(&meta_path), e))?;

                let data_path = [root, directory, FIXED_DATA];
                let data = self.require(&data_path)?;
                let fixed = match width {
                    RecordWidth::MetaSized { item, .. } => {
                        FixedStore::from_meta_sized(&meta_store, &data, item, limits)
                    }
                    RecordWidth::MetaChunked { item, .. } => FixedStore::chunked(&data, item, limits),
                    _ => FixedStore::from_meta(&meta_store, &data, limits),
                }
                .map_err(|e| ReadError::store(display_path(&data_path), e))?;

                let (tagged, tag_error) = match self.tagged(root, directory) {
                    Ok(tagged) => (tagged, None),
                    Err(error) if error.is_fatal() => return Err(error),
                    Err(error) => (None, Some(error)),
                };
                Ok(Some(Records::Indexed {
                    tagged,
                    tag_error,
                    meta: meta_store,
                    fixed,
                }))
            }
        }
    }

    fn tagged(&self, root: &str, directory: &str) -> ReadResult<Option<VarStore>> {
        let meta_path = [root, directory, VAR_META];
        let data_path = [root, directory, VAR_DATA];
        let (Some(meta), Some(data)) = (self.open(&meta_path)?, self.open(&data_path)?) else {
            return Ok(None);
        };
        VarStore::decode(&meta, &data, self.limits)
            .map(Some)
            .map_err(|e| ReadError::store(display_path(&meta_path), e))
    }
}
