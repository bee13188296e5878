//! Field descriptors: where a field lives and how its bytes become a value.
//!
//! A descriptor is three independent steps. A [`Locator`] names the byte
//! source, a [`Decode`] reads a raw scalar from it, and an [`Interpret`]
//! turns the raw scalar into a typed [`FieldValue`]. Tables of descriptors
//! are plain `'static` data; nothing here performs I/O.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scalar::{
    get_date, get_f64, get_i16, get_i32, get_long6, get_time, get_timestamp, get_u16, get_u64,
    get_u8, get_utf16, ScalarResult,
};

use crate::field::EntityKind;
use crate::value::{
    AccrueType, ConstraintType, CurrencyPlacement, DurationContext, FieldValue, Priority,
    ScheduleFrom, TaskType, TimeUnit, Weekday,
};

/// Where a field's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Offset into the entity's fixed record.
    Fixed(usize),
    /// Offset into the entity's fixed metadata record.
    Meta(usize),
    /// Tag in the entity's tagged store (or legacy extended item type).
    Tagged(i16),
    /// Legacy extended item holding a pointer to a deferred chunk.
    TaggedPointer(i16),
    /// Fixed-record offset holding a pointer to a deferred chunk.
    Deferred(usize),
    /// Key in the project property bag.
    Property(i32),
}

impl Locator {
    /// Offset within the located bytes at which the value starts.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Fixed(offset) | Self::Meta(offset) => offset,
            Self::Tagged(_) | Self::TaggedPointer(_) | Self::Deferred(_) | Self::Property(_) => 0,
        }
    }
}

/// How the located bytes are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decode {
    Byte,
    Short,
    Int,
    Long6,
    /// Eight-byte signed integer.
    Long,
    Double,
    Date,
    Time,
    Timestamp,
    /// Two-byte-per-character, NUL-terminated.
    Text,
    /// Byte tested against a mask.
    Flag(u8),
    /// Byte at the offset AND byte at `with`, tested against `mask`.
    FlagPair { mask: u8, with: usize },
    /// Byte at the offset is a boolean.
    Bool,
}

/// A scalar read from the wire, before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i64),
    Double(f64),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Text(String),
    Bool(bool),
}

impl RawValue {
    /// Numeric view of integer and double values.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view, saturated to 16 bits for code lookups.
    #[must_use]
    pub fn as_code(&self) -> Option<i16> {
        match self {
            Self::Int(v) => Some(i16::try_from(*v).unwrap_or(if *v < 0 {
                i16::MIN
            } else {
                i16::MAX
            })),
            _ => None,
        }
    }

    /// Integer view saturated to 32 bits.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(i32::try_from(*v).unwrap_or(if *v < 0 {
                i32::MIN
            } else {
                i32::MAX
            })),
            _ => None,
        }
    }
}

impl Decode {
    /// Reads a raw value at `offset`.
    ///
    /// Sentinel dates and empty strings are `Ok(None)`. Only a read past
    /// the end of `buf` is an error.
    pub fn read(self, buf: &[u8], offset: usize) -> ScalarResult<Option<RawValue>> {
        let value = match self {
            Self::Byte => RawValue::Int(i64::from(get_u8(buf, offset)?)),
            Self::Short => RawValue::Int(i64::from(get_i16(buf, offset)?)),
            Self::Int => RawValue::Int(i64::from(get_i32(buf, offset)?)),
            Self::Long6 => RawValue::Int(get_long6(buf, offset)?),
            Self::Long => RawValue::Int(i64::from_le_bytes(get_u64(buf, offset)?.to_le_bytes())),
            Self::Double => RawValue::Double(get_f64(buf, offset)?),
            Self::Date => match get_date(buf, offset)? {
                Some(date) => RawValue::Date(date),
                None => return Ok(None),
            },
            Self::Time => RawValue::Time(get_time(buf, offset)?),
            Self::Timestamp => match get_timestamp(buf, offset)? {
                Some(stamp) => RawValue::Timestamp(stamp),
                None => return Ok(None),
            },
            Self::Text => {
                let text = get_utf16(buf, offset)?;
                if text.is_empty() {
                    return Ok(None);
                }
                RawValue::Text(text)
            }
            Self::Flag(mask) => RawValue::Bool(get_u8(buf, offset)? & mask != 0),
            Self::FlagPair { mask, with } => {
                RawValue::Bool(get_u8(buf, offset)? & get_u8(buf, with)? & mask != 0)
            }
            Self::Bool => RawValue::Bool(get_u8(buf, offset)? != 0),
        };
        Ok(Some(value))
    }
}

/// How a raw value becomes a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpret {
    /// Kept as read: integers, dates, text, booleans.
    Plain,
    /// Scaled number.
    Number { divisor: u32 },
    /// Scaled currency amount.
    Currency { divisor: u32 },
    /// Scaled work, in hours.
    Work { divisor: u32 },
    /// Scaled resource units, 1.0 is 100%.
    Units { divisor: u32 },
    Percent,
    /// Raw tenths of a minute, converted into the unit read from `units`.
    Duration { units: Option<Locator> },
    Priority,
    /// Legacy priority step code.
    LegacyPriority,
    Constraint,
    TaskKind,
    Accrue,
    ScheduleFrom,
    CurrencyPlacement,
    TimeUnit,
    Weekday,
}

impl Interpret {
    /// Applies the interpretation.
    ///
    /// `units` is the decoded unit for [`Interpret::Duration`], defaulting to
    /// days when absent. Returns `None` when the raw value has the wrong
    /// shape or an enumeration code is unknown.
    #[must_use]
    pub fn apply(
        self,
        raw: RawValue,
        units: Option<TimeUnit>,
        ctx: &DurationContext,
    ) -> Option<FieldValue> {
        match self {
            Self::Plain => Some(match raw {
                RawValue::Int(_) => FieldValue::Int(raw.as_i32()?),
                RawValue::Double(v) => FieldValue::Number(v),
                RawValue::Date(v) => FieldValue::Date(v),
                RawValue::Time(v) => FieldValue::Time(v),
                RawValue::Timestamp(v) => FieldValue::Timestamp(v),
                RawValue::Text(v) => FieldValue::Text(v),
                RawValue::Bool(v) => FieldValue::Bool(v),
            }),
            Self::Number { divisor } => Some(FieldValue::Number(scaled(&raw, divisor)?)),
            Self::Currency { divisor } => Some(FieldValue::Currency(scaled(&raw, divisor)?)),
            Self::Work { divisor } => Some(FieldValue::Work(scaled(&raw, divisor)?)),
            Self::Units { divisor } => Some(FieldValue::Units(scaled(&raw, divisor)?)),
            Self::Percent => Some(FieldValue::Percent(raw.as_code()?)),
            Self::Duration { .. } => Some(FieldValue::Duration(
                ctx.adjust(raw.as_f64()?, units.unwrap_or_default()),
            )),
            Self::Priority => Some(FieldValue::Priority(Priority::new(raw.as_i32()?))),
            Self::LegacyPriority => Some(FieldValue::Priority(Priority::from_legacy(
                raw.as_code()?,
            ))),
            Self::Constraint => ConstraintType::from_code(raw.as_code()?).map(FieldValue::Constraint),
            Self::TaskKind => TaskType::from_code(raw.as_code()?).map(FieldValue::TaskType),
            Self::Accrue => Some(FieldValue::Accrue(AccrueType::from_code(raw.as_code()?))),
            Self::ScheduleFrom => {
                ScheduleFrom::from_code(raw.as_code()?).map(FieldValue::ScheduleFrom)
            }
            Self::CurrencyPlacement => {
                CurrencyPlacement::from_code(raw.as_code()?).map(FieldValue::CurrencyPlacement)
            }
            Self::TimeUnit => Some(FieldValue::TimeUnit(TimeUnit::from_code(raw.as_code()?))),
            Self::Weekday => Weekday::from_code(raw.as_code()?).map(FieldValue::Weekday),
        }
    }

    /// Locator of the unit field a duration depends on.
    #[must_use]
    pub const fn units_locator(self) -> Option<Locator> {
        match self {
            Self::Duration { units } => units,
            _ => None,
        }
    }
}

fn scaled(raw: &RawValue, divisor: u32) -> Option<f64> {
    let divisor = if divisor == 0 { 1 } else { divisor };
    raw.as_f64().map(|v| v / f64::from(divisor))
}

/// One field's wire location and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor<F> {
    pub field: F,
    pub locator: Locator,
    pub decode: Decode,
    pub interpret: Interpret,
}

impl<F> FieldDescriptor<F> {
    #[must_use]
    pub const fn new(field: F, locator: Locator, decode: Decode, interpret: Interpret) -> Self {
        Self {
            field,
            locator,
            decode,
            interpret,
        }
    }

    /// Fixed-record field kept as read.
    #[must_use]
    pub const fn fixed(field: F, offset: usize, decode: Decode) -> Self {
        Self::new(field, Locator::Fixed(offset), decode, Interpret::Plain)
    }

    /// Tagged field kept as read.
    #[must_use]
    pub const fn tagged(field: F, tag: i16, decode: Decode) -> Self {
        Self::new(field, Locator::Tagged(tag), decode, Interpret::Plain)
    }

    /// Property bag field.
    #[must_use]
    pub const fn property(field: F, key: i32, decode: Decode, interpret: Interpret) -> Self {
        Self::new(field, Locator::Property(key), decode, interpret)
    }

    /// Replaces the interpretation.
    #[must_use]
    pub const fn with(mut self, interpret: Interpret) -> Self {
        self.interpret = interpret;
        self
    }
}

/// A predicate that drops a row before any field is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSkip {
    /// Fixed record shorter than the given length.
    ShorterThan(usize),
    /// Metadata int at `offset` equals one of `values`.
    MetaIntIn {
        offset: usize,
        values: &'static [i32],
    },
    /// Metadata byte at `offset` is non-zero.
    MetaByteNonZero { offset: usize },
    /// Metadata short at `offset` is non-zero.
    MetaShortNonZero { offset: usize },
    /// Fixed byte at `offset` has any bit of `mask` set.
    FixedBits { offset: usize, mask: u8 },
    /// Fixed short at `offset` is non-zero.
    FixedShortNonZero { offset: usize },
    /// Fixed int at `offset` is non-zero.
    FixedIntNonZero { offset: usize },
    /// Legacy deleted-row marker in the fixed short at `offset`.
    DeletedMarker { offset: usize },
}

/// Marker values that look deleted but belong to live rows.
const LIVE_MARKERS: [u16; 2] = [0x0031, 0x203D];

impl RowSkip {
    /// Returns `true` if the row should be dropped.
    ///
    /// A row whose tested bytes are missing is dropped too.
    #[must_use]
    pub fn matches(self, fixed: &[u8], meta: Option<&[u8]>) -> bool {
        let meta = meta.unwrap_or(&[]);
        match self {
            Self::ShorterThan(len) => fixed.len() < len,
            Self::MetaIntIn { offset, values } => {
                get_i32(meta, offset).map_or(true, |v| values.contains(&v))
            }
            Self::MetaByteNonZero { offset } => get_u8(meta, offset).map_or(true, |v| v != 0),
            Self::MetaShortNonZero { offset } => get_i16(meta, offset).map_or(true, |v| v != 0),
            Self::FixedBits { offset, mask } => {
                get_u8(fixed, offset).map_or(true, |v| v & mask != 0)
            }
            Self::FixedShortNonZero { offset } => get_i16(fixed, offset).map_or(true, |v| v != 0),
            Self::FixedIntNonZero { offset } => get_i32(fixed, offset).map_or(true, |v| v != 0),
            Self::DeletedMarker { offset } => get_u16(fixed, offset).map_or(true, |v| {
                v & 0xC0 == 0 && v & 0x03 != 0 && !LIVE_MARKERS.contains(&v)
            }),
        }
    }
}

/// Legacy record width with an optional second candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacyWidth {
    pub primary: usize,
    pub alternate: Option<usize>,
}

impl LegacyWidth {
    #[must_use]
    pub const fn fixed(primary: usize) -> Self {
        Self {
            primary,
            alternate: None,
        }
    }

    #[must_use]
    pub const fn either(primary: usize, alternate: usize) -> Self {
        Self {
            primary,
            alternate: Some(alternate),
        }
    }
}

/// How an entity's records are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordWidth {
    /// Metadata records of width `meta`; data sizes from offset deltas.
    Meta { meta: usize },
    /// Metadata records of width `meta`; every data item is `item` bytes.
    MetaSized { meta: usize, item: usize },
    /// Metadata records of width `meta`; data cut into `item`-byte chunks.
    MetaChunked { meta: usize, item: usize },
    /// Legacy single-stream array plus deferred area.
    Legacy(LegacyWidth),
}

/// Table-driven description of one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityLayout<F: 'static> {
    pub kind: EntityKind,
    /// Directory inside the project directory holding the streams.
    pub directory: &'static str,
    pub records: RecordWidth,
    /// Fixed-record offset of the unique id.
    pub unique_id: usize,
    /// `Decode::Short` where only 16 bits of the id are stored.
    pub unique_id_width: Decode,
    /// Rows at the start of the store that never hold entities.
    pub leading_rows: usize,
    pub skip: &'static [RowSkip],
    /// Fixed-record offset of the legacy extended-data pointer.
    pub extended: Option<usize>,
    /// Fixed-record offset of the id of the entity's own calendar.
    pub calendar: Option<usize>,
    pub fields: &'static [FieldDescriptor<F>],
}

impl<F: 'static> EntityLayout<F> {
    /// Returns `true` if any skip rule drops the row.
    #[must_use]
    pub fn skips(&self, fixed: &[u8], meta: Option<&[u8]>) -> bool {
        self.skip.iter().any(|rule| rule.matches(fixed, meta))
    }

    /// Reads the unique id from a fixed record.
    #[must_use]
    pub fn read_unique_id(&self, fixed: &[u8]) -> Option<i32> {
        self.unique_id_width
            .read(fixed, self.unique_id)
            .ok()
            .flatten()
            .and_then(|raw| raw.as_i32())
    }

    /// Returns the descriptor for `field`, if the table has one.
    pub fn descriptor(&self, field: &F) -> Option<&FieldDescriptor<F>>
    where
        F: PartialEq,
    {
        self.fields.iter().find(|d| d.field == *field)
    }
}

/// Where a relation record keeps its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationLayout {
    pub directory: &'static str,
    pub records: RecordWidth,
    /// Unique id that must strictly increase; `None` when the format has none.
    pub ordinal: Option<usize>,
    pub predecessor: usize,
    pub successor: usize,
    pub kind: usize,
    pub lag_units: usize,
    pub lag: usize,
    pub skip: &'static [RowSkip],
    /// Metadata int holding the data offset of the row, when rows are
    /// addressed through metadata.
    pub meta_offset: Option<usize>,
    /// The stream may be absent without it being an error.
    pub optional: bool,
}

/// Where an assignment record keeps its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssignmentLayout {
    pub directory: &'static str,
    pub records: RecordWidth,
    pub task: usize,
    pub resource: usize,
    pub skip: &'static [RowSkip],
    pub meta_offset: Option<usize>,
    pub fields: &'static [FieldDescriptor<crate::field::AssignmentField>],
}
