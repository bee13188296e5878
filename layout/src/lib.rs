//! Field identifiers and field-descriptor tables for project files.
//!
//! This crate is the data half of entity hydration:
//! - The field identifier space ([`FieldId`] and the per-kind enums)
//! - Value types fields decode into ([`FieldValue`], [`Duration`], enums)
//! - Per-generation descriptor tables ([`Generation`], [`mpp8`], [`mpp9`])
//! - Calendar and view/table record layouts with their decoders
//! - Deterministic layout hashing and table validation
//!
//! # Design Principles
//!
//! - **Tables, not code** - A generation is described by `'static` data; the
//!   reader walks the tables and never branches on the generation itself.
//! - **Absent is normal** - Sentinel dates, empty strings and unknown codes
//!   decode to `None`; only reads past the end of a record are errors.
//! - **Deterministic hashing** - [`layout_hash`] is stable for a given set of
//!   tables.

mod calendar;
mod descriptor;
mod error;
mod field;
mod generation;
mod hash;
pub mod mpp8;
pub mod mpp9;
pub mod properties;
mod value;
mod view;

pub use calendar::{
    standard_week, BaseRule, CalendarException, CalendarLayout, CalendarParent, DayDefinition,
    PeriodLayout, SpanWidth, TimeRange, WeekLayout, MAX_PERIODS,
};
pub use descriptor::{
    AssignmentLayout, Decode, EntityLayout, FieldDescriptor, Interpret, LegacyWidth, Locator,
    RawValue, RecordWidth, RelationLayout, RowSkip,
};
pub use error::{validate, LayoutError, LayoutResult};
pub use field::{
    custom, AssignmentField, CalendarField, EnglishNames, EntityKind, FieldId, FieldNames,
    ProjectField, ResourceField, TaskField,
};
pub use generation::Generation;
pub use hash::layout_hash;
pub use value::{
    AccrueType, ConstraintType, CurrencyPlacement, Duration, DurationContext, FieldValue,
    Priority, RelationType, ScheduleFrom, TaskType, TimeUnit, Weekday,
};
pub use view::{
    Alignment, ColumnDefinition, TableDefinition, TableLayout, ViewDefinition, ViewLayout,
};
