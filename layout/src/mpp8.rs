//! Layouts for the legacy generation (`MSProject.MPP8`).
//!
//! Each entity directory holds a `FixFix   0` record array and a
//! `FixDeferFix   0` deferred area. Sparse fields live in extended-data
//! item lists reached through a pointer in the fixed record; text items
//! are themselves pointers back into the deferred area.

use crate::calendar::{BaseRule, CalendarLayout, PeriodLayout, SpanWidth, WeekLayout};
use crate::descriptor::{
    AssignmentLayout, Decode, EntityLayout, FieldDescriptor, Interpret, LegacyWidth, Locator,
    RecordWidth, RelationLayout, RowSkip,
};
use crate::field::{AssignmentField, EntityKind, ResourceField, TaskField};
use crate::view::{TableLayout, ViewLayout};

/// Project directory below the container root.
pub const PROJECT_DIR: &str = "   1";

/// View directory below the container root.
pub const VIEW_DIR: &str = "   2";

/// Record array stream name inside an entity directory.
pub const FIXED_STREAM: &str = "FixFix   0";

/// Deferred area stream name inside an entity directory.
pub const DEFERRED_STREAM: &str = "FixDeferFix   0";

/// View property saying whether the project summary task is shown.
pub const SHOW_PROJECT_SUMMARY_TASK: i32 = 54_525_961;

const fn stamp<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Timestamp)
}

const fn coded<F>(field: F, offset: usize, interpret: Interpret) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Short).with(interpret)
}

const fn duration<F>(field: F, offset: usize, units: Locator) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Int).with(Interpret::Duration {
        units: Some(units),
    })
}

const fn work<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Long6).with(Interpret::Work { divisor: 100 })
}

const fn cost<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Long6).with(Interpret::Currency { divisor: 100 })
}

const fn rate<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Double).with(Interpret::Currency { divisor: 1 })
}

const fn units<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Int).with(Interpret::Units { divisor: 100 })
}

const fn flag<F>(field: F, offset: usize, mask: u8) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Flag(mask))
}

/// Custom flags are set only where both bytes carry the bit.
const fn custom_flag<F>(field: F, offset: usize, with: usize, mask: u8) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::FlagPair { mask, with })
}

const fn pointer_text<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::new(field, Locator::Deferred(offset), Decode::Text, Interpret::Plain)
}

const fn text<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Text)
}

const fn tagged_stamp<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Timestamp)
}

const fn number<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Double).with(Interpret::Number { divisor: 1 })
}

const fn long_cost<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Long).with(Interpret::Currency { divisor: 100 })
}

const fn tagged_duration<F>(field: F, tag: i16, units: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Int).with(Interpret::Duration {
        units: Some(Locator::Tagged(units)),
    })
}

const TASK_FIELDS: &[FieldDescriptor<TaskField>] = &[
    FieldDescriptor::fixed(TaskField::UniqueId, 0, Decode::Int),
    FieldDescriptor::fixed(TaskField::Id, 4, Decode::Int),
    FieldDescriptor::fixed(TaskField::OutlineLevel, 48, Decode::Short),
    pointer_text(TaskField::Name, 264),
    stamp(TaskField::Finish, 20),
    stamp(TaskField::LateStart, 24),
    stamp(TaskField::Resume, 32),
    stamp(TaskField::Start, 96),
    stamp(TaskField::ActualStart, 104),
    stamp(TaskField::ActualFinish, 108),
    stamp(TaskField::BaselineStart, 112),
    stamp(TaskField::BaselineFinish, 116),
    stamp(TaskField::ConstraintDate, 120),
    stamp(TaskField::Stop, 124),
    stamp(TaskField::Created, 138),
    stamp(TaskField::LateFinish, 160),
    duration(TaskField::Duration, 68, Locator::Fixed(72)),
    duration(TaskField::ActualDuration, 74, Locator::Fixed(72)),
    duration(TaskField::RemainingDuration, 78, Locator::Fixed(72)),
    duration(TaskField::BaselineDuration, 82, Locator::Fixed(72)),
    coded(TaskField::ConstraintType, 88, Interpret::Constraint),
    coded(TaskField::Priority, 128, Interpret::LegacyPriority),
    coded(TaskField::PercentComplete, 130, Interpret::Percent),
    coded(TaskField::PercentWorkComplete, 132, Interpret::Percent),
    coded(TaskField::Type, 134, Interpret::TaskKind),
    coded(TaskField::FixedCostAccrual, 136, Interpret::Accrue),
    work(TaskField::Work, 168),
    work(TaskField::BaselineWork, 174),
    work(TaskField::ActualWork, 180),
    work(TaskField::RemainingWork, 186),
    work(TaskField::ActualOvertimeWork, 192),
    work(TaskField::RemainingOvertimeWork, 198),
    cost(TaskField::OvertimeCost, 204),
    cost(TaskField::ActualOvertimeCost, 210),
    cost(TaskField::RemainingOvertimeCost, 216),
    cost(TaskField::Cost, 222),
    cost(TaskField::FixedCost, 228),
    cost(TaskField::ActualCost, 234),
    cost(TaskField::RemainingCost, 240),
    cost(TaskField::BaselineCost, 246),
    flag(TaskField::HideBar, 16, 0x01),
    flag(TaskField::EffortDriven, 17, 0x08),
    flag(TaskField::Marked, 13, 0x02),
    flag(TaskField::Milestone, 12, 0x01),
    flag(TaskField::Rollup, 15, 0x04),
    custom_flag(TaskField::Flag(1), 268, 303, 0x02),
    custom_flag(TaskField::Flag(2), 268, 303, 0x04),
    custom_flag(TaskField::Flag(3), 268, 303, 0x08),
    custom_flag(TaskField::Flag(4), 268, 303, 0x10),
    custom_flag(TaskField::Flag(5), 268, 303, 0x20),
    custom_flag(TaskField::Flag(6), 268, 303, 0x40),
    custom_flag(TaskField::Flag(7), 268, 303, 0x80),
    custom_flag(TaskField::Flag(8), 269, 304, 0x01),
    custom_flag(TaskField::Flag(9), 269, 304, 0x02),
    custom_flag(TaskField::Flag(10), 269, 304, 0x04),
    custom_flag(TaskField::Flag(11), 269, 304, 0x08),
    custom_flag(TaskField::Flag(12), 269, 304, 0x10),
    custom_flag(TaskField::Flag(13), 269, 304, 0x20),
    custom_flag(TaskField::Flag(14), 269, 304, 0x40),
    custom_flag(TaskField::Flag(15), 269, 304, 0x80),
    custom_flag(TaskField::Flag(16), 270, 305, 0x01),
    custom_flag(TaskField::Flag(17), 270, 305, 0x02),
    custom_flag(TaskField::Flag(18), 270, 305, 0x04),
    custom_flag(TaskField::Flag(19), 270, 305, 0x08),
    custom_flag(TaskField::Flag(20), 270, 305, 0x10),
    text(TaskField::Wbs, 104),
    text(TaskField::Contact, 105),
    text(TaskField::Notes, 247),
    text(TaskField::Text(1), 106),
    text(TaskField::Text(2), 107),
    text(TaskField::Text(3), 108),
    text(TaskField::Text(4), 109),
    text(TaskField::Text(5), 110),
    text(TaskField::Text(6), 111),
    text(TaskField::Text(7), 112),
    text(TaskField::Text(8), 113),
    text(TaskField::Text(9), 114),
    text(TaskField::Text(10), 115),
    text(TaskField::Text(11), 184),
    text(TaskField::Text(12), 185),
    text(TaskField::Text(13), 186),
    text(TaskField::Text(14), 187),
    text(TaskField::Text(15), 188),
    text(TaskField::Text(16), 189),
    text(TaskField::Text(17), 190),
    text(TaskField::Text(18), 191),
    text(TaskField::Text(19), 192),
    text(TaskField::Text(20), 193),
    text(TaskField::Text(21), 194),
    text(TaskField::Text(22), 195),
    text(TaskField::Text(23), 196),
    text(TaskField::Text(24), 197),
    text(TaskField::Text(25), 198),
    text(TaskField::Text(26), 199),
    text(TaskField::Text(27), 200),
    text(TaskField::Text(28), 201),
    text(TaskField::Text(29), 202),
    text(TaskField::Text(30), 203),
    tagged_stamp(TaskField::CustomStart(1), 116),
    tagged_stamp(TaskField::CustomStart(2), 118),
    tagged_stamp(TaskField::CustomStart(3), 120),
    tagged_stamp(TaskField::CustomStart(4), 122),
    tagged_stamp(TaskField::CustomStart(5), 124),
    tagged_stamp(TaskField::CustomStart(6), 126),
    tagged_stamp(TaskField::CustomStart(7), 128),
    tagged_stamp(TaskField::CustomStart(8), 130),
    tagged_stamp(TaskField::CustomStart(9), 132),
    tagged_stamp(TaskField::CustomStart(10), 134),
    tagged_stamp(TaskField::CustomFinish(1), 117),
    tagged_stamp(TaskField::CustomFinish(2), 119),
    tagged_stamp(TaskField::CustomFinish(3), 121),
    tagged_stamp(TaskField::CustomFinish(4), 123),
    tagged_stamp(TaskField::CustomFinish(5), 125),
    tagged_stamp(TaskField::CustomFinish(6), 127),
    tagged_stamp(TaskField::CustomFinish(7), 129),
    tagged_stamp(TaskField::CustomFinish(8), 131),
    tagged_stamp(TaskField::CustomFinish(9), 133),
    tagged_stamp(TaskField::CustomFinish(10), 135),
    number(TaskField::Number(1), 137),
    number(TaskField::Number(2), 138),
    number(TaskField::Number(3), 139),
    number(TaskField::Number(4), 140),
    number(TaskField::Number(5), 141),
    number(TaskField::Number(6), 142),
    number(TaskField::Number(7), 143),
    number(TaskField::Number(8), 144),
    number(TaskField::Number(9), 145),
    number(TaskField::Number(10), 146),
    number(TaskField::Number(11), 204),
    number(TaskField::Number(12), 205),
    number(TaskField::Number(13), 206),
    number(TaskField::Number(14), 207),
    number(TaskField::Number(15), 208),
    number(TaskField::Number(16), 209),
    number(TaskField::Number(17), 210),
    number(TaskField::Number(18), 211),
    number(TaskField::Number(19), 212),
    number(TaskField::Number(20), 213),
    tagged_duration(TaskField::CustomDuration(1), 147, 148),
    tagged_duration(TaskField::CustomDuration(2), 149, 150),
    tagged_duration(TaskField::CustomDuration(3), 151, 152),
    tagged_duration(TaskField::CustomDuration(4), 153, 154),
    tagged_duration(TaskField::CustomDuration(5), 155, 156),
    tagged_duration(TaskField::CustomDuration(6), 157, 158),
    tagged_duration(TaskField::CustomDuration(7), 159, 160),
    tagged_duration(TaskField::CustomDuration(8), 161, 162),
    tagged_duration(TaskField::CustomDuration(9), 163, 164),
    tagged_duration(TaskField::CustomDuration(10), 165, 166),
    tagged_stamp(TaskField::CustomDate(1), 174),
    tagged_stamp(TaskField::CustomDate(2), 175),
    tagged_stamp(TaskField::CustomDate(3), 176),
    tagged_stamp(TaskField::CustomDate(4), 177),
    tagged_stamp(TaskField::CustomDate(5), 178),
    tagged_stamp(TaskField::CustomDate(6), 179),
    tagged_stamp(TaskField::CustomDate(7), 180),
    tagged_stamp(TaskField::CustomDate(8), 181),
    tagged_stamp(TaskField::CustomDate(9), 182),
    tagged_stamp(TaskField::CustomDate(10), 183),
    long_cost(TaskField::CustomCost(1), 237),
    long_cost(TaskField::CustomCost(2), 238),
    long_cost(TaskField::CustomCost(3), 239),
    long_cost(TaskField::CustomCost(4), 240),
    long_cost(TaskField::CustomCost(5), 241),
    long_cost(TaskField::CustomCost(6), 242),
    long_cost(TaskField::CustomCost(7), 243),
    long_cost(TaskField::CustomCost(8), 244),
    long_cost(TaskField::CustomCost(9), 245),
    long_cost(TaskField::CustomCost(10), 246),
];

/// Task records come in one of two widths.
pub static TASKS: EntityLayout<TaskField> = EntityLayout {
    kind: EntityKind::Task,
    directory: "TBkndTask",
    records: RecordWidth::Legacy(LegacyWidth::either(316, 366)),
    unique_id: 0,
    unique_id_width: Decode::Int,
    leading_rows: 0,
    skip: &[
        RowSkip::DeletedMarker { offset: 272 },
        RowSkip::FixedBits { offset: 8, mask: 0x01 },
    ],
    extended: Some(312),
    calendar: None,
    fields: TASK_FIELDS,
};

const RESOURCE_FIELDS: &[FieldDescriptor<ResourceField>] = &[
    FieldDescriptor::fixed(ResourceField::UniqueId, 0, Decode::Int),
    FieldDescriptor::fixed(ResourceField::Id, 4, Decode::Int),
    pointer_text(ResourceField::Name, 156),
    pointer_text(ResourceField::Initials, 160),
    coded(ResourceField::AccrueAt, 20, Interpret::Accrue),
    stamp(ResourceField::AvailableFrom, 28),
    stamp(ResourceField::AvailableTo, 32),
    rate(ResourceField::StandardRate, 36),
    rate(ResourceField::OvertimeRate, 44),
    units(ResourceField::MaxUnits, 52),
    units(ResourceField::PeakUnits, 110),
    work(ResourceField::Work, 56),
    work(ResourceField::ActualWork, 62),
    work(ResourceField::BaselineWork, 68),
    work(ResourceField::OvertimeWork, 74),
    work(ResourceField::RemainingWork, 86),
    work(ResourceField::RegularWork, 92),
    cost(ResourceField::CostPerUse, 80),
    cost(ResourceField::ActualCost, 114),
    cost(ResourceField::Cost, 120),
    cost(ResourceField::BaselineCost, 126),
    cost(ResourceField::RemainingCost, 132),
    cost(ResourceField::OvertimeCost, 138),
    cost(ResourceField::ActualOvertimeCost, 144),
    cost(ResourceField::RemainingOvertimeCost, 150),
    text(ResourceField::Group, 61),
    text(ResourceField::Code, 62),
    text(ResourceField::EmailAddress, 63),
    text(ResourceField::Notes, 169),
    text(ResourceField::Text(1), 64),
    text(ResourceField::Text(2), 65),
    text(ResourceField::Text(3), 66),
    text(ResourceField::Text(4), 67),
    text(ResourceField::Text(5), 68),
    text(ResourceField::Text(6), 69),
    text(ResourceField::Text(7), 70),
    text(ResourceField::Text(8), 71),
    text(ResourceField::Text(9), 72),
    text(ResourceField::Text(10), 73),
    text(ResourceField::Text(11), 74),
    text(ResourceField::Text(12), 75),
    text(ResourceField::Text(13), 76),
    text(ResourceField::Text(14), 77),
    text(ResourceField::Text(15), 78),
    text(ResourceField::Text(16), 79),
    text(ResourceField::Text(17), 80),
    text(ResourceField::Text(18), 81),
    text(ResourceField::Text(19), 82),
    text(ResourceField::Text(20), 83),
    text(ResourceField::Text(21), 84),
    text(ResourceField::Text(22), 85),
    text(ResourceField::Text(23), 86),
    text(ResourceField::Text(24), 87),
    text(ResourceField::Text(25), 88),
    text(ResourceField::Text(26), 89),
    text(ResourceField::Text(27), 90),
    text(ResourceField::Text(28), 91),
    text(ResourceField::Text(29), 92),
    text(ResourceField::Text(30), 93),
    tagged_stamp(ResourceField::CustomStart(1), 94),
    tagged_stamp(ResourceField::CustomStart(2), 95),
    tagged_stamp(ResourceField::CustomStart(3), 96),
    tagged_stamp(ResourceField::CustomStart(4), 97),
    tagged_stamp(ResourceField::CustomStart(5), 98),
    tagged_stamp(ResourceField::CustomStart(6), 99),
    tagged_stamp(ResourceField::CustomStart(7), 100),
    tagged_stamp(ResourceField::CustomStart(8), 101),
    tagged_stamp(ResourceField::CustomStart(9), 102),
    tagged_stamp(ResourceField::CustomStart(10), 103),
    tagged_stamp(ResourceField::CustomFinish(1), 104),
    tagged_stamp(ResourceField::CustomFinish(2), 105),
    tagged_stamp(ResourceField::CustomFinish(3), 106),
    tagged_stamp(ResourceField::CustomFinish(4), 107),
    tagged_stamp(ResourceField::CustomFinish(5), 108),
    tagged_stamp(ResourceField::CustomFinish(6), 109),
    tagged_stamp(ResourceField::CustomFinish(7), 110),
    tagged_stamp(ResourceField::CustomFinish(8), 111),
    tagged_stamp(ResourceField::CustomFinish(9), 112),
    tagged_stamp(ResourceField::CustomFinish(10), 113),
    number(ResourceField::Number(1), 114),
    number(ResourceField::Number(2), 115),
    number(ResourceField::Number(3), 116),
    number(ResourceField::Number(4), 117),
    number(ResourceField::Number(5), 118),
    number(ResourceField::Number(6), 119),
    number(ResourceField::Number(7), 120),
    number(ResourceField::Number(8), 121),
    number(ResourceField::Number(9), 122),
    number(ResourceField::Number(10), 123),
    number(ResourceField::Number(11), 124),
    number(ResourceField::Number(12), 125),
    number(ResourceField::Number(13), 126),
    number(ResourceField::Number(14), 127),
    number(ResourceField::Number(15), 128),
    number(ResourceField::Number(16), 129),
    number(ResourceField::Number(17), 130),
    number(ResourceField::Number(18), 131),
    number(ResourceField::Number(19), 132),
    number(ResourceField::Number(20), 133),
    tagged_duration(ResourceField::CustomDuration(1), 134, 144),
    tagged_duration(ResourceField::CustomDuration(2), 135, 145),
    tagged_duration(ResourceField::CustomDuration(3), 136, 146),
    tagged_duration(ResourceField::CustomDuration(4), 137, 147),
    tagged_duration(ResourceField::CustomDuration(5), 138, 148),
    tagged_duration(ResourceField::CustomDuration(6), 139, 149),
    tagged_duration(ResourceField::CustomDuration(7), 140, 150),
    tagged_duration(ResourceField::CustomDuration(8), 141, 151),
    tagged_duration(ResourceField::CustomDuration(9), 142, 152),
    tagged_duration(ResourceField::CustomDuration(10), 143, 153),
    tagged_stamp(ResourceField::CustomDate(1), 157),
    tagged_stamp(ResourceField::CustomDate(2), 158),
    tagged_stamp(ResourceField::CustomDate(3), 159),
    tagged_stamp(ResourceField::CustomDate(4), 160),
    tagged_stamp(ResourceField::CustomDate(5), 161),
    tagged_stamp(ResourceField::CustomDate(6), 162),
    tagged_stamp(ResourceField::CustomDate(7), 163),
    tagged_stamp(ResourceField::CustomDate(8), 164),
    tagged_stamp(ResourceField::CustomDate(9), 165),
    tagged_stamp(ResourceField::CustomDate(10), 166),
    long_cost(ResourceField::CustomCost(1), 170),
    long_cost(ResourceField::CustomCost(2), 171),
    long_cost(ResourceField::CustomCost(3), 172),
    long_cost(ResourceField::CustomCost(4), 173),
    long_cost(ResourceField::CustomCost(5), 174),
    long_cost(ResourceField::CustomCost(6), 175),
    long_cost(ResourceField::CustomCost(7), 176),
    long_cost(ResourceField::CustomCost(8), 177),
    long_cost(ResourceField::CustomCost(9), 178),
    long_cost(ResourceField::CustomCost(10), 179),
];

pub static RESOURCES: EntityLayout<ResourceField> = EntityLayout {
    kind: EntityKind::Resource,
    directory: "TBkndRsc",
    records: RecordWidth::Legacy(LegacyWidth::fixed(196)),
    unique_id: 0,
    unique_id_width: Decode::Int,
    leading_rows: 0,
    skip: &[
        RowSkip::FixedBits { offset: 8, mask: 0x01 },
        RowSkip::FixedShortNonZero { offset: 164 },
    ],
    extended: Some(192),
    calendar: Some(24),
    fields: RESOURCE_FIELDS,
};

/// Task dependencies. Valid files may omit the directory.
pub static RELATIONS: RelationLayout = RelationLayout {
    directory: "TBkndCons",
    records: RecordWidth::Legacy(LegacyWidth::fixed(36)),
    ordinal: None,
    predecessor: 12,
    successor: 16,
    kind: 20,
    lag_units: 22,
    lag: 24,
    skip: &[RowSkip::FixedIntNonZero { offset: 28 }],
    meta_offset: None,
    optional: true,
};

const ASSIGNMENT_FIELDS: &[FieldDescriptor<AssignmentField>] = &[
    stamp(AssignmentField::Start, 24),
    stamp(AssignmentField::Finish, 28),
    FieldDescriptor::fixed(AssignmentField::Units, 80, Decode::Short)
        .with(Interpret::Units { divisor: 100 }),
    work(AssignmentField::Work, 84),
    work(AssignmentField::OvertimeWork, 90),
    work(AssignmentField::ActualWork, 96),
    work(AssignmentField::RemainingWork, 114),
    cost(AssignmentField::Cost, 132),
    cost(AssignmentField::ActualCost, 138),
];

/// Assignment records are 204 or 238 bytes; see the reader's width
/// heuristic.
pub static ASSIGNMENTS: AssignmentLayout = AssignmentLayout {
    directory: "TBkndAssn",
    records: RecordWidth::Legacy(LegacyWidth::either(204, 238)),
    task: 16,
    resource: 20,
    skip: &[],
    meta_offset: None,
    fields: ASSIGNMENT_FIELDS,
};

pub static CALENDARS: CalendarLayout = CalendarLayout {
    directory: "TBkndCal",
    records: RecordWidth::Legacy(LegacyWidth::fixed(36)),
    block: 36,
    id: 0,
    base_id: 4,
    resource: None,
    extended: Some(32),
    name: Locator::Deferred(20),
    data: Locator::TaggedPointer(8),
    base_rule: BaseRule::PositiveIsDerived,
    min_id: 0,
    week: WeekLayout {
        first_day: 4,
        day_stride: 40,
        default_flag: 0,
        day_periods: PeriodLayout {
            count: 2,
            starts: 8,
            durations: 16,
        },
        exception_count: 0,
        first_exception: 4 + 40 * 7,
        exception_stride: 44,
        exception_from: 0,
        exception_to: 2,
        exception_periods: PeriodLayout {
            count: 6,
            starts: 12,
            durations: 20,
        },
        span: SpanWidth::Long,
        derived_default_inherits: false,
    },
};

pub static VIEWS: ViewLayout = ViewLayout {
    directory: "CV_iew",
    width: 138,
    id: 0,
    name: 4,
};

pub static TABLES: TableLayout = TableLayout {
    directory: "CTable",
    width: 126,
    id: 0,
    name: 4,
    extended: 122,
    columns: 8,
    column_count: 4,
    first_column: 8,
    column_stride: 12,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deferred_pointers() {
        assert_eq!(
            TASKS.descriptor(&TaskField::Name).map(|d| d.locator),
            Some(Locator::Deferred(264))
        );
        assert_eq!(
            RESOURCES.descriptor(&ResourceField::Initials).map(|d| d.locator),
            Some(Locator::Deferred(160))
        );
    }

    #[test]
    fn custom_flags_pair_bytes() {
        let d = TASKS.descriptor(&TaskField::Flag(8)).unwrap();
        assert_eq!(d.locator, Locator::Fixed(269));
        assert_eq!(d.decode, Decode::FlagPair { mask: 0x01, with: 304 });
        let d = TASKS.descriptor(&TaskField::Flag(1)).unwrap();
        assert_eq!(d.decode, Decode::FlagPair { mask: 0x02, with: 303 });
    }

    #[test]
    fn priority_is_stepped() {
        let d = TASKS.descriptor(&TaskField::Priority).unwrap();
        assert_eq!(d.interpret, Interpret::LegacyPriority);
    }

    #[test]
    fn task_rows_skip_deleted_and_blank() {
        let mut record = vec![0u8; 316];
        assert!(!TASKS.skips(&record, None));
        record[272] = 0x01;
        assert!(TASKS.skips(&record, None));
        record[272] = 0x31;
        assert!(!TASKS.skips(&record, None));
        record[8] = 0x01;
        assert!(TASKS.skips(&record, None));
    }

    #[test]
    fn resource_rows_skip_flagged() {
        let mut record = vec![0u8; 196];
        assert!(!RESOURCES.skips(&record, None));
        record[164] = 2;
        assert!(RESOURCES.skips(&record, None));
    }

    #[test]
    fn calendar_week_is_legacy_shaped() {
        assert_eq!(CALENDARS.week.first_exception, 284);
        assert!(!CALENDARS.week.derived_default_inherits);
    }
}
