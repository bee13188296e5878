//! Layouts for the newer generation (`MSProject.MPP9`).
//!
//! Entities live in a directory per kind holding `VarMeta`/`Var2Data`
//! (tagged fields) and `FixedMeta`/`FixedData` (fixed records).

use crate::calendar::{BaseRule, CalendarLayout, PeriodLayout, SpanWidth, WeekLayout};
use crate::descriptor::{
    AssignmentLayout, Decode, EntityLayout, FieldDescriptor, Interpret, Locator, RecordWidth,
    RelationLayout, RowSkip,
};
use crate::field::{AssignmentField, EntityKind, ResourceField, TaskField};

/// Project directory below the container root.
pub const PROJECT_DIR: &str = "   19";

/// View directory below the container root.
pub const VIEW_DIR: &str = "   29";

/// Property holding the working week used when a base calendar has none.
pub const DEFAULT_CALENDAR_HOURS: i32 = 37_753_736;

const MINIMUM_TASK_SIZE: usize = 240;
const MINIMUM_RESOURCE_SIZE: usize = 188;

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
    FieldDescriptor::fixed(field, offset, Decode::Double).with(Interpret::Work { divisor: 60_000 })
}

const fn cost<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Double).with(Interpret::Currency { divisor: 100 })
}

const fn rate<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Double).with(Interpret::Currency { divisor: 1 })
}

const fn units<F>(field: F, offset: usize) -> FieldDescriptor<F> {
    FieldDescriptor::fixed(field, offset, Decode::Double).with(Interpret::Units { divisor: 100 })
}

const fn meta_flag<F>(field: F, offset: usize, mask: u8) -> FieldDescriptor<F> {
    FieldDescriptor::new(field, Locator::Meta(offset), Decode::Flag(mask), Interpret::Plain)
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

const fn tagged_work<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Double).with(Interpret::Work { divisor: 60_000 })
}

const fn tagged_cost<F>(field: F, tag: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Double).with(Interpret::Currency { divisor: 100 })
}

const fn tagged_duration<F>(field: F, tag: i16, units: i16) -> FieldDescriptor<F> {
    FieldDescriptor::tagged(field, tag, Decode::Int).with(Interpret::Duration {
        units: Some(Locator::Tagged(units)),
    })
}

const TASK_FIELDS: &[FieldDescriptor<TaskField>] = &[
    FieldDescriptor::fixed(TaskField::UniqueId, 0, Decode::Int),
    FieldDescriptor::fixed(TaskField::Id, 4, Decode::Int),
    FieldDescriptor::fixed(TaskField::OutlineLevel, 40, Decode::Short),
    stamp(TaskField::Finish, 8),
    stamp(TaskField::LateStart, 12),
    stamp(TaskField::Stop, 16),
    stamp(TaskField::Resume, 20),
    stamp(TaskField::Start, 88),
    stamp(TaskField::ActualStart, 96),
    stamp(TaskField::ActualFinish, 100),
    stamp(TaskField::BaselineStart, 104),
    stamp(TaskField::BaselineFinish, 108),
    stamp(TaskField::ConstraintDate, 112),
    stamp(TaskField::Created, 130),
    stamp(TaskField::LateFinish, 152),
    stamp(TaskField::Deadline, 164),
    duration(TaskField::Duration, 60, Locator::Fixed(64)),
    duration(TaskField::ActualDuration, 66, Locator::Fixed(64)),
    duration(TaskField::RemainingDuration, 70, Locator::Fixed(64)),
    duration(TaskField::BaselineDuration, 74, Locator::Fixed(78)),
    coded(TaskField::ConstraintType, 80, Interpret::Constraint),
    coded(TaskField::Priority, 120, Interpret::Priority),
    coded(TaskField::PercentComplete, 122, Interpret::Percent),
    coded(TaskField::PercentWorkComplete, 124, Interpret::Percent),
    coded(TaskField::Type, 126, Interpret::TaskKind),
    coded(TaskField::FixedCostAccrual, 128, Interpret::Accrue),
    work(TaskField::Work, 168),
    work(TaskField::BaselineWork, 176),
    work(TaskField::ActualWork, 184),
    work(TaskField::RemainingWork, 192),
    cost(TaskField::Cost, 200),
    cost(TaskField::FixedCost, 208),
    cost(TaskField::ActualCost, 216),
    cost(TaskField::RemainingCost, 224),
    cost(TaskField::BaselineCost, 232),
    meta_flag(TaskField::EffortDriven, 11, 0x10),
    meta_flag(TaskField::Milestone, 8, 0x20),
    meta_flag(TaskField::Marked, 9, 0x40),
    meta_flag(TaskField::Rollup, 10, 0x08),
    meta_flag(TaskField::HideBar, 10, 0x80),
    meta_flag(TaskField::Flag(1), 37, 0x20),
    meta_flag(TaskField::Flag(2), 37, 0x40),
    meta_flag(TaskField::Flag(3), 37, 0x80),
    meta_flag(TaskField::Flag(4), 38, 0x01),
    meta_flag(TaskField::Flag(5), 38, 0x02),
    meta_flag(TaskField::Flag(6), 38, 0x04),
    meta_flag(TaskField::Flag(7), 38, 0x08),
    meta_flag(TaskField::Flag(8), 38, 0x10),
    meta_flag(TaskField::Flag(9), 38, 0x20),
    meta_flag(TaskField::Flag(10), 38, 0x40),
    meta_flag(TaskField::Flag(11), 38, 0x80),
    meta_flag(TaskField::Flag(12), 39, 0x01),
    meta_flag(TaskField::Flag(13), 39, 0x02),
    meta_flag(TaskField::Flag(14), 39, 0x04),
    meta_flag(TaskField::Flag(15), 39, 0x08),
    meta_flag(TaskField::Flag(16), 39, 0x10),
    meta_flag(TaskField::Flag(17), 39, 0x20),
    meta_flag(TaskField::Flag(18), 39, 0x40),
    meta_flag(TaskField::Flag(19), 39, 0x80),
    meta_flag(TaskField::Flag(20), 40, 0x01),
    text(TaskField::Wbs, 10),
    text(TaskField::Name, 11),
    text(TaskField::Contact, 12),
    text(TaskField::Notes, 144),
    tagged_work(TaskField::ActualOvertimeWork, 3),
    tagged_work(TaskField::RemainingOvertimeWork, 4),
    tagged_cost(TaskField::OvertimeCost, 5),
    tagged_cost(TaskField::ActualOvertimeCost, 6),
    tagged_cost(TaskField::RemainingOvertimeCost, 7),
    text(TaskField::Text(1), 14),
    text(TaskField::Text(2), 15),
    text(TaskField::Text(3), 16),
    text(TaskField::Text(4), 17),
    text(TaskField::Text(5), 18),
    text(TaskField::Text(6), 19),
    text(TaskField::Text(7), 20),
    text(TaskField::Text(8), 21),
    text(TaskField::Text(9), 22),
    text(TaskField::Text(10), 23),
    text(TaskField::Text(11), 90),
    text(TaskField::Text(12), 91),
    text(TaskField::Text(13), 92),
    text(TaskField::Text(14), 93),
    text(TaskField::Text(15), 94),
    text(TaskField::Text(16), 95),
    text(TaskField::Text(17), 96),
    text(TaskField::Text(18), 97),
    text(TaskField::Text(19), 98),
    text(TaskField::Text(20), 99),
    text(TaskField::Text(21), 100),
    text(TaskField::Text(22), 101),
    text(TaskField::Text(23), 102),
    text(TaskField::Text(24), 103),
    text(TaskField::Text(25), 104),
    text(TaskField::Text(26), 105),
    text(TaskField::Text(27), 106),
    text(TaskField::Text(28), 107),
    text(TaskField::Text(29), 108),
    text(TaskField::Text(30), 109),
    tagged_stamp(TaskField::CustomStart(1), 24),
    tagged_stamp(TaskField::CustomStart(2), 26),
    tagged_stamp(TaskField::CustomStart(3), 28),
    tagged_stamp(TaskField::CustomStart(4), 30),
    tagged_stamp(TaskField::CustomStart(5), 32),
    tagged_stamp(TaskField::CustomStart(6), 34),
    tagged_stamp(TaskField::CustomStart(7), 36),
    tagged_stamp(TaskField::CustomStart(8), 38),
    tagged_stamp(TaskField::CustomStart(9), 40),
    tagged_stamp(TaskField::CustomStart(10), 42),
    tagged_stamp(TaskField::CustomFinish(1), 25),
    tagged_stamp(TaskField::CustomFinish(2), 27),
    tagged_stamp(TaskField::CustomFinish(3), 29),
    tagged_stamp(TaskField::CustomFinish(4), 31),
    tagged_stamp(TaskField::CustomFinish(5), 33),
    tagged_stamp(TaskField::CustomFinish(6), 35),
    tagged_stamp(TaskField::CustomFinish(7), 37),
    tagged_stamp(TaskField::CustomFinish(8), 39),
    tagged_stamp(TaskField::CustomFinish(9), 41),
    tagged_stamp(TaskField::CustomFinish(10), 43),
    number(TaskField::Number(1), 45),
    number(TaskField::Number(2), 46),
    number(TaskField::Number(3), 47),
    number(TaskField::Number(4), 48),
    number(TaskField::Number(5), 49),
    number(TaskField::Number(6), 50),
    number(TaskField::Number(7), 51),
    number(TaskField::Number(8), 52),
    number(TaskField::Number(9), 53),
    number(TaskField::Number(10), 54),
    number(TaskField::Number(11), 110),
    number(TaskField::Number(12), 111),
    number(TaskField::Number(13), 112),
    number(TaskField::Number(14), 113),
    number(TaskField::Number(15), 114),
    number(TaskField::Number(16), 115),
    number(TaskField::Number(17), 116),
    number(TaskField::Number(18), 117),
    number(TaskField::Number(19), 118),
    number(TaskField::Number(20), 119),
    tagged_duration(TaskField::CustomDuration(1), 55, 56),
    tagged_duration(TaskField::CustomDuration(2), 57, 58),
    tagged_duration(TaskField::CustomDuration(3), 59, 60),
    tagged_duration(TaskField::CustomDuration(4), 61, 62),
    tagged_duration(TaskField::CustomDuration(5), 63, 64),
    tagged_duration(TaskField::CustomDuration(6), 65, 66),
    tagged_duration(TaskField::CustomDuration(7), 67, 68),
    tagged_duration(TaskField::CustomDuration(8), 69, 70),
    tagged_duration(TaskField::CustomDuration(9), 71, 72),
    tagged_duration(TaskField::CustomDuration(10), 73, 74),
    tagged_stamp(TaskField::CustomDate(1), 80),
    tagged_stamp(TaskField::CustomDate(2), 81),
    tagged_stamp(TaskField::CustomDate(3), 82),
    tagged_stamp(TaskField::CustomDate(4), 83),
    tagged_stamp(TaskField::CustomDate(5), 84),
    tagged_stamp(TaskField::CustomDate(6), 85),
    tagged_stamp(TaskField::CustomDate(7), 86),
    tagged_stamp(TaskField::CustomDate(8), 87),
    tagged_stamp(TaskField::CustomDate(9), 88),
    tagged_stamp(TaskField::CustomDate(10), 89),
    tagged_cost(TaskField::CustomCost(1), 134),
    tagged_cost(TaskField::CustomCost(2), 135),
    tagged_cost(TaskField::CustomCost(3), 136),
    tagged_cost(TaskField::CustomCost(4), 137),
    tagged_cost(TaskField::CustomCost(5), 138),
    tagged_cost(TaskField::CustomCost(6), 139),
    tagged_cost(TaskField::CustomCost(7), 140),
    tagged_cost(TaskField::CustomCost(8), 141),
    tagged_cost(TaskField::CustomCost(9), 142),
    tagged_cost(TaskField::CustomCost(10), 143),
];

/// Task records. The first three rows of the store are not tasks.
pub static TASKS: EntityLayout<TaskField> = EntityLayout {
    kind: EntityKind::Task,
    directory: "TBkndTask",
    records: RecordWidth::Meta { meta: 47 },
    unique_id: 0,
    unique_id_width: Decode::Int,
    leading_rows: 3,
    skip: &[
        // 2 and 6 mark deleted rows, 4 blank placeholders
        RowSkip::MetaIntIn {
            offset: 0,
            values: &[2, 4, 6],
        },
        RowSkip::ShorterThan(MINIMUM_TASK_SIZE),
    ],
    extended: None,
    calendar: None,
    fields: TASK_FIELDS,
};

const RESOURCE_FIELDS: &[FieldDescriptor<ResourceField>] = &[
    FieldDescriptor::fixed(ResourceField::UniqueId, 0, Decode::Short),
    FieldDescriptor::fixed(ResourceField::Id, 4, Decode::Int),
    coded(ResourceField::AccrueAt, 12, Interpret::Accrue),
    stamp(ResourceField::AvailableFrom, 20),
    stamp(ResourceField::AvailableTo, 24),
    rate(ResourceField::StandardRate, 28),
    rate(ResourceField::OvertimeRate, 36),
    units(ResourceField::MaxUnits, 44),
    units(ResourceField::PeakUnits, 124),
    work(ResourceField::Work, 52),
    work(ResourceField::ActualWork, 60),
    work(ResourceField::BaselineWork, 68),
    work(ResourceField::OvertimeWork, 76),
    work(ResourceField::RemainingWork, 92),
    work(ResourceField::RegularWork, 100),
    work(ResourceField::ActualOvertimeWork, 108),
    cost(ResourceField::CostPerUse, 84),
    cost(ResourceField::ActualCost, 132),
    cost(ResourceField::Cost, 140),
    cost(ResourceField::BaselineCost, 148),
    cost(ResourceField::RemainingCost, 156),
    cost(ResourceField::OvertimeCost, 164),
    cost(ResourceField::ActualOvertimeCost, 172),
    cost(ResourceField::RemainingOvertimeCost, 180),
    meta_flag(ResourceField::Flag(1), 28, 0x40),
    meta_flag(ResourceField::Flag(2), 28, 0x80),
    meta_flag(ResourceField::Flag(3), 29, 0x01),
    meta_flag(ResourceField::Flag(4), 29, 0x02),
    meta_flag(ResourceField::Flag(5), 29, 0x04),
    meta_flag(ResourceField::Flag(6), 29, 0x08),
    meta_flag(ResourceField::Flag(7), 29, 0x10),
    meta_flag(ResourceField::Flag(8), 29, 0x20),
    meta_flag(ResourceField::Flag(9), 29, 0x40),
    meta_flag(ResourceField::Flag(10), 28, 0x20),
    meta_flag(ResourceField::Flag(11), 29, 0x20),
    meta_flag(ResourceField::Flag(12), 30, 0x01),
    meta_flag(ResourceField::Flag(13), 30, 0x02),
    meta_flag(ResourceField::Flag(14), 30, 0x04),
    meta_flag(ResourceField::Flag(15), 30, 0x08),
    meta_flag(ResourceField::Flag(16), 30, 0x10),
    meta_flag(ResourceField::Flag(17), 30, 0x20),
    meta_flag(ResourceField::Flag(18), 30, 0x40),
    meta_flag(ResourceField::Flag(19), 30, 0x80),
    meta_flag(ResourceField::Flag(20), 31, 0x01),
    text(ResourceField::Name, 1),
    text(ResourceField::Initials, 3),
    text(ResourceField::Group, 4),
    text(ResourceField::Code, 5),
    text(ResourceField::EmailAddress, 6),
    text(ResourceField::Notes, 124),
    text(ResourceField::Text(1), 10),
    text(ResourceField::Text(2), 11),
    text(ResourceField::Text(3), 12),
    text(ResourceField::Text(4), 13),
    text(ResourceField::Text(5), 14),
    text(ResourceField::Text(6), 15),
    text(ResourceField::Text(7), 16),
    text(ResourceField::Text(8), 17),
    text(ResourceField::Text(9), 18),
    text(ResourceField::Text(10), 19),
    text(ResourceField::Text(11), 20),
    text(ResourceField::Text(12), 21),
    text(ResourceField::Text(13), 22),
    text(ResourceField::Text(14), 23),
    text(ResourceField::Text(15), 24),
    text(ResourceField::Text(16), 25),
    text(ResourceField::Text(17), 26),
    text(ResourceField::Text(18), 27),
    text(ResourceField::Text(19), 28),
    text(ResourceField::Text(20), 29),
    text(ResourceField::Text(21), 30),
    text(ResourceField::Text(22), 31),
    text(ResourceField::Text(23), 32),
    text(ResourceField::Text(24), 33),
    text(ResourceField::Text(25), 34),
    text(ResourceField::Text(26), 35),
    text(ResourceField::Text(27), 36),
    text(ResourceField::Text(28), 37),
    text(ResourceField::Text(29), 38),
    text(ResourceField::Text(30), 39),
    tagged_stamp(ResourceField::CustomStart(1), 40),
    tagged_stamp(ResourceField::CustomStart(2), 41),
    tagged_stamp(ResourceField::CustomStart(3), 42),
    tagged_stamp(ResourceField::CustomStart(4), 43),
    tagged_stamp(ResourceField::CustomStart(5), 44),
    tagged_stamp(ResourceField::CustomStart(6), 45),
    tagged_stamp(ResourceField::CustomStart(7), 46),
    tagged_stamp(ResourceField::CustomStart(8), 47),
    tagged_stamp(ResourceField::CustomStart(9), 48),
    tagged_stamp(ResourceField::CustomStart(10), 49),
    tagged_stamp(ResourceField::CustomFinish(1), 50),
    tagged_stamp(ResourceField::CustomFinish(2), 51),
    tagged_stamp(ResourceField::CustomFinish(3), 52),
    tagged_stamp(ResourceField::CustomFinish(4), 53),
    tagged_stamp(ResourceField::CustomFinish(5), 54),
    tagged_stamp(ResourceField::CustomFinish(6), 55),
    tagged_stamp(ResourceField::CustomFinish(7), 56),
    tagged_stamp(ResourceField::CustomFinish(8), 57),
    tagged_stamp(ResourceField::CustomFinish(9), 58),
    tagged_stamp(ResourceField::CustomFinish(10), 59),
    number(ResourceField::Number(1), 60),
    number(ResourceField::Number(2), 61),
    number(ResourceField::Number(3), 62),
    number(ResourceField::Number(4), 63),
    number(ResourceField::Number(5), 64),
    number(ResourceField::Number(6), 65),
    number(ResourceField::Number(7), 66),
    number(ResourceField::Number(8), 67),
    number(ResourceField::Number(9), 68),
    number(ResourceField::Number(10), 69),
    number(ResourceField::Number(11), 70),
    number(ResourceField::Number(12), 71),
    number(ResourceField::Number(13), 72),
    number(ResourceField::Number(14), 73),
    number(ResourceField::Number(15), 74),
    number(ResourceField::Number(16), 75),
    number(ResourceField::Number(17), 76),
    number(ResourceField::Number(18), 77),
    number(ResourceField::Number(19), 78),
    number(ResourceField::Number(20), 79),
    tagged_duration(ResourceField::CustomDuration(1), 80, 90),
    tagged_duration(ResourceField::CustomDuration(2), 81, 91),
    tagged_duration(ResourceField::CustomDuration(3), 82, 92),
    tagged_duration(ResourceField::CustomDuration(4), 83, 93),
    tagged_duration(ResourceField::CustomDuration(5), 84, 94),
    tagged_duration(ResourceField::CustomDuration(6), 85, 95),
    tagged_duration(ResourceField::CustomDuration(7), 86, 96),
    tagged_duration(ResourceField::CustomDuration(8), 87, 97),
    tagged_duration(ResourceField::CustomDuration(9), 88, 98),
    tagged_duration(ResourceField::CustomDuration(10), 89, 99),
    tagged_stamp(ResourceField::CustomDate(1), 103),
    tagged_stamp(ResourceField::CustomDate(2), 104),
    tagged_stamp(ResourceField::CustomDate(3), 105),
    tagged_stamp(ResourceField::CustomDate(4), 106),
    tagged_stamp(ResourceField::CustomDate(5), 107),
    tagged_stamp(ResourceField::CustomDate(6), 108),
    tagged_stamp(ResourceField::CustomDate(7), 109),
    tagged_stamp(ResourceField::CustomDate(8), 110),
    tagged_stamp(ResourceField::CustomDate(9), 111),
    tagged_stamp(ResourceField::CustomDate(10), 112),
    tagged_cost(ResourceField::CustomCost(1), 125),
    tagged_cost(ResourceField::CustomCost(2), 126),
    tagged_cost(ResourceField::CustomCost(3), 127),
    tagged_cost(ResourceField::CustomCost(4), 128),
    tagged_cost(ResourceField::CustomCost(5), 129),
    tagged_cost(ResourceField::CustomCost(6), 130),
    tagged_cost(ResourceField::CustomCost(7), 131),
    tagged_cost(ResourceField::CustomCost(8), 132),
    tagged_cost(ResourceField::CustomCost(9), 133),
    tagged_cost(ResourceField::CustomCost(10), 134),
];

pub static RESOURCES: EntityLayout<ResourceField> = EntityLayout {
    kind: EntityKind::Resource,
    directory: "TBkndRsc",
    records: RecordWidth::Meta { meta: 37 },
    unique_id: 0,
    unique_id_width: Decode::Short,
    leading_rows: 0,
    skip: &[RowSkip::ShorterThan(MINIMUM_RESOURCE_SIZE)],
    extended: None,
    calendar: None,
    fields: RESOURCE_FIELDS,
};

/// Task dependencies. The stream is absent from files without links.
pub static RELATIONS: RelationLayout = RelationLayout {
    directory: "TBkndCons",
    records: RecordWidth::MetaSized { meta: 10, item: 20 },
    ordinal: Some(0),
    predecessor: 4,
    successor: 8,
    kind: 12,
    lag_units: 14,
    lag: 16,
    skip: &[RowSkip::MetaShortNonZero { offset: 0 }],
    meta_offset: Some(4),
    optional: true,
};

const ASSIGNMENT_FIELDS: &[FieldDescriptor<AssignmentField>] = &[
    FieldDescriptor::fixed(AssignmentField::UniqueId, 0, Decode::Int),
    stamp(AssignmentField::Start, 12),
    stamp(AssignmentField::Finish, 16),
    units(AssignmentField::Units, 54),
    work(AssignmentField::Work, 62),
    work(AssignmentField::ActualWork, 70),
    work(AssignmentField::RemainingWork, 86),
    cost(AssignmentField::Cost, 102),
    cost(AssignmentField::ActualCost, 110),
];

pub static ASSIGNMENTS: AssignmentLayout = AssignmentLayout {
    directory: "TBkndAssn",
    records: RecordWidth::MetaChunked { meta: 34, item: 142 },
    task: 4,
    resource: 8,
    skip: &[RowSkip::MetaByteNonZero { offset: 0 }],
    meta_offset: Some(4),
    fields: ASSIGNMENT_FIELDS,
};

/// Calendars. A data item may hold several 12-byte blocks.
pub static CALENDARS: CalendarLayout = CalendarLayout {
    directory: "TBkndCal",
    records: RecordWidth::Meta { meta: 10 },
    block: 12,
    id: 0,
    base_id: 4,
    resource: Some(8),
    extended: None,
    name: Locator::Tagged(1),
    data: Locator::Tagged(3),
    base_rule: BaseRule::MinusOneIsBase,
    min_id: 1,
    week: WeekLayout {
        first_day: 4,
        day_stride: 60,
        default_flag: 0,
        day_periods: PeriodLayout {
            count: 2,
            starts: 8,
            durations: 20,
        },
        exception_count: 0,
        first_exception: 4 + 60 * 7,
        exception_stride: 64,
        exception_from: 0,
        exception_to: 2,
        exception_periods: PeriodLayout {
            count: 6,
            starts: 12,
            durations: 24,
        },
        span: SpanWidth::Short,
        derived_default_inherits: true,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_layout_has_core_fields() {
        for field in [TaskField::UniqueId, TaskField::Name, TaskField::Start, TaskField::Duration] {
            assert!(TASKS.descriptor(&field).is_some(), "{field} missing");
        }
    }

    #[test]
    fn numbered_families_are_complete() {
        for n in 1..=30 {
            assert!(TASKS.descriptor(&TaskField::Text(n)).is_some());
            assert!(RESOURCES.descriptor(&ResourceField::Text(n)).is_some());
        }
        for n in 1..=20 {
            assert!(TASKS.descriptor(&TaskField::Flag(n)).is_some());
            assert!(TASKS.descriptor(&TaskField::Number(n)).is_some());
        }
        for n in 1..=10 {
            assert_eq!(
                TASKS.descriptor(&TaskField::CustomStart(n)).map(|d| d.locator),
                Some(Locator::Tagged(24 + 2 * (i16::from(n) - 1)))
            );
        }
    }

    #[test]
    fn custom_duration_units_follow_value() {
        let d = TASKS.descriptor(&TaskField::CustomDuration(3)).unwrap();
        assert_eq!(d.locator, Locator::Tagged(59));
        assert_eq!(d.interpret.units_locator(), Some(Locator::Tagged(60)));
    }

    #[test]
    fn task_skip_rules() {
        let record = vec![0u8; MINIMUM_TASK_SIZE];
        assert!(TASKS.skips(&record, Some(&2i32.to_le_bytes())));
        assert!(TASKS.skips(&record, Some(&4i32.to_le_bytes())));
        assert!(!TASKS.skips(&record, Some(&1i32.to_le_bytes())));
        assert!(TASKS.skips(&record[..100], Some(&1i32.to_le_bytes())));
    }

    #[test]
    fn resource_id_is_short() {
        let mut record = vec![0u8; MINIMUM_RESOURCE_SIZE];
        record[0..4].copy_from_slice(&0x0001_0005i32.to_le_bytes());
        assert_eq!(RESOURCES.read_unique_id(&record), Some(5));
    }
}
