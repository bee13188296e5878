//! Project property keys.
//!
//! Both generations share the same keys; only the bag's entry framing
//! differs, and that is handled when the bag is decoded.

use crate::descriptor::{Decode, FieldDescriptor, Interpret};
use crate::field::ProjectField;

pub const SCHEDULE_FROM: i32 = 37_748_740;
pub const START_DATE: i32 = 37_748_738;
pub const FINISH_DATE: i32 = 37_748_739;
pub const DEFAULT_CALENDAR_NAME: i32 = 37_748_750;
pub const CURRENCY_SYMBOL: i32 = 37_748_752;
pub const CURRENCY_PLACEMENT: i32 = 37_748_753;
pub const CURRENCY_DIGITS: i32 = 37_748_754;
pub const DEFAULT_DURATION_UNITS: i32 = 37_748_757;
pub const DEFAULT_WORK_UNITS: i32 = 37_748_758;
pub const TASK_UPDATES_RESOURCE: i32 = 37_748_761;
pub const SPLIT_IN_PROGRESS_TASKS: i32 = 37_748_762;
pub const DEFAULT_START_TIME: i32 = 37_748_764;
pub const MINUTES_PER_DAY: i32 = 37_748_765;
pub const MINUTES_PER_WEEK: i32 = 37_748_766;
pub const DEFAULT_STANDARD_RATE: i32 = 37_748_767;
pub const DEFAULT_OVERTIME_RATE: i32 = 37_748_768;
pub const DEFAULT_END_TIME: i32 = 37_748_769;
pub const WEEK_START_DAY: i32 = 37_748_773;
pub const STATUS_DATE: i32 = 37_748_805;

const fn prop(field: ProjectField, key: i32, decode: Decode) -> FieldDescriptor<ProjectField> {
    FieldDescriptor::property(field, key, decode, Interpret::Plain)
}

const fn coded(
    field: ProjectField,
    key: i32,
    interpret: Interpret,
) -> FieldDescriptor<ProjectField> {
    FieldDescriptor::property(field, key, Decode::Short, interpret)
}

/// Project-level fields read from the property bag.
pub static PROPERTIES: &[FieldDescriptor<ProjectField>] = &[
    coded(ProjectField::ScheduleFrom, SCHEDULE_FROM, Interpret::ScheduleFrom),
    prop(ProjectField::StartDate, START_DATE, Decode::Timestamp),
    prop(ProjectField::FinishDate, FINISH_DATE, Decode::Timestamp),
    prop(ProjectField::StatusDate, STATUS_DATE, Decode::Timestamp),
    prop(ProjectField::DefaultCalendarName, DEFAULT_CALENDAR_NAME, Decode::Text),
    prop(ProjectField::CurrencySymbol, CURRENCY_SYMBOL, Decode::Text),
    coded(
        ProjectField::CurrencyPlacement,
        CURRENCY_PLACEMENT,
        Interpret::CurrencyPlacement,
    ),
    prop(ProjectField::CurrencyDigits, CURRENCY_DIGITS, Decode::Short),
    coded(
        ProjectField::DefaultDurationUnits,
        DEFAULT_DURATION_UNITS,
        Interpret::TimeUnit,
    ),
    coded(ProjectField::DefaultWorkUnits, DEFAULT_WORK_UNITS, Interpret::TimeUnit),
    prop(ProjectField::TaskUpdatesResource, TASK_UPDATES_RESOURCE, Decode::Bool),
    prop(ProjectField::SplitInProgressTasks, SPLIT_IN_PROGRESS_TASKS, Decode::Bool),
    prop(ProjectField::DefaultStartTime, DEFAULT_START_TIME, Decode::Time),
    prop(ProjectField::DefaultEndTime, DEFAULT_END_TIME, Decode::Time),
    prop(ProjectField::MinutesPerDay, MINUTES_PER_DAY, Decode::Int),
    prop(ProjectField::MinutesPerWeek, MINUTES_PER_WEEK, Decode::Int),
    FieldDescriptor::property(
        ProjectField::DefaultStandardRate,
        DEFAULT_STANDARD_RATE,
        Decode::Double,
        Interpret::Currency { divisor: 1 },
    ),
    FieldDescriptor::property(
        ProjectField::DefaultOvertimeRate,
        DEFAULT_OVERTIME_RATE,
        Decode::Double,
        Interpret::Currency { divisor: 1 },
    ),
    coded(ProjectField::WeekStartDay, WEEK_START_DAY, Interpret::Weekday),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Locator;

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = PROPERTIES
            .iter()
            .map(|d| match d.locator {
                Locator::Property(key) => key,
                other => panic!("unexpected locator {other:?}"),
            })
            .collect();
        let before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn identity_fields_are_not_properties() {
        assert!(PROPERTIES
            .iter()
            .all(|d| d.field != ProjectField::ApplicationName && d.field != ProjectField::FileFormat));
    }
}
