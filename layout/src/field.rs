//! Field identifiers.
//!
//! Each entity kind has its own identifier enum. Numbered custom fields
//! (`Text3`, `Flag12`, ...) carry their one-based number. Keys are stable
//! snake-case strings suitable for serialized output.

use std::fmt;

/// Kind of entity a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Project,
    Calendar,
    Resource,
    Task,
    Assignment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Project => "project",
            Self::Calendar => "calendar",
            Self::Resource => "resource",
            Self::Task => "task",
            Self::Assignment => "assignment",
        })
    }
}

/// Highest number of each custom field family.
pub mod custom {
    pub const TEXT: u8 = 30;
    pub const START: u8 = 10;
    pub const FINISH: u8 = 10;
    pub const NUMBER: u8 = 20;
    pub const DURATION: u8 = 10;
    pub const DATE: u8 = 10;
    pub const COST: u8 = 10;
    pub const FLAG: u8 = 20;
}

/// Task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskField {
    UniqueId,
    Id,
    Name,
    Wbs,
    Contact,
    Notes,
    OutlineLevel,
    Start,
    Finish,
    LateStart,
    LateFinish,
    Stop,
    Resume,
    ActualStart,
    ActualFinish,
    BaselineStart,
    BaselineFinish,
    ConstraintType,
    ConstraintDate,
    Created,
    Deadline,
    Duration,
    ActualDuration,
    RemainingDuration,
    BaselineDuration,
    Priority,
    PercentComplete,
    PercentWorkComplete,
    Type,
    FixedCostAccrual,
    Work,
    BaselineWork,
    ActualWork,
    RemainingWork,
    ActualOvertimeWork,
    RemainingOvertimeWork,
    Cost,
    FixedCost,
    ActualCost,
    RemainingCost,
    BaselineCost,
    OvertimeCost,
    ActualOvertimeCost,
    RemainingOvertimeCost,
    EffortDriven,
    Milestone,
    Rollup,
    HideBar,
    Marked,
    Text(u8),
    CustomStart(u8),
    CustomFinish(u8),
    Number(u8),
    CustomDuration(u8),
    CustomDate(u8),
    CustomCost(u8),
    Flag(u8),
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::UniqueId => "unique_id",
            Self::Id => "id",
            Self::Name => "name",
            Self::Wbs => "wbs",
            Self::Contact => "contact",
            Self::Notes => "notes",
            Self::OutlineLevel => "outline_level",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::LateStart => "late_start",
            Self::LateFinish => "late_finish",
            Self::Stop => "stop",
            Self::Resume => "resume",
            Self::ActualStart => "actual_start",
            Self::ActualFinish => "actual_finish",
            Self::BaselineStart => "baseline_start",
            Self::BaselineFinish => "baseline_finish",
            Self::ConstraintType => "constraint_type",
            Self::ConstraintDate => "constraint_date",
            Self::Created => "created",
            Self::Deadline => "deadline",
            Self::Duration => "duration",
            Self::ActualDuration => "actual_duration",
            Self::RemainingDuration => "remaining_duration",
            Self::BaselineDuration => "baseline_duration",
            Self::Priority => "priority",
            Self::PercentComplete => "percent_complete",
            Self::PercentWorkComplete => "percent_work_complete",
            Self::Type => "type",
            Self::FixedCostAccrual => "fixed_cost_accrual",
            Self::Work => "work",
            Self::BaselineWork => "baseline_work",
            Self::ActualWork => "actual_work",
            Self::RemainingWork => "remaining_work",
            Self::ActualOvertimeWork => "actual_overtime_work",
            Self::RemainingOvertimeWork => "remaining_overtime_work",
            Self::Cost => "cost",
            Self::FixedCost => "fixed_cost",
            Self::ActualCost => "actual_cost",
            Self::RemainingCost => "remaining_cost",
            Self::BaselineCost => "baseline_cost",
            Self::OvertimeCost => "overtime_cost",
            Self::ActualOvertimeCost => "actual_overtime_cost",
            Self::RemainingOvertimeCost => "remaining_overtime_cost",
            Self::EffortDriven => "effort_driven",
            Self::Milestone => "milestone",
            Self::Rollup => "rollup",
            Self::HideBar => "hide_bar",
            Self::Marked => "marked",
            Self::Text(n) => return write!(f, "text{n}"),
            Self::CustomStart(n) => return write!(f, "start{n}"),
            Self::CustomFinish(n) => return write!(f, "finish{n}"),
            Self::Number(n) => return write!(f, "number{n}"),
            Self::CustomDuration(n) => return write!(f, "duration{n}"),
            Self::CustomDate(n) => return write!(f, "date{n}"),
            Self::CustomCost(n) => return write!(f, "cost{n}"),
            Self::Flag(n) => return write!(f, "flag{n}"),
        };
        f.write_str(key)
    }
}

/// Resource fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceField {
    UniqueId,
    Id,
    Name,
    Initials,
    Group,
    Code,
    EmailAddress,
    Notes,
    AccrueAt,
    AvailableFrom,
    AvailableTo,
    StandardRate,
    OvertimeRate,
    MaxUnits,
    PeakUnits,
    Work,
    ActualWork,
    BaselineWork,
    OvertimeWork,
    RemainingWork,
    RegularWork,
    ActualOvertimeWork,
    CostPerUse,
    Cost,
    ActualCost,
    BaselineCost,
    RemainingCost,
    OvertimeCost,
    ActualOvertimeCost,
    RemainingOvertimeCost,
    Text(u8),
    CustomStart(u8),
    CustomFinish(u8),
    Number(u8),
    CustomDuration(u8),
    CustomDate(u8),
    CustomCost(u8),
    Flag(u8),
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Self::UniqueId => "unique_id",
            Self::Id => "id",
            Self::Name => "name",
            Self::Initials => "initials",
            Self::Group => "group",
            Self::Code => "code",
            Self::EmailAddress => "email_address",
            Self::Notes => "notes",
            Self::AccrueAt => "accrue_at",
            Self::AvailableFrom => "available_from",
            Self::AvailableTo => "available_to",
            Self::StandardRate => "standard_rate",
            Self::OvertimeRate => "overtime_rate",
            Self::MaxUnits => "max_units",
            Self::PeakUnits => "peak_units",
            Self::Work => "work",
            Self::ActualWork => "actual_work",
            Self::BaselineWork => "baseline_work",
            Self::OvertimeWork => "overtime_work",
            Self::RemainingWork => "remaining_work",
            Self::RegularWork => "regular_work",
            Self::ActualOvertimeWork => "actual_overtime_work",
            Self::CostPerUse => "cost_per_use",
            Self::Cost => "cost",
            Self::ActualCost => "actual_cost",
            Self::BaselineCost => "baseline_cost",
            Self::RemainingCost => "remaining_cost",
            Self::OvertimeCost => "overtime_cost",
            Self::ActualOvertimeCost => "actual_overtime_cost",
            Self::RemainingOvertimeCost => "remaining_overtime_cost",
            Self::Text(n) => return write!(f, "text{n}"),
            Self::CustomStart(n) => return write!(f, "start{n}"),
            Self::CustomFinish(n) => return write!(f, "finish{n}"),
            Self::Number(n) => return write!(f, "number{n}"),
            Self::CustomDuration(n) => return write!(f, "duration{n}"),
            Self::CustomDate(n) => return write!(f, "date{n}"),
            Self::CustomCost(n) => return write!(f, "cost{n}"),
            Self::Flag(n) => return write!(f, "flag{n}"),
        };
        f.write_str(key)
    }
}

/// Assignment fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentField {
    UniqueId,
    Start,
    Finish,
    Units,
    Work,
    OvertimeWork,
    ActualWork,
    RemainingWork,
    Cost,
    ActualCost,
}

impl fmt::Display for AssignmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UniqueId => "unique_id",
            Self::Start => "start",
            Self::Finish => "finish",
            Self::Units => "units",
            Self::Work => "work",
            Self::OvertimeWork => "overtime_work",
            Self::ActualWork => "actual_work",
            Self::RemainingWork => "remaining_work",
            Self::Cost => "cost",
            Self::ActualCost => "actual_cost",
        })
    }
}

/// Calendar fields. Working days and exceptions have their own sink calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalendarField {
    UniqueId,
    Name,
}

impl fmt::Display for CalendarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UniqueId => "unique_id",
            Self::Name => "name",
        })
    }
}

/// Project-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProjectField {
    ApplicationName,
    FileFormat,
    ScheduleFrom,
    StartDate,
    FinishDate,
    StatusDate,
    DefaultCalendarName,
    CurrencySymbol,
    CurrencyPlacement,
    CurrencyDigits,
    DefaultDurationUnits,
    DefaultWorkUnits,
    TaskUpdatesResource,
    SplitInProgressTasks,
    DefaultStartTime,
    DefaultEndTime,
    MinutesPerDay,
    MinutesPerWeek,
    DefaultStandardRate,
    DefaultOvertimeRate,
    WeekStartDay,
    ShowProjectSummaryTask,
}

impl fmt::Display for ProjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ApplicationName => "application_name",
            Self::FileFormat => "file_format",
            Self::ScheduleFrom => "schedule_from",
            Self::StartDate => "start_date",
            Self::FinishDate => "finish_date",
            Self::StatusDate => "status_date",
            Self::DefaultCalendarName => "default_calendar_name",
            Self::CurrencySymbol => "currency_symbol",
            Self::CurrencyPlacement => "currency_placement",
            Self::CurrencyDigits => "currency_digits",
            Self::DefaultDurationUnits => "default_duration_units",
            Self::DefaultWorkUnits => "default_work_units",
            Self::TaskUpdatesResource => "task_updates_resource",
            Self::SplitInProgressTasks => "split_in_progress_tasks",
            Self::DefaultStartTime => "default_start_time",
            Self::DefaultEndTime => "default_end_time",
            Self::MinutesPerDay => "minutes_per_day",
            Self::MinutesPerWeek => "minutes_per_week",
            Self::DefaultStandardRate => "default_standard_rate",
            Self::DefaultOvertimeRate => "default_overtime_rate",
            Self::WeekStartDay => "week_start_day",
            Self::ShowProjectSummaryTask => "show_project_summary_task",
        })
    }
}

/// Any field of any entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldId {
    Project(ProjectField),
    Calendar(CalendarField),
    Resource(ResourceField),
    Task(TaskField),
    Assignment(AssignmentField),
}

impl FieldId {
    /// Returns the entity kind this field belongs to.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::Calendar(_) => EntityKind::Calendar,
            Self::Resource(_) => EntityKind::Resource,
            Self::Task(_) => EntityKind::Task,
            Self::Assignment(_) => EntityKind::Assignment,
        }
    }

    /// Stable snake-case key, unique within the entity kind.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }

    /// Returns the number of a numbered custom field and its family limit.
    #[must_use]
    pub const fn custom_number(self) -> Option<(u8, u8)> {
        use TaskField as T;
        match self {
            Self::Task(T::Text(n)) | Self::Resource(ResourceField::Text(n)) => {
                Some((n, custom::TEXT))
            }
            Self::Task(T::CustomStart(n)) | Self::Resource(ResourceField::CustomStart(n)) => {
                Some((n, custom::START))
            }
            Self::Task(T::CustomFinish(n)) | Self::Resource(ResourceField::CustomFinish(n)) => {
                Some((n, custom::FINISH))
            }
            Self::Task(T::Number(n)) | Self::Resource(ResourceField::Number(n)) => {
                Some((n, custom::NUMBER))
            }
            Self::Task(T::CustomDuration(n))
            | Self::Resource(ResourceField::CustomDuration(n)) => Some((n, custom::DURATION)),
            Self::Task(T::CustomDate(n)) | Self::Resource(ResourceField::CustomDate(n)) => {
                Some((n, custom::DATE))
            }
            Self::Task(T::CustomCost(n)) | Self::Resource(ResourceField::CustomCost(n)) => {
                Some((n, custom::COST))
            }
            Self::Task(T::Flag(n)) | Self::Resource(ResourceField::Flag(n)) => {
                Some((n, custom::FLAG))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(field) => field.fmt(f),
            Self::Calendar(field) => field.fmt(f),
            Self::Resource(field) => field.fmt(f),
            Self::Task(field) => field.fmt(f),
            Self::Assignment(field) => field.fmt(f),
        }
    }
}

impl From<ProjectField> for FieldId {
    fn from(field: ProjectField) -> Self {
        Self::Project(field)
    }
}

impl From<CalendarField> for FieldId {
    fn from(field: CalendarField) -> Self {
        Self::Calendar(field)
    }
}

impl From<ResourceField> for FieldId {
    fn from(field: ResourceField) -> Self {
        Self::Resource(field)
    }
}

impl From<TaskField> for FieldId {
    fn from(field: TaskField) -> Self {
        Self::Task(field)
    }
}

impl From<AssignmentField> for FieldId {
    fn from(field: AssignmentField) -> Self {
        Self::Assignment(field)
    }
}

/// Display names for fields.
///
/// Decoding never depends on names. Implement this to present fields in
/// another language.
pub trait FieldNames {
    fn name(&self, field: FieldId) -> String;
}

/// English display names derived from the field keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNames;

impl FieldNames for EnglishNames {
    fn name(&self, field: FieldId) -> String {
        field
            .key()
            .split('_')
            .map(|word| match word {
                "id" | "wbs" => word.to_ascii_uppercase(),
                _ => {
                    let mut chars = word.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_ascii_uppercase().to_string() + chars.as_str()
                    })
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_keys() {
        assert_eq!(FieldId::from(TaskField::Text(3)).key(), "text3");
        assert_eq!(FieldId::from(ResourceField::CustomStart(10)).key(), "start10");
        assert_eq!(FieldId::from(TaskField::Flag(20)).key(), "flag20");
    }

    #[test]
    fn kinds_follow_wrapper() {
        assert_eq!(FieldId::from(TaskField::Name).kind(), EntityKind::Task);
        assert_eq!(FieldId::from(ResourceField::Name).kind(), EntityKind::Resource);
        assert_eq!(
            FieldId::from(ProjectField::MinutesPerDay).kind(),
            EntityKind::Project
        );
    }

    #[test]
    fn custom_number_reports_family_limit() {
        assert_eq!(
            FieldId::from(TaskField::Number(12)).custom_number(),
            Some((12, custom::NUMBER))
        );
        assert_eq!(FieldId::from(TaskField::Name).custom_number(), None);
    }

    #[test]
    fn english_names() {
        let names = EnglishNames;
        assert_eq!(names.name(TaskField::UniqueId.into()), "Unique ID");
        assert_eq!(names.name(TaskField::Wbs.into()), "WBS");
        assert_eq!(names.name(TaskField::Text(7).into()), "Text7");
        assert_eq!(
            names.name(ProjectField::ShowProjectSummaryTask.into()),
            "Show Project Summary Task"
        );
    }

    #[test]
    fn same_key_in_different_kinds_is_distinct() {
        let task = FieldId::from(TaskField::Name);
        let resource = FieldId::from(ResourceField::Name);
        assert_eq!(task.key(), resource.key());
        assert_ne!(task, resource);
    }
}
