//! Typed field values and the enumerations stored as small integer codes.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Unit of a stored duration.
///
/// Codes come from the low five bits of a units short. Elapsed units count
/// calendar time rather than working time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    Minutes,
    ElapsedMinutes,
    Hours,
    ElapsedHours,
    #[default]
    Days,
    ElapsedDays,
    Weeks,
    ElapsedWeeks,
    Months,
    ElapsedMonths,
}

impl TimeUnit {
    /// Decodes a units code. Unknown codes map to days.
    #[must_use]
    pub const fn from_code(code: i16) -> Self {
        match code & 0x1F {
            3 => Self::Minutes,
            4 => Self::ElapsedMinutes,
            5 => Self::Hours,
            6 => Self::ElapsedHours,
            8 => Self::ElapsedDays,
            9 => Self::Weeks,
            10 => Self::ElapsedWeeks,
            11 => Self::Months,
            12 => Self::ElapsedMonths,
            _ => Self::Days,
        }
    }

    /// Returns the stored code.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Minutes => 3,
            Self::ElapsedMinutes => 4,
            Self::Hours => 5,
            Self::ElapsedHours => 6,
            Self::Days => 7,
            Self::ElapsedDays => 8,
            Self::Weeks => 9,
            Self::ElapsedWeeks => 10,
            Self::Months => 11,
            Self::ElapsedMonths => 12,
        }
    }

    /// Returns `true` for calendar-time units.
    #[must_use]
    pub const fn is_elapsed(self) -> bool {
        matches!(
            self,
            Self::ElapsedMinutes
                | Self::ElapsedHours
                | Self::ElapsedDays
                | Self::ElapsedWeeks
                | Self::ElapsedMonths
        )
    }

    /// Short label used when printing durations.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Minutes => "m",
            Self::ElapsedMinutes => "em",
            Self::Hours => "h",
            Self::ElapsedHours => "eh",
            Self::Days => "d",
            Self::ElapsedDays => "ed",
            Self::Weeks => "w",
            Self::ElapsedWeeks => "ew",
            Self::Months => "mo",
            Self::ElapsedMonths => "emo",
        }
    }
}

/// Working-time ratios used to convert raw durations into their units.
///
/// Raw durations are tenths of a minute. Working units divide by the
/// project's minutes per day and week; elapsed units use 24-hour days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationContext {
    pub minutes_per_day: u32,
    pub minutes_per_week: u32,
    pub days_per_month: u32,
}

impl Default for DurationContext {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl DurationContext {
    /// 8-hour days, 40-hour weeks, 20-day months.
    pub const STANDARD: Self = Self {
        minutes_per_day: 480,
        minutes_per_week: 2400,
        days_per_month: 20,
    };

    /// Replaces zero ratios with the standard ones.
    #[must_use]
    pub const fn sanitized(self) -> Self {
        Self {
            minutes_per_day: if self.minutes_per_day == 0 {
                Self::STANDARD.minutes_per_day
            } else {
                self.minutes_per_day
            },
            minutes_per_week: if self.minutes_per_week == 0 {
                Self::STANDARD.minutes_per_week
            } else {
                self.minutes_per_week
            },
            days_per_month: if self.days_per_month == 0 {
                Self::STANDARD.days_per_month
            } else {
                self.days_per_month
            },
        }
    }

    /// Number of raw tenths of a minute in one `unit`.
    #[must_use]
    pub fn divisor(&self, unit: TimeUnit) -> f64 {
        let ctx = self.sanitized();
        let day = f64::from(ctx.minutes_per_day) * 10.0;
        match unit {
            TimeUnit::Minutes | TimeUnit::ElapsedMinutes => 10.0,
            TimeUnit::Hours | TimeUnit::ElapsedHours => 600.0,
            TimeUnit::Days => day,
            TimeUnit::Weeks => f64::from(ctx.minutes_per_week) * 10.0,
            TimeUnit::Months => day * f64::from(ctx.days_per_month),
            TimeUnit::ElapsedDays => 14_400.0,
            TimeUnit::ElapsedWeeks => 100_800.0,
            TimeUnit::ElapsedMonths => 432_000.0,
        }
    }

    /// Converts a raw duration to a value in `unit`.
    #[must_use]
    pub fn adjust(&self, raw: f64, unit: TimeUnit) -> Duration {
        Duration::new(raw / self.divisor(unit), unit)
    }
}

/// A duration value with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration {
    pub value: f64,
    pub unit: TimeUnit,
}

impl Duration {
    #[must_use]
    pub const fn new(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Zero in `unit`.
    #[must_use]
    pub const fn zero(unit: TimeUnit) -> Self {
        Self::new(0.0, unit)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.abbreviation())
    }
}

/// Dependency kind between two tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationType {
    FinishFinish,
    FinishStart,
    StartFinish,
    StartStart,
}

impl RelationType {
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::FinishFinish),
            1 => Some(Self::FinishStart),
            2 => Some(Self::StartFinish),
            3 => Some(Self::StartStart),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::FinishFinish => 0,
            Self::FinishStart => 1,
            Self::StartFinish => 2,
            Self::StartStart => 3,
        }
    }
}

/// Scheduling constraint on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintType {
    AsSoonAsPossible,
    AsLateAsPossible,
    MustStartOn,
    MustFinishOn,
    StartNoEarlierThan,
    StartNoLaterThan,
    FinishNoEarlierThan,
    FinishNoLaterThan,
}

impl ConstraintType {
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::AsSoonAsPossible),
            1 => Some(Self::AsLateAsPossible),
            2 => Some(Self::MustStartOn),
            3 => Some(Self::MustFinishOn),
            4 => Some(Self::StartNoEarlierThan),
            5 => Some(Self::StartNoLaterThan),
            6 => Some(Self::FinishNoEarlierThan),
            7 => Some(Self::FinishNoLaterThan),
            _ => None,
        }
    }
}

/// What stays fixed when a task is rescheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskType {
    FixedUnits,
    FixedDuration,
    FixedWork,
}

impl TaskType {
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::FixedUnits),
            1 => Some(Self::FixedDuration),
            2 => Some(Self::FixedWork),
            _ => None,
        }
    }
}

/// When a cost is incurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccrueType {
    Start,
    End,
    #[default]
    Prorated,
}

impl AccrueType {
    /// Decodes an accrual code. Unknown codes are prorated.
    #[must_use]
    pub const fn from_code(code: i16) -> Self {
        match code {
            1 => Self::Start,
            2 => Self::End,
            _ => Self::Prorated,
        }
    }
}

/// Direction the project is scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleFrom {
    Start,
    Finish,
}

impl ScheduleFrom {
    /// The stored flag is inverted: 1 means forward from the start.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match 1 - code {
            0 => Some(Self::Start),
            1 => Some(Self::Finish),
            _ => None,
        }
    }
}

/// Placement of the currency symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurrencyPlacement {
    Before,
    After,
    BeforeWithSpace,
    AfterWithSpace,
}

impl CurrencyPlacement {
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Before),
            1 => Some(Self::After),
            2 => Some(Self::BeforeWithSpace),
            3 => Some(Self::AfterWithSpace),
            _ => None,
        }
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Zero-based index, Sunday is 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a zero-based stored day.
    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    #[must_use]
    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Sunday | Self::Saturday)
    }
}

/// Task priority, 0 to 1000. 1000 means "do not level".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Priority(u16);

impl Priority {
    pub const MAX: u16 = 1000;

    /// Clamps `value` into range.
    #[must_use]
    pub fn new(value: i32) -> Self {
        let clamped = value.clamp(0, i32::from(Self::MAX));
        Self(u16::try_from(clamped).unwrap_or(Self::MAX))
    }

    /// Decodes the legacy step code, where each step is 100 points.
    #[must_use]
    pub fn from_legacy(code: i16) -> Self {
        Self::new((i32::from(code) + 1) * 100)
    }

    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn do_not_level(self) -> bool {
        self.0 >= Self::MAX
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    Text(String),
    Int(i32),
    Number(f64),
    Currency(f64),
    /// Work in hours.
    Work(f64),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Duration(Duration),
    /// Resource units, 1.0 is 100%.
    Units(f64),
    Percent(i16),
    Priority(Priority),
    Constraint(ConstraintType),
    TaskType(TaskType),
    Accrue(AccrueType),
    ScheduleFrom(ScheduleFrom),
    CurrencyPlacement(CurrencyPlacement),
    Weekday(Weekday),
    TimeUnit(TimeUnit),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric payload of number-like values.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) | Self::Currency(v) | Self::Work(v) | Self::Units(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Number(v) | Self::Currency(v) | Self::Work(v) | Self::Units(v) => {
                write!(f, "{v}")
            }
            Self::Bool(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::Time(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Duration(v) => write!(f, "{v}"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Priority(p) => write!(f, "{}", p.value()),
            Self::Constraint(v) => write!(f, "{v:?}"),
            Self::TaskType(v) => write!(f, "{v:?}"),
            Self::Accrue(v) => write!(f, "{v:?}"),
            Self::ScheduleFrom(v) => write!(f, "{v:?}"),
            Self::CurrencyPlacement(v) => write!(f, "{v:?}"),
            Self::Weekday(v) => write!(f, "{v:?}"),
            Self::TimeUnit(v) => f.write_str(v.abbreviation()),
        }
    }
}
