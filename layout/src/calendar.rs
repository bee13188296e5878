//! Calendar record layouts and the shared day/exception decoder.
//!
//! Both generations store a calendar's working week as seven fixed-size day
//! blocks followed by a list of dated exceptions. Only strides and a few
//! offsets differ, so one decoder walks either layout.

use chrono::{NaiveDate, NaiveTime};
use scalar::{get_date, get_i16, get_i32, get_long_span, get_short_span, get_time, range_end, ScalarResult};

use crate::descriptor::{Locator, RecordWidth};
use crate::value::Weekday;

/// Most time ranges a day block or exception can hold.
pub const MAX_PERIODS: usize = 3;

/// Width of a stored time-range duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanWidth {
    Short,
    Long,
}

impl SpanWidth {
    fn read(self, buf: &[u8], offset: usize) -> ScalarResult<i64> {
        match self {
            Self::Short => get_short_span(buf, offset),
            Self::Long => get_long_span(buf, offset),
        }
    }
}

/// Working hours from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Builds a range from hour/minute pairs.
    #[must_use]
    pub fn hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self::new(
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or(NaiveTime::MIN),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or(NaiveTime::MIN),
        )
    }
}

/// One day of a calendar's working week.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayDefinition {
    /// Taken from the base calendar.
    Inherit,
    NonWorking,
    Working(Vec<TimeRange>),
}

impl DayDefinition {
    /// The built-in day: weekends off, 08:00-12:00 and 13:00-17:00 otherwise.
    #[must_use]
    pub fn standard(day: Weekday) -> Self {
        if day.is_weekend() {
            Self::NonWorking
        } else {
            Self::Working(vec![TimeRange::hm((8, 0), (12, 0)), TimeRange::hm((13, 0), (17, 0))])
        }
    }

    #[must_use]
    pub const fn is_working(&self) -> bool {
        matches!(self, Self::Working(_))
    }
}

/// The built-in working week, Sunday first.
#[must_use]
pub fn standard_week() -> [DayDefinition; 7] {
    Weekday::ALL.map(DayDefinition::standard)
}

/// A dated override of the working week.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarException {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Empty means non-working.
    pub ranges: Vec<TimeRange>,
}

impl CalendarException {
    #[must_use]
    pub fn is_working(&self) -> bool {
        !self.ranges.is_empty()
    }
}

/// Offsets of the ranges inside a day block or exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodLayout {
    pub count: usize,
    pub starts: usize,
    pub durations: usize,
}

/// Shape of a calendar's working-week data blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekLayout {
    /// Offset of the first day block.
    pub first_day: usize,
    pub day_stride: usize,
    /// Offset of the default flag inside a day block.
    pub default_flag: usize,
    pub day_periods: PeriodLayout,
    /// Offset of the exception count in the blob.
    pub exception_count: usize,
    pub first_exception: usize,
    pub exception_stride: usize,
    pub exception_from: usize,
    pub exception_to: usize,
    pub exception_periods: PeriodLayout,
    pub span: SpanWidth,
    /// A set default flag on a derived calendar means "inherit" rather
    /// than the built-in day.
    pub derived_default_inherits: bool,
}

impl WeekLayout {
    /// Decodes the seven day blocks.
    ///
    /// A day whose block is cut short is left as [`DayDefinition::Inherit`]
    /// for derived calendars and the built-in day otherwise.
    #[must_use]
    pub fn decode_week(&self, data: &[u8], derived: bool) -> [DayDefinition; 7] {
        Weekday::ALL.map(|day| {
            let offset = self.first_day + self.day_stride * day.index();
            self.decode_day(data, offset, day, derived)
                .unwrap_or_else(|_| self.default_day(day, derived))
        })
    }

    fn decode_day(
        &self,
        data: &[u8],
        offset: usize,
        day: Weekday,
        derived: bool,
    ) -> ScalarResult<DayDefinition> {
        if get_i16(data, offset + self.default_flag)? == 1 {
            return Ok(self.default_day(day, derived));
        }
        let ranges = self.periods(data, offset, self.day_periods)?;
        Ok(if ranges.is_empty() {
            DayDefinition::NonWorking
        } else {
            DayDefinition::Working(ranges)
        })
    }

    fn default_day(&self, day: Weekday, derived: bool) -> DayDefinition {
        if derived && self.derived_default_inherits {
            DayDefinition::Inherit
        } else {
            DayDefinition::standard(day)
        }
    }

    /// Decodes the exception list. Decoding stops at the first exception
    /// that runs past the blob; earlier ones are kept.
    #[must_use]
    pub fn decode_exceptions(&self, data: &[u8]) -> Vec<CalendarException> {
        let count = get_i16(data, self.exception_count).map_or(0, |c| usize::try_from(c).unwrap_or(0));
        let mut out = Vec::with_capacity(count.min(64));
        for index in 0..count {
            let offset = self.first_exception + self.exception_stride * index;
            match self.decode_exception(data, offset) {
                Ok(exception) => out.push(exception),
                Err(_) => break,
            }
        }
        out
    }

    fn decode_exception(&self, data: &[u8], offset: usize) -> ScalarResult<CalendarException> {
        Ok(CalendarException {
            from: get_date(data, offset + self.exception_from)?,
            to: get_date(data, offset + self.exception_to)?,
            ranges: self.periods(data, offset, self.exception_periods)?,
        })
    }

    fn periods(&self, data: &[u8], base: usize, layout: PeriodLayout) -> ScalarResult<Vec<TimeRange>> {
        let count = usize::try_from(get_i16(data, base + layout.count)?)
            .unwrap_or(0)
            .min(MAX_PERIODS);
        (0..count)
            .map(|p| {
                let start = get_time(data, base + layout.starts + 2 * p)?;
                let span = self.span.read(data, base + layout.durations + 4 * p)?;
                Ok(TimeRange::new(start, range_end(start, span)))
            })
            .collect()
    }
}

/// How a calendar's parent is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseRule {
    /// `-1` marks a base calendar, `0` an unusable record, anything else
    /// names the parent.
    MinusOneIsBase,
    /// A positive id names the parent, anything else is a base calendar.
    PositiveIsDerived,
}

/// What a calendar record says about its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarParent {
    Base,
    Derived(i32),
    Invalid,
}

impl BaseRule {
    #[must_use]
    pub const fn classify(self, base_id: i32) -> CalendarParent {
        match self {
            Self::MinusOneIsBase => match base_id {
                -1 => CalendarParent::Base,
                0 => CalendarParent::Invalid,
                id => CalendarParent::Derived(id),
            },
            Self::PositiveIsDerived => {
                if base_id > 0 {
                    CalendarParent::Derived(base_id)
                } else {
                    CalendarParent::Base
                }
            }
        }
    }
}

/// Where a calendar record keeps its identity and data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarLayout {
    pub directory: &'static str,
    pub records: RecordWidth,
    /// Size of one calendar block; a data item may hold several.
    pub block: usize,
    pub id: usize,
    pub base_id: usize,
    /// Offset of the resource id for resource calendars.
    pub resource: Option<usize>,
    pub extended: Option<usize>,
    pub name: Locator,
    pub data: Locator,
    pub base_rule: BaseRule,
    /// Smallest id a record may carry.
    pub min_id: i32,
    pub week: WeekLayout,
}

impl CalendarLayout {
    /// Reads `(id, base id, resource id)` from a calendar block.
    pub fn identity(&self, block: &[u8]) -> ScalarResult<(i32, i32, Option<i32>)> {
        let id = get_i32(block, self.id)?;
        let base = get_i32(block, self.base_id)?;
        let resource = self
            .resource
            .map(|offset| get_i32(block, offset))
            .transpose()?;
        Ok((id, base, resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: WeekLayout = WeekLayout {
        first_day: 4,
        day_stride: 60,
        default_flag: 0,
        day_periods: PeriodLayout {
            count: 2,
            starts: 8,
            durations: 20,
        },
        exception_count: 0,
        first_exception: 424,
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
    };

    fn put_i16(buf: &mut [u8], offset: usize, value: i16) {
        buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn blob(exceptions: usize) -> Vec<u8> {
        vec![0u8; 424 + 64 * exceptions]
    }

    #[test]
    fn default_flag_on_base_gives_standard_day() {
        let mut data = blob(0);
        for day in 0..7 {
            put_i16(&mut data, 4 + 60 * day, 1);
        }
        let week = LAYOUT.decode_week(&data, false);
        assert_eq!(week, standard_week());
    }

    #[test]
    fn default_flag_on_derived_inherits() {
        let mut data = blob(0);
        put_i16(&mut data, 4, 1);
        let week = LAYOUT.decode_week(&data, true);
        assert_eq!(week[0], DayDefinition::Inherit);
        assert_eq!(week[1], DayDefinition::NonWorking);
    }

    #[test]
    fn explicit_periods() {
        let mut data = blob(0);
        let monday = 4 + 60;
        put_i16(&mut data, monday + 2, 1);
        put_i16(&mut data, monday + 8, 4800);
        put_i16(&mut data, monday + 20, 2400);
        let week = LAYOUT.decode_week(&data, false);
        assert_eq!(
            week[Weekday::Monday.index()],
            DayDefinition::Working(vec![TimeRange::hm((8, 0), (12, 0))])
        );
    }

    #[test]
    fn period_count_is_capped() {
        let mut data = blob(0);
        put_i16(&mut data, 4 + 2, 9);
        let week = LAYOUT.decode_week(&data, false);
        match &week[0] {
            DayDefinition::Working(ranges) => assert_eq!(ranges.len(), MAX_PERIODS),
            other => panic!("expected working day, got {other:?}"),
        }
    }

    #[test]
    fn truncated_blob_falls_back() {
        let week = LAYOUT.decode_week(&[], true);
        assert!(week.iter().all(|d| *d == DayDefinition::Inherit));
        let week = LAYOUT.decode_week(&[], false);
        assert_eq!(week, standard_week());
    }

    #[test]
    fn exceptions_decode_until_truncated() {
        let mut data = blob(1);
        put_i16(&mut data, 0, 2);
        put_i16(&mut data, 424, 100);
        put_i16(&mut data, 426, 101);
        let exceptions = LAYOUT.decode_exceptions(&data);
        assert_eq!(exceptions.len(), 1, "second exception runs past the blob");
        assert_eq!(exceptions[0].from, scalar::date_from_days(100));
        assert_eq!(exceptions[0].to, scalar::date_from_days(101));
        assert!(!exceptions[0].is_working());
    }

    #[test]
    fn base_rules() {
        assert_eq!(BaseRule::MinusOneIsBase.classify(-1), CalendarParent::Base);
        assert_eq!(BaseRule::MinusOneIsBase.classify(0), CalendarParent::Invalid);
        assert_eq!(BaseRule::MinusOneIsBase.classify(3), CalendarParent::Derived(3));
        assert_eq!(BaseRule::PositiveIsDerived.classify(0), CalendarParent::Base);
        assert_eq!(BaseRule::PositiveIsDerived.classify(-1), CalendarParent::Base);
        assert_eq!(BaseRule::PositiveIsDerived.classify(2), CalendarParent::Derived(2));
    }
}
