//! Date, time-of-day and timestamp decoders.
//!
//! Dates are 16-bit day counts from 1983-12-31 with `0xFFFF` reserved for
//! "no date". Times are 16-bit tenths of a minute since midnight.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::bytes::{get_i32, get_u16};
use crate::error::ScalarResult;

/// Day count sentinel meaning "absent".
pub const DATE_ABSENT: u16 = 0xFFFF;

/// `NaiveDate::num_days_from_ce` of the format epoch, 1983-12-31.
const EPOCH_DAYS_FROM_CE: i32 = 724_275;

const SECONDS_PER_DAY: i64 = 86_400;

/// Returns the epoch date (day count zero).
#[must_use]
pub fn epoch() -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE).unwrap_or_default()
}

/// Converts a raw day count to a date. The sentinel maps to `None`.
#[must_use]
pub fn date_from_days(days: u16) -> Option<NaiveDate> {
    if days == DATE_ABSENT {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE + i32::from(days))
}

/// Inverse of [`date_from_days`]. Returns `None` for dates that have no
/// representation (before the epoch, or landing on the sentinel).
#[must_use]
pub fn days_since_epoch(date: NaiveDate) -> Option<u16> {
    let days = date.signed_duration_since(epoch()).num_days();
    u16::try_from(days).ok().filter(|&d| d != DATE_ABSENT)
}

/// Converts tenths of a minute to a time of day, wrapping at midnight.
#[must_use]
pub fn time_from_tenths(tenths: u16) -> NaiveTime {
    let secs = (i64::from(tenths) * 6).rem_euclid(SECONDS_PER_DAY);
    let secs = u32::try_from(secs).unwrap_or_default();
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default()
}

/// Adds a duration expressed in tenths of a minute to a start time.
#[must_use]
pub fn range_end(start: NaiveTime, tenths: i64) -> NaiveTime {
    let tenths = tenths.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    start.overflowing_add_signed(Duration::seconds(tenths * 6)).0
}

/// Reads a date at `offset`.
pub fn get_date(buf: &[u8], offset: usize) -> ScalarResult<Option<NaiveDate>> {
    get_u16(buf, offset).map(date_from_days)
}

/// Reads a time of day at `offset`.
pub fn get_time(buf: &[u8], offset: usize) -> ScalarResult<NaiveTime> {
    get_u16(buf, offset).map(time_from_tenths)
}

/// Reads a timestamp: time of day at `offset`, day count at `offset + 2`.
///
/// The time component is added to midnight of the day rather than wrapped,
/// so values of a full day or more roll into the following date.
pub fn get_timestamp(buf: &[u8], offset: usize) -> ScalarResult<Option<NaiveDateTime>> {
    let tenths = get_u16(buf, offset)?;
    let days = get_u16(buf, offset + 2)?;
    Ok(date_from_days(days).and_then(|date| {
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::seconds(i64::from(tenths) * 6))
    }))
}

/// Reads a 16-bit time-range duration in tenths of a minute.
pub fn get_short_span(buf: &[u8], offset: usize) -> ScalarResult<i64> {
    get_u16(buf, offset).map(i64::from)
}

/// Reads a 32-bit time-range duration in tenths of a minute.
pub fn get_long_span(buf: &[u8], offset: usize) -> ScalarResult<i64> {
    get_i32(buf, offset).map(i64::from)
}
