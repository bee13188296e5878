//! Scalar decoders for project file records.
//!
//! This crate turns raw record bytes into values: little-endian integers,
//! doubles, six-byte legacy integers, dates, times of day, timestamps,
//! time-range spans and null-terminated strings. It also provides
//! [`ByteCursor`] for walking headers sequentially.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Every read is checked against the supplied slice.
//! - **Sentinels are values** - An absent date is `None`, not an error.
//! - **No domain knowledge** - This crate knows nothing about tasks or resources.
//!
//! # Example
//!
//! ```
//! use scalar::{get_date, get_u16, get_utf16};
//!
//! let record = [0x40, 0x1F, 0xFF, 0xFF, b'A', 0, 0, 0];
//! assert_eq!(get_u16(&record, 0).unwrap(), 8000);
//! assert!(get_date(&record, 2).unwrap().is_none());
//! assert_eq!(get_utf16(&record, 4).unwrap(), "A");
//! ```

mod bytes;
mod cursor;
mod error;
mod text;
mod time;

pub use bytes::{
    fixed_point, get_bytes, get_f64, get_i16, get_i32, get_long6, get_u16, get_u32, get_u64,
    get_u8,
};
pub use cursor::ByteCursor;
pub use error::{ScalarError, ScalarResult};
pub use text::{get_ansi, get_utf16, strip_ampersands};
pub use time::{
    date_from_days, days_since_epoch, epoch, get_date, get_long_span, get_short_span, get_time,
    get_timestamp, range_end, time_from_tenths, DATE_ABSENT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = DATE_ABSENT;
        let _ = epoch();
        let _ = ByteCursor::new(&[]);
        let _: ScalarResult<()> = Ok(());
    }

    #[test]
    fn doctest_example() {
        let record = [0x40, 0x1F, 0xFF, 0xFF, b'A', 0, 0, 0];
        assert_eq!(get_u16(&record, 0).unwrap(), 8000);
        assert!(get_date(&record, 2).unwrap().is_none());
        assert_eq!(get_utf16(&record, 4).unwrap(), "A");
    }

    #[test]
    fn cursor_and_positional_agree() {
        let record = [0x10, 0x00, 0x20, 0x00, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&record);
        assert_eq!(cursor.read_u16().unwrap(), get_u16(&record, 0).unwrap());
        assert_eq!(cursor.read_i32().unwrap(), get_i32(&record, 2).unwrap());
    }
}
