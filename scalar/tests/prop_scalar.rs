use proptest::prelude::*;
use scalar::{date_from_days, days_since_epoch, get_date, get_utf16, DATE_ABSENT};

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,24}",
        "[\u{00C0}-\u{00FF}]{0,8}",
        "[\u{4E00}-\u{4E20}]{0,8}",
    ]
}

proptest! {
    #[test]
    fn prop_day_counts_roundtrip(days in 0u16..DATE_ABSENT) {
        let date = date_from_days(days).unwrap();
        prop_assert_eq!(days_since_epoch(date), Some(days));
    }

    #[test]
    fn prop_date_decode_matches_day_count(days in any::<u16>()) {
        let decoded = get_date(&days.to_le_bytes(), 0).unwrap();
        prop_assert_eq!(decoded.is_none(), days == DATE_ABSENT);
    }

    #[test]
    fn prop_utf16_stops_at_terminator(text in text_strategy(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut buf: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&tail);
        prop_assert_eq!(get_utf16(&buf, 0).unwrap(), text);
    }

    #[test]
    fn prop_utf16_never_reads_out_of_bounds(buf in prop::collection::vec(any::<u8>(), 0..64), offset in 0usize..80) {
        let result = get_utf16(&buf, offset);
        prop_assert_eq!(result.is_ok(), offset <= buf.len());
        if let Ok(text) = result {
            prop_assert!(text.encode_utf16().count() <= (buf.len() - offset) / 2);
        }
    }
}
