use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%B %d, %Y",
];

/// Parses the mix of date shapes seen in enrollment exports. Returns `None`
/// for blank or unrecognised values.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Inverse of [`parse_datetime`] for exports: date-only when the time is
/// midnight.
pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_mixed_formats() {
        let midnight = ymd_hms(2023, 9, 14, 0, 0, 0);
        assert_eq!(parse_datetime("2023-09-14"), Some(midnight));
        assert_eq!(parse_datetime("09/14/2023"), Some(midnight));
        assert_eq!(parse_datetime("9/14/23"), Some(midnight));
        assert_eq!(parse_datetime("2023/09/14"), Some(midnight));
        assert_eq!(parse_datetime("14-Sep-2023"), Some(midnight));
        assert_eq!(parse_datetime("September 14, 2023"), Some(midnight));
        assert_eq!(
            parse_datetime("2023-09-14 08:30:00"),
            Some(ymd_hms(2023, 9, 14, 8, 30, 0))
        );
        assert_eq!(
            parse_datetime("09/14/2023 08:30"),
            Some(ymd_hms(2023, 9, 14, 8, 30, 0))
        );
        assert_eq!(
            parse_datetime("2023-09-14T08:30:00Z"),
            Some(ymd_hms(2023, 9, 14, 8, 30, 0))
        );
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert!(parse_datetime("   ").is_none());
        assert!(parse_datetime("not-a-date").is_none());
        assert!(parse_datetime("2023-13-45").is_none());
    }

    #[test]
    fn formats_midnight_as_date_only() {
        assert_eq!(format_datetime(&ymd_hms(2024, 1, 2, 0, 0, 0)), "2024-01-02");
        assert_eq!(
            format_datetime(&ymd_hms(2024, 1, 2, 13, 5, 9)),
            "2024-01-02 13:05:09"
        );
    }
}
