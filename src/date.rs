//! Parsing and display helpers for post timestamps. All display formats are
//! rendered in UTC so a post's archive bucket never depends on the machine
//! building the site.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parses a frontmatter timestamp. Accepts RFC 3339 (any offset, converted
/// to UTC), `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, and a bare
/// `YYYY-MM-DD` (midnight UTC). Returns `None` for anything else.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(input) {
        return Some(date_time.with_timezone(&Utc));
    }
    for format in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// The year to pass as the archive's last year. This is the one place the
/// wall clock is read; the views themselves never do.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// `yyyy/mm/dd`, the date shown next to each article.
pub fn article_date(date_time: &DateTime<Utc>) -> String {
    date_time.format("%Y/%m/%d").to_string()
}

/// Zero-padded day of the month (`05`).
pub fn day_of_month(date_time: &DateTime<Utc>) -> String {
    date_time.format("%d").to_string()
}

/// Full English month name for a 1-based month number. Out-of-range numbers
/// yield an empty string.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1],
        _ => "",
    }
}

/// Zero-padded 1-based month number (`06`).
pub fn month_number(month: u32) -> String {
    format!("{:02}", month)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2023-01-05"), Some(midnight));
        assert_eq!(parse_timestamp(" 2023-01-05 "), Some(midnight));
        assert_eq!(parse_timestamp("2023-01-05T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2023-01-05 00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("2023-01-05T00:00:00"), Some(midnight));
    }

    #[test]
    fn test_parse_timestamp_converts_offsets_to_utc() {
        // Late evening on the 31st in New York is already January in UTC.
        assert_eq!(
            parse_timestamp("2022-12-31T23:30:00-05:00"),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 4, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2023-13-01"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_display_formats() {
        let date_time = Utc.with_ymd_and_hms(2014, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(article_date(&date_time), "2014/06/01");
        assert_eq!(day_of_month(&date_time), "01");
        assert_eq!(month_number(6), "06");
        assert_eq!(month_name(6), "June");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_current_year() {
        assert!(current_year() >= 2024);
    }
}
