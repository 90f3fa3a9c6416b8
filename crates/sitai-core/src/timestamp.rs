//! ISO-8601 text form of discovery dates.
//!
//! Dates are naive local timestamps. They are written as
//! `YYYY-MM-DDTHH:MM:SS[.fraction]`; reading is more lenient and also takes
//! a space separator, an RFC 3339 offset (dropped), or a bare date
//! (midnight).

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Text that could not be read as a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ISO-8601 timestamp: {0:?}")]
pub struct ParseTimestampError(pub String);

/// Current local time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Render a timestamp in the stored text form.
pub fn format(dt: &NaiveDateTime) -> String {
    dt.format(WRITE_FORMAT).to_string()
}

/// Parse any of the accepted text forms.
pub fn parse(s: &str) -> Result<NaiveDateTime, ParseTimestampError> {
    let s = s.trim();

    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ParseTimestampError(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn format_without_fraction() {
        assert_eq!(format(&ymd_hms(2024, 3, 9, 14, 5, 0)), "2024-03-09T14:05:00");
    }

    #[test]
    fn format_parse_keeps_subseconds() {
        let dt = ymd_hms(2024, 3, 9, 14, 5, 0)
            .with_nanosecond(123_456_000)
            .unwrap();
        assert_eq!(parse(&format(&dt)).unwrap(), dt);
    }

    #[test]
    fn parses_lenient_forms() {
        let expected = ymd_hms(2023, 11, 2, 8, 30, 15);
        assert_eq!(parse("2023-11-02T08:30:15").unwrap(), expected);
        assert_eq!(parse("2023-11-02 08:30:15").unwrap(), expected);
        assert_eq!(parse("2023-11-02T08:30:15-03:00").unwrap(), expected);
        assert_eq!(parse("2023-11-02").unwrap(), ymd_hms(2023, 11, 2, 0, 0, 0));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse("02/11/2023").unwrap_err();
        assert!(err.to_string().contains("02/11/2023"));
    }
}
