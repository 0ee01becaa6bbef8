//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Date assigned to documents whose front-matter carries no date
pub const EPOCH_DATE: &str = "1970-01-01";

/// Sort key for a missing date
pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Parse a date string in various formats.
///
/// Offset-bearing timestamps are normalized to UTC.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a date the way `Intl.DateTimeFormat("ja-JP", { dateStyle: "medium" })` does,
/// e.g. `2024/01/15`.
///
/// Timestamps with an explicit offset are shifted into `tz` first; plain dates are shown as written.
pub fn format_date_ja(s: &str, tz: Tz) -> Option<String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz).format("%Y/%m/%d").to_string());
    }
    parse_date_string(s).map(|dt| dt.format("%Y/%m/%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let dt = parse_date_string("2024-01-15T09:00:00+09:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_date_string("someday").is_none());
        assert!(parse_date_string("").is_none());
    }

    #[test]
    fn test_epoch_is_sentinel_date() {
        assert_eq!(parse_date_string(EPOCH_DATE), Some(epoch()));
    }

    #[test]
    fn test_format_date_ja() {
        assert_eq!(
            format_date_ja("2024-01-15", chrono_tz::Asia::Tokyo).as_deref(),
            Some("2024/01/15")
        );
        // 20:00 UTC is already the next day in Tokyo
        assert_eq!(
            format_date_ja("2024-01-15T20:00:00Z", chrono_tz::Asia::Tokyo).as_deref(),
            Some("2024/01/16")
        );
    }
}
