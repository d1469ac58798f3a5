use serde::Serialize;

/// Seconds between 1601-01-01 (Chromium's visit_time epoch) and 1970-01-01.
pub const WEBKIT_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

pub const INVALID_TIME: &str = "Invalid time";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub url: String,
    pub visit_time_raw: i64,
}

impl HistoryRecord {
    pub fn visit_time_unix(&self) -> i64 {
        webkit_to_unix(self.visit_time_raw)
    }
}

/// Visits at most `window_secs` before `reference_time` (unix seconds) are
/// recent. The difference is signed, so visits after the reference count too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub reference_time: i64,
    pub window_secs: i64,
}

impl TimeWindow {
    pub fn new(reference_time: i64, window_secs: i64) -> Self {
        Self {
            reference_time,
            window_secs,
        }
    }

    pub fn ending_now(window_secs: i64) -> Self {
        Self::new(chrono::Utc::now().timestamp(), window_secs)
    }

    pub fn contains(&self, unix_secs: i64) -> bool {
        self.reference_time.wrapping_sub(unix_secs) <= self.window_secs
    }
}

/// Microseconds since 1601 to whole seconds since 1970. Unclamped.
pub fn webkit_to_unix(microseconds: i64) -> i64 {
    microseconds / 1_000_000 - WEBKIT_EPOCH_OFFSET_SECS
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or [`INVALID_TIME`] when the value has no
/// calendar representation.
pub fn format_utc(unix_secs: i64) -> String {
    match chrono::DateTime::<chrono::Utc>::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => INVALID_TIME.to_string(),
    }
}

/// Stored URL text to a native string. Absent or non-UTF-8 text yields "".
pub fn decode_url(bytes: Option<&[u8]>) -> String {
    match bytes {
        Some(b) if !b.is_empty() => std::str::from_utf8(b)
            .map(str::to_owned)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_webkit_epoch() {
        assert_eq!(webkit_to_unix(0), -WEBKIT_EPOCH_OFFSET_SECS);
        assert_eq!(webkit_to_unix(11_644_473_600_000_000), 0);
        assert_eq!(webkit_to_unix(13_303_449_600_000_000), 1_658_976_000);
        // sub-second ticks are truncated
        assert_eq!(webkit_to_unix(11_644_473_600_999_999), 0);
    }

    #[test]
    fn conversion_matches_formula_across_range() {
        for t in [i64::MIN, -1, 1, 999_999, 1_000_000, 13_000_000_000_000_123, i64::MAX] {
            assert_eq!(webkit_to_unix(t), t / 1_000_000 - 11_644_473_600);
        }
    }

    #[test]
    fn window_includes_boundary_and_excludes_one_past() {
        let window = TimeWindow::new(1_700_000_600, 600);
        assert!(window.contains(1_700_000_000));
        assert!(!window.contains(1_699_999_999));
        assert!(window.contains(1_700_000_600));
        assert!(window.contains(1_700_009_999));
    }

    #[test]
    fn formats_utc() {
        assert_eq!(format_utc(0), "1970-01-01 00:00:00");
        assert_eq!(format_utc(1_658_976_000), "2022-07-28 02:40:00");
        assert_eq!(format_utc(-WEBKIT_EPOCH_OFFSET_SECS), "1601-01-01 00:00:00");
    }

    #[test]
    fn out_of_range_time_is_invalid() {
        assert_eq!(format_utc(i64::MAX), INVALID_TIME);
        assert_eq!(format_utc(i64::MIN), INVALID_TIME);
    }

    #[test]
    fn decodes_url_text() {
        assert_eq!(
            decode_url(Some(b"https://example.com/\xe2\x9c\x93")),
            "https://example.com/\u{2713}"
        );
        assert_eq!(decode_url(Some(b"")), "");
        assert_eq!(decode_url(None), "");
        assert_eq!(decode_url(Some(b"\xff\xfe")), "");
    }
}
