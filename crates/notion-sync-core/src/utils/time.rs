use chrono::{DateTime, Utc};

/// Format used for `notion-last-sync-time`.
///
/// Milliseconds are separated by a colon; existing vaults already carry
/// timestamps in this shape.
pub const SYNC_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S:%3fZ";

/// Current time as a sync timestamp
pub fn now() -> String {
    format_sync_time(Utc::now())
}

pub fn format_sync_time(at: DateTime<Utc>) -> String {
    at.format(SYNC_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_sync_time() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(67);
        assert_eq!(format_sync_time(at), "2024-01-02T03:04:05:067Z");
    }
}
