// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Best-effort parse of a textual `earliest_known_date` cell.
///
/// Returns `None` for anything unparseable; the loader records the miss in
/// its summary instead of failing.
#[must_use]
pub fn parse_earliest_date_str(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_common_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2023, 10, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("date");
        assert_eq!(parse_earliest_date_str("2023-10-01"), Some(expected));
        assert_eq!(
            parse_earliest_date_str("2023-10-01 00:00:00"),
            Some(expected)
        );
        assert_eq!(parse_earliest_date_str("01-10-2023"), Some(expected));
    }

    #[test]
    fn rejects_garbage_without_panicking() {
        assert_eq!(parse_earliest_date_str(""), None);
        assert_eq!(parse_earliest_date_str("   "), None);
        assert_eq!(parse_earliest_date_str("unknown"), None);
        assert_eq!(parse_earliest_date_str("2023-13-45"), None);
    }
}
