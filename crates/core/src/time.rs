//! Date handling for list views.
//!
//! Backend rows carry their timestamps as plain strings. They are parsed
//! leniently here; anything unparseable becomes `None`, which the filter stage
//! treats as non-matching and the sort stage places last.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, TimeZone, Utc,
};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`), naive date-times (taken as
/// UTC) and bare dates (midnight UTC). Returns `None` for anything else.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Start of the calendar day containing `now`, in the given offset.
pub fn start_of_day(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    // Fixed offsets have no gaps or folds, so the mapping is always single.
    now.with_timezone(&offset)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| offset.from_local_datetime(&midnight).single())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

/// `now` minus whole days.
pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// `now` minus calendar months, evaluated in the given offset.
///
/// Day-of-month is clamped when the target month is shorter (31 March minus
/// one month is 29 or 28 February).
pub fn months_before(now: DateTime<Utc>, months: u32, offset: FixedOffset) -> DateTime<Utc> {
    now.with_timezone(&offset)
        .checked_sub_months(Months::new(months))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whether `instant` falls in the same calendar month as `now`.
pub fn in_same_month(instant: DateTime<Utc>, now: DateTime<Utc>, offset: FixedOffset) -> bool {
    let a = instant.with_timezone(&offset);
    let b = now.with_timezone(&offset);
    a.year() == b.year() && a.month() == b.month()
}
