//! Resolves the configured timezone and local calendar dates within it.

use time::{Date, OffsetDateTime};
use time_tz::{OffsetDateTimeExt, Tz};

use crate::Error;

/// Looks up a canonical timezone name, e.g. "Asia/Tokyo".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not a canonical timezone.
pub fn resolve_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
}

/// The calendar date of `date_time` in `timezone`.
///
/// The offset is the one in effect at `date_time`, so daylight saving time is
/// applied per timestamp.
pub fn local_date(date_time: OffsetDateTime, timezone: &Tz) -> Date {
    date_time.to_timezone(timezone).date()
}

/// Today's calendar date in `timezone`.
pub fn today(timezone: &Tz) -> Date {
    local_date(OffsetDateTime::now_utc(), timezone)
}
