//! Time window helpers: the range selector, window bounds and calendar month keys.

use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};
use time::{Date, Duration, Month};

/// The time span of transactions to analyse, counted back from "now".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TimeRange {
    /// The last seven days.
    Week,
    /// The last calendar month.
    #[default]
    Month,
    /// The last calendar year.
    Year,
}

impl TimeRange {
    /// The value used for this range on the command line and in reports.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// A human-readable label for report titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "Last week",
            Self::Month => "Last month",
            Self::Year => "Last year",
        }
    }
}

/// Computes the inclusive lower bound of the window for `range` ending at `now`.
///
/// Month and year subtraction keep the day of the month, clamped to the last
/// day of the target month, e.g. 31 March minus one month is 29 February in a
/// leap year and 29 February minus one year is 28 February.
pub fn resolve_window_start(range: TimeRange, now: Date) -> Date {
    match range {
        TimeRange::Week => now.checked_sub(Duration::days(7)).unwrap_or(Date::MIN),
        TimeRange::Month => subtract_months(now, 1),
        TimeRange::Year => subtract_months(now, 12),
    }
}

/// A calendar month, displayed and serialized as `YYYY-MM`.
///
/// Ordering is chronological, which matches the string ordering of the
/// formatted keys for four digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    /// The month containing `date`.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// The 1-based month number.
    pub fn month(self) -> u8 {
        self.month
    }

    fn months_since_epoch(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_months_since_epoch(months: i64) -> Self {
        Self {
            year: months.div_euclid(12) as i32,
            month: (months.rem_euclid(12) + 1) as u8,
        }
    }

    /// The month `count` months before this one.
    pub fn minus(self, count: u32) -> Self {
        Self::from_months_since_epoch(self.months_since_epoch() - count as i64)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The `count` calendar months ending with the month containing `now`, oldest first.
///
/// Works on (year, month) pairs rather than dates so every month appears
/// exactly once regardless of the day of the month of `now`.
pub fn trailing_months(now: Date, count: u32) -> Vec<MonthKey> {
    let current = MonthKey::of(now);

    (0..count).rev().map(|offset| current.minus(offset)).collect()
}

/// The Sunday that starts the week containing `date`.
pub fn week_start(date: Date) -> Date {
    let days_since_sunday = date.weekday().number_days_from_sunday() as i64;

    date.checked_sub(Duration::days(days_since_sunday))
        .unwrap_or(Date::MIN)
}

/// Keeps the day of the month, clamped to the length of the target month, so
/// 31 March minus one month is the end of February rather than early March.
fn subtract_months(date: Date, count: u32) -> Date {
    let target = MonthKey::of(date).minus(count);

    Month::try_from(target.month)
        .and_then(|month| {
            let day = date.day().min(month.length(target.year));
            Date::from_calendar_date(target.year, month, day)
        })
        .unwrap_or(Date::MIN)
}
