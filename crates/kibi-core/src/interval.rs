//! Time partition intervals for date-based index names

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a string names no known interval
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown interval: {0}")]
pub struct UnknownInterval(pub String);

/// Granularity at which a date-pattern index rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Interval {
    /// Every interval, finest first. This is the order the wizard offers them in.
    pub const ALL: [Interval; 5] = [
        Interval::Hours,
        Interval::Days,
        Interval::Weeks,
        Interval::Months,
        Interval::Years,
    ];

    /// Machine name persisted with index patterns (`days`, `weeks`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Interval::Hours => "hours",
            Interval::Days => "days",
            Interval::Weeks => "weeks",
            Interval::Months => "months",
            Interval::Years => "years",
        }
    }

    /// Label shown to users (`daily`, `weekly`, ...)
    pub fn display(self) -> &'static str {
        match self {
            Interval::Hours => "hourly",
            Interval::Days => "daily",
            Interval::Weeks => "weekly",
            Interval::Months => "monthly",
            Interval::Years => "yearly",
        }
    }

    /// Floor `dt` to the start of the partition that contains it.
    ///
    /// Weeks start on the ISO Monday.
    pub fn start_of(self, dt: DateTime<Utc>) -> DateTime<Utc> {
        let date = dt.date_naive();
        match self {
            Interval::Hours => midnight(date) + TimeDelta::hours(i64::from(dt.hour())),
            Interval::Days => midnight(date),
            Interval::Weeks => {
                let back = i64::from(date.weekday().num_days_from_monday());
                midnight(date) - TimeDelta::days(back)
            }
            Interval::Months => midnight(date.with_day(1).unwrap_or(date)),
            Interval::Years => midnight(date.with_ordinal(1).unwrap_or(date)),
        }
    }

    /// Move `dt` by `steps` partitions (negative steps go back in time).
    ///
    /// Months and years are calendar aware. Returns `None` on overflow.
    pub fn offset(self, dt: DateTime<Utc>, steps: i64) -> Option<DateTime<Utc>> {
        match self {
            Interval::Hours => dt.checked_add_signed(TimeDelta::try_hours(steps)?),
            Interval::Days => dt.checked_add_signed(TimeDelta::try_days(steps)?),
            Interval::Weeks => dt.checked_add_signed(TimeDelta::try_weeks(steps)?),
            Interval::Months => add_months(dt, steps),
            Interval::Years => add_months(dt, steps.checked_mul(12)?),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn add_months(dt: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(count)
    } else {
        dt.checked_sub_months(count)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Interval::ALL
            .into_iter()
            .find(|i| i.name() == normalized || i.display() == normalized)
            .ok_or_else(|| UnknownInterval(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_interval_parses_names_and_labels() {
        assert_eq!("days".parse::<Interval>().unwrap(), Interval::Days);
        assert_eq!("Weekly".parse::<Interval>().unwrap(), Interval::Weeks);
        assert_eq!(" hourly ".parse::<Interval>().unwrap(), Interval::Hours);
        assert!("fortnightly".parse::<Interval>().is_err());
    }

    #[test]
    fn test_start_of_truncates_to_partition() {
        let dt = at(2024, 5, 15, 13, 42); // a Wednesday
        assert_eq!(Interval::Hours.start_of(dt), at(2024, 5, 15, 13, 0));
        assert_eq!(Interval::Days.start_of(dt), at(2024, 5, 15, 0, 0));
        assert_eq!(Interval::Weeks.start_of(dt), at(2024, 5, 13, 0, 0));
        assert_eq!(Interval::Months.start_of(dt), at(2024, 5, 1, 0, 0));
        assert_eq!(Interval::Years.start_of(dt), at(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_offset_is_calendar_aware() {
        let dt = at(2024, 1, 31, 0, 0);
        assert_eq!(Interval::Months.offset(dt, 1), Some(at(2024, 2, 29, 0, 0)));
        assert_eq!(Interval::Months.offset(dt, -2), Some(at(2023, 11, 30, 0, 0)));
        assert_eq!(Interval::Years.offset(dt, -1), Some(at(2023, 1, 31, 0, 0)));
        assert_eq!(Interval::Weeks.offset(dt, 1), Some(at(2024, 2, 7, 0, 0)));
        assert_eq!(Interval::Hours.offset(dt, -1), Some(at(2024, 1, 30, 23, 0)));
    }

    #[test]
    fn test_serde_uses_machine_name() {
        let json = serde_json::to_string(&Interval::Months).unwrap();
        assert_eq!(json, "\"months\"");
    }
}
