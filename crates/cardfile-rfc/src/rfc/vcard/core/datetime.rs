//! Date and time values for BDAY, ANNIVERSARY and REV.
//!
//! vCard dates support partial/truncated forms that iCalendar doesn't allow.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

/// A date value with optional truncation.
///
/// Supports full dates and truncated forms like `--MMDD` or `---DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VCardDate {
    /// Full date (YYYYMMDD).
    Full(NaiveDate),
    /// Year and month only (YYYY-MM).
    YearMonth { year: i32, month: u32 },
    /// Year only (YYYY).
    Year(i32),
    /// Month only (--MM).
    Month(u32),
    /// Month and day, no year (--MMDD).
    MonthDay { month: u32, day: u32 },
    /// Day only (---DD).
    Day(u32),
}

impl VCardDate {
    /// Creates a full date, if the components form a calendar date.
    #[must_use]
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::Full)
    }

    /// Returns the year if available.
    #[must_use]
    pub fn year_value(&self) -> Option<i32> {
        match self {
            Self::Full(d) => Some(d.year()),
            Self::YearMonth { year, .. } | Self::Year(year) => Some(*year),
            Self::Month(_) | Self::MonthDay { .. } | Self::Day(_) => None,
        }
    }

    /// Returns the month if available.
    #[must_use]
    pub fn month_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.month()),
            Self::YearMonth { month, .. } | Self::MonthDay { month, .. } | Self::Month(month) => {
                Some(*month)
            }
            Self::Year(_) | Self::Day(_) => None,
        }
    }

    /// Returns the day if available.
    #[must_use]
    pub fn day_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.day()),
            Self::MonthDay { day, .. } | Self::Day(day) => Some(*day),
            Self::Year(_) | Self::YearMonth { .. } | Self::Month(_) => None,
        }
    }
}

/// A time value with optional truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VCardTime {
    /// Full time (HHMMSS).
    Full(NaiveTime),
    /// Hour and minute only (HHMM).
    HourMinute { hour: u32, minute: u32 },
    /// Hour only (HH).
    Hour(u32),
    /// Minute and second, no hour (-MMSS).
    MinuteSecond { minute: u32, second: u32 },
    /// Second only (--SS).
    Second(u32),
}

/// UTC offset attached to a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VCardUtcOffset {
    /// Hours from UTC (-12 to +14).
    pub hours: i8,
    /// Minutes from UTC (0-59).
    pub minutes: u8,
}

impl VCardUtcOffset {
    /// UTC offset.
    pub const UTC: Self = Self {
        hours: 0,
        minutes: 0,
    };

    /// Creates a new UTC offset.
    #[must_use]
    pub const fn new(hours: i8, minutes: u8) -> Self {
        Self { hours, minutes }
    }

    /// Whether this offset is zero.
    #[must_use]
    pub const fn is_utc(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    /// Returns total offset in minutes.
    #[must_use]
    pub fn total_minutes(&self) -> i32 {
        let sign = if self.hours < 0 { -1 } else { 1 };
        i32::from(self.hours) * 60 + i32::from(self.minutes) * sign
    }
}

/// Combined date and time, possibly partial.
///
/// This is the value type of BDAY, ANNIVERSARY and REV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DateAndOrTime {
    /// Date only.
    Date(VCardDate),
    /// Date and time.
    DateTime {
        date: VCardDate,
        time: VCardTime,
        offset: Option<VCardUtcOffset>,
    },
    /// Time only.
    Time {
        time: VCardTime,
        offset: Option<VCardUtcOffset>,
    },
    /// Free-form text (`VALUE=text`).
    Text(String),
}

impl DateAndOrTime {
    /// Creates a full date from year/month/day.
    #[must_use]
    pub fn full_date(year: i32, month: u32, day: u32) -> Option<Self> {
        VCardDate::ymd(year, month, day).map(Self::Date)
    }

    /// Returns the date component if available.
    #[must_use]
    pub fn as_date(&self) -> Option<&VCardDate> {
        match self {
            Self::Date(d) | Self::DateTime { date: d, .. } => Some(d),
            Self::Time { .. } | Self::Text(_) => None,
        }
    }

    /// Returns the time component if available.
    #[must_use]
    pub fn as_time(&self) -> Option<&VCardTime> {
        match self {
            Self::DateTime { time: t, .. } | Self::Time { time: t, .. } => Some(t),
            Self::Date(_) | Self::Text(_) => None,
        }
    }

    /// Returns the UTC offset if one was given.
    #[must_use]
    pub fn offset(&self) -> Option<VCardUtcOffset> {
        match self {
            Self::DateTime { offset, .. } | Self::Time { offset, .. } => *offset,
            Self::Date(_) | Self::Text(_) => None,
        }
    }

    /// Returns whether this is a text value.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}
