//! Departure-time model.
//!
//! # Design
//!
//! Historical flow is aggregated by **time of week**: a record belongs to a
//! `(weekday, interval)` slot where the interval is a fixed-width bucket of
//! the day (30 minutes in the shipped dataset, labelled by its start, e.g.
//! `"08:30"`).  A requested departure maps to exactly one slot by flooring
//! its wall-clock time to the bucket start:
//!
//!   08:44 → "08:30",  08:30 → "08:30",  23:59 → "23:30"
//!
//! All timestamps are naive local wall-clock time.  An offset on an incoming
//! RFC 3339 timestamp is accepted but discarded; the dataset has no zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::{CoreError, CoreResult};

// ── IntervalLabel ─────────────────────────────────────────────────────────────

/// A time-of-day bucket label, stored as minutes since midnight.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalLabel(pub u16);

impl IntervalLabel {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Build from hour and minute.  Returns `None` outside `00:00..=23:59`.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then(|| IntervalLabel((hour * 60 + minute) as u16))
    }

    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    #[inline]
    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Floor to the start of the `bucket_minutes`-wide bucket containing
    /// this label.  A zero bucket width is treated as one minute.
    #[inline]
    pub fn floor_to(self, bucket_minutes: u16) -> Self {
        let b = bucket_minutes.max(1);
        IntervalLabel(self.0 - self.0 % b)
    }
}

impl fmt::Display for IntervalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for IntervalLabel {
    type Err = CoreError;

    /// Accepts `HH:MM`, `HH:MM:SS` (seconds are dropped), or a bare integer
    /// number of seconds since midnight.
    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let bad = || CoreError::InvalidInterval(s.to_owned());

        if !s.contains(':') {
            let secs: u32 = s.parse().map_err(|_| bad())?;
            return IntervalLabel::from_hm(secs / 3_600, (secs % 3_600) / 60).ok_or_else(bad);
        }

        let mut parts = s.split(':');
        let hour: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let minute: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        if let Some(sec) = parts.next() {
            sec.parse::<u32>().ok().filter(|&v| v < 60).ok_or_else(bad)?;
        }
        if parts.next().is_some() {
            return Err(bad());
        }
        IntervalLabel::from_hm(hour, minute).ok_or_else(bad)
    }
}

// ── TimeSlot ──────────────────────────────────────────────────────────────────

/// A time-of-week slot: the key historical flow is aggregated under.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct TimeSlot {
    pub weekday:  Weekday,
    pub interval: IntervalLabel,
}

impl TimeSlot {
    pub fn new(weekday: Weekday, interval: IntervalLabel) -> Self {
        Self { weekday, interval }
    }

    /// The slot containing `at`, with the time of day floored to
    /// `bucket_minutes`.
    pub fn containing(at: NaiveDateTime, bucket_minutes: u16) -> Self {
        let minutes = (at.hour() * 60 + at.minute()) as u16;
        Self {
            weekday:  at.weekday(),
            interval: IntervalLabel(minutes).floor_to(bucket_minutes),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", weekday_name(self.weekday), self.interval)
    }
}

/// Full English weekday name, matching the dataset's `weekday` column.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── DepartureTime ─────────────────────────────────────────────────────────────

/// A parsed departure timestamp that remembers the text it came from, so the
/// response can echo it verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct DepartureTime {
    raw:   String,
    local: NaiveDateTime,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl DepartureTime {
    /// Parse an ISO-8601 timestamp.
    ///
    /// Accepted, in order: naive date-time (`T` or space separator, seconds
    /// and fraction optional), RFC 3339 with offset (the local wall-clock
    /// part is kept), and a bare date (midnight).
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let text = raw.trim();

        let local = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| CoreError::InvalidTimestamp(raw.to_owned()))?;

        Ok(Self { raw: raw.to_owned(), local })
    }

    /// The text the caller supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    /// Time-of-week slot for this departure.
    pub fn slot(&self, bucket_minutes: u16) -> TimeSlot {
        TimeSlot::containing(self.local, bucket_minutes)
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ── ServiceWindow ─────────────────────────────────────────────────────────────

/// Inclusive calendar-date range covered by the historical dataset.
///
/// Departures outside this range are rejected at the request boundary; the
/// flow estimator itself accepts any time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceWindow {
    pub first_day: NaiveDate,
    pub last_day:  NaiveDate,
}

impl ServiceWindow {
    pub fn new(first_day: NaiveDate, last_day: NaiveDate) -> Self {
        Self { first_day, last_day }
    }

    /// `true` if `at` falls on any day from `first_day` to `last_day`.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        self.first_day <= day && day <= self.last_day
    }

    /// Reject a departure outside the window.
    pub fn check(&self, departure: &DepartureTime) -> CoreResult<()> {
        if self.contains(departure.local()) {
            Ok(())
        } else {
            Err(CoreError::OutsideWindow { first: self.first_day, last: self.last_day })
        }
    }
}

impl Default for ServiceWindow {
    /// The Taipei detector dataset: 2017-09-18 through 2017-11-30.
    fn default() -> Self {
        Self {
            first_day: NaiveDate::from_ymd_opt(2017, 9, 18).expect("valid calendar date"),
            last_day:  NaiveDate::from_ymd_opt(2017, 11, 30).expect("valid calendar date"),
        }
    }
}
