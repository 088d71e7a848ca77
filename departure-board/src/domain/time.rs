//! Time-of-day handling for upstream board data.
//!
//! The live departures API reports times as bare "HH:MM" strings with no
//! date component. [`ClockTime`] keeps exactly that: a time of day. Delays
//! are same-day differences, so a service scheduled at 23:58 and expected at
//! 00:03 reports a large negative delay. That is a known limitation of the
//! data, not something this module papers over.

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time of day as reported by the upstream board, minute precision.
///
/// # Examples
///
/// ```
/// use departure_board::domain::ClockTime;
///
/// let scheduled = ClockTime::parse_hhmm("10:00").unwrap();
/// let live = ClockTime::parse_hhmm("10:05").unwrap();
/// assert_eq!(live.minutes_since(scheduled), 5);
/// assert_eq!(live.to_string(), "10:05");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse a time from "HH:MM" format.
    ///
    /// Both fields must be two digits; "9:05" and "09:05:00" are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use departure_board::domain::ClockTime;
    ///
    /// assert!(ClockTime::parse_hhmm("00:00").is_ok());
    /// assert!(ClockTime::parse_hhmm("23:59").is_ok());
    ///
    /// assert!(ClockTime::parse_hhmm("1430").is_err());
    /// assert!(ClockTime::parse_hhmm("14:3").is_err());
    /// assert!(ClockTime::parse_hhmm("25:00").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        let well_formed = s.len() == 5
            && s.bytes().enumerate().all(|(i, b)| match i {
                2 => b == b':',
                _ => b.is_ascii_digit(),
            });
        if !well_formed {
            return Err(TimeError::new("expected HH:MM format"));
        }

        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| TimeError::new("hour or minute out of range"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Whole minutes from `earlier` to `self` on the same day.
    ///
    /// Negative when `self` is before `earlier`. No midnight wrap-around is
    /// attempted.
    pub fn minutes_since(&self, earlier: Self) -> i64 {
        self.0.signed_duration_since(earlier.0).num_minutes()
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
