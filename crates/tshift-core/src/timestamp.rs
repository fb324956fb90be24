//! Comparable timestamp encoding.
//!
//! A [`Timestamp`] packs `YYYYMMDDHHMMSSmmm` into the decimal digits of an
//! `i64`, so ordering two values is a plain integer comparison.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

const MILLIS: i64 = 1;
const SECONDS: i64 = 1_000;
const MINUTES: i64 = 100_000;
const HOURS: i64 = 10_000_000;
const DAYS: i64 = 1_000_000_000;
const MONTHS: i64 = 100_000_000_000;
const YEARS: i64 = 10_000_000_000_000;

/// Calendar fields extracted from a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFields {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millis: u16,
}

impl TimestampFields {
    /// Packs the fields into their comparable integer form.
    pub fn encode(&self) -> Timestamp {
        Timestamp(
            i64::from(self.year) * YEARS
                + i64::from(self.month) * MONTHS
                + i64::from(self.day) * DAYS
                + i64::from(self.hour) * HOURS
                + i64::from(self.minute) * MINUTES
                + i64::from(self.second) * SECONDS
                + i64::from(self.millis) * MILLIS,
        )
    }

    /// Converts the fields into a calendar instant.
    ///
    /// Returns `None` when a field is out of range (month 13, Feb 30, ...).
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))?
            .and_hms_milli_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
                u32::from(self.millis),
            )
    }
}

/// A timestamp whose integer order matches chronological order within a
/// single year context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wraps an already-encoded `YYYYMMDDHHMMSSmmm` value.
    pub const fn from_encoded(value: i64) -> Self {
        Self(value)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Adds a tolerance directly to the encoded value.
    ///
    /// This is integer arithmetic on the digit encoding, not calendar
    /// arithmetic: `+500` on `...59_800` yields `...60_300`.
    #[must_use]
    pub const fn plus(self, tolerance: i64) -> Self {
        Self(self.0.saturating_add(tolerance))
    }

    /// Splits the encoded value back into its digit fields.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn fields(self) -> TimestampFields {
        let v = self.0;
        TimestampFields {
            year: (v / YEARS) as i32,
            month: ((v / MONTHS) % 100) as u8,
            day: ((v / DAYS) % 100) as u8,
            hour: ((v / HOURS) % 100) as u8,
            minute: ((v / MINUTES) % 100) as u8,
            second: ((v / SECONDS) % 100) as u8,
            millis: (v % 1000) as u16,
        }
    }

    /// Decodes into a calendar instant, if the digits form a valid date.
    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        if self.0 < 0 {
            return None;
        }
        self.fields().to_datetime()
    }

    /// Real elapsed time from `self` to `later`.
    ///
    /// Both values are decoded as calendar instants, so the result is not
    /// the integer difference of the encodings.
    pub fn elapsed_until(self, later: Self) -> Option<TimeDelta> {
        Some(later.to_datetime()? - self.to_datetime()?)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
