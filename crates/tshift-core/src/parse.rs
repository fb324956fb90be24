//! Fixed-offset timestamp parsing.
//!
//! Older layouts (`<= 2.2`, `2.4`) carry no year. The year is supplied by a
//! per-source [`ParserState`] that advances when the month wraps from
//! December to January.

use std::ops::Range;

use chrono::{Datelike, Local};
use thiserror::Error;

use crate::format::TimestampFormat;
use crate::timestamp::{Timestamp, TimestampFields};

const MONTHS: [(&[u8; 3], u8); 12] = [
    (b"Jan", 1),
    (b"Feb", 2),
    (b"Mar", 3),
    (b"Apr", 4),
    (b"May", 5),
    (b"Jun", 6),
    (b"Jul", 7),
    (b"Aug", 8),
    (b"Sep", 9),
    (b"Oct", 10),
    (b"Nov", 11),
    (b"Dec", 12),
];

/// Why a classified line failed to yield a timestamp.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The line was not classified into a known layout.
    #[error("line has no recognized timestamp layout")]
    UnknownFormat,

    /// The month token is not an English three-letter abbreviation.
    #[error("unrecognized month abbreviation: {0:?}")]
    UnknownMonth(String),

    /// A numeric field contained something other than ASCII digits.
    #[error("{field} is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    /// The line ended before the field.
    #[error("line too short for {field}")]
    Truncated { field: &'static str },
}

/// Year inference state for one log source.
///
/// Never share one instance between independent sources: the December to
/// January rollover would leak from one file into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserState {
    base_year: i32,
    current_year: i32,
    last_month: Option<u8>,
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserState {
    /// Starts from the current calendar year.
    pub fn new() -> Self {
        Self::with_year(Local::now().year())
    }

    /// Starts from an explicit year. [`ParserState::reset`] returns to it.
    pub const fn with_year(year: i32) -> Self {
        Self {
            base_year: year,
            current_year: year,
            last_month: None,
        }
    }

    /// Prepares the state for a new log source.
    pub const fn reset(&mut self) {
        self.current_year = self.base_year;
        self.last_month = None;
    }

    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    pub const fn last_month(&self) -> Option<u8> {
        self.last_month
    }

    /// Applies the rollover rule for `month` and returns the year to use.
    const fn advance(&mut self, month: u8) -> i32 {
        if month == 1 && matches!(self.last_month, Some(12)) {
            self.current_year += 1;
        }
        self.last_month = Some(month);
        self.current_year
    }
}

/// Extracts the timestamp fields of a line already classified as `format`.
///
/// Every field is validated before `state` is touched, so a failed line
/// never advances the year.
pub fn parse_fields(
    line: &str,
    format: TimestampFormat,
    state: &mut ParserState,
) -> Result<TimestampFields, FieldError> {
    let bytes = line.as_bytes();
    match format {
        TimestampFormat::Legacy22 | TimestampFormat::Legacy24 => {
            let month = month_number(bytes)?;
            let day = padded_day(bytes)?;
            let hour = two_digits(bytes, 11..13, "hour")?;
            let minute = two_digits(bytes, 14..16, "minute")?;
            let second = two_digits(bytes, 17..19, "second")?;
            let millis = if format == TimestampFormat::Legacy24 {
                three_digits(bytes, 20..23)?
            } else {
                0
            };

            let year = state.advance(month);
            Ok(TimestampFields {
                year,
                month,
                day,
                hour,
                minute,
                second,
                millis,
            })
        }
        TimestampFormat::Legacy26 | TimestampFormat::Modern28 => Ok(TimestampFields {
            year: i32::from(digits(bytes, 0..4, "year")?),
            month: two_digits(bytes, 5..7, "month")?,
            day: two_digits(bytes, 8..10, "day")?,
            hour: two_digits(bytes, 11..13, "hour")?,
            minute: two_digits(bytes, 14..16, "minute")?,
            second: two_digits(bytes, 17..19, "second")?,
            millis: three_digits(bytes, 20..23)?,
        }),
        TimestampFormat::Unknown => Err(FieldError::UnknownFormat),
    }
}

/// Parses a classified line into a comparable timestamp.
pub fn parse(line: &str, format: TimestampFormat, state: &mut ParserState) -> Option<Timestamp> {
    match parse_fields(line, format, state) {
        Ok(fields) => Some(fields.encode()),
        Err(e) => {
            tracing::trace!(error = %e, %format, "timestamp parse failed");
            None
        }
    }
}

/// Classifies and parses lines from a single log source.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    state: ParserState,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_state(state: ParserState) -> Self {
        Self { state }
    }

    /// Returns the line's timestamp, or `None` for unknown or malformed lines.
    pub fn parse_line(&mut self, line: &str) -> Option<Timestamp> {
        let format = TimestampFormat::classify(line);
        if !format.is_known() {
            return None;
        }
        parse(line, format, &mut self.state)
    }

    pub const fn state(&self) -> &ParserState {
        &self.state
    }

    /// Clears year inference before reading another source.
    pub const fn reset(&mut self) {
        self.state.reset();
    }
}

fn month_number(bytes: &[u8]) -> Result<u8, FieldError> {
    let token = bytes
        .get(4..7)
        .ok_or(FieldError::Truncated { field: "month" })?;
    MONTHS
        .iter()
        .find(|(name, _)| name.as_slice() == token)
        .map(|&(_, number)| number)
        .ok_or_else(|| FieldError::UnknownMonth(String::from_utf8_lossy(token).into_owned()))
}

/// Day of month at offsets 8..10, where a single-digit day is space-padded.
fn padded_day(bytes: &[u8]) -> Result<u8, FieldError> {
    let raw = bytes
        .get(8..10)
        .ok_or(FieldError::Truncated { field: "day" })?;
    let tens = if raw[0] == b' ' { b'0' } else { raw[0] };
    let padded = [tens, raw[1]];
    Ok(to_u8(parse_ascii(&padded, "day")?))
}

fn two_digits(bytes: &[u8], range: Range<usize>, field: &'static str) -> Result<u8, FieldError> {
    digits(bytes, range, field).map(to_u8)
}

fn three_digits(bytes: &[u8], range: Range<usize>) -> Result<u16, FieldError> {
    digits(bytes, range, "millisecond")
}

fn digits(bytes: &[u8], range: Range<usize>, field: &'static str) -> Result<u16, FieldError> {
    let raw = bytes.get(range).ok_or(FieldError::Truncated { field })?;
    parse_ascii(raw, field)
}

fn parse_ascii(raw: &[u8], field: &'static str) -> Result<u16, FieldError> {
    if raw.is_empty() || !raw.iter().all(u8::is_ascii_digit) {
        return Err(FieldError::NotNumeric {
            field,
            value: String::from_utf8_lossy(raw).into_owned(),
        });
    }
    Ok(raw
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0')))
}

#[allow(clippy::cast_possible_truncation)]
const fn to_u8(value: u16) -> u8 {
    // Callers only pass two-digit slices.
    value as u8
}
