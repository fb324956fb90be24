//! Time-shift windows.
//!
//! A [`WindowAccumulator`] collects consecutive lines while their timestamps
//! stay within tolerance of the running maximum. Once a line falls outside,
//! the accumulated lines are frozen into a [`Window`].

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::duration::format_duration;
use crate::format::TimestampFormat;
use crate::timestamp::Timestamp;

/// One line held by a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub timestamp: Timestamp,
    pub line: String,
}

/// An extreme (minimum or maximum) timestamp and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    timestamp: Timestamp,
    line: String,
    /// Classified before trimming; trailing spaces can be significant.
    format: TimestampFormat,
}

impl Bound {
    fn new(timestamp: Timestamp, raw: &str) -> Self {
        Self {
            timestamp,
            line: raw.trim().to_string(),
            format: TimestampFormat::classify(raw.trim_start()),
        }
    }
}

/// The window currently being built.
#[derive(Debug, Clone, Default)]
pub struct WindowAccumulator {
    start: Option<Bound>,
    end: Option<Bound>,
    members: Vec<Member>,
    first_line: usize,
    last_line: usize,
}

impl WindowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line unconditionally.
    ///
    /// Ties on the minimum keep the earliest line; ties on the maximum adopt
    /// the newest one.
    pub fn ingest(&mut self, timestamp: Timestamp, line: &str, line_number: usize) {
        if self.start.as_ref().is_none_or(|s| timestamp < s.timestamp) {
            self.start = Some(Bound::new(timestamp, line));
        }
        if self.end.as_ref().is_none_or(|e| timestamp >= e.timestamp) {
            self.end = Some(Bound::new(timestamp, line));
        }

        if self.members.is_empty() {
            self.first_line = line_number;
        }
        self.last_line = line_number;
        self.members.push(Member {
            timestamp,
            line: line.trim().to_string(),
        });
    }

    /// Whether `timestamp` continues the current window.
    ///
    /// `fudge` is ignored until the window holds at least two lines.
    pub fn belongs(&self, timestamp: Timestamp, fudge: i64) -> bool {
        let (Some(start), Some(end)) = (&self.start, &self.end) else {
            return false;
        };
        if start.timestamp == end.timestamp && timestamp > end.timestamp {
            return false;
        }

        let fudge = if self.members.len() <= 1 { 0 } else { fudge };
        timestamp < end.timestamp.plus(fudge)
    }

    /// True until the first line has been ingested.
    pub const fn is_unset(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// A window with one line or fewer is not reportable.
    pub fn is_empty(&self) -> bool {
        self.size() <= 1
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.start.as_ref().map(|b| b.timestamp)
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end.as_ref().map(|b| b.timestamp)
    }

    /// Drops bounds and members. Line numbers are kept until the next ingest.
    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
        self.members.clear();
    }

    /// Freezes the accumulated lines into a [`Window`] and clears.
    ///
    /// Returns `None` if nothing has been ingested.
    pub fn take(&mut self) -> Option<Window> {
        let start = self.start.take()?;
        let end = self.end.take()?;
        let members = std::mem::take(&mut self.members);
        let duration = start.timestamp.elapsed_until(end.timestamp);

        Some(Window {
            start_line: self.first_line,
            end_line: self.last_line,
            start: start.timestamp,
            start_raw_line: start.line,
            start_format: start.format,
            end: end.timestamp,
            end_raw_line: end.line,
            end_format: end.format,
            members,
            duration,
        })
    }
}

/// A completed time-shift window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Line number of the first line in the window.
    ///
    /// Fixed when the window opens. Earlier tools reported the number of the
    /// last ingested line here; that value is [`Window::end_line`].
    pub start_line: usize,

    /// Line number of the last line in the window.
    pub end_line: usize,

    /// Earliest timestamp observed.
    pub start: Timestamp,
    pub start_raw_line: String,
    /// Layout of the untrimmed start line.
    pub start_format: TimestampFormat,

    /// Latest timestamp observed.
    pub end: Timestamp,
    pub end_raw_line: String,
    pub end_format: TimestampFormat,

    /// Lines in arrival order.
    pub members: Vec<Member>,

    /// Real time between `start` and `end`, if both decode to valid dates.
    pub duration: Option<TimeDelta>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The first line in arrival order.
    pub fn first_line(&self) -> &str {
        self.members.first().map_or("", |m| m.line.as_str())
    }

    pub fn start_display(&self) -> &str {
        self.start_format.display(&self.start_raw_line)
    }

    pub fn end_display(&self) -> &str {
        self.end_format.display(&self.end_raw_line)
    }

    /// Human-readable duration, e.g. `"1 hr, 1 min, 1 sec"`.
    ///
    /// `"unknown"` when a boundary is not a real calendar date. Legacy
    /// layouts carry no year, so a `Feb 29` line under an inferred non-leap
    /// year ends up here.
    pub fn duration_phrase(&self) -> String {
        self.duration
            .map_or_else(|| "unknown".to_string(), format_duration)
    }
}
