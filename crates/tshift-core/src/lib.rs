//! Core logic for log time-shift detection.
//!
//! This crate contains:
//! - Format detection: recognising timestamp layouts by fixed byte offsets
//! - Parsing: turning a line into a comparable integer timestamp
//! - Windowing: grouping out-of-order lines into time-shift windows

mod duration;
pub mod format;
pub mod parse;
pub mod scanner;
mod timestamp;
pub mod window;

pub use duration::format_duration;
pub use format::{TimestampFormat, UnknownFormat, display_timestamp};
pub use parse::{FieldError, LineParser, ParserState};
pub use scanner::{
    DEFAULT_FUDGE_MS, ScanConfig, ShiftScanner, TimestampExtractor, find_time_shifts, scan_lines,
};
pub use timestamp::{Timestamp, TimestampFields};
pub use window::{Member, Window, WindowAccumulator};
