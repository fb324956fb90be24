//! Time-shift scanning.
//!
//! The scanner walks a log source line by line and cuts it into windows:
//!
//! 1. Extract the line's timestamp (lines without one are skipped)
//! 2. If the current window is unset or the timestamp belongs to it, ingest
//! 3. Otherwise emit the current window if it holds more than one line,
//!    then start a new window with this line
//! 4. At end of input, emit the last window if it holds more than one line

use crate::parse::LineParser;
use crate::timestamp::Timestamp;
use crate::window::{Window, WindowAccumulator};

/// Default tolerance in milliseconds.
pub const DEFAULT_FUDGE_MS: i64 = 500;

/// Configuration for time-shift scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// How far (in encoded milliseconds) a timestamp may pass the running
    /// maximum and still extend the current window. Default: 500.
    pub fudge_ms: i64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fudge_ms: DEFAULT_FUDGE_MS,
        }
    }
}

/// Maps a raw line to its comparable timestamp.
///
/// [`LineParser`] is the built-in implementation. Closures work too, for
/// callers that already know each line's timestamp.
pub trait TimestampExtractor {
    fn extract(&mut self, line: &str) -> Option<Timestamp>;
}

impl<F> TimestampExtractor for F
where
    F: FnMut(&str) -> Option<Timestamp>,
{
    fn extract(&mut self, line: &str) -> Option<Timestamp> {
        self(line)
    }
}

impl TimestampExtractor for LineParser {
    fn extract(&mut self, line: &str) -> Option<Timestamp> {
        self.parse_line(line)
    }
}

/// Incremental scanner over one log source.
#[derive(Debug)]
pub struct ShiftScanner<E> {
    extractor: E,
    config: ScanConfig,
    window: WindowAccumulator,
    lines_seen: usize,
    lines_skipped: usize,
}

impl<E: TimestampExtractor> ShiftScanner<E> {
    pub fn new(extractor: E, config: ScanConfig) -> Self {
        Self {
            extractor,
            config,
            window: WindowAccumulator::new(),
            lines_seen: 0,
            lines_skipped: 0,
        }
    }

    /// Feeds the next line. Returns a window if this line closed one.
    pub fn push(&mut self, line_number: usize, line: &str) -> Option<Window> {
        self.lines_seen += 1;

        let Some(timestamp) = self.extractor.extract(line) else {
            self.lines_skipped += 1;
            return None;
        };

        if self.window.is_unset() || self.window.belongs(timestamp, self.config.fudge_ms) {
            self.window.ingest(timestamp, line, line_number);
            return None;
        }

        let closed = if self.window.is_empty() {
            self.window.clear();
            None
        } else {
            self.window.take()
        };
        if let Some(window) = &closed {
            tracing::debug!(
                start_line = window.start_line,
                length = window.len(),
                "time shift window closed"
            );
        }

        self.window.ingest(timestamp, line, line_number);
        closed
    }

    /// Ends the source, returning the final window if it qualifies.
    pub fn finish(mut self) -> Option<Window> {
        tracing::debug!(
            lines = self.lines_seen,
            skipped = self.lines_skipped,
            "time shift scan finished"
        );
        if self.window.is_empty() {
            return None;
        }
        self.window.take()
    }

    pub const fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    /// Lines that had no usable timestamp.
    pub const fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }
}

/// Scans numbered lines and returns every qualifying window in order.
pub fn scan_lines<I, S, E>(lines: I, extractor: E, config: &ScanConfig) -> Vec<Window>
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
    E: TimestampExtractor,
{
    let mut scanner = ShiftScanner::new(extractor, *config);
    let mut windows: Vec<Window> = lines
        .into_iter()
        .filter_map(|(number, line)| scanner.push(number, line.as_ref()))
        .collect();
    windows.extend(scanner.finish());
    windows
}

/// Scans one source with a fresh [`LineParser`].
pub fn find_time_shifts<I, S>(lines: I, config: &ScanConfig) -> Vec<Window>
where
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<str>,
{
    scan_lines(lines, LineParser::new(), config)
}
