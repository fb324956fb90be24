//! Per-source summary section.

use std::fmt::Write;

use serde::Serialize;
use tshift_core::TimestampFormat;

/// Overview of one log source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub source: String,
    pub lines: usize,
    /// Lines whose layout was recognised.
    pub timestamped_lines: usize,
    /// Layout of the first timestamped line.
    pub format: TimestampFormat,
    /// Display timestamp of the first timestamped line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Display timestamp of the last timestamped line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl Summary {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            lines: 0,
            timestamped_lines: 0,
            format: TimestampFormat::Unknown,
            start: None,
            end: None,
        }
    }

    /// Records one line.
    pub fn observe(&mut self, line: &str) {
        self.lines += 1;

        let format = TimestampFormat::classify(line);
        if !format.is_known() {
            return;
        }
        self.timestamped_lines += 1;

        let shown = format.display(line);
        if self.start.is_none() {
            self.format = format;
            self.start = Some(shown.to_string());
        }
        match &mut self.end {
            Some(end) => {
                end.clear();
                end.push_str(shown);
            }
            None => self.end = Some(shown.to_string()),
        }
    }
}

/// Renders the summary as aligned `label: value` lines.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let rows = [
        ("source", summary.source.clone()),
        ("lines", summary.lines.to_string()),
        ("timestamped", summary.timestamped_lines.to_string()),
        ("format", summary.format.to_string()),
        ("start", summary.start.clone().unwrap_or_else(|| "-".to_string())),
        ("end", summary.end.clone().unwrap_or_else(|| "-".to_string())),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:>11}: {value}");
    }
    out
}
