//! Time-shift section: one table row per detected window.

use serde::Serialize;
use tshift_core::Window;

/// Column titles, in display order.
pub const TITLES: [&str; 6] = ["line#", "start", "end", "duration", "length", "first"];

/// Printed instead of a table when no window was found.
pub const NO_SHIFTS: &str = "  no time shifts found";

/// A window flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShiftRow {
    #[serde(rename = "line")]
    pub line_number: usize,
    pub start: String,
    pub end: String,
    pub duration: String,
    pub length: usize,
    pub first: String,
}

impl From<&Window> for ShiftRow {
    fn from(window: &Window) -> Self {
        Self {
            line_number: window.start_line,
            start: window.start_display().to_string(),
            end: window.end_display().to_string(),
            duration: window.duration_phrase(),
            length: window.len(),
            first: window.first_line().to_string(),
        }
    }
}

impl ShiftRow {
    fn cells(&self) -> [String; 6] {
        [
            self.line_number.to_string(),
            self.start.clone(),
            self.end.clone(),
            self.duration.clone(),
            self.length.to_string(),
            format!("'{}'", self.first),
        ]
    }
}

pub fn rows(windows: &[Window]) -> Vec<ShiftRow> {
    windows.iter().map(ShiftRow::from).collect()
}

/// Renders rows as a left-aligned table, or [`NO_SHIFTS`] when empty.
pub fn format_table(rows: &[ShiftRow]) -> String {
    if rows.is_empty() {
        return format!("{NO_SHIFTS}\n");
    }

    let header = TITLES.map(str::to_string);
    let body: Vec<[String; 6]> = rows.iter().map(ShiftRow::cells).collect();

    let mut widths = header.clone().map(|title| title.chars().count());
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for cells in std::iter::once(&header).chain(&body) {
        let mut line = String::new();
        for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if i + 1 < cells.len() {
                let pad = width.saturating_sub(cell.chars().count());
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
