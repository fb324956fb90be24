//! Report sections and the per-source analysis that feeds them.

pub mod summary;
pub mod timeshifts;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tshift_core::{LineParser, ShiftScanner, Window};

use crate::Config;
use crate::source::LogSource;
use summary::{Summary, format_summary};
use timeshifts::{ShiftRow, format_table};

/// Everything learned from one pass over a log source.
#[derive(Debug, Serialize)]
pub struct SourceReport {
    #[serde(flatten)]
    pub summary: Summary,

    /// Present only when the time-shift section is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeshifts: Option<Vec<ShiftRow>>,
}

/// Reads `source` once, building the summary and, if enabled, the
/// time-shift windows.
///
/// Each call owns its parser state, so sources can be analysed in parallel.
pub fn analyze(source: LogSource, config: &Config) -> Result<SourceReport> {
    let name = source.name().to_string();
    let mut summary = Summary::new(&name);
    let mut scanner = config
        .timeshifts
        .then(|| ShiftScanner::new(LineParser::new(), config.scan_config()));
    let mut windows: Vec<Window> = Vec::new();

    for entry in source.lines() {
        let (number, line) = entry.with_context(|| format!("failed to read {name}"))?;
        summary.observe(&line);
        if let Some(scanner) = scanner.as_mut() {
            windows.extend(scanner.push(number, &line));
        }
    }

    let timeshifts = scanner.map(|scanner| {
        windows.extend(scanner.finish());
        tracing::debug!(source = %name, windows = windows.len(), "time shift scan complete");
        timeshifts::rows(&windows)
    });

    Ok(SourceReport {
        summary,
        timeshifts,
    })
}

/// Renders one report in the text layout.
pub fn format_report(report: &SourceReport) -> String {
    let mut out = format_summary(&report.summary);
    if let Some(rows) = &report.timeshifts {
        out.push_str("\nTIME SHIFTS\n\n");
        out.push_str(&format_table(rows));
    }
    out
}

/// Analyses every input and writes the reports in input order.
///
/// Unreadable inputs are logged and skipped; the run fails only if none
/// could be read.
pub fn run<W: Write>(writer: &mut W, inputs: &[PathBuf], config: &Config, json: bool) -> Result<()> {
    let results: Vec<Result<SourceReport>> = inputs
        .par_iter()
        .map(|path| LogSource::open(path).and_then(|source| analyze(source, config)))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    for (path, result) in inputs.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                let error = format!("{e:#}");
                tracing::warn!(path = %path.display(), %error, "skipping log source");
            }
        }
    }

    if reports.is_empty() && !inputs.is_empty() {
        anyhow::bail!("none of the {} log source(s) could be read", inputs.len());
    }

    if json {
        serde_json::to_writer_pretty(&mut *writer, &reports).context("failed to serialize report")?;
        writeln!(writer)?;
        return Ok(());
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        write!(writer, "{}", format_report(report))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use insta::assert_snapshot;

    const SHIFTED_LOG: &str = "\
2014-04-09T10:00:00.000+0000 I NETWORK  [conn1] a
2014-04-09T09:59:50.000+0000 I NETWORK  [conn1] b
2014-04-09T09:59:51.000+0000 I NETWORK  [conn1] c
2014-04-09T10:00:30.000+0000 I NETWORK  [conn1] d
";

    fn config(timeshifts: bool) -> Config {
        Config {
            timeshifts,
            ..Config::default()
        }
    }

    fn report_for(text: &'static str, timeshifts: bool) -> SourceReport {
        let source = LogSource::from_reader("mongod.log", Cursor::new(text));
        analyze(source, &config(timeshifts)).unwrap()
    }

    #[test]
    fn timeshifts_disabled_skips_section() {
        let report = report_for(SHIFTED_LOG, false);
        assert!(report.timeshifts.is_none());
        assert_eq!(report.summary.lines, 4);
        assert!(!format_report(&report).contains("TIME SHIFTS"));
    }

    #[test]
    fn text_report_with_shift() {
        let report = report_for(SHIFTED_LOG, true);
        let rows = report.timeshifts.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].length, 3);

        assert_snapshot!(format_report(&report).trim_start(), @r"
        source: mongod.log
              lines: 4
        timestamped: 4
             format: >= 2.8
              start: 2014-04-09T10:00:00.000+0000
                end: 2014-04-09T10:00:30.000+0000

        TIME SHIFTS

        line#  start                         end                           duration  length  first
        1      2014-04-09T09:59:50.000+0000  2014-04-09T10:00:00.000+0000  10 secs   3       '2014-04-09T10:00:00.000+0000 I NETWORK  [conn1] a'
        ");
    }

    #[test]
    fn monotonic_log_has_no_shifts() {
        let report = report_for(
            "\
2014-04-09T10:00:00.000+0000 I NETWORK  [conn1] a
2014-04-09T10:00:01.000+0000 I NETWORK  [conn1] b
2014-04-09T10:00:02.000+0000 I NETWORK  [conn1] c
",
            true,
        );
        assert_eq!(report.timeshifts.as_deref(), Some(&[][..]));
        assert!(format_report(&report).ends_with("  no time shifts found\n"));
    }

    #[test]
    fn run_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mongod.log");
        std::fs::write(&path, SHIFTED_LOG).unwrap();

        let mut output = Vec::new();
        run(&mut output, &[path], &config(true), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value[0]["lines"], 4);
        assert_eq!(value[0]["format"], ">= 2.8");
        assert_eq!(value[0]["timeshifts"][0]["line"], 1);
        assert_eq!(value[0]["timeshifts"][0]["duration"], "10 secs");
    }

    #[test]
    fn run_skips_unreadable_sources() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.log");
        std::fs::write(&good, SHIFTED_LOG).unwrap();
        let missing = dir.path().join("missing.log");

        let mut output = Vec::new();
        run(&mut output, &[missing, good], &config(false), false).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("good.log"));
        assert!(!output.contains("missing.log"));
    }

    #[test]
    fn run_fails_when_nothing_readable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.log");

        let mut output = Vec::new();
        let err = run(&mut output, &[missing], &config(true), false).unwrap_err();
        assert!(err.to_string().contains("could be read"));
    }
}
