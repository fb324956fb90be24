//! Timestamp layout detection.
//!
//! Server versions wrote timestamps in a handful of fixed-width layouts.
//! Each layout is recognised by probing a few byte offsets instead of
//! running a general date parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEEKDAYS: [&[u8; 4]; 7] = [
    b"Mon ", b"Tue ", b"Wed ", b"Thu ", b"Fri ", b"Sat ", b"Sun ",
];

/// The timestamp layout a line starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    /// `Wed Apr  9 23:16:24 [conn1] ...`
    Legacy22,
    /// `Wed Apr  9 23:16:24.305 [conn1] ...`
    Legacy24,
    /// `2014-04-09T23:16:24.305+0200 [conn1] ...`
    Legacy26,
    /// `2014-04-09T23:16:24.305+0200 I NETWORK  [conn1] ...`
    Modern28,
    Unknown,
}

impl TimestampFormat {
    /// Classifies a line by its leading bytes.
    ///
    /// Lines shorter than 21 bytes are always [`TimestampFormat::Unknown`].
    pub fn classify(line: &str) -> Self {
        let bytes = line.as_bytes();
        let len = bytes.len();

        if len >= 30 && has_iso_prefix(bytes) {
            return if len >= 41 && bytes[40] == b'[' {
                Self::Modern28
            } else {
                Self::Legacy26
            };
        }
        if len >= 25 && (bytes[24] == b'[' || bytes[23] == b' ') && has_weekday_prefix(bytes) {
            return Self::Legacy24;
        }
        if len >= 21 && (bytes[20] == b'[' || bytes[19] == b' ') && has_weekday_prefix(bytes) {
            return Self::Legacy22;
        }
        Self::Unknown
    }

    /// Version label shown in reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy22 => "<= 2.2",
            Self::Legacy24 => "2.4",
            Self::Legacy26 => "2.6",
            Self::Modern28 => ">= 2.8",
            Self::Unknown => "unknown",
        }
    }

    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Number of leading bytes that make up the display form.
    const fn display_len(self) -> Option<usize> {
        match self {
            Self::Legacy22 => Some(19),
            Self::Legacy24 => Some(23),
            Self::Legacy26 | Self::Modern28 => Some(28),
            Self::Unknown => None,
        }
    }

    /// Returns the leading part of `line` that holds its timestamp, or
    /// `"unknown"` when the format carries none.
    pub fn display<'a>(&self, line: &'a str) -> &'a str {
        match self.display_len() {
            Some(n) => line.get(..n).unwrap_or(line),
            None => "unknown",
        }
    }
}

/// Classifies `line` and returns its timestamp display string.
pub fn display_timestamp(line: &str) -> &str {
    TimestampFormat::classify(line).display(line)
}

fn has_iso_prefix(bytes: &[u8]) -> bool {
    bytes.starts_with(b"201") && bytes.get(23) == Some(&b'+')
}

fn has_weekday_prefix(bytes: &[u8]) -> bool {
    bytes
        .get(..4)
        .is_some_and(|head| WEEKDAYS.iter().any(|day| head == day.as_slice()))
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<= 2.2" => Ok(Self::Legacy22),
            "2.4" => Ok(Self::Legacy24),
            "2.6" => Ok(Self::Legacy26),
            ">= 2.8" => Ok(Self::Modern28),
            "unknown" => Ok(Self::Unknown),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl Serialize for TimestampFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TimestampFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unrecognised format labels.
#[derive(Debug, Clone, Error)]
#[error("unknown timestamp format: {0}")]
pub struct UnknownFormat(String);

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_22: &str = "Wed Apr  9 23:16:24 [initandlisten] MongoDB starting";
    const LINE_24: &str = "Wed Apr  9 23:16:24.305 [initandlisten] MongoDB starting";
    const LINE_26: &str = "2014-04-09T23:16:24.305+0200 [initandlisten] MongoDB starting";
    const LINE_28: &str =
        "2014-04-09T23:16:24.305+0200 I CONTROL  [initandlisten] MongoDB starting";

    #[test]
    fn test_classifies_each_layout() {
        assert_eq!(TimestampFormat::classify(LINE_22), TimestampFormat::Legacy22);
        assert_eq!(TimestampFormat::classify(LINE_24), TimestampFormat::Legacy24);
        assert_eq!(TimestampFormat::classify(LINE_26), TimestampFormat::Legacy26);
        assert_eq!(TimestampFormat::classify(LINE_28), TimestampFormat::Modern28);
    }

    #[test]
    fn test_short_lines_are_unknown() {
        assert_eq!(TimestampFormat::classify(""), TimestampFormat::Unknown);
        assert_eq!(
            TimestampFormat::classify("Wed Apr  9 23:16:24"),
            TimestampFormat::Unknown
        );
    }

    #[test]
    fn test_minimal_lengths() {
        // 21 bytes with the bracket at offset 20.
        assert_eq!(
            TimestampFormat::classify("Wed Apr  9 23:16:24 ["),
            TimestampFormat::Legacy22
        );
        // 30 bytes of an ISO line.
        assert_eq!(
            TimestampFormat::classify(&LINE_26[..30]),
            TimestampFormat::Legacy26
        );
        // A 2.8 prefix cut before offset 40 cannot be told apart from 2.6.
        assert_eq!(
            TimestampFormat::classify(&LINE_28[..40]),
            TimestampFormat::Legacy26
        );
    }

    #[test]
    fn test_weekday_must_be_followed_by_space() {
        assert_eq!(
            TimestampFormat::classify("Wedx Apr  9 23:16:24 [conn1] x"),
            TimestampFormat::Unknown
        );
        assert_eq!(
            TimestampFormat::classify("Foo Apr  9 23:16:24 [conn1] x"),
            TimestampFormat::Unknown
        );
    }

    #[test]
    fn test_iso_prefix_is_decade_specific() {
        let line = "2024-04-09T23:16:24.305+0200 I CONTROL  [initandlisten] x";
        assert_eq!(TimestampFormat::classify(line), TimestampFormat::Unknown);
    }

    #[test]
    fn test_non_log_text_is_unknown() {
        assert_eq!(
            TimestampFormat::classify("this line has no timestamp at all, none"),
            TimestampFormat::Unknown
        );
    }

    #[test]
    fn test_display_slices_timestamp_prefix() {
        assert_eq!(display_timestamp(LINE_22), "Wed Apr  9 23:16:24");
        assert_eq!(display_timestamp(LINE_24), "Wed Apr  9 23:16:24.305");
        assert_eq!(display_timestamp(LINE_26), "2014-04-09T23:16:24.305+0200");
        assert_eq!(display_timestamp(LINE_28), "2014-04-09T23:16:24.305+0200");
        assert_eq!(display_timestamp("garbage"), "unknown");
    }

    #[test]
    fn test_labels_roundtrip() {
        let variants = [
            TimestampFormat::Legacy22,
            TimestampFormat::Legacy24,
            TimestampFormat::Legacy26,
            TimestampFormat::Modern28,
            TimestampFormat::Unknown,
        ];

        for variant in &variants {
            let parsed: TimestampFormat = variant.to_string().parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn test_unknown_label_errors() {
        let err = "3.0".parse::<TimestampFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unknown timestamp format: 3.0");
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&TimestampFormat::Modern28).unwrap();
        assert_eq!(json, r#"">= 2.8""#);
    }
}
