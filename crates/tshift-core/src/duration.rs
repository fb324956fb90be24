//! Duration phrases for reports.

use chrono::TimeDelta;

const TIME_FRAMES: [(&str, i64); 6] = [
    ("yr", 60 * 60 * 24 * 365),
    ("mth", 60 * 60 * 24 * 30),
    ("day", 60 * 60 * 24),
    ("hr", 60 * 60),
    ("min", 60),
    ("sec", 1),
];

/// Formats a duration largest unit first, e.g. `"2 days, 3 hrs, 1 sec"`.
///
/// Durations below one second fall back to `"N ms"` or `"N us"`.
/// Negative durations are formatted by magnitude.
pub fn format_duration(delta: TimeDelta) -> String {
    let delta = if delta < TimeDelta::zero() { -delta } else { delta };

    let mut seconds = delta.num_seconds();
    let mut parts = Vec::new();
    for (name, period) in TIME_FRAMES {
        let count = seconds / period;
        if count == 0 {
            continue;
        }
        seconds %= period;
        if count == 1 {
            parts.push(format!("{count} {name}"));
        } else {
            parts.push(format!("{count} {name}s"));
        }
    }

    if parts.is_empty() {
        let micros = delta.subsec_nanos() / 1_000;
        return if micros > 1_000 {
            format!("{} ms", micros / 1_000)
        } else {
            format!("{micros} us")
        };
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(3_661)), "1 hr, 1 min, 1 sec");
    }

    #[test]
    fn test_plural_units() {
        assert_eq!(format_duration(TimeDelta::seconds(7_322)), "2 hrs, 2 mins, 2 secs");
        assert_eq!(format_duration(TimeDelta::seconds(10)), "10 secs");
    }

    #[test]
    fn test_zero_counts_are_skipped() {
        assert_eq!(format_duration(TimeDelta::seconds(86_400 + 5)), "1 day, 5 secs");
        assert_eq!(format_duration(TimeDelta::seconds(3_600)), "1 hr");
    }

    #[test]
    fn test_years_and_months() {
        let secs = 31_536_000 + 2 * 2_592_000 + 60;
        assert_eq!(format_duration(TimeDelta::seconds(secs)), "1 yr, 2 mths, 1 min");
    }

    #[test]
    fn test_sub_second_precision() {
        assert_eq!(format_duration(TimeDelta::microseconds(500)), "500 us");
        assert_eq!(format_duration(TimeDelta::microseconds(2_000)), "2 ms");
        assert_eq!(format_duration(TimeDelta::microseconds(500_000)), "500 ms");
        assert_eq!(format_duration(TimeDelta::microseconds(1_000)), "1000 us");
        assert_eq!(format_duration(TimeDelta::zero()), "0 us");
    }

    #[test]
    fn test_fractional_seconds_are_truncated() {
        assert_eq!(format_duration(TimeDelta::milliseconds(1_999)), "1 sec");
    }

    #[test]
    fn test_negative_durations_use_magnitude() {
        assert_eq!(format_duration(TimeDelta::seconds(-61)), "1 min, 1 sec");
    }
}
