//! Duration parsing and formatting.
//!
//! Durations in pomo are whole seconds. Input strings accept `h`, `m` and
//! `s` units; a bare number means minutes.

use chrono::Duration;

/// Parse a duration string like `25m`, `1h30m`, `90s` or `25`.
///
/// Returns `None` for empty, zero, malformed or out-of-range input.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();

    if let Ok(minutes) = s.parse::<i64>() {
        return Duration::try_minutes(minutes).filter(|_| minutes > 0);
    }

    let mut total_seconds: i64 = 0;
    let mut digits = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if c.is_whitespace() {
            continue;
        }
        let value: i64 = digits.parse().ok()?;
        digits.clear();
        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return None,
        };
        total_seconds = total_seconds.checked_add(value.checked_mul(unit)?)?;
    }

    // A trailing bare number is minutes, as in "1h30".
    if !digits.is_empty() {
        let value: i64 = digits.parse().ok()?;
        total_seconds = total_seconds.checked_add(value.checked_mul(60)?)?;
    }

    Duration::try_seconds(total_seconds).filter(|_| total_seconds > 0)
}

/// Format a number of seconds as `MM:SS` (minutes may exceed 59).
#[must_use]
pub fn format_duration_mmss(seconds: u64) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a number of seconds compactly, e.g. `2h 5m`, `25m`, `40s`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match (hours, minutes, secs) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, 0, _) => format!("{h}h"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("25"), Some(Duration::minutes(25)));
        assert_eq!(parse_duration("25m"), Some(Duration::minutes(25)));
    }

    #[test]
    fn test_parse_duration_mixed() {
        assert_eq!(parse_duration("1h30m"), Some(Duration::minutes(90)));
        assert_eq!(parse_duration("1m 30s"), Some(Duration::seconds(90)));
        assert_eq!(parse_duration("1500s"), Some(Duration::seconds(1500)));
        assert_eq!(parse_duration("1h30"), Some(Duration::minutes(90)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert!(parse_duration("").is_none());
        assert!(parse_duration("abc").is_none());
        assert!(parse_duration("0").is_none());
        assert!(parse_duration("0s").is_none());
        assert!(parse_duration("5x").is_none());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("9223372036854775807").is_none());
        assert!(parse_duration("9999999999999999s").is_none());
        assert!(parse_duration("99999999999999999999h").is_none());
    }

    #[test]
    fn test_format_duration_mmss() {
        assert_eq!(format_duration_mmss(1500), "25:00");
        assert_eq!(format_duration_mmss(90), "01:30");
        assert_eq!(format_duration_mmss(0), "00:00");
        assert_eq!(format_duration_mmss(6000), "100:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(40), "40s");
        assert_eq!(format_duration(1500), "25m");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(7200), "2h");
        assert_eq!(format_duration(7500), "2h 5m");
    }
}
