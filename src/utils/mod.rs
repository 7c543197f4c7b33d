//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod retry;

use chrono::{DateTime, Local};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

const MINUTES_PER_DAY: i64 = 24 * 60;
const MINUTES_PER_HOUR: i64 = 60;

/// Convert a play-time string such as `"12天3小时45分钟"` into total minutes
///
/// Each component is optional and matched independently; missing components
/// count as zero. A component whose number does not fit is also treated as
/// zero, so this never fails.
pub fn parse_play_time_to_minutes(play_time: &str) -> i64 {
    static DAY_RE: OnceLock<Regex> = OnceLock::new();
    static HOUR_RE: OnceLock<Regex> = OnceLock::new();
    static MINUTE_RE: OnceLock<Regex> = OnceLock::new();

    let day_re = DAY_RE.get_or_init(|| Regex::new(r"(\d+)天").expect("Invalid regex pattern"));
    let hour_re = HOUR_RE.get_or_init(|| Regex::new(r"(\d+)小时").expect("Invalid regex pattern"));
    let minute_re =
        MINUTE_RE.get_or_init(|| Regex::new(r"(\d+)分钟").expect("Invalid regex pattern"));

    let component = |re: &Regex| -> i64 {
        re.captures(play_time)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    component(day_re)
        .saturating_mul(MINUTES_PER_DAY)
        .saturating_add(component(hour_re).saturating_mul(MINUTES_PER_HOUR))
        .saturating_add(component(minute_re))
}

/// Pretty-print a payload with 2-space indent when it is a JSON object,
/// otherwise return it untouched
pub fn prettify_json(bytes: &[u8]) -> Vec<u8> {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value @ serde_json::Value::Object(_)) => {
            serde_json::to_vec_pretty(&value).unwrap_or_else(|_| bytes.to_vec())
        }
        _ => bytes.to_vec(),
    }
}

/// Current year-month in the remote API's `YYYY-MM` format
pub fn current_month() -> String {
    Local::now().format("%Y-%m").to_string()
}

/// Format a timestamp for status output, `-` when absent
pub fn format_timestamp(at: Option<DateTime<Local>>) -> String {
    at.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Render a duration as `12h0m0s`
pub fn format_interval(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_play_time() {
        assert_eq!(parse_play_time_to_minutes("2天3小时4分钟"), 2 * 1440 + 3 * 60 + 4);
    }

    #[test]
    fn test_parse_partial_play_time() {
        assert_eq!(parse_play_time_to_minutes("5小时"), 300);
        assert_eq!(parse_play_time_to_minutes("1天10分钟"), 1450);
        assert_eq!(parse_play_time_to_minutes(""), 0);
        assert_eq!(parse_play_time_to_minutes("online for a while"), 0);
    }

    #[test]
    fn test_parse_overflowing_component_is_zero() {
        assert_eq!(parse_play_time_to_minutes("99999999999999999999999天5分钟"), 5);
    }

    #[test]
    fn test_prettify_object() {
        let pretty = prettify_json(br#"{"a":1}"#);
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_prettify_passthrough() {
        assert_eq!(prettify_json(b"[1,2]"), b"[1,2]".to_vec());
        assert_eq!(prettify_json(b"not json"), b"not json".to_vec());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(12 * 3600)), "12h0m0s");
        assert_eq!(format_interval(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
    }

    #[test]
    fn test_format_timestamp_absent() {
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn test_current_month_shape() {
        let month = current_month();
        assert_eq!(month.len(), 7);
        assert_eq!(&month[4..5], "-");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 7), "very lo...");
        assert_eq!(truncate_text("石之家石之家", 3), "石之家...");
    }
}
