//! Utility functions and helpers

use chrono::{DateTime, Local, NaiveDate, Timelike};
use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> std::path::PathBuf {
    let path = path.as_ref();
    if !path.exists() {
        let _ = std::fs::create_dir_all(path);
    }
    path.to_path_buf()
}

/// Create a safe filename from a string
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}

/// Truncate a string to a maximum byte length, ensuring valid UTF-8 boundaries
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len < 3 {
        // No room for an ellipsis, just cut
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s[..end].to_string()
    } else {
        let mut end = max_len - 3;
        while !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        format!("{}...", &s[..end])
    }
}

/// Time-of-day greeting
pub fn greeting() -> &'static str {
    greeting_for_hour(Local::now().hour())
}

fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        _ => "Good evening!",
    }
}

/// Greeting with the current clock time and date,
/// e.g. "It's 3:45 PM on Friday, June 25, 2025."
pub fn clock_greeting() -> String {
    let now = Local::now();
    format!(
        "It's {} on {}.",
        now.format("%-I:%M %p"),
        now.format("%A, %B %-d, %Y")
    )
}

/// Format a timestamp as a clock time, e.g. "3:45 PM"
pub fn format_time(timestamp: DateTime<Local>) -> String {
    timestamp.format("%-I:%M %p").to_string()
}

/// Format a date, e.g. "June 25, 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Human-readable time until a target, in days, hours, or minutes
pub fn time_until(target: DateTime<Local>) -> String {
    let delta = target.signed_duration_since(Local::now());
    if delta.num_days() > 0 {
        format!("{} days", delta.num_days())
    } else if delta.num_hours() > 0 {
        format!("{} hours", delta.num_hours())
    } else {
        format!("{} minutes", delta.num_minutes().max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_safe_filename() {
        assert_eq!(safe_filename("hello world"), "hello_world");
        assert_eq!(safe_filename("test/file:name"), "test_file_name");
        assert_eq!(safe_filename("normal-name.txt"), "normal-name.txt");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("test", 3), "...");
    }

    #[test]
    fn test_truncate_never_exceeds_max_len() {
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate("hello", 0), "");
        // Multi-byte boundary inside the cut
        assert_eq!(truncate("héllo", 2), "h");
    }

    #[test]
    fn test_ensure_dir_creates_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        assert_eq!(ensure_dir(&nested), nested);
        assert!(nested.is_dir());
        assert_eq!(ensure_dir(&nested), nested);
    }

    #[test]
    fn test_greeting_for_hour() {
        assert_eq!(greeting_for_hour(8), "Good morning!");
        assert_eq!(greeting_for_hour(13), "Good afternoon!");
        assert_eq!(greeting_for_hour(22), "Good evening!");
        assert_eq!(greeting_for_hour(3), "Good evening!");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 25).unwrap();
        assert_eq!(format_date(date), "June 25, 2025");
    }

    #[test]
    fn test_format_time() {
        let t = Local.with_ymd_and_hms(2025, 6, 25, 15, 45, 0).unwrap();
        assert_eq!(format_time(t), "3:45 PM");
    }

    #[test]
    fn test_time_until() {
        let in_two_days = Local::now() + Duration::days(2) + Duration::hours(1);
        assert_eq!(time_until(in_two_days), "2 days");

        let in_three_hours = Local::now() + Duration::hours(3) + Duration::minutes(5);
        assert_eq!(time_until(in_three_hours), "3 hours");
    }
}
