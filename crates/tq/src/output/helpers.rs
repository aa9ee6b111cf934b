//! Common helper functions for output formatting.

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats priority for display, padded to `width`.
///
/// Priorities run from 1 (normal) to 4 (urgent).
pub fn format_priority(priority: i32, width: usize, use_colors: bool) -> String {
    let label = format!("{:<width$}", format!("p{priority}"));

    if use_colors {
        match priority {
            4 => label.red().to_string(),
            3 => label.yellow().to_string(),
            2 => label.blue().to_string(),
            _ => label.dimmed().to_string(),
        }
    } else {
        label
    }
}

/// Describes a deadline relative to `today`.
pub fn deadline_label(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        d if d < 0 => format!("{} days ago", -d),
        _ => date.format("%b %d").to_string(),
    }
}

/// Formats a deadline for display, padded to `width`.
///
/// Overdue deadlines are red and today's are yellow.
pub fn format_deadline(deadline: Option<NaiveDate>, width: usize, use_colors: bool) -> String {
    let Some(date) = deadline else {
        return " ".repeat(width);
    };

    let today = Local::now().date_naive();
    let display = format!("{:<width$}", deadline_label(date, today));

    if use_colors {
        if date < today {
            display.red().to_string()
        } else if date == today {
            display.yellow().to_string()
        } else {
            display
        }
    } else {
        display
    }
}

/// Formats tags for display.
pub fn format_tags(tags: &[String], max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
    truncate_str(&formatted.join(" "), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a longer name", 8), "a lon...");
        assert_eq!(truncate_str("日本語のタスク名", 6), "日本語...");
    }

    #[test]
    fn test_format_priority_without_colors() {
        assert_eq!(format_priority(4, 4, false), "p4  ");
        assert_eq!(format_priority(1, 2, false), "p1");
    }

    #[test]
    fn test_deadline_label() {
        let today = date(2026, 10, 16);
        assert_eq!(deadline_label(today, today), "Today");
        assert_eq!(deadline_label(date(2026, 10, 17), today), "Tomorrow");
        assert_eq!(deadline_label(date(2026, 10, 15), today), "Yesterday");
        assert_eq!(deadline_label(date(2026, 10, 10), today), "6 days ago");
        assert_eq!(deadline_label(date(2026, 12, 1), today), "Dec 01");
    }

    #[test]
    fn test_format_deadline_missing() {
        assert_eq!(format_deadline(None, 5, true), "     ");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[], 10), "");
        let tags = vec!["work".to_string(), "q4".to_string()];
        assert_eq!(format_tags(&tags, 20), "#work #q4");
        assert_eq!(format_tags(&tags, 6), "#wo...");
    }
}
