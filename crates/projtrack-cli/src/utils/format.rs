use chrono::{DateTime, NaiveDate, Utc};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a timestamp as a short readable date
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Due date column: the date, `-` when unset, flagged when overdue
pub fn format_due(due: Option<NaiveDate>, overdue: bool) -> String {
    match due {
        Some(date) if overdue => format!("{} (overdue)", date.format("%Y-%m-%d")),
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Text progress bar, e.g. `[#####-----] 50%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * width / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Ça va très bien", 6), "Ça ...");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_date(&date), "May 01, 2024");
    }

    #[test]
    fn test_format_due() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert_eq!(format_due(date, false), "2024-06-01");
        assert_eq!(format_due(date, true), "2024-06-01 (overdue)");
        assert_eq!(format_due(None, true), "-");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50, 10), "[#####-----] 50%");
        assert_eq!(progress_bar(0, 4), "[----] 0%");
        assert_eq!(progress_bar(120, 4), "[####] 100%");
    }
}
