//! Formatting utilities

use chrono::Duration;

/// Format a countdown as MM:SS (or H:MM:SS once it crosses an hour).
pub fn clock(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a duration in human-readable form ("1h 5m 30s", "25m 0s", "42s").
pub fn duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock() {
        assert_eq!(clock(Duration::seconds(0)), "00:00");
        assert_eq!(clock(Duration::seconds(59)), "00:59");
        assert_eq!(clock(Duration::seconds(1500)), "25:00");
        assert_eq!(clock(Duration::seconds(3661)), "1:01:01");
    }

    #[test]
    fn test_clock_never_negative() {
        assert_eq!(clock(Duration::seconds(-5)), "00:00");
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(42), "42s");
        assert_eq!(duration(1500), "25m 0s");
        assert_eq!(duration(3930), "1h 5m 30s");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer label", 10), "a longe...");
    }
}
