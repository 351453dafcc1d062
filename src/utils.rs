use chrono::{DateTime, Utc};

/// Parse an RFC 3339 / ISO 8601 timestamp as returned in `publishedAt`
/// fields. Malformed or empty input is treated as absent, never an error.
pub fn parse_rfc3339(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }
    date_str.parse::<DateTime<Utc>>().ok()
}

/// Parse an ISO 8601 duration string (PT1H2M3S) to total seconds.
pub fn parse_iso8601_duration(duration_str: &str) -> u64 {
    if !duration_str.starts_with("PT") {
        return 0;
    }

    let duration_part = &duration_str[2..];
    let mut total_seconds = 0.0;
    let mut current_number = String::new();

    for ch in duration_part.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
        } else {
            if let Ok(num) = current_number.parse::<f64>() {
                match ch {
                    'H' => total_seconds += num * 3600.0,
                    'M' => total_seconds += num * 60.0,
                    'S' => total_seconds += num,
                    _ => {}
                }
            }
            current_number.clear();
        }
    }

    total_seconds as u64
}

/// Format seconds as H:MM:SS, or M:SS under an hour.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "0:00".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
