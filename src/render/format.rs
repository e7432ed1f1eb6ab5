//! Display formatters for currency, counts and timestamps

use chrono::{DateTime, Utc};

/// Format a dollar amount rounded to whole dollars (`$12,345`)
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }

    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_digits(rounded.abs() as u64))
}

/// Format a count with thousands separators (`1,234`)
pub fn format_number(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(value.unsigned_abs()))
}

/// Format a timestamp relative to `now`
///
/// Under a minute (or in the future) is "just now"; then minutes, hours and
/// days up to a week; older timestamps show the calendar date.
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let secs = elapsed.num_seconds();

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", elapsed.num_minutes())
    } else if secs < 86_400 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d ago", elapsed.num_days())
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
