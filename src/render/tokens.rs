//! Lookup tables from record values to icon and CSS class tokens
//!
//! Unrecognized values fall back to the `info` token.

pub const DEFAULT_TOKEN: &str = "info";

/// Icon token for an insight category
pub fn category_icon(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "retirement" => "piggy-bank",
        "deductions" => "receipt",
        "credits" => "award",
        "qbi" => "briefcase",
        "investment" => "trending-up",
        _ => DEFAULT_TOKEN,
    }
}

/// Class token for an insight type
pub fn insight_type_class(kind: &str) -> &'static str {
    match kind.to_lowercase().as_str() {
        "opportunity" | "savings" => "success",
        "warning" | "risk" => "warning",
        "deadline" | "urgent" | "alert" => "danger",
        _ => DEFAULT_TOKEN,
    }
}

/// Class token for a client status
pub fn client_status_class(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "active" | "complete" | "completed" => "success",
        "pending" | "in_progress" | "in-progress" => "warning",
        "inactive" | "archived" => "muted",
        "blocked" | "overdue" => "danger",
        _ => DEFAULT_TOKEN,
    }
}

/// Class token for a review priority
pub fn priority_class(priority: &str) -> &'static str {
    match priority.to_lowercase().as_str() {
        "high" | "urgent" => "danger",
        "medium" | "normal" => "warning",
        "low" => "success",
        _ => DEFAULT_TOKEN,
    }
}

/// Class token for a lead value tier
pub fn value_tier_class(tier: &str) -> &'static str {
    match tier.to_lowercase().as_str() {
        "high" => "success",
        "medium" => "warning",
        "low" => "muted",
        _ => DEFAULT_TOKEN,
    }
}

/// Initials shown in a client avatar (`Dana Lee` → `DL`)
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}
