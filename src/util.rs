use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;
use crate::store::email::Email;

static DAYS_AGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s+days?\s+ago$").unwrap());

/// Number of id characters shown in listings.
pub const SHORT_ID_LEN: usize = 6;

/// Parse a user-supplied date: `YYYY-MM-DD`, `today`, `yesterday` or `N days ago`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate, Error> {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }
    if let Some(cap) = DAYS_AGO_RE.captures(trimmed) {
        let days: i64 = cap[1]
            .parse()
            .map_err(|_| Error::InvalidDate(input.to_string()))?;
        return Duration::try_days(days)
            .and_then(|d| today.checked_sub_signed(d))
            .ok_or_else(|| Error::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Parse a date relative to today's date in UTC.
pub fn parse_date_arg(input: &str) -> Result<NaiveDate, Error> {
    parse_date(input, Utc::now().date_naive())
}

/// Date in Gmail search syntax (`YYYY/MM/DD`).
pub fn gmail_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn short_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(SHORT_ID_LEN)
        .map(|(i, _)| i)
        .unwrap_or(id.len());
    &id[..end]
}

/// Truncate to `max` characters, ending in "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Compact age: minutes, hours, days, weeks, then months.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();
    if mins < 60 {
        format!("{}m", mins)
    } else if hours < 24 {
        format!("{}h", hours)
    } else if days < 7 {
        format!("{}d", days)
    } else if days / 7 < 5 {
        format!("{}w", days / 7)
    } else {
        format!("{}mo", days / 30)
    }
}

/// Sender display name, falling back to the address.
pub fn format_sender(email: &Email) -> String {
    match &email.from {
        Some(from) if !from.name.is_empty() => from.name.clone(),
        Some(from) if !from.address.is_empty() => from.address.clone(),
        _ => "(unknown sender)".to_string(),
    }
}
