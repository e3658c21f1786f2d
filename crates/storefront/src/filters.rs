//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Formats a cart item count for the header badge.
///
/// Counts above 99 collapse to "99+" so the badge never overflows.
///
/// Usage in templates: `{{ count|badge_count }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn badge_count(count: &i64, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_badge(*count))
}

/// Formats a date for display, e.g. "June 1, 2025".
///
/// Usage in templates: `{{ post.published_at|format_date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn format_date(
    date: &chrono::NaiveDate,
    _env: &dyn askama::Values,
) -> askama::Result<String> {
    Ok(display_date(date))
}

fn display_date(date: &chrono::NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn format_badge(count: i64) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_exact_below_cap() {
        assert_eq!(format_badge(1), "1");
        assert_eq!(format_badge(99), "99");
    }

    #[test]
    fn test_badge_caps_at_99() {
        assert_eq!(format_badge(100), "99+");
        assert_eq!(format_badge(250), "99+");
    }

    #[test]
    fn test_format_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(display_date(&date), "June 1, 2025");
    }
}
