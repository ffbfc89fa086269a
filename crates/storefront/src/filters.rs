//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Highest rating a product can have.
const MAX_RATING: usize = 5;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating out of five as filled and empty stars.
///
/// Usage in templates: `{{ product.rating|rating_stars }}`
#[askama::filter_fn]
pub fn rating_stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stars(&rating.to_string()))
}

fn stars(rating: &str) -> String {
    let filled = rating.trim().parse::<usize>().unwrap_or(0).min(MAX_RATING);
    let mut out = "★".repeat(filled);
    out.push_str(&"☆".repeat(MAX_RATING - filled));
    out
}
