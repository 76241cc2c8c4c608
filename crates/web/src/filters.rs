//! Custom Askama template filters.

use std::fmt::Display;

/// Quantity with its unit: `1 can`, `3 cans`.
///
/// Usage in templates: `{{ order.cans|cans }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn cans(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = value.to_string();
    let unit = if count == "1" { "can" } else { "cans" };
    Ok(format!("{count} {unit}"))
}

/// Year shown in the page footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
