//! Custom Askama template filters.

use std::fmt::Display;

use boutique_core::catalog::MAX_RATING;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating as five filled or empty stars, rounding to the nearest star.
///
/// Usage in templates: `{{ product.rating|stars }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(render_stars(&rating.to_string()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_stars(rating: &str) -> String {
    let rating = rating.parse::<f64>().unwrap_or(0.0).clamp(0.0, MAX_RATING);
    let filled = rating.round() as usize;
    let total = MAX_RATING as usize;
    "★".repeat(filled) + &"☆".repeat(total - filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stars() {
        assert_eq!(render_stars("4.4"), "★★★★☆");
        assert_eq!(render_stars("4.5"), "★★★★★");
        assert_eq!(render_stars("0"), "☆☆☆☆☆");
        assert_eq!(render_stars("9"), "★★★★★");
        assert_eq!(render_stars("n/a"), "☆☆☆☆☆");
    }
}
