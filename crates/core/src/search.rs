//! Query-string driven product search.
//!
//! The search page is fully described by its query string:
//!
//! ```text
//! /search?q=linen&category=Shirts&brand=all&price=1-50&rating=4&sort=lowest&page=2
//! ```
//!
//! Every filter defaults to `all`. [`SearchParams`] is the raw, lenient view
//! of those parameters (what the page links are built from), and
//! [`SearchFilter`] is the typed filter handed to the catalog repository.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::pagination::PageRequest;

/// Value meaning "no filter".
pub const ALL: &str = "all";

/// Path of the search page.
pub const SEARCH_PATH: &str = "/search";

/// Price buckets offered in the filter sidebar: (query value, label).
pub const PRICE_BUCKETS: &[(&str, &str)] = &[
    ("1-50", "$1 to $50"),
    ("51-200", "$51 to $200"),
    ("201-1000", "$201 to $1000"),
];

/// Minimum-rating choices offered in the filter sidebar.
pub const RATING_CHOICES: &[u8] = &[4, 3, 2, 1];

// =============================================================================
// Sort
// =============================================================================

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Featured products first.
    Featured,
    /// Cheapest first.
    Lowest,
    /// Most expensive first.
    Highest,
    /// Best rated first.
    TopRated,
    /// Most recently added first.
    #[default]
    Newest,
}

impl SortOrder {
    /// All orders, in the order the sort select lists them.
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::Featured,
        Self::Lowest,
        Self::Highest,
        Self::TopRated,
    ];

    /// Parse from the `sort` query value. Unknown values mean [`Self::Newest`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "featured" => Self::Featured,
            "lowest" => Self::Lowest,
            "highest" => Self::Highest,
            "toprated" => Self::TopRated,
            _ => Self::Newest,
        }
    }

    /// Query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Lowest => "lowest",
            Self::Highest => "highest",
            Self::TopRated => "toprated",
            Self::Newest => "newest",
        }
    }

    /// Label shown in the sort select.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::Lowest => "Price: Low to High",
            Self::Highest => "Price: High to Low",
            Self::TopRated => "Top Rated",
            Self::Newest => "Newest Arrivals",
        }
    }
}

// =============================================================================
// Price range
// =============================================================================

/// Inclusive price bounds parsed from `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Parse `"min-max"`. Returns `None` for malformed or inverted ranges.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (min, max) = s.split_once('-')?;
        let min = min.trim().parse::<Decimal>().ok()?;
        let max = max.trim().parse::<Decimal>().ok()?;
        if min.is_sign_negative() || min > max {
            return None;
        }
        Some(Self { min, max })
    }
}

// =============================================================================
// Raw parameters
// =============================================================================

/// A search-page query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Query,
    Category,
    Brand,
    Price,
    Rating,
    Sort,
    Page,
}

impl FilterKey {
    /// Query-string name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "q",
            Self::Category => "category",
            Self::Brand => "brand",
            Self::Price => "price",
            Self::Rating => "rating",
            Self::Sort => "sort",
            Self::Page => "page",
        }
    }
}

/// Search-page query parameters, as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: String,
    pub category: String,
    pub brand: String,
    pub price: String,
    pub rating: String,
    pub sort: String,
    pub page: String,
    #[serde(rename = "pageSize", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: ALL.to_string(),
            category: ALL.to_string(),
            brand: ALL.to_string(),
            price: ALL.to_string(),
            rating: ALL.to_string(),
            sort: SortOrder::Newest.as_str().to_string(),
            page: "1".to_string(),
            page_size: None,
        }
    }
}

/// A removable filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub label: String,
    pub clear_url: String,
    /// The free-text query chip is styled differently.
    pub is_query: bool,
}

/// One selectable sidebar option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub url: String,
    pub selected: bool,
}

impl SearchParams {
    /// Replace blank values with their defaults and trim whitespace.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        for (value, default) in [
            (&mut self.q, defaults.q),
            (&mut self.category, defaults.category),
            (&mut self.brand, defaults.brand),
            (&mut self.price, defaults.price),
            (&mut self.rating, defaults.rating),
            (&mut self.sort, defaults.sort),
            (&mut self.page, defaults.page),
        ] {
            let trimmed = value.trim();
            *value = if trimmed.is_empty() {
                default
            } else {
                trimmed.to_string()
            };
        }
        self
    }

    fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Query => &self.q,
            FilterKey::Category => &self.category,
            FilterKey::Brand => &self.brand,
            FilterKey::Price => &self.price,
            FilterKey::Rating => &self.rating,
            FilterKey::Sort => &self.sort,
            FilterKey::Page => &self.page,
        }
    }

    fn set(&mut self, key: FilterKey, value: &str) {
        let slot = match key {
            FilterKey::Query => &mut self.q,
            FilterKey::Category => &mut self.category,
            FilterKey::Brand => &mut self.brand,
            FilterKey::Price => &mut self.price,
            FilterKey::Rating => &mut self.rating,
            FilterKey::Sort => &mut self.sort,
            FilterKey::Page => &mut self.page,
        };
        *slot = value.to_string();
    }

    /// Whether a filter value is active (not `all` and not blank).
    fn is_set(value: &str) -> bool {
        !value.is_empty() && value != ALL
    }

    /// The sort order.
    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(&self.sort)
    }

    /// 1-based page number; invalid values mean page 1.
    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.page.trim().parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1)
    }

    /// The encoded query string, in a stable parameter order.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for key in [
            FilterKey::Query,
            FilterKey::Category,
            FilterKey::Brand,
            FilterKey::Price,
            FilterKey::Rating,
            FilterKey::Sort,
            FilterKey::Page,
        ] {
            serializer.append_pair(key.as_str(), self.get(key));
        }
        if let Some(size) = self.page_size {
            serializer.append_pair("pageSize", &size.to_string());
        }
        serializer.finish()
    }

    /// Search-page URL with `key` set to `value`.
    ///
    /// Changing any filter other than the page sends the visitor back to
    /// page 1.
    #[must_use]
    pub fn filter_url(&self, key: FilterKey, value: &str) -> String {
        let mut next = self.clone();
        next.set(key, value);
        if key != FilterKey::Page {
            next.set(FilterKey::Page, "1");
        }
        format!("{SEARCH_PATH}?{}", next.query_string())
    }

    /// Search-page URL for another page of the current results.
    #[must_use]
    pub fn page_url(&self, page: u32) -> String {
        self.filter_url(FilterKey::Page, &page.to_string())
    }

    /// Whether any filter (including free text) narrows the results.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        [
            &self.q,
            &self.category,
            &self.brand,
            &self.price,
            &self.rating,
        ]
        .into_iter()
        .any(|v| Self::is_set(v))
    }

    /// Page heading.
    #[must_use]
    pub fn title(&self) -> String {
        if Self::is_set(&self.q) {
            format!("Results for \"{}\"", self.q)
        } else {
            "All Collections".to_string()
        }
    }

    /// Chips for each active filter, each linking to the results without it.
    #[must_use]
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let mut chips = Vec::new();
        if Self::is_set(&self.q) {
            chips.push(ActiveFilter {
                label: format!("\"{}\"", self.q),
                clear_url: self.filter_url(FilterKey::Query, ALL),
                is_query: true,
            });
        }
        for (key, label) in [
            (FilterKey::Category, self.category.clone()),
            (FilterKey::Brand, self.brand.clone()),
            (FilterKey::Price, format!("Price: {}", self.price)),
            (FilterKey::Rating, format!("Rating: {}+", self.rating)),
        ] {
            if Self::is_set(self.get(key)) {
                chips.push(ActiveFilter {
                    label,
                    clear_url: self.filter_url(key, ALL),
                    is_query: false,
                });
            }
        }
        chips
    }

    /// Sidebar options for a facet: "All" followed by each value.
    #[must_use]
    pub fn facet_options(&self, key: FilterKey, values: &[String]) -> Vec<FilterOption> {
        let current = self.get(key);
        std::iter::once(FilterOption {
            label: "All".to_string(),
            url: self.filter_url(key, ALL),
            selected: !Self::is_set(current),
        })
        .chain(values.iter().map(|value| FilterOption {
            label: value.clone(),
            url: self.filter_url(key, value),
            selected: current == value,
        }))
        .collect()
    }

    /// Sidebar options for the price buckets.
    #[must_use]
    pub fn price_options(&self) -> Vec<FilterOption> {
        self.labelled_options(
            FilterKey::Price,
            PRICE_BUCKETS
                .iter()
                .map(|(value, label)| ((*value).to_string(), (*label).to_string())),
        )
    }

    /// Sidebar options for minimum rating.
    #[must_use]
    pub fn rating_options(&self) -> Vec<FilterOption> {
        self.labelled_options(
            FilterKey::Rating,
            RATING_CHOICES
                .iter()
                .map(|stars| (stars.to_string(), format!("{stars} stars & up"))),
        )
    }

    /// Options for the sort select.
    #[must_use]
    pub fn sort_options(&self) -> Vec<FilterOption> {
        let current = self.sort_order();
        SortOrder::ALL
            .iter()
            .map(|order| FilterOption {
                label: order.label().to_string(),
                url: self.filter_url(FilterKey::Sort, order.as_str()),
                selected: *order == current,
            })
            .collect()
    }

    fn labelled_options(
        &self,
        key: FilterKey,
        choices: impl Iterator<Item = (String, String)>,
    ) -> Vec<FilterOption> {
        let current = self.get(key);
        std::iter::once(FilterOption {
            label: "Any".to_string(),
            url: self.filter_url(key, ALL),
            selected: !Self::is_set(current),
        })
        .chain(choices.map(|(value, label)| FilterOption {
            selected: current == value,
            url: self.filter_url(key, &value),
            label,
        }))
        .collect()
    }

    /// Typed filter for the repository.
    #[must_use]
    pub fn to_filter(&self, default_page_size: u32) -> SearchFilter {
        let text = |v: &str| Self::is_set(v).then(|| v.to_string());
        SearchFilter {
            query: text(&self.q),
            category: text(&self.category),
            brand: text(&self.brand),
            price: Self::is_set(&self.price)
                .then(|| PriceRange::parse(&self.price))
                .flatten(),
            min_rating: Self::is_set(&self.rating)
                .then(|| self.rating.trim().parse::<f64>().ok())
                .flatten()
                .filter(|r| r.is_finite()),
            sort: self.sort_order(),
            page: PageRequest::new(
                self.page_number(),
                self.page_size.unwrap_or(default_page_size),
            ),
        }
    }
}

// =============================================================================
// Typed filter
// =============================================================================

/// Filter handed to the catalog repository. Every `Some` narrows the results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    /// Case-insensitive substring of the product name.
    pub query: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<PriceRange>,
    pub min_rating: Option<f64>,
    pub sort: SortOrder,
    pub page: PageRequest,
}

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
#[must_use]
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(query: &str) -> SearchParams {
        let map: serde_json::Map<String, serde_json::Value> =
            form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .map(|(k, v)| {
                    let value = if k == "pageSize" {
                        serde_json::json!(v.parse::<u32>().unwrap())
                    } else {
                        serde_json::Value::String(v)
                    };
                    (k, value)
                })
                .collect();
        let parsed: SearchParams = serde_json::from_value(serde_json::Value::Object(map)).unwrap();
        parsed.normalized()
    }

    #[test]
    fn test_defaults() {
        let p = params("");
        assert_eq!(p, SearchParams::default());
        assert!(!p.is_filtered());
        assert_eq!(p.title(), "All Collections");
        assert_eq!(p.sort_order(), SortOrder::Newest);
        assert_eq!(p.page_number(), 1);
    }

    #[test]
    fn test_blank_values_become_all() {
        let p = params("q=&category=%20&page=");
        assert_eq!(p.q, ALL);
        assert_eq!(p.category, ALL);
        assert_eq!(p.page, "1");
    }

    #[test]
    fn test_sort_parse_roundtrip() {
        for order in SortOrder::ALL {
            assert_eq!(SortOrder::parse(order.as_str()), order);
        }
        assert_eq!(SortOrder::parse("bogus"), SortOrder::Newest);
    }

    #[test]
    fn test_price_range_parse() {
        let range = PriceRange::parse("1-50").unwrap();
        assert_eq!(range.min, Decimal::from(1));
        assert_eq!(range.max, Decimal::from(50));

        assert!(PriceRange::parse("12.5-99.99").is_some());
        assert!(PriceRange::parse("50-1").is_none());
        assert!(PriceRange::parse("cheap").is_none());
        assert!(PriceRange::parse("1-").is_none());
    }

    #[test]
    fn test_filter_url_resets_page() {
        let p = params("q=linen&page=3");
        let url = p.filter_url(FilterKey::Category, "Shirts");
        assert!(url.starts_with("/search?"));
        assert!(url.contains("category=Shirts"));
        assert!(url.contains("page=1"));
        assert!(url.contains("q=linen"));
    }

    #[test]
    fn test_page_url_keeps_filters() {
        let p = params("category=Shirts&page=1");
        let url = p.page_url(4);
        assert!(url.contains("page=4"));
        assert!(url.contains("category=Shirts"));
    }

    #[test]
    fn test_filter_url_encodes_values() {
        let p = params("");
        let url = p.filter_url(FilterKey::Query, "silk & wool");
        assert!(url.contains("q=silk+%26+wool"));
    }

    #[test]
    fn test_active_filters() {
        let p = params("q=linen&category=Shirts&price=1-50");
        assert!(p.is_filtered());
        assert_eq!(p.title(), "Results for \"linen\"");

        let chips = p.active_filters();
        let labels: Vec<&str> = chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["\"linen\"", "Shirts", "Price: 1-50"]);
        assert!(chips.first().unwrap().is_query);
        assert!(chips.get(1).unwrap().clear_url.contains("category=all"));
    }

    #[test]
    fn test_facet_options_mark_selection() {
        let p = params("brand=Atelier");
        let options = p.facet_options(
            FilterKey::Brand,
            &["Atelier".to_string(), "Maison".to_string()],
        );
        assert_eq!(options.len(), 3);
        assert!(!options.first().unwrap().selected);
        assert!(options.get(1).unwrap().selected);
        assert!(!options.get(2).unwrap().selected);
    }

    #[test]
    fn test_sort_and_price_options() {
        let p = params("sort=lowest&price=51-200");
        let selected_sort: Vec<_> = p.sort_options().into_iter().filter(|o| o.selected).collect();
        assert_eq!(selected_sort.len(), 1);
        assert_eq!(selected_sort.first().unwrap().label, "Price: Low to High");

        let prices = p.price_options();
        assert_eq!(prices.len(), PRICE_BUCKETS.len() + 1);
        assert!(prices.get(2).unwrap().selected);

        assert_eq!(p.rating_options().len(), RATING_CHOICES.len() + 1);
    }

    #[test]
    fn test_to_filter() {
        let p = params("q=linen&category=Shirts&brand=all&price=1-50&rating=4&sort=toprated&page=2&pageSize=12");
        let filter = p.to_filter(9);
        assert_eq!(filter.query.as_deref(), Some("linen"));
        assert_eq!(filter.category.as_deref(), Some("Shirts"));
        assert_eq!(filter.brand, None);
        assert!(filter.price.is_some());
        assert_eq!(filter.min_rating, Some(4.0));
        assert_eq!(filter.sort, SortOrder::TopRated);
        assert_eq!(filter.page.page(), 2);
        assert_eq!(filter.page.page_size(), 12);
    }

    #[test]
    fn test_to_filter_ignores_garbage() {
        let p = params("price=lots&rating=five&page=-1");
        let filter = p.to_filter(9);
        assert_eq!(filter.price, None);
        assert_eq!(filter.min_rating, None);
        assert_eq!(filter.page.page(), 1);
        assert_eq!(filter.page.page_size(), 9);
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("linen"), "%linen%");
        assert_eq!(like_pattern("100%_a\\"), "%100\\%\\_a\\\\%");
    }
}
