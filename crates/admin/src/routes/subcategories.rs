//! Subcategory registry page.

use askama::Template;
use axum::{extract::State, response::Html};
use boutique_core::catalog::SubCategorySummary;
use tracing::instrument;

use super::render;
use crate::db::SubCategoryRepository;
use crate::error::Result;
use crate::state::AppState;

/// One card on the registry page.
#[derive(Debug, Clone)]
pub struct SubCategoryCard {
    pub name: String,
    pub item_label: String,
    pub collections: String,
}

impl From<&SubCategorySummary> for SubCategoryCard {
    fn from(summary: &SubCategorySummary) -> Self {
        let noun = if summary.product_count == 1 { "item" } else { "items" };
        Self {
            name: summary.name.clone(),
            item_label: format!("{} {noun}", summary.product_count),
            collections: summary.categories.join(", "),
        }
    }
}

/// Registry page template.
#[derive(Template)]
#[template(path = "subcategories/index.html")]
pub struct SubCategoriesIndexTemplate {
    pub current_path: &'static str,
    pub cards: Vec<SubCategoryCard>,
}

/// Subcategory registry handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let summaries = SubCategoryRepository::new(state.pool()).summaries().await?;

    render(&SubCategoriesIndexTemplate {
        current_path: "/admin/subcategories",
        cards: summaries.iter().map(SubCategoryCard::from).collect(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn summary(count: i64, categories: &[&str]) -> SubCategorySummary {
        SubCategorySummary {
            name: "Totes".to_string(),
            product_count: count,
            categories: categories.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_card_labels() {
        let card = SubCategoryCard::from(&summary(3, &["Accessories", "Bags"]));
        assert_eq!(card.item_label, "3 items");
        assert_eq!(card.collections, "Accessories, Bags");

        let card = SubCategoryCard::from(&summary(1, &["Bags"]));
        assert_eq!(card.item_label, "1 item");
    }

    #[test]
    fn test_template_renders_cards() {
        let html = SubCategoriesIndexTemplate {
            current_path: "/admin/subcategories",
            cards: vec![SubCategoryCard::from(&summary(2, &["Bags"]))],
        }
        .render()
        .unwrap();
        assert!(html.contains("Subcategory Registry"));
        assert!(html.contains("Totes"));
        assert!(html.contains("2 items"));
    }
}
