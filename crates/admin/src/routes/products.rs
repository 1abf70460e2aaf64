//! Products list page.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use boutique_core::catalog::Product;
use boutique_core::pagination::{PageLinks, PageRequest};
use tracing::instrument;

use super::{PRODUCTS_PER_PAGE, PageQuery, render};
use crate::components::data_table::{DataTableConfig, products_table_config};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// Product row for the table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub stock: i32,
    pub in_stock: bool,
    pub rating: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            image: product.image_url().to_string(),
            price: product.price.display(),
            category: product.category.clone(),
            brand: product.brand.clone().unwrap_or_else(|| "-".to_string()),
            stock: product.count_in_stock.get(),
            in_stock: product.is_in_stock(),
            rating: format!("{:.1}", product.rating),
        }
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: &'static str,
    pub table: DataTableConfig,
    pub products: Vec<ProductRow>,
    pub total_products: i64,
    pub pagination: Option<PageLinks>,
}

/// Products list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>> {
    let page = PageRequest::from_query(query.page.as_deref(), PRODUCTS_PER_PAGE);
    let result = ProductRepository::new(state.pool()).list(page).await?;

    let template = ProductsIndexTemplate {
        current_path: "/admin/products",
        table: products_table_config(),
        products: result.items.iter().map(ProductRow::from).collect(),
        total_products: result.total,
        pagination: PageLinks::build(result.page, result.total_pages, |page| {
            format!("/admin/products?page={page}")
        }),
    };

    render(&template)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{Price, ProductId, Slug, StockCount};
    use chrono::Utc;

    use super::*;

    fn product(brand: Option<&str>) -> Product {
        Product {
            id: ProductId::new(9),
            name: "Canvas Tote".to_string(),
            slug: Slug::parse("canvas-tote").unwrap(),
            category: "Bags".to_string(),
            sub_category: Some("Totes".to_string()),
            brand: brand.map(ToString::to_string),
            image: Some("/static/images/tote.jpg".to_string()),
            images: Vec::new(),
            price: Price::from_cents(4_500).unwrap(),
            count_in_stock: StockCount::new(12).unwrap(),
            description: None,
            rating: 4.25,
            num_reviews: 8,
            delivery_time: None,
            weight: None,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_from_product() {
        let row = ProductRow::from(&product(Some("Field Co")));
        assert_eq!(row.id, 9);
        assert_eq!(row.price, "$45");
        assert_eq!(row.brand, "Field Co");
        assert_eq!(row.image, "/static/images/tote.jpg");
        assert!(row.in_stock);
        assert_eq!(row.stock, 12);
    }

    #[test]
    fn test_row_without_brand() {
        let row = ProductRow::from(&product(None));
        assert_eq!(row.brand, "-");
    }

    #[test]
    fn test_template_renders_rows_and_pagination() {
        let template = ProductsIndexTemplate {
            current_path: "/admin/products",
            table: products_table_config(),
            products: vec![ProductRow::from(&product(None))],
            total_products: 25,
            pagination: PageLinks::build(2, 3, |page| format!("/admin/products?page={page}")),
        };
        let html = template.render().unwrap();
        assert!(html.contains("Canvas Tote"));
        assert!(html.contains("/admin/products?page=3"));
        assert!(html.contains("25 products"));
    }

    #[test]
    fn test_template_renders_empty_state() {
        let template = ProductsIndexTemplate {
            current_path: "/admin/products",
            table: products_table_config(),
            products: Vec::new(),
            total_products: 0,
            pagination: None,
        };
        let html = template.render().unwrap();
        assert!(html.contains("No products yet"));
    }
}
