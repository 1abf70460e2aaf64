//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, State},
};
use boutique_core::Slug;
use boutique_core::catalog::Product;
use boutique_core::search::{FilterKey, SearchParams};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::cart::cart_count;
use crate::state::AppState;

/// Product card data for grids.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub slug: String,
    pub url: String,
    pub name: String,
    pub image: String,
    pub fallback_image: String,
    pub price: String,
    pub category: String,
    pub brand: Option<String>,
    pub rating: f64,
    pub num_reviews: i32,
    pub delivery_time: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            slug: product.slug.to_string(),
            url: format!("/product/{}", product.slug),
            name: product.name.clone(),
            image: product.image_url().to_string(),
            fallback_image: product.fallback_image_url(),
            price: product.price.display(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            rating: product.rating,
            num_reviews: product.num_reviews,
            delivery_time: product.delivery_time.clone(),
            in_stock: product.is_in_stock(),
        }
    }
}

/// Product detail view.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub card: ProductCard,
    /// Search page filtered to this product's category.
    pub category_url: String,
    pub description: Option<String>,
    pub sub_category: Option<String>,
    pub images: Vec<String>,
    pub weight: Option<String>,
    pub count_in_stock: i32,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            card: ProductCard::from(product),
            category_url: SearchParams::default()
                .filter_url(FilterKey::Category, &product.category),
            description: product.description.clone(),
            sub_category: product.sub_category.clone(),
            images: product.images.clone(),
            weight: product.weight.clone(),
            count_in_stock: product.count_in_stock.get(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductDetail,
    pub cart_count: u32,
}

/// Parse a path slug and load the product, treating malformed slugs as unknown.
async fn load_product(state: &AppState, raw: &str) -> Result<Product> {
    let not_found = || AppError::NotFound(format!("product {raw}"));
    let slug = Slug::parse(raw).map_err(|_| not_found())?;
    CatalogRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(not_found)
}

/// Display a product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = load_product(&state, &slug).await?;

    Ok(ProductShowTemplate {
        product: ProductDetail::from(&product),
        cart_count: cart_count(&session).await,
    })
}

/// Product record as JSON.
#[instrument(skip(state))]
pub async fn api_show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    load_product(&state, &slug).await.map(Json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{Price, ProductId, StockCount};
    use chrono::Utc;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Linen Shirt".to_string(),
            slug: Slug::parse("linen-shirt").unwrap(),
            category: "Shirts".to_string(),
            sub_category: None,
            brand: Some("Atelier".to_string()),
            image: None,
            images: Vec::new(),
            price: Price::from_cents(124_950).unwrap(),
            count_in_stock: StockCount::new(0).unwrap(),
            description: None,
            rating: 4.5,
            num_reviews: 12,
            delivery_time: Some("2-3 days".to_string()),
            weight: None,
            is_featured: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_card_from_product() {
        let card = ProductCard::from(&product());
        assert_eq!(card.url, "/product/linen-shirt");
        assert_eq!(card.price, "$1,249.5");
        assert!(!card.in_stock);
        assert_eq!(card.image, boutique_core::catalog::PLACEHOLDER_IMAGE);
        assert!(card.fallback_image.starts_with("https://images.unsplash.com/"));
    }

    #[test]
    fn test_detail_links_to_category() {
        let detail = ProductDetail::from(&product());
        assert!(detail.category_url.starts_with("/search?"));
        assert!(detail.category_url.contains("category=Shirts"));
    }
}
