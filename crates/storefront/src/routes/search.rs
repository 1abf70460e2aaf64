//! Search route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Query, State},
};
use boutique_core::catalog::Product;
use boutique_core::pagination::{PageLinks, Paginated};
use boutique_core::search::{
    ALL, ActiveFilter, FilterKey, FilterOption, SEARCH_PATH, SearchParams,
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::routes::cart::cart_count;
use crate::routes::products::ProductCard;
use crate::state::{AppState, Facets};

/// JSON search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub count_products: i64,
    pub page: u32,
    pub pages: u32,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
}

/// Search results page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/search.html")]
pub struct SearchPageTemplate {
    pub title: String,
    /// Current free-text query, empty when unfiltered.
    pub query: String,
    pub products: Vec<ProductCard>,
    pub count_products: i64,
    pub is_filtered: bool,
    pub clear_url: &'static str,
    pub active_filters: Vec<ActiveFilter>,
    pub category_options: Vec<FilterOption>,
    pub brand_options: Vec<FilterOption>,
    pub price_options: Vec<FilterOption>,
    pub rating_options: Vec<FilterOption>,
    pub sort_options: Vec<FilterOption>,
    pub pagination: Option<PageLinks>,
    pub cart_count: u32,
}

/// Run a search and load the facet lists alongside it.
async fn run_search(
    state: &AppState,
    params: &SearchParams,
) -> Result<(Paginated<Product>, Facets)> {
    let filter = params.to_filter(state.config().page_size);
    let repo = CatalogRepository::new(state.pool());
    let (results, facets) = tokio::try_join!(repo.search(&filter), state.facets())?;
    Ok((results, facets))
}

/// Full search page.
#[instrument(skip(state, session))]
pub async fn search_page(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchParams>,
) -> Result<SearchPageTemplate> {
    let params = params.normalized();
    let (results, facets) = run_search(&state, &params).await?;

    let pagination = PageLinks::build(results.page, results.total_pages, |page| {
        params.page_url(page)
    });
    let query = if params.q == ALL {
        String::new()
    } else {
        params.q.clone()
    };

    Ok(SearchPageTemplate {
        title: params.title(),
        query,
        products: results.items.iter().map(ProductCard::from).collect(),
        count_products: results.total,
        is_filtered: params.is_filtered(),
        clear_url: SEARCH_PATH,
        active_filters: params.active_filters(),
        category_options: params.facet_options(FilterKey::Category, &facets.categories),
        brand_options: params.facet_options(FilterKey::Brand, &facets.brands),
        price_options: params.price_options(),
        rating_options: params.rating_options(),
        sort_options: params.sort_options(),
        pagination,
        cart_count: cart_count(&session).await,
    })
}

/// Search results as JSON.
#[instrument(skip(state))]
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let params = params.normalized();
    let (results, facets) = run_search(&state, &params).await?;

    Ok(Json(SearchResponse {
        count_products: results.total,
        page: results.page,
        pages: results.total_pages,
        products: results.items,
        categories: facets.categories.as_ref().clone(),
        brands: facets.brands.as_ref().clone(),
    }))
}
