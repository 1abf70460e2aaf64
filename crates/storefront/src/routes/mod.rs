//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//! GET  /                       - Redirect to /search
//! GET  /search                 - Search results page
//! GET  /product/{slug}         - Product detail page
//!
//! # Cart (form posts, redirect back to /cart)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # JSON API (rate limited)
//! GET  /api/search             - Search results and facets
//! GET  /api/products/{slug}    - Product record
//! GET  /api/cart               - Cart contents and totals
//! ```

pub mod cart;
pub mod products;
pub mod search;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the JSON API router (mounted under `/api`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::api_search))
        .route("/products/{slug}", get(products::api_show))
        .route("/cart", get(cart::api_show))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Readiness check failed: {e}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Create the health check and HTML page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(|| async { Redirect::permanent("/search") }))
        .route("/search", get(search::search_page))
        .route("/product/{slug}", get(products::show))
        .nest("/cart", cart_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;

    /// Router over a pool that never connects; only paths that stop before
    /// the database are exercised.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/boutique_test")
            .unwrap();
        routes()
            .nest("/api", api_routes())
            .with_state(AppState::new(test_config(), pool))
    }

    async fn get(uri: &str) -> axum::response::Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_readiness_without_database() {
        // Nothing listens on port 1
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(500))
            .connect_lazy("postgres://127.0.0.1:1/boutique_test")
            .unwrap();
        let app = routes().with_state(AppState::new(test_config(), pool));

        let response = app
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_root_redirects_to_search() {
        let response = get("/").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/search");
    }

    #[tokio::test]
    async fn test_malformed_product_slug_is_not_found() {
        let response = get("/api/products/Not%20A%20Slug").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("Not A Slug"));
    }

    #[tokio::test]
    async fn test_invalid_page_size_is_bad_request() {
        let response = get("/api/search?pageSize=lots").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
