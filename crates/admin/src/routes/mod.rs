//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (database)
//! GET  /                             - Redirect to /admin/products
//!
//! # Pages
//! GET  /admin/products?page=N        - Products table (10 per page, newest first)
//! GET  /admin/subcategories          - Subcategory registry cards
//! GET  /admin/users                  - Users table
//!
//! # JSON API
//! GET|POST|PUT|DELETE /api/admin/products
//! GET|POST|PUT|DELETE /api/admin/subcategories
//! GET|POST|PUT|DELETE /api/admin/users
//! ```

pub mod api;
pub mod products;
pub mod subcategories;
pub mod users;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Products shown per admin page.
pub const PRODUCTS_PER_PAGE: u32 = 10;

/// `?page=N` on paged listings. Anything unparseable means page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Render a template into an HTML response.
fn render(template: &impl Template) -> Result<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("template render error: {e}")))
}

/// Liveness health check endpoint.
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

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/", get(|| async { Redirect::to("/admin/products") }))
        .route("/admin/products", get(products::index))
        .route("/admin/subcategories", get(subcategories::index))
        .route("/admin/users", get(users::index))
        .nest("/api/admin", api::router())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/boutique_test")
            .unwrap();
        routes().with_state(AppState::new(pool))
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_redirects_to_products() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/products"
        );
    }
}
