//! JSON API for catalog administration (mounted under `/api/admin`).
//!
//! Updates send `{ id, ...fields }`; deletes take `?id=N`. Every error is a
//! `{ "message": ... }` body.

pub mod products;
pub mod subcategories;
pub mod users;

use std::str::FromStr;

use axum::{
    Router,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(products::list)
                .post(products::create)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/subcategories",
            get(subcategories::list)
                .post(subcategories::create)
                .put(subcategories::update)
                .delete(subcategories::delete),
        )
        .route(
            "/users",
            get(users::list)
                .post(users::create)
                .put(users::update)
                .delete(users::delete),
        )
}

/// Update body: the record ID alongside the fields to change.
#[derive(Debug, Deserialize)]
pub struct UpdateBody<I, T> {
    pub id: I,
    #[serde(flatten)]
    pub fields: T,
}

/// `?id=N` on delete requests.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// Parse the ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when the ID is missing or not a number.
    pub fn parse<I: FromStr>(&self) -> Result<I> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("ID required".to_string()))?;
        raw.parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid ID: {raw}")))
    }
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Turn a repository miss into a named 404.
fn not_found(entity: &'static str) -> impl FnOnce(RepositoryError) -> AppError {
    move |e| match e {
        RepositoryError::NotFound => AppError::NotFound(format!("{entity} not found")),
        other => AppError::Database(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use boutique_core::ProductId;
    use boutique_core::catalog::ProductUpdate;
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    fn query(id: Option<&str>) -> IdQuery {
        IdQuery {
            id: id.map(ToString::to_string),
        }
    }

    /// Router over a pool that never connects; only requests rejected
    /// before any query are exercised.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/boutique_test")
            .unwrap();
        Router::new()
            .nest("/api/admin", router())
            .with_state(AppState::new(pool))
    }

    async fn send(method: Method, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_id_query_parse() {
        assert_eq!(query(Some(" 42 ")).parse::<ProductId>().unwrap(), ProductId::new(42));
        assert!(matches!(
            query(None).parse::<ProductId>(),
            Err(AppError::BadRequest(m)) if m == "ID required"
        ));
        assert!(matches!(
            query(Some("")).parse::<ProductId>(),
            Err(AppError::BadRequest(m)) if m == "ID required"
        ));
        assert!(matches!(
            query(Some("abc")).parse::<ProductId>(),
            Err(AppError::BadRequest(m)) if m == "Invalid ID: abc"
        ));
    }

    #[test]
    fn test_update_body_flattens_fields() {
        let body: UpdateBody<ProductId, ProductUpdate> =
            serde_json::from_str(r#"{"id": 5, "name": "Wool Coat", "countInStock": 3}"#).unwrap();
        assert_eq!(body.id, ProductId::new(5));
        assert_eq!(body.fields.name.as_deref(), Some("Wool Coat"));
        assert_eq!(body.fields.count_in_stock.unwrap().get(), 3);
        assert!(body.fields.price.is_none());
    }

    #[test]
    fn test_not_found_names_the_entity() {
        let err = not_found("Product")(RepositoryError::NotFound);
        assert!(matches!(err, AppError::NotFound(m) if m == "Product not found"));

        let err = not_found("Product")(RepositoryError::Conflict("taken".to_string()));
        assert!(matches!(err, AppError::Database(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_without_id_is_bad_request() {
        for path in ["/api/admin/products", "/api/admin/subcategories", "/api/admin/users"] {
            let (status, json) = send(Method::DELETE, path, "").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(json["message"], "ID required", "{path}");
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, json) = send(Method::POST, "/api/admin/products", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_product_is_bad_request() {
        let (status, json) = send(
            Method::POST,
            "/api/admin/products",
            r#"{"name": "  ", "category": "Coats", "price": 120}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "name is required");
    }

    #[tokio::test]
    async fn test_unstorable_price_is_bad_request() {
        let (status, json) = send(
            Method::POST,
            "/api/admin/products",
            r#"{"name": "Wool Coat", "category": "Coats", "price": 19.999}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "invalid price: price cannot have more than 2 decimal places"
        );

        let (status, json) = send(
            Method::PUT,
            "/api/admin/products",
            r#"{"id": 1, "price": 10000000000}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().starts_with("invalid price"));
    }

    #[tokio::test]
    async fn test_update_without_id_is_bad_request() {
        let (status, _) = send(Method::PUT, "/api/admin/users", r#"{"name": "Ada"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_email_is_bad_request() {
        let (status, json) = send(
            Method::POST,
            "/api/admin/users",
            r#"{"name": "Ada", "email": "ada-at-example"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().starts_with("invalid email"));
    }
}
