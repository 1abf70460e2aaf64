//! Product API handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use boutique_core::ProductId;
use boutique_core::catalog::{NewProduct, Product, ProductUpdate};
use boutique_core::pagination::PageRequest;
use serde::Serialize;
use tracing::instrument;

use super::{IdQuery, Message, UpdateBody, not_found};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::routes::{PRODUCTS_PER_PAGE, PageQuery};
use crate::state::AppState;

/// One page of products.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total_pages: u32,
    pub total_products: i64,
}

/// List products, newest first.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = PageRequest::from_query(query.page.as_deref(), PRODUCTS_PER_PAGE);
    let result = ProductRepository::new(state.pool()).list(page).await?;

    Ok(Json(ProductListResponse {
        total_pages: result.total_pages,
        total_products: result.total,
        products: result.items,
    }))
}

/// Create a product.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(product) = payload?;
    product.validate()?;
    let slug = product.resolved_slug()?;

    let created = ProductRepository::new(state.pool())
        .create(&product, &slug)
        .await?;
    tracing::info!(id = %created.id, slug = %created.slug, "Product created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update the fields present in the body.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateBody<ProductId, ProductUpdate>>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(UpdateBody { id, fields }) = payload?;
    fields.validate()?;
    let slug_update = fields.slug_update()?;

    let updated = ProductRepository::new(state.pool())
        .update(id, &fields, &slug_update)
        .await
        .map_err(not_found("Product"))?;
    tracing::info!(%id, "Product updated");

    Ok(Json(updated))
}

/// Delete a product by `?id=N`.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Message>> {
    let id: ProductId = query.parse()?;

    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Product"))?;
    tracing::info!(%id, "Product deleted");

    Ok(Json(Message {
        message: "Product deleted",
    }))
}
