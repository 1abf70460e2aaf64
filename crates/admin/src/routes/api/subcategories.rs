//! Subcategory API handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use boutique_core::SubCategoryId;
use boutique_core::catalog::{NewSubCategory, SubCategory, SubCategoryUpdate};
use tracing::instrument;

use super::{IdQuery, Message, UpdateBody, not_found};
use crate::db::SubCategoryRepository;
use crate::error::Result;
use crate::state::AppState;

/// All subcategories, by name.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SubCategory>>> {
    let rows = SubCategoryRepository::new(state.pool()).list_all().await?;
    Ok(Json(rows))
}

/// Create a subcategory.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewSubCategory>, JsonRejection>,
) -> Result<(StatusCode, Json<SubCategory>)> {
    let Json(sub_category) = payload?;
    let slug = sub_category.validate()?;

    let created = SubCategoryRepository::new(state.pool())
        .create(&sub_category, &slug)
        .await?;
    tracing::info!(id = %created.id, slug = %created.slug, "Subcategory created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update the fields present in the body.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateBody<SubCategoryId, SubCategoryUpdate>>, JsonRejection>,
) -> Result<Json<SubCategory>> {
    let Json(UpdateBody { id, fields }) = payload?;
    let slug = fields.validate()?;

    let updated = SubCategoryRepository::new(state.pool())
        .update(id, &fields, slug.as_ref())
        .await
        .map_err(not_found("Subcategory"))?;

    Ok(Json(updated))
}

/// Delete a subcategory by `?id=N`.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Message>> {
    let id: SubCategoryId = query.parse()?;

    SubCategoryRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("Subcategory"))?;
    tracing::info!(%id, "Subcategory deleted");

    Ok(Json(Message {
        message: "Subcategory deleted",
    }))
}
