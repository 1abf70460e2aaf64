//! User API handlers.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use boutique_core::UserId;
use boutique_core::catalog::{NewUser, User, UserUpdate};
use tracing::instrument;

use super::{IdQuery, Message, UpdateBody, not_found};
use crate::db::UserRepository;
use crate::error::Result;
use crate::state::AppState;

/// All users, newest first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users))
}

/// Register a user.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(user) = payload?;
    let email = user.validate()?;

    let created = UserRepository::new(state.pool()).create(&user, &email).await?;
    tracing::info!(id = %created.id, "User created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Update the fields present in the body.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UpdateBody<UserId, UserUpdate>>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(UpdateBody { id, fields }) = payload?;
    let email = fields.validate()?;

    let updated = UserRepository::new(state.pool())
        .update(id, &fields, email.as_ref())
        .await
        .map_err(not_found("User"))?;

    Ok(Json(updated))
}

/// Delete a user by `?id=N`.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Message>> {
    let id: UserId = query.parse()?;

    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found("User"))?;
    tracing::info!(%id, "User deleted");

    Ok(Json(Message {
        message: "User deleted",
    }))
}
