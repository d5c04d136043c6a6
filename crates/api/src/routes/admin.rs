//! Sudo-gated bulk deletes. The secret travels in the body as `sudoSecret`;
//! a missing or unreadable body counts as no secret.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    routes::models::{EmptyResponse, SudoRequest},
    services::{article as article_service, category as category_service},
    ApiError, AppState,
};

#[utoipa::path(
    post,
    path = "/deleteAllUsers",
    tag = "Admin",
    request_body = SudoRequest,
    responses(
        (status = 202, description = "Every user removed", body = EmptyResponse),
        (status = 401, description = "Missing or wrong sudo secret", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_all_users(
    State(state): State<AppState>,
    payload: Option<Json<SudoRequest>>,
) -> Result<(StatusCode, Json<EmptyResponse>), ApiError> {
    state
        .authenticator()
        .delete_all_users(sudo_secret(&payload))
        .await?;

    Ok((StatusCode::ACCEPTED, Json(EmptyResponse::default())))
}

#[utoipa::path(
    post,
    path = "/deleteAllCategories",
    tag = "Admin",
    request_body = SudoRequest,
    responses(
        (status = 202, description = "Every category removed", body = EmptyResponse),
        (status = 401, description = "Missing or wrong sudo secret", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_all_categories(
    State(state): State<AppState>,
    payload: Option<Json<SudoRequest>>,
) -> Result<(StatusCode, Json<EmptyResponse>), ApiError> {
    category_service::delete_all_categories(
        state.db_pool(),
        state.sudo(),
        sudo_secret(&payload),
    )
    .await?;

    Ok((StatusCode::ACCEPTED, Json(EmptyResponse::default())))
}

#[utoipa::path(
    post,
    path = "/deleteAllArticles",
    tag = "Admin",
    request_body = SudoRequest,
    responses(
        (status = 202, description = "Every article removed", body = EmptyResponse),
        (status = 401, description = "Missing or wrong sudo secret", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_all_articles(
    State(state): State<AppState>,
    payload: Option<Json<SudoRequest>>,
) -> Result<(StatusCode, Json<EmptyResponse>), ApiError> {
    article_service::delete_all_articles(state.db_pool(), state.sudo(), sudo_secret(&payload))
        .await?;

    Ok((StatusCode::ACCEPTED, Json(EmptyResponse::default())))
}

fn sudo_secret(payload: &Option<Json<SudoRequest>>) -> Option<&str> {
    payload
        .as_ref()
        .and_then(|Json(req)| req.sudo_secret.as_deref())
}
