use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    routes::models::{CategoriesResponse, CategoryRequest, CategoryResponse},
    services::category as category_service,
    util::require_user,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "The caller's categories", body = CategoriesResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let categories = category_service::list_categories(state.db_pool(), user.id).await?;

    Ok(Json(CategoriesResponse { categories }))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Missing or duplicate name", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<CategoryRequest>, ApiError>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let user = require_user(&state, &headers).await?;

    let category = category_service::create_category(state.db_pool(), user.id, req.name).await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

#[utoipa::path(
    put,
    path = "/categories/{category_id}",
    tag = "Categories",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(("category_id" = String, Path, description = "Category public identifier")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Missing or duplicate name", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "No such category for this user", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<CategoryRequest>, ApiError>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let category =
        category_service::rename_category(state.db_pool(), user.id, &category_id, req.name).await?;

    Ok(Json(CategoryResponse { category }))
}

#[utoipa::path(
    delete,
    path = "/categories/{category_id}",
    tag = "Categories",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(("category_id" = String, Path, description = "Category public identifier")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "No such category for this user", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state, &headers).await?;

    category_service::delete_category(state.db_pool(), user.id, &category_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
