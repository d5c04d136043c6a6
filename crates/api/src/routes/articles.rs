use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    routes::models::{
        ArticleFilter, ArticleResponse, ArticlesResponse, CreateArticleRequest,
        UpdateArticleRequest,
    },
    services::article as article_service,
    util::require_user,
    ApiError, AppState,
};

#[utoipa::path(
    get,
    path = "/articles",
    tag = "Articles",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(ArticleFilter),
    responses(
        (status = 200, description = "The caller's articles, newest first", body = ArticlesResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown category filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
    headers: HeaderMap,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let articles =
        article_service::list_articles(state.db_pool(), user.id, filter.category_id.as_deref())
            .await?;

    Ok(Json(ArticlesResponse { articles }))
}

#[utoipa::path(
    post,
    path = "/articles",
    tag = "Articles",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Missing title", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not owned by the caller", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<CreateArticleRequest>, ApiError>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let user = require_user(&state, &headers).await?;

    let article = article_service::create_article(state.db_pool(), user.id, req).await?;

    Ok((StatusCode::CREATED, Json(ArticleResponse { article })))
}

#[utoipa::path(
    get,
    path = "/articles/{article_id}",
    tag = "Articles",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(("article_id" = String, Path, description = "Article public identifier")),
    responses(
        (status = 200, description = "Article fetched", body = ArticleResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ArticleResponse>, ApiError> {
    require_user(&state, &headers).await?;

    let article = article_service::get_article(state.db_pool(), &article_id).await?;

    Ok(Json(ArticleResponse { article }))
}

#[utoipa::path(
    put,
    path = "/articles/{article_id}",
    tag = "Articles",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(("article_id" = String, Path, description = "Article public identifier")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Blank title", body = crate::error::ErrorResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Article or category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    headers: HeaderMap,
    WithRejection(Json(req), _): WithRejection<Json<UpdateArticleRequest>, ApiError>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;

    let article =
        article_service::update_article(state.db_pool(), user.id, &article_id, req).await?;

    Ok(Json(ArticleResponse { article }))
}

#[utoipa::path(
    delete,
    path = "/articles/{article_id}",
    tag = "Articles",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    params(("article_id" = String, Path, description = "Article public identifier")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the author", body = crate::error::ErrorResponse),
        (status = 404, description = "Article not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user = require_user(&state, &headers).await?;

    article_service::delete_article(state.db_pool(), user.id, &article_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
