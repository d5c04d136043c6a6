use inkpost_auth::{messages, AuthError};
use thiserror::Error;

use crate::ApiError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{}", messages::CATEGORY_NAME_NOT_PROVIDED)]
    CategoryNameMissing,
    #[error("{}", messages::DUPLICATE_CATEGORY)]
    DuplicateCategory,
    #[error("{}", messages::CATEGORY_NOT_FOUND)]
    CategoryNotFound,
    #[error("{}", messages::ARTICLE_TITLE_NOT_PROVIDED)]
    ArticleTitleMissing,
    #[error("{}", messages::ARTICLE_ID_NOT_FOUND)]
    ArticleNotFound,
    #[error("{}", messages::UNAUTHORIZED)]
    Forbidden,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::CategoryNameMissing
            | ServiceError::DuplicateCategory
            | ServiceError::ArticleTitleMissing => ApiError::bad_request(err.to_string()),
            ServiceError::CategoryNotFound | ServiceError::ArticleNotFound => {
                ApiError::not_found(err.to_string())
            }
            ServiceError::Forbidden => ApiError::forbidden(err.to_string()),
            ServiceError::Auth(auth_err) => ApiError::from(auth_err),
            ServiceError::Database(db_err) => ApiError::unexpected(&db_err),
        }
    }
}
