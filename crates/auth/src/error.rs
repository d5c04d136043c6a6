use thiserror::Error;

use crate::messages;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", messages::DUPLICATE_EMAIL)]
    DuplicateEmail,
    #[error("{}", messages::WRONG_CREDENTIALS)]
    WrongCredentials,
    #[error("{}", messages::NOT_LOGGED_IN)]
    NotLoggedIn,
    #[error("{}", messages::NO_USER_FOR_THIS_TOKEN)]
    UserGone,
    #[error("{}", messages::SUDO_ACCESS_ONLY)]
    SudoOnly,
    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
