//! Client-facing messages. Clients match on these strings, so they are part of
//! the HTTP contract.

pub const ARTICLE_ID_NOT_FOUND: &str = "Article id does not exist.";
pub const ARTICLE_TITLE_NOT_PROVIDED: &str = "Please provide an article title.";
pub const CATEGORY_NAME_NOT_PROVIDED: &str = "Please provide a category name";
pub const CATEGORY_NOT_FOUND: &str = "This user does not have this category.";
pub const CONFIRM_PASSWORD_EMPTY: &str = "Please confirm your password";
pub const DUPLICATE_CATEGORY: &str = "This user already has this category.";
pub const DUPLICATE_EMAIL: &str = "User already exists. Email is already used.";
pub const EMPTY_EMAIL: &str = "Email cannot be empty.";
pub const EMPTY_NAME: &str = "Name cannot be empty";
pub const EMPTY_PASSWORD: &str = "Password cannot be empty";
pub const INVALID_EMAIL: &str = "Email has invalid format";
pub const MALFORMED_BODY: &str = "Request body must be a JSON object.";
pub const NOT_LOGGED_IN: &str = "You are not logged in. Please log in to complete this action.";
pub const NO_USER_FOR_THIS_TOKEN: &str = "The user corresponding to this token no longer exists.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const SUDO_ACCESS_ONLY: &str = "You need sudo privilege to access this route.";
pub const UNAUTHORIZED: &str = "You are not authorized to complete this action.";
pub const UNEXPECTED_ERROR: &str = "Unexpected error";
pub const WRONG_CREDENTIALS: &str = "Email or password is wrong.";

pub fn password_too_short(min_length: impl std::fmt::Display) -> String {
    format!("Password must be at least {min_length} characters long")
}
