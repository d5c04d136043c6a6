//! Request and response bodies shared by the route modules.

use inkpost_auth::User;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A user as clients see it. There is no password field to leak.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.public_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserProfile,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { user: user.into() }
    }
}

/// Body of the sudo-gated bulk delete routes.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SudoRequest {
    #[serde(default)]
    pub sudo_secret: Option<String>,
}

/// `{}`
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct EmptyResponse {}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[sqlx(rename = "id")]
    #[serde(skip)]
    pub row_id: i64,
    #[serde(rename = "id")]
    pub public_id: String,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub category: Category,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[sqlx(rename = "id")]
    #[serde(skip)]
    pub row_id: i64,
    #[serde(rename = "id")]
    pub public_id: String,
    #[serde(skip)]
    pub user_id: i64,
    /// Public id of the owner.
    pub author_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

/// Absent fields stay as they are. An empty `categoryId` detaches the
/// article from its category.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ArticleFilter {
    pub category_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    pub article: Article,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticlesResponse {
    pub articles: Vec<Article>,
}
