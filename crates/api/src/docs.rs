use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health_check,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::admin::delete_all_users,
        crate::routes::admin::delete_all_categories,
        crate::routes::admin::delete_all_articles,
        crate::routes::categories::list_categories,
        crate::routes::categories::create_category,
        crate::routes::categories::update_category,
        crate::routes::categories::delete_category,
        crate::routes::articles::list_articles,
        crate::routes::articles::create_article,
        crate::routes::articles::get_article,
        crate::routes::articles::update_article,
        crate::routes::articles::delete_article
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::routes::health::HealthResponse,
            crate::routes::auth::RegisterRequest,
            crate::routes::auth::LoginRequest,
            crate::routes::models::UserProfile,
            crate::routes::models::UserResponse,
            crate::routes::models::SudoRequest,
            crate::routes::models::EmptyResponse,
            crate::routes::models::Category,
            crate::routes::models::CategoryRequest,
            crate::routes::models::CategoryResponse,
            crate::routes::models::CategoriesResponse,
            crate::routes::models::Article,
            crate::routes::models::CreateArticleRequest,
            crate::routes::models::UpdateArticleRequest,
            crate::routes::models::ArticleResponse,
            crate::routes::models::ArticlesResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Auth", description = "Registration, login and session management"),
        (name = "Admin", description = "Sudo-gated maintenance"),
        (name = "Categories", description = "Per-user article categories"),
        (name = "Articles", description = "Blog articles")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        let schemes = &mut components.security_schemes;

        let mut bearer = SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer));
        if let SecurityScheme::Http(http) = &mut bearer {
            http.bearer_format = Some("JWT".to_string());
        }
        schemes.insert("bearerAuth".to_string(), bearer);

        schemes.insert(
            "cookieAuth".to_string(),
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(
                inkpost_auth::SESSION_COOKIE_NAME,
            ))),
        );
    }
}
