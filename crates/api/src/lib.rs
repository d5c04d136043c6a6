mod error;
mod state;
mod util;

pub mod docs;
pub mod routes;
pub mod services;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;
pub use util::session_token;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(routes::health::health_check))
        // Accounts and sessions
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        // Sudo-gated maintenance
        .route("/deleteAllUsers", post(routes::admin::delete_all_users))
        .route(
            "/deleteAllCategories",
            post(routes::admin::delete_all_categories),
        )
        .route(
            "/deleteAllArticles",
            post(routes::admin::delete_all_articles),
        )
        // Categories
        .route(
            "/categories",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .route(
            "/categories/:category_id",
            put(routes::categories::update_category).delete(routes::categories::delete_category),
        )
        // Articles
        .route(
            "/articles",
            get(routes::articles::list_articles).post(routes::articles::create_article),
        )
        .route(
            "/articles/:article_id",
            get(routes::articles::get_article)
                .put(routes::articles::update_article)
                .delete(routes::articles::delete_article),
        )
        .with_state(state);

    with_docs(router)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

#[cfg(debug_assertions)]
fn with_docs(router: Router) -> Router {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
}

#[cfg(not(debug_assertions))]
fn with_docs(router: Router) -> Router {
    router
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
