use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::WithRejection;
use inkpost_auth::RegistrationForm;
use serde::{de::IgnoredAny, Deserialize, Deserializer};
use utoipa::ToSchema;

use crate::{
    routes::models::{EmptyResponse, UserResponse},
    util::{cookie_header, require_user},
    ApiError, AppState,
};

/// Fields are read loosely so that validation order, not the JSON shape,
/// decides which message a bad payload gets.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub password: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub confirm_password: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub bio: Option<String>,
}

impl From<RegisterRequest> for RegistrationForm {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            password: req.password,
            confirm_password: req.confirm_password,
            email: req.email,
            phone: req.phone,
            bio: req.bio,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "loose_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub password: Option<String>,
}

/// Scalars become their text; `null`, arrays and objects count as absent.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
        Other(IgnoredAny),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(text) => Some(text),
        Loose::Integer(value) => Some(value.to_string()),
        Loose::Float(value) => Some(value.to_string()),
        Loose::Flag(value) => Some(value.to_string()),
        Loose::Other(_) => None,
    })
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created; session cookie set", body = UserResponse),
        (status = 400, description = "Invalid payload or email already used", body = crate::error::ErrorResponse),
        (status = 500, description = "Unexpected error", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, HeaderMap, Json<UserResponse>), ApiError> {
    let registered = state.authenticator().register(req.into()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie_header(
            state
                .authenticator()
                .sessions()
                .cookie(&registered.session.token),
        )?,
    );

    Ok((
        StatusCode::CREATED,
        headers,
        Json(UserResponse::from(registered.user)),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = UserResponse),
        (status = 400, description = "Email or password missing, or unreadable body", body = crate::error::ErrorResponse),
        (status = 401, description = "Wrong credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<(HeaderMap, Json<UserResponse>), ApiError> {
    let logged_in = state
        .authenticator()
        .login(
            req.email.as_deref().unwrap_or_default(),
            req.password.as_deref().unwrap_or_default(),
        )
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie_header(
            state
                .authenticator()
                .sessions()
                .cookie(&logged_in.session.token),
        )?,
    );

    Ok((headers, Json(UserResponse::from(logged_in.user))))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = EmptyResponse))
)]
pub async fn logout(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<EmptyResponse>), ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie_header(state.authenticator().sessions().clear_cookie())?,
    );

    Ok((headers, Json(EmptyResponse::default())))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    security(("cookieAuth" = []), ("bearerAuth" = [])),
    responses(
        (status = 200, description = "The current user", body = UserResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let user = require_user(&state, &headers).await?;
    Ok(Json(UserResponse::from(user)))
}
