use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use axum_extra::extract::CookieJar;
use inkpost_auth::{messages, User, SESSION_COOKIE_NAME};

use crate::{ApiError, AppState};

/// Session token from the `jwt` cookie, else from a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    bearer_token(headers)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next()?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    parts.next().map(str::to_string)
}

/// Resolve the caller, or fail with 401.
pub async fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token =
        session_token(headers).ok_or_else(|| ApiError::unauthorized(messages::NOT_LOGGED_IN))?;
    state.authenticate(&token).await
}

pub fn cookie_header(cookie: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&cookie).map_err(|err| ApiError::unexpected(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; jwt=FROM_COOKIE"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer FROM_HEADER"));

        assert_eq!(session_token(&headers).as_deref(), Some("FROM_COOKIE"));
    }

    #[test]
    fn bearer_is_case_insensitive_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        assert_eq!(session_token(&headers).as_deref(), Some("TOKEN123"));
    }

    #[test]
    fn cleared_cookie_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("jwt="));
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(session_token(&headers), None);
    }
}
