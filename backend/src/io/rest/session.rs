//! Session cookie handling and the two request gates.
//!
//! - [`require_session`] guards the record API and answers 401 without a live token
//! - [`page_gate`] guards UI pages and redirects between `/auth` and `/`

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

use crate::domain::AccessToken;
use crate::AppState;

pub const AUTH_COOKIE: &str = "auth";
pub const LOGIN_PAGE: &str = "/auth";
pub const HOME_PAGE: &str = "/";

/// Paths the page gate never redirects
const UNGATED_PREFIXES: [&str; 3] = ["/api", "/assets/", "/favicon.ico"];

/// Value of the `auth` cookie, if the request carries one
pub fn read_auth_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &AccessToken, max_age_seconds: i64) -> Option<HeaderValue> {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE,
        token.value,
        max_age_seconds.max(0)
    );
    HeaderValue::from_str(&cookie).ok()
}

pub fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("auth=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

async fn has_live_session(state: &AppState, headers: &HeaderMap) -> bool {
    match read_auth_cookie(headers) {
        Some(token) => state.auth_service.is_authenticated(&token).await,
        None => false,
    }
}

/// Reject API calls that do not carry a live session
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if has_live_session(&state, request.headers()).await {
        return next.run(request).await;
    }

    debug!("Rejected unauthenticated {} {}", request.method(), request.uri().path());
    (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
}

/// Where a UI request for `path` should be sent instead, if anywhere
pub fn page_redirect(path: &str, authenticated: bool) -> Option<&'static str> {
    if UNGATED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return None;
    }

    let on_login_page = path == LOGIN_PAGE || path.starts_with("/auth/");
    match (on_login_page, authenticated) {
        (true, true) => Some(HOME_PAGE),
        (false, false) => Some(LOGIN_PAGE),
        _ => None,
    }
}

/// Redirect UI pages between the login surface and the app
pub async fn page_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authenticated = has_live_session(&state, request.headers()).await;

    match page_redirect(request.uri().path(), authenticated) {
        Some(target) => {
            debug!("Redirecting {} to {}", request.uri().path(), target);
            Redirect::to(target).into_response()
        }
        None => next.run(request).await,
    }
}

/// Attach a cookie header, logging instead of failing if it cannot be built
pub fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    match cookie {
        Some(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        None => error!("Could not build session cookie"),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn headers_with_cookie(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_read_auth_cookie() {
        assert_eq!(read_auth_cookie(&headers_with_cookie("auth=abc")), Some("abc".to_string()));
        assert_eq!(
            read_auth_cookie(&headers_with_cookie("theme=dark; auth=abc; lang=ja")),
            Some("abc".to_string())
        );
        assert_eq!(read_auth_cookie(&headers_with_cookie("author=abc")), None);
        assert_eq!(read_auth_cookie(&headers_with_cookie("auth=")), None);
        assert_eq!(read_auth_cookie(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let token = AccessToken {
            value: "token-123".to_string(),
            expires_at: Utc::now(),
        };
        let cookie = session_cookie(&token, 3600).unwrap();
        let cookie = cookie.to_str().unwrap();

        assert!(cookie.starts_with("auth=token-123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let cookie = expired_cookie();
        assert!(cookie.to_str().unwrap().starts_with("auth=;"));
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_page_redirect_rules() {
        assert_eq!(page_redirect("/", false), Some(LOGIN_PAGE));
        assert_eq!(page_redirect("/birthdays", false), Some(LOGIN_PAGE));
        assert_eq!(page_redirect("/", true), None);
        assert_eq!(page_redirect("/auth", false), None);
        assert_eq!(page_redirect("/auth", true), Some(HOME_PAGE));
        assert_eq!(page_redirect("/authors", false), Some(LOGIN_PAGE));
    }

    #[test]
    fn test_page_redirect_skips_api_and_assets() {
        assert_eq!(page_redirect("/api/birthdays", false), None);
        assert_eq!(page_redirect("/assets/app.js", false), None);
        assert_eq!(page_redirect("/favicon.ico", false), None);
    }
}
