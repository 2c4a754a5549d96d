//! # REST API for the Access Gate
//!
//! Login, logout and session check. These routes are open; everything else
//! under `/api` requires the cookie they hand out.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tracing::{info, warn};

use super::session::{expired_cookie, read_auth_cookie, session_cookie, with_cookie};
use crate::AppState;
use shared::{AuthResponse, LoginRequest, SessionResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", post(login))
        .route("/logout", post(logout))
        .route("/session", get(check_session))
}

async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Response {
    info!("POST /api/auth");

    match state.auth_service.login(&request.username, &request.password).await {
        Ok(token) => {
            let max_age = state.auth_service.session_ttl().num_seconds();
            let body = AuthResponse {
                success: true,
                message: "Logged in".to_string(),
            };
            with_cookie((StatusCode::OK, Json(body)).into_response(), session_cookie(&token, max_age))
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            let body = AuthResponse {
                success: false,
                message: e.to_string(),
            };
            (StatusCode::UNAUTHORIZED, Json(body)).into_response()
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    info!("POST /api/logout");

    let token = read_auth_cookie(&headers);
    state.auth_service.logout(token.as_deref()).await;

    let body = AuthResponse {
        success: true,
        message: "Logged out".to_string(),
    };
    with_cookie((StatusCode::OK, Json(body)).into_response(), Some(expired_cookie()))
}

async fn check_session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("GET /api/session");

    let authenticated = match read_auth_cookie(&headers) {
        Some(token) => state.auth_service.is_authenticated(&token).await,
        None => false,
    };
    (StatusCode::OK, Json(SessionResponse { authenticated }))
}
