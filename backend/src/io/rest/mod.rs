//! # REST API Interface Layer
//!
//! HTTP endpoints for the birthday admin service.
//!
//! ## Routes (all under `/api`)
//!
//! - `POST /auth`, `POST /logout`, `GET /session`: open
//! - `GET|POST /birthdays`, `GET /birthdays/table`, `GET|PUT|DELETE /birthdays/:id`:
//!   require a live `auth` cookie
//!
//! Handlers log the request line, call one service, and map the result to a
//! status code. Domain errors never leak storage details to the caller.

pub mod auth_apis;
pub mod birthday_apis;
pub mod birthday_table_apis;
pub mod mappers;
pub mod session;

use axum::{middleware, Router};

use crate::AppState;

/// All `/api` routes, with the session gate applied to the record endpoints
pub fn api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/birthdays", birthday_apis::router().merge(birthday_table_apis::router()))
        .route_layer(middleware::from_fn_with_state(state, session::require_session));

    Router::new().merge(auth_apis::router()).merge(protected)
}
