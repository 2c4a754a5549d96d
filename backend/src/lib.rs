//! # Utaite Birthdays Backend
//!
//! Admin service for a list of utaite birthdays: a JSON API for creating,
//! editing and deleting records, a filtered/sorted/paginated table view, and
//! a single shared-password login in front of both.
//!
//! ## Layers
//!
//! - **storage**: `BirthdayStorage` trait and its CSV implementation
//! - **domain**: validation, services and the table view deriver
//! - **io**: axum handlers, DTO mappers and the session gates
//! - **config**: environment-driven settings

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{header, Method},
    middleware, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{AuthService, BirthdayService, BirthdayTableService};
use crate::storage::{CsvBirthdayRepository, CsvConnection};

#[derive(Clone)]
pub struct AppState {
    pub birthday_service: BirthdayService,
    pub birthday_table_service: BirthdayTableService,
    pub auth_service: AuthService,
}

pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up CSV storage in {}", config.data_dir.display());
    let connection = CsvConnection::new(&config.data_dir)?;
    connection.ensure_birthdays_file_exists()?;
    let repository = Arc::new(CsvBirthdayRepository::new(connection));

    info!("Setting up domain model");
    let birthday_service = BirthdayService::new(repository);
    let birthday_table_service = BirthdayTableService::new();
    let auth_service = AuthService::new(config.credentials.clone(), config.session_ttl);

    Ok(AppState {
        birthday_service,
        birthday_table_service,
        auth_service,
    })
}

pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    // Credentialed CORS needs an explicit origin and header list
    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let mut router = Router::new().nest("/api", io::rest::api_router(app_state.clone()));

    if let Some(static_dir) = &config.static_dir {
        info!("Serving UI from {}", static_dir.display());
        let ui = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
        router = router
            .fallback_service(ui)
            .layer(middleware::from_fn_with_state(app_state.clone(), io::rest::session::page_gate));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
