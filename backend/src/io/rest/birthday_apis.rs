//! # REST API for Birthday Management
//!
//! Endpoints for listing, fetching, creating, updating and deleting birthdays.
//! Mutations always answer with a [`MutationResponse`] body, including on
//! failure, so callers can show the message and field errors directly.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tracing::{error, info, warn};

use crate::domain::birthday_service::BirthdayError;
use crate::domain::commands::birthdays::{CreateBirthdayCommand, DeleteBirthdayCommand, UpdateBirthdayCommand};
use crate::io::rest::mappers::BirthdayMapper;
use crate::AppState;
use shared::{BirthdayPayload, MutationResponse};

pub const NOT_FOUND_MESSAGE: &str = "Birthday not found";
pub const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields.";
const STORAGE_FAILURE_MESSAGE: &str = "Something went wrong while saving. Please try again.";

/// Create a router for birthday related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_birthdays).post(create_birthday))
        .route("/:id", get(get_birthday).put(update_birthday).delete(delete_birthday))
}

/// Turn a failed mutation into its status code and response body
fn mutation_error(e: BirthdayError) -> Response {
    match e {
        BirthdayError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(MutationResponse::validation_failure(VALIDATION_MESSAGE, errors.into_map())),
        )
            .into_response(),
        BirthdayError::NotFound(_) => {
            (StatusCode::NOT_FOUND, Json(MutationResponse::failure(NOT_FOUND_MESSAGE))).into_response()
        }
        BirthdayError::Transport(e) => {
            error!("Birthday storage failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MutationResponse::failure(STORAGE_FAILURE_MESSAGE)),
            )
                .into_response()
        }
    }
}

/// A body that could not be read as a birthday payload
fn malformed_body(rejection: JsonRejection) -> Response {
    warn!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(MutationResponse::failure(format!("Invalid request body: {}", rejection.body_text()))),
    )
        .into_response()
}

/// Full snapshot of all birthdays
async fn list_birthdays(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/birthdays");

    match state.birthday_service.list_birthdays().await {
        Ok(birthdays) => (StatusCode::OK, Json(BirthdayMapper::to_list_response(birthdays))).into_response(),
        Err(e) => {
            error!("Failed to list birthdays: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing birthdays").into_response()
        }
    }
}

async fn get_birthday(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/birthdays/{}", id);

    match state.birthday_service.get_birthday(&id).await {
        Ok(birthday) => (StatusCode::OK, Json(BirthdayMapper::to_dto(birthday))).into_response(),
        Err(BirthdayError::NotFound(_)) => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
        Err(e) => {
            error!("Failed to get birthday: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving birthday").into_response()
        }
    }
}

async fn create_birthday(
    State(state): State<AppState>,
    payload: Result<Json<BirthdayPayload>, JsonRejection>,
) -> Response {
    info!("POST /api/birthdays");
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };
    info!("Create request: {:?}", payload);

    let command = CreateBirthdayCommand {
        input: BirthdayMapper::to_input(payload),
    };

    match state.birthday_service.create_birthday(command).await {
        Ok(result) => (StatusCode::CREATED, Json(BirthdayMapper::to_mutation_response(result))).into_response(),
        Err(e) => {
            warn!("Failed to create birthday: {}", e);
            mutation_error(e)
        }
    }
}

async fn update_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BirthdayPayload>, JsonRejection>,
) -> Response {
    info!("PUT /api/birthdays/{}", id);
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return malformed_body(rejection),
    };
    info!("Update request for {}: {:?}", id, payload);

    let command = UpdateBirthdayCommand {
        id,
        input: BirthdayMapper::to_input(payload),
    };

    match state.birthday_service.update_birthday(command).await {
        Ok(result) => (StatusCode::OK, Json(BirthdayMapper::to_mutation_response(result))).into_response(),
        Err(e) => {
            warn!("Failed to update birthday: {}", e);
            mutation_error(e)
        }
    }
}

async fn delete_birthday(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!("DELETE /api/birthdays/{}", id);

    match state.birthday_service.delete_birthday(DeleteBirthdayCommand { id }).await {
        Ok(result) => (StatusCode::OK, Json(MutationResponse::success(result.success_message, None))).into_response(),
        Err(e) => {
            warn!("Failed to delete birthday: {}", e);
            mutation_error(e)
        }
    }
}
