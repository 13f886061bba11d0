use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use shared::{CreateCashInRequest, ErrorResponse, MessageResponse, UpdateStatusRequest};
use tracing::{error, info};

use crate::db::DocumentStore;
use crate::rest::AppState;

const INVALID_ID: &str = "Cashin ID is not valid! Please enter a valid cashin id";

/// Axum handler function for GET /cashin
///
/// An empty collection is a successful empty list here, unlike the
/// other three resources.
pub async fn get_all_cash_ins(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /cashin");

    match state.cash_ins().find_all().await {
        Ok(cash_ins) => (StatusCode::OK, Json(cash_ins)).into_response(),
        Err(e) => {
            error!("Error fetching cashins: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while fetching cashins",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for GET /cashin/:id
pub async fn get_cash_in_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /cashin/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.cash_ins().find_by_id(&id).await {
        Ok(Some(cash_in)) => (StatusCode::OK, Json(cash_in)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashin request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error fetching cashin {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while fetching cashin",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for POST /cashin
pub async fn create_cash_in(
    State(state): State<AppState>,
    Json(request): Json<CreateCashInRequest>,
) -> impl IntoResponse {
    info!("POST /cashin");

    let Some(cash_in) = request.into_cash_in() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Please provide all required fields")),
        )
            .into_response();
    };

    match state.cash_ins().create(&cash_in).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            error!("Error creating cashin: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while creating cashin",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for PUT /cashin/:id
///
/// Only the status field is updatable. A payload without one is not an
/// error; the update degenerates to returning the stored record.
pub async fn update_cash_in_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /cashin/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    let mut changes = Map::new();
    if let Some(status) = request.status {
        changes.insert("status".to_string(), Value::String(status));
    }

    match state.cash_ins().update_by_id(&id, &changes).await {
        Ok(Some(cash_in)) => (StatusCode::OK, Json(cash_in)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashin request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error updating cashin {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while updating cashin",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for DELETE /cashin/:id
pub async fn delete_cash_in(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /cashin/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.cash_ins().delete_by_id(&id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse::new("Cashin request deleted successfully")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashin request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting cashin {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while deleting cashin",
                    &e,
                )),
            )
                .into_response()
        }
    }
}
