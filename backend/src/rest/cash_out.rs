use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use shared::{CreateCashOutRequest, ErrorResponse, MessageResponse, UpdateStatusRequest};
use tracing::{error, info};

use crate::db::DocumentStore;
use crate::rest::AppState;

const INVALID_ID: &str = "Cashout ID is not valid! Please enter a valid cashout id";

/// Axum handler function for GET /cashout
pub async fn get_all_cash_outs(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /cashout");

    match state.cash_outs().find_all().await {
        Ok(cash_outs) if cash_outs.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("No cashout requests found")),
        )
            .into_response(),
        Ok(cash_outs) => (StatusCode::OK, Json(cash_outs)).into_response(),
        Err(e) => {
            error!("Error fetching cashouts: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for GET /cashout/:id
pub async fn get_cash_out_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /cashout/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.cash_outs().find_by_id(&id).await {
        Ok(Some(cash_out)) => (StatusCode::OK, Json(cash_out)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashout request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error fetching cashout {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for POST /cashout
///
/// The whole payload is honored here: optional status and timestamps
/// override the creation defaults when supplied.
pub async fn create_cash_out(
    State(state): State<AppState>,
    Json(request): Json<CreateCashOutRequest>,
) -> impl IntoResponse {
    info!("POST /cashout");

    let Some(cash_out) = request.into_cash_out() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("All fields are required")),
        )
            .into_response();
    };

    match state.cash_outs().create(&cash_out).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            error!("Error creating cashout: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for PUT /cashout/:id
///
/// Unlike cash-in, a missing status field is rejected outright.
pub async fn update_cash_out_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /cashout/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    let Some(status) = request.status else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Status is required")),
        )
            .into_response();
    };

    let mut changes = Map::new();
    changes.insert("status".to_string(), Value::String(status));

    match state.cash_outs().update_by_id(&id, &changes).await {
        Ok(Some(cash_out)) => (StatusCode::OK, Json(cash_out)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashout request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error updating cashout {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for DELETE /cashout/:id
pub async fn delete_cash_out(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /cashout/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.cash_outs().delete_by_id(&id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse::new("Cashout request deleted successfully")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Cashout request not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting cashout {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}
