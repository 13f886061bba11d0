use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::{ErrorResponse, MessageResponse, SendMoneyRequest};
use tracing::{error, info};

use crate::db::DocumentStore;
use crate::rest::AppState;

/// Axum handler function for POST /sendmoney
///
/// Records the transfer and nothing else: sender and receiver balances
/// are untouched, so there is no multi-document update to coordinate.
pub async fn send_money(
    State(state): State<AppState>,
    Json(request): Json<SendMoneyRequest>,
) -> impl IntoResponse {
    info!("POST /sendmoney");

    let Some(transfer) = request.into_send_money() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("All fields are required")),
        )
            .into_response();
    };

    match state.send_moneys().create(&transfer).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            error!("Error creating sendmoney: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for GET /sendmoney
pub async fn get_all_send_money_transactions(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /sendmoney");

    match state.send_moneys().find_all().await {
        Ok(transactions) if transactions.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("No sendmoneys found")),
        )
            .into_response(),
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            error!("Error fetching sendmoneys: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for GET /sendmoney/:id
pub async fn get_send_money_transaction_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /sendmoney/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid transaction ID")),
        )
            .into_response();
    }

    match state.send_moneys().find_by_id(&id).await {
        Ok(Some(transaction)) => (StatusCode::OK, Json(transaction)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Transaction not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error fetching sendmoney {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}

/// Axum handler function for DELETE /sendmoney/:id
pub async fn delete_send_money_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /sendmoney/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid transaction ID")),
        )
            .into_response();
    }

    match state.send_moneys().delete_by_id(&id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse::new("Transaction deleted successfully")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Transaction not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting sendmoney {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error("Server error", &e)),
            )
                .into_response()
        }
    }
}
