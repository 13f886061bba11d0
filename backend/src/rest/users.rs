use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use shared::{CreateUserRequest, ErrorResponse, MessageResponse};
use tracing::{error, info};

use crate::db::DocumentStore;
use crate::rest::AppState;

const INVALID_ID: &str = "User ID is not valid! Please enter a valid user id";

/// Axum handler function for GET /users
pub async fn get_all_users(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /users");

    match state.users().find_all().await {
        Ok(users) if users.is_empty() => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("No users found")),
        )
            .into_response(),
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => {
            error!("Error fetching users: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while fetching users",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for GET /users/:id
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("GET /users/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.users().find_by_id(&id).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Error fetching user {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while fetching user",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for POST /users
///
/// The payload arrives as a raw map so a fully empty object can be
/// told apart from a partially filled one; the two cases report
/// different statuses.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> impl IntoResponse {
    info!("POST /users");

    if payload.is_empty() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("User data is required")),
        )
            .into_response();
    }

    let user = serde_json::from_value::<CreateUserRequest>(Value::Object(payload))
        .ok()
        .and_then(CreateUserRequest::into_user);
    let Some(user) = user else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("All fields are required")),
        )
            .into_response();
    };

    match state.users().create(&user).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            error!("Error creating user: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while creating user",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<Map<String, Value>>,
) -> impl IntoResponse {
    info!("PUT /users/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    if changes.is_empty() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Update data is required")),
        )
            .into_response();
    }

    match state.users().update_by_id(&id, &changes).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found or update failed")),
        )
            .into_response(),
        Err(e) => {
            error!("Error updating user {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while updating the user",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

/// Axum handler function for DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /users/{}", id);

    if !DocumentStore::is_valid_id(&id) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response();
    }

    match state.users().delete_by_id(&id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(MessageResponse::new("User deleted successfully")),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found or already deleted")),
        )
            .into_response(),
        Err(e) => {
            error!("Error deleting user {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_error(
                    "Server error while deleting the user",
                    &e,
                )),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::app::testing::{send, test_app};

    const UNKNOWN_ID: &str = "0123456789abcdef0123456789abcdef";

    fn user_payload() -> serde_json::Value {
        json!({
            "name": "A",
            "pin": "1",
            "phone": "1",
            "email": "a@b.com",
            "role": "user",
        })
    }

    #[tokio::test]
    async fn test_get_all_users_empty_is_404() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/users", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No users found");
    }

    #[tokio::test]
    async fn test_create_user_applies_defaults() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::POST, "/users", Some(user_payload())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "A");
        assert_eq!(body["statusOfUser"], "pending");
        assert_eq!(body["balance"], 0.0);
        let id = body["id"].as_str().expect("created user carries an id");
        assert_eq!(id.len(), 32);

        let (status, listed) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_create_user_empty_payload_is_401() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::POST, "/users", Some(json!({}))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "User data is required");

        // Nothing was written
        let (status, _) = send(&app, Method::GET, "/users", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_user_missing_fields_is_400() {
        let app = test_app().await;

        let (status, body) =
            send(&app, Method::POST, "/users", Some(json!({"name": "A"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All fields are required");
    }

    #[tokio::test]
    async fn test_get_user_invalid_id_is_400() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::GET, "/users/invalid", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "User ID is not valid! Please enter a valid user id"
        );
    }

    #[tokio::test]
    async fn test_get_user_unknown_id_is_404() {
        let app = test_app().await;

        let uri = format!("/users/{UNKNOWN_ID}");
        let (status, body) = send(&app, Method::GET, &uri, None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_update_user_merges_fields() {
        let app = test_app().await;

        let (_, created) = send(&app, Method::POST, "/users", Some(user_payload())).await;
        let id = created["id"].as_str().expect("id");

        let uri = format!("/users/{id}");
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"name": "B"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "B");
        // Fields left out of the payload keep their stored values
        assert_eq!(body["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_update_user_empty_payload_is_401() {
        let app = test_app().await;

        let (_, created) = send(&app, Method::POST, "/users", Some(user_payload())).await;
        let id = created["id"].as_str().expect("id");

        let uri = format!("/users/{id}");
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Update data is required");

        // The record is untouched
        let (_, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["name"], "A");
    }

    #[tokio::test]
    async fn test_update_user_invalid_id_is_400() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/users/invalid",
            Some(json!({"name": "B"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "User ID is not valid! Please enter a valid user id"
        );
    }

    #[tokio::test]
    async fn test_update_user_unknown_id_is_404() {
        let app = test_app().await;

        let uri = format!("/users/{UNKNOWN_ID}");
        let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"name": "B"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found or update failed");
    }

    #[tokio::test]
    async fn test_delete_user_then_miss() {
        let app = test_app().await;

        let (_, created) = send(&app, Method::POST, "/users", Some(user_payload())).await;
        let id = created["id"].as_str().expect("id");
        let uri = format!("/users/{id}");

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User deleted successfully");

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Deleting again is a miss, not an idempotent success
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found or already deleted");
    }
}
