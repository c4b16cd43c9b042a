use axum::{
    Router,
    routing::{any, get, post},
};

use crate::error::ApiError;
use crate::messages;
use crate::state::AppState;
use crate::users;

/// All API routes plus `/health`. Middleware (CORS, tracing, static files)
/// is layered on by the server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(messages::get_messages).post(messages::send_message),
        )
        .route(
            "/api/users/online",
            get(users::get_online).post(users::go_online),
        )
        .route("/api/users/offline", post(users::go_offline))
        .route("/api/users/avatar", post(users::set_avatar))
        .route("/api/{*path}", any(unknown_endpoint))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn unknown_endpoint() -> ApiError {
    ApiError::NotFound("Not found")
}
