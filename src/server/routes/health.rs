use crate::server::router::AppState;
use axum::{Json, Router, routing::get};
use movies_schema::MessageBody;

pub const HELLO_TEXT: &str = "Hello from Rust";

/// `GET /` liveness probe.
async fn health_handler() -> Json<MessageBody> {
    Json(MessageBody::new("Healthy"))
}

/// `GET /api/hello` plain-text connectivity check.
async fn hello_handler() -> &'static str {
    HELLO_TEXT
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_handler))
        .route("/api/hello", get(hello_handler))
}
