// handlers/mod.rs - HTTP handlers per resource
//
// Public:    GET on every collection and item
// Protected: POST / PUT / DELETE on favorites and posts (bearer token + ownership)

pub mod favorites;
pub mod posts;
pub mod users;
pub mod utils;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Favorites API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/users[/:id] (public, read-only)",
            "favorites": "/favorites[/:id] (reads public, writes require bearer token)",
            "posts": "/posts[/:id] (reads public, writes require bearer token)",
            "health": "/health"
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
