// handlers/users.rs - read-only user lookups
//
// Registration and login live outside this service.

use axum::extract::{Path, State};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::parse_id;

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state
        .store
        .list_users(state.list_limit())
        .await
        .map_err(ApiError::store_failure)?;
    Ok(ApiResponse::success(users))
}

/// GET /users/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_id(&id)?;
    let user = state.store.find_user(id).await?;
    Ok(ApiResponse::success(user))
}
