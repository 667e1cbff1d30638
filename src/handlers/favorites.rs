// handlers/favorites.rs - /favorites and /favorites/:id
//
// Every mutation runs: authenticate caller -> check ownership -> normalize ->
// validate -> store. The first failing step ends the request with no side effect.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, Uri},
};
use tracing::{info, warn};

use crate::auth::assert_owner;
use crate::database::models::{Favorite, FavoritePayload};
use crate::error::ApiError;
use crate::middleware::{extract_caller_id, ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{location, parse_body, parse_id};

/// POST /favorites - Create a favorite owned by the caller
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Favorite> {
    let payload: FavoritePayload = parse_body(&body)?;
    let draft = payload.prepare();
    draft.validate()?;

    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;
    assert_owner(caller, draft.user_id)?;

    let created = state
        .store
        .create_favorite(&draft)
        .await
        .map_err(ApiError::store_failure)?;

    info!("User {} created favorite {}", caller, created.id);
    let location = location(uri.path(), created.id);
    Ok(ApiResponse::created(created, location))
}

/// GET /favorites - List favorites with their owners
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Favorite>> {
    let favorites = state
        .store
        .list_favorites(state.list_limit())
        .await
        .map_err(ApiError::store_failure)?;
    Ok(ApiResponse::success(favorites))
}

/// GET /favorites/:id - Fetch one favorite
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Favorite> {
    let id = parse_id(&id)?;
    let favorite = state.store.find_favorite(id).await?;
    Ok(ApiResponse::success(favorite))
}

/// PUT /favorites/:id - Retitle a favorite the caller owns
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Favorite> {
    let id = parse_id(&id)?;
    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;

    let existing = load_existing(&state, id).await?;
    assert_owner(caller, existing.user_id)?;

    let payload: FavoritePayload = parse_body(&body)?;
    // The payload may not claim a different owner than the token
    assert_owner(caller, payload.user_id)?;

    let draft = payload.prepare();
    draft.validate()?;
    let draft = draft.with_id(existing.id);

    let updated = state
        .store
        .update_favorite(&draft)
        .await
        .map_err(ApiError::store_failure)?;

    info!("User {} updated favorite {}", caller, updated.id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /favorites/:id - Remove a favorite the caller owns
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;

    let existing = load_existing(&state, id).await?;
    assert_owner(caller, existing.user_id)?;

    state
        .store
        .delete_favorite(id, caller)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::not_found("Favorite not found")
            } else {
                warn!("Failed to delete favorite {}: {}", id, e);
                ApiError::bad_request(e.user_message())
            }
        })?;

    info!("User {} deleted favorite {}", caller, id);
    Ok(ApiResponse::no_content().with_header(HeaderName::from_static("entity"), id.to_string()))
}

async fn load_existing(state: &AppState, id: i64) -> Result<Favorite, ApiError> {
    state.store.find_favorite(id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("Favorite not found")
        } else {
            ApiError::store_failure(e)
        }
    })
}
