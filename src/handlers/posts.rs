// handlers/posts.rs - /posts and /posts/:id
//
// Same lifecycle as favorites; the owner field is `author_id`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, Uri},
};
use tracing::{info, warn};

use crate::auth::assert_owner;
use crate::database::models::{Post, PostPayload};
use crate::error::ApiError;
use crate::middleware::{extract_caller_id, ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{location, parse_body, parse_id};

/// POST /posts
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Post> {
    let payload: PostPayload = parse_body(&body)?;
    let draft = payload.prepare();
    draft.validate()?;

    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;
    assert_owner(caller, draft.author_id)?;

    let created = state
        .store
        .create_post(&draft)
        .await
        .map_err(ApiError::store_failure)?;

    info!("User {} created post {}", caller, created.id);
    let location = location(uri.path(), created.id);
    Ok(ApiResponse::created(created, location))
}

/// GET /posts
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state
        .store
        .list_posts(state.list_limit())
        .await
        .map_err(ApiError::store_failure)?;
    Ok(ApiResponse::success(posts))
}

/// GET /posts/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id)?;
    let post = state.store.find_post(id).await?;
    Ok(ApiResponse::success(post))
}

/// PUT /posts/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> ApiResult<Post> {
    let id = parse_id(&id)?;
    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;

    let existing = load_existing(&state, id).await?;
    assert_owner(caller, existing.author_id)?;

    let payload: PostPayload = parse_body(&body)?;
    assert_owner(caller, payload.author_id)?;

    let draft = payload.prepare();
    draft.validate()?;
    let draft = draft.with_id(existing.id);

    let updated = state
        .store
        .update_post(&draft)
        .await
        .map_err(ApiError::store_failure)?;

    info!("User {} updated post {}", caller, updated.id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /posts/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let caller = extract_caller_id(&state.tokens, &headers, &uri)?;

    let existing = load_existing(&state, id).await?;
    assert_owner(caller, existing.author_id)?;

    state.store.delete_post(id, caller).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("Post not found")
        } else {
            warn!("Failed to delete post {}: {}", id, e);
            ApiError::bad_request(e.user_message())
        }
    })?;

    info!("User {} deleted post {}", caller, id);
    Ok(ApiResponse::no_content().with_header(HeaderName::from_static("entity"), id.to_string()))
}

async fn load_existing(state: &AppState, id: i64) -> Result<Post, ApiError> {
    state.store.find_post(id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("Post not found")
        } else {
            ApiError::store_failure(e)
        }
    })
}
