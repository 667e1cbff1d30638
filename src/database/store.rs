//! Persistence seams used by the handlers.
//!
//! Backends:
//! - `PgStore` (sqlx / Postgres)
//! - `MemoryStore` (process-local tables, used by tests and when no database is configured)
//!
//! Every operation returning a favorite or post attaches its owning user before
//! returning. A failed owner lookup fails the whole call.

use async_trait::async_trait;

use super::error::StoreError;
use super::models::{Favorite, FavoriteDraft, Post, PostDraft, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id. `NotFound` when absent.
    async fn find_user(&self, id: i64) -> Result<User, StoreError>;

    async fn list_users(&self, limit: i64) -> Result<Vec<User>, StoreError>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Insert a new row. A taken title is reported as `Duplicate`.
    async fn create_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError>;

    /// Up to `limit` rows in store order
    async fn list_favorites(&self, limit: i64) -> Result<Vec<Favorite>, StoreError>;

    async fn find_favorite(&self, id: i64) -> Result<Favorite, StoreError>;

    /// Write `title` and a fresh `updated_at` to the row named by `draft.id`.
    /// Owner, flags and `created_at` are never touched.
    async fn update_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError>;

    /// Delete the row matching both `id` and `owner_id`.
    /// Zero matching rows is `NotFound`.
    async fn delete_favorite(&self, id: i64, owner_id: i64) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, StoreError>;

    async fn list_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError>;

    async fn find_post(&self, id: i64) -> Result<Post, StoreError>;

    /// Write `title`, `content` and a fresh `updated_at`
    async fn update_post(&self, draft: &PostDraft) -> Result<Post, StoreError>;

    async fn delete_post(&self, id: i64, author_id: i64) -> Result<u64, StoreError>;
}

/// Everything the HTTP layer needs from a backend
#[async_trait]
pub trait Store: UserStore + FavoriteStore + PostStore {
    /// Cheap connectivity check for `/health`
    async fn ping(&self) -> Result<(), StoreError>;
}
