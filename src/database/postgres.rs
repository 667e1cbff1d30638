use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};

use super::error::StoreError;
use super::models::{Favorite, FavoriteDraft, Post, PostDraft, User};
use super::store::{FavoriteStore, PostStore, Store, UserStore};

const USER_COLUMNS: &str = "id, nickname, email, password, created_at, updated_at";
const FAVORITE_COLUMNS: &str = "id, title, user_id, watched, want_watch, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

/// Postgres-backed store. Each call is a single statement plus the owner lookup;
/// no transaction spans the two.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate_favorite(&self, mut favorite: Favorite) -> Result<Favorite, StoreError> {
        if favorite.id != 0 {
            favorite.user = Some(self.owner_of("favorite", favorite.id, favorite.user_id).await?);
        }
        Ok(favorite)
    }

    async fn hydrate_post(&self, mut post: Post) -> Result<Post, StoreError> {
        if post.id != 0 {
            post.author = Some(self.owner_of("post", post.id, post.author_id).await?);
        }
        Ok(post)
    }

    async fn owner_of(&self, table: &str, row_id: i64, owner_id: i64) -> Result<User, StoreError> {
        match self.find_user(owner_id).await {
            Err(StoreError::NotFound(_)) => Err(StoreError::missing_owner(table, row_id, owner_id)),
            other => other,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: i64) -> Result<User, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn list_users(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users LIMIT $1");
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn create_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError> {
        let sql = format!(
            "INSERT INTO favorites (title, user_id, watched, want_watch, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {FAVORITE_COLUMNS}"
        );
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(&draft.title)
            .bind(draft.user_id)
            .bind(draft.watched)
            .bind(draft.want_watch)
            .bind(draft.created_at)
            .bind(draft.updated_at)
            .fetch_one(&self.pool)
            .await?;

        info!("Inserted favorite {} for user {}", favorite.id, favorite.user_id);
        self.hydrate_favorite(favorite).await
    }

    async fn list_favorites(&self, limit: i64) -> Result<Vec<Favorite>, StoreError> {
        let sql = format!("SELECT {FAVORITE_COLUMNS} FROM favorites LIMIT $1");
        let rows = sqlx::query_as::<_, Favorite>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut favorites = Vec::with_capacity(rows.len());
        for row in rows {
            favorites.push(self.hydrate_favorite(row).await?);
        }
        Ok(favorites)
    }

    async fn find_favorite(&self, id: i64) -> Result<Favorite, StoreError> {
        let sql = format!("SELECT {FAVORITE_COLUMNS} FROM favorites WHERE id = $1");
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("favorite {id}")))?;
        self.hydrate_favorite(favorite).await
    }

    async fn update_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError> {
        let id = draft
            .id
            .ok_or_else(|| StoreError::Query("favorite update requires an id".to_string()))?;

        let sql = format!(
            "UPDATE favorites SET title = $1, updated_at = $2 WHERE id = $3 RETURNING {FAVORITE_COLUMNS}"
        );
        let favorite = sqlx::query_as::<_, Favorite>(&sql)
            .bind(&draft.title)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("favorite {id}")))?;

        debug!("Updated favorite {}", id);
        self.hydrate_favorite(favorite).await
    }

    async fn delete_favorite(&self, id: i64, owner_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound(format!("favorite {id}"))),
            n => Ok(n),
        }
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, StoreError> {
        let sql = format!(
            "INSERT INTO posts (title, content, author_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(draft.author_id)
            .bind(draft.created_at)
            .bind(draft.updated_at)
            .fetch_one(&self.pool)
            .await?;

        info!("Inserted post {} for author {}", post.id, post.author_id);
        self.hydrate_post(post).await
    }

    async fn list_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts LIMIT $1");
        let rows = sqlx::query_as::<_, Post>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            posts.push(self.hydrate_post(row).await?);
        }
        Ok(posts)
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("post {id}")))?;
        self.hydrate_post(post).await
    }

    async fn update_post(&self, draft: &PostDraft) -> Result<Post, StoreError> {
        let id = draft
            .id
            .ok_or_else(|| StoreError::Query("post update requires an id".to_string()))?;

        let sql = format!(
            "UPDATE posts SET title = $1, content = $2, updated_at = $3 WHERE id = $4 RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.title)
            .bind(&draft.content)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("post {id}")))?;

        debug!("Updated post {}", id);
        self.hydrate_post(post).await
    }

    async fn delete_post(&self, id: i64, author_id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound(format!("post {id}"))),
            n => Ok(n),
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
