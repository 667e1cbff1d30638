use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use super::error::StoreError;
use super::models::{Favorite, FavoriteDraft, Post, PostDraft, User};
use super::store::{FavoriteStore, PostStore, Store, UserStore};

/// Process-local store with the same constraints as the Postgres schema:
/// unique titles, unique nicknames and emails, owners must exist.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    favorites: BTreeMap<i64, Favorite>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_favorite_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn owner(&self, id: i64) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    fn require_user(&self, id: i64, table: &str) -> Result<(), StoreError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKey(format!("{table} owner {id} does not exist")))
        }
    }

    fn owner_of(&self, table: &str, row_id: i64, owner_id: i64) -> Result<User, StoreError> {
        self.users
            .get(&owner_id)
            .cloned()
            .ok_or_else(|| StoreError::missing_owner(table, row_id, owner_id))
    }

    fn hydrate_favorite(&self, mut favorite: Favorite) -> Result<Favorite, StoreError> {
        if favorite.id != 0 {
            favorite.user = Some(self.owner_of("favorite", favorite.id, favorite.user_id)?);
        }
        Ok(favorite)
    }

    fn hydrate_post(&self, mut post: Post) -> Result<Post, StoreError> {
        if post.id != 0 {
            post.author = Some(self.owner_of("post", post.id, post.author_id)?);
        }
        Ok(post)
    }

    fn favorite_title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.favorites
            .values()
            .any(|f| f.title == title && Some(f.id) != except)
    }

    fn post_title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.posts
            .values()
            .any(|p| p.title == title && Some(p.id) != except)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Users are provisioned outside this service, so this
    /// exists for seeding.
    pub async fn insert_user(&self, nickname: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.nickname == nickname) {
            return Err(StoreError::Duplicate("users_nickname_key".to_string()));
        }
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate("users_email_key".to_string()));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            nickname: nickname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Drop a user without cascading, leaving any owned rows dangling
    pub async fn remove_user(&self, id: i64) -> Option<User> {
        self.tables.write().await.users.remove(&id)
    }

    /// Stored favorite row as-is, without hydration
    pub async fn raw_favorite(&self, id: i64) -> Option<Favorite> {
        self.tables.read().await.favorites.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<User, StoreError> {
        self.tables.read().await.owner(id)
    }

    async fn list_users(&self, limit: i64) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(tables.users.values().take(take).cloned().collect())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn create_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.favorite_title_taken(&draft.title, None) {
            return Err(StoreError::Duplicate("favorites_title_key".to_string()));
        }
        tables.require_user(draft.user_id, "favorites")?;

        tables.last_favorite_id += 1;
        let favorite = Favorite {
            id: tables.last_favorite_id,
            title: draft.title.clone(),
            user: None,
            user_id: draft.user_id,
            watched: draft.watched,
            want_watch: draft.want_watch,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        };
        tables.favorites.insert(favorite.id, favorite.clone());

        info!("Inserted favorite {} for user {}", favorite.id, favorite.user_id);
        tables.hydrate_favorite(favorite)
    }

    async fn list_favorites(&self, limit: i64) -> Result<Vec<Favorite>, StoreError> {
        let tables = self.tables.read().await;
        let take = usize::try_from(limit).unwrap_or(0);
        tables
            .favorites
            .values()
            .take(take)
            .cloned()
            .map(|f| tables.hydrate_favorite(f))
            .collect()
    }

    async fn find_favorite(&self, id: i64) -> Result<Favorite, StoreError> {
        let tables = self.tables.read().await;
        let favorite = tables
            .favorites
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("favorite {id}")))?;
        tables.hydrate_favorite(favorite)
    }

    async fn update_favorite(&self, draft: &FavoriteDraft) -> Result<Favorite, StoreError> {
        let id = draft
            .id
            .ok_or_else(|| StoreError::Query("favorite update requires an id".to_string()))?;

        let mut tables = self.tables.write().await;
        if tables.favorite_title_taken(&draft.title, Some(id)) {
            return Err(StoreError::Duplicate("favorites_title_key".to_string()));
        }
        let row = tables
            .favorites
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("favorite {id}")))?;
        row.title = draft.title.clone();
        row.updated_at = Utc::now();
        let favorite = row.clone();

        tables.hydrate_favorite(favorite)
    }

    async fn delete_favorite(&self, id: i64, owner_id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.favorites.get(&id) {
            Some(f) if f.user_id == owner_id => {
                tables.favorites.remove(&id);
                Ok(1)
            }
            _ => Err(StoreError::NotFound(format!("favorite {id}"))),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.post_title_taken(&draft.title, None) {
            return Err(StoreError::Duplicate("posts_title_key".to_string()));
        }
        tables.require_user(draft.author_id, "posts")?;

        tables.last_post_id += 1;
        let post = Post {
            id: tables.last_post_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            author: None,
            author_id: draft.author_id,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        };
        tables.posts.insert(post.id, post.clone());

        info!("Inserted post {} for author {}", post.id, post.author_id);
        tables.hydrate_post(post)
    }

    async fn list_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables.read().await;
        let take = usize::try_from(limit).unwrap_or(0);
        tables
            .posts
            .values()
            .take(take)
            .cloned()
            .map(|p| tables.hydrate_post(p))
            .collect()
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        let tables = self.tables.read().await;
        let post = tables
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("post {id}")))?;
        tables.hydrate_post(post)
    }

    async fn update_post(&self, draft: &PostDraft) -> Result<Post, StoreError> {
        let id = draft
            .id
            .ok_or_else(|| StoreError::Query("post update requires an id".to_string()))?;

        let mut tables = self.tables.write().await;
        if tables.post_title_taken(&draft.title, Some(id)) {
            return Err(StoreError::Duplicate("posts_title_key".to_string()));
        }
        let row = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("post {id}")))?;
        row.title = draft.title.clone();
        row.content = draft.content.clone();
        row.updated_at = Utc::now();
        let post = row.clone();

        tables.hydrate_post(post)
    }

    async fn delete_post(&self, id: i64, author_id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.posts.get(&id) {
            Some(p) if p.author_id == author_id => {
                tables.posts.remove(&id);
                Ok(1)
            }
            _ => Err(StoreError::NotFound(format!("post {id}"))),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
