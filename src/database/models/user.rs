use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Account that owns favorites and posts. Created and authenticated elsewhere;
/// this service only reads it to hydrate owned records.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
