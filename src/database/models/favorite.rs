use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{User, ValidationError};
use crate::sanitize::clean_text;

/// A user's bookmark of a titled item.
///
/// `watched` and `want_watch` are stored but never exposed over the API.
/// `user` is filled by a secondary lookup and is not a column.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub title: String,
    #[sqlx(skip)]
    pub user: Option<User>,
    pub user_id: i64,
    #[serde(skip)]
    pub watched: bool,
    #[serde(skip)]
    pub want_watch: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by `POST /favorites` and `PUT /favorites/:id`.
///
/// Only `title` and `user_id` carry meaning. The remaining fields are the ones a
/// client may echo back from a read; they are accepted and thrown away. Anything
/// else is rejected at decode time.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FavoritePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub id: Option<IgnoredAny>,
    #[serde(default)]
    pub user: Option<IgnoredAny>,
    #[serde(default)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default)]
    pub updated_at: Option<IgnoredAny>,
}

/// Server-normalized favorite, ready for validation and persistence
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteDraft {
    pub id: Option<i64>,
    pub title: String,
    pub user_id: i64,
    pub watched: bool,
    pub want_watch: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FavoritePayload {
    /// Drop client identity and flags, clean the title, stamp both timestamps.
    pub fn prepare(&self) -> FavoriteDraft {
        let now = Utc::now();
        FavoriteDraft {
            id: None,
            title: clean_text(&self.title),
            user_id: self.user_id,
            watched: false,
            want_watch: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl FavoriteDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.user_id < 1 {
            return Err(ValidationError::MissingOwner);
        }
        Ok(())
    }

    /// Target an existing row
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, user_id: i64) -> FavoritePayload {
        FavoritePayload {
            title: title.to_string(),
            user_id,
            ..Default::default()
        }
    }

    #[test]
    fn prepare_resets_server_controlled_fields() {
        let draft = payload("  Blade Runner  ", 3).prepare();

        assert_eq!(draft.id, None);
        assert_eq!(draft.title, "Blade Runner");
        assert_eq!(draft.user_id, 3);
        assert!(!draft.watched);
        assert!(!draft.want_watch);
        assert_eq!(draft.created_at, draft.updated_at);
    }

    #[test]
    fn prepare_escapes_markup_in_title() {
        let draft = payload("<b>Heat</b>", 1).prepare();
        assert_eq!(draft.title, "&lt;b&gt;Heat&lt;/b&gt;");
    }

    #[test]
    fn prepare_twice_yields_same_title() {
        let first = payload("  Tom & Jerry <Classic> ", 1).prepare();
        let second = payload(&first.title, 1).prepare();
        assert_eq!(first.title, second.title);
    }

    #[test]
    fn validate_rejects_blank_title() {
        let draft = payload(" \t\n ", 1).prepare();
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn validate_rejects_missing_owner() {
        assert_eq!(payload("Ran", 0).prepare().validate(), Err(ValidationError::MissingOwner));
        assert_eq!(payload("Ran", -4).prepare().validate(), Err(ValidationError::MissingOwner));
    }

    #[test]
    fn validate_checks_title_before_owner() {
        assert_eq!(payload("", 0).prepare().validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn decode_ignores_echoed_read_fields() {
        let body = r#"{"id": 9, "title": "Up", "user_id": 2, "user": {"id": 2}, "created_at": "2024-01-01T00:00:00Z"}"#;
        let payload: FavoritePayload = serde_json::from_str(body).unwrap();
        let draft = payload.prepare();
        assert_eq!(draft.id, None);
        assert_eq!(draft.title, "Up");
        assert_eq!(draft.user_id, 2);
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let body = r#"{"title": "Up", "user_id": 2, "watched": true}"#;
        assert!(serde_json::from_str::<FavoritePayload>(body).is_err());
    }

    #[test]
    fn decode_rejects_wrongly_typed_owner() {
        let body = r#"{"title": "Up", "user_id": "2"}"#;
        assert!(serde_json::from_str::<FavoritePayload>(body).is_err());
    }

    #[test]
    fn serialized_favorite_hides_flags() {
        let now = Utc::now();
        let favorite = Favorite {
            id: 1,
            title: "Up".to_string(),
            user: None,
            user_id: 2,
            watched: true,
            want_watch: true,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&favorite).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["created_at", "id", "title", "updated_at", "user", "user_id"]);
    }
}
