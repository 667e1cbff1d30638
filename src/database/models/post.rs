use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{User, ValidationError};
use crate::sanitize::clean_text;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[sqlx(skip)]
    pub author: Option<User>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by `POST /posts` and `PUT /posts/:id`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_id: i64,
    #[serde(default)]
    pub id: Option<IgnoredAny>,
    #[serde(default)]
    pub author: Option<IgnoredAny>,
    #[serde(default)]
    pub created_at: Option<IgnoredAny>,
    #[serde(default)]
    pub updated_at: Option<IgnoredAny>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostPayload {
    pub fn prepare(&self) -> PostDraft {
        let now = Utc::now();
        PostDraft {
            id: None,
            title: clean_text(&self.title),
            content: clean_text(&self.content),
            author_id: self.author_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.content.is_empty() {
            return Err(ValidationError::MissingContent);
        }
        if self.author_id < 1 {
            return Err(ValidationError::MissingAuthor);
        }
        Ok(())
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str, content: &str, author_id: i64) -> PostPayload {
        PostPayload {
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            ..Default::default()
        }
    }

    #[test]
    fn prepare_cleans_title_and_content() {
        let draft = payload(" Hello ", " <p>body</p> ", 1).prepare();
        assert_eq!(draft.title, "Hello");
        assert_eq!(draft.content, "&lt;p&gt;body&lt;/p&gt;");
        assert_eq!(draft.id, None);
    }

    #[test]
    fn validate_reports_first_missing_field() {
        assert_eq!(payload("", "", 0).prepare().validate(), Err(ValidationError::MissingTitle));
        assert_eq!(payload("t", "  ", 0).prepare().validate(), Err(ValidationError::MissingContent));
        assert_eq!(payload("t", "c", 0).prepare().validate(), Err(ValidationError::MissingAuthor));
        assert_eq!(payload("t", "c", 5).prepare().validate(), Ok(()));
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let body = r#"{"title": "t", "content": "c", "author_id": 1, "user_id": 2}"#;
        assert!(serde_json::from_str::<PostPayload>(body).is_err());
    }
}
