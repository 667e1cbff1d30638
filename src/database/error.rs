use thiserror::Error;

/// Failures surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness violation. Carries the constraint name or driver detail.
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("missing referenced row: {0}")]
    ForeignKey(String),

    #[error("{0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let detail = db
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db.message().to_string());
            if db.is_unique_violation() {
                return StoreError::Duplicate(detail);
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKey(detail);
            }
        }
        StoreError::Sqlx(err)
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// A stored row points at a user that no longer exists. This is a broken
    /// reference, not a missing row, so it must never read as NotFound.
    pub fn missing_owner(table: &str, row_id: i64, owner_id: i64) -> Self {
        StoreError::ForeignKey(format!("{table} {row_id} references missing user {owner_id}"))
    }

    /// Message safe to hand back to a client.
    ///
    /// Duplicates are rewritten to name the taken field; everything else keeps
    /// the underlying message.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Duplicate(detail) => format_duplicate(detail).to_string(),
            other => other.to_string(),
        }
    }
}

/// Map a uniqueness violation detail onto a stable message
pub fn format_duplicate(detail: &str) -> &'static str {
    let detail = detail.to_ascii_lowercase();
    if detail.contains("nickname") {
        "Nickname Already Taken"
    } else if detail.contains("email") {
        "Email Already Taken"
    } else if detail.contains("title") {
        "Title Already Taken"
    } else {
        "Incorrect Details"
    }
}
