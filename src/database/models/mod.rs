pub mod favorite;
pub mod post;
pub mod user;

pub use favorite::{Favorite, FavoriteDraft, FavoritePayload};
pub use post::{Post, PostDraft, PostPayload};
pub use user::User;

use thiserror::Error;

/// Required-field violations found after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required title")]
    MissingTitle,
    #[error("required content")]
    MissingContent,
    #[error("required user")]
    MissingOwner,
    #[error("required author")]
    MissingAuthor,
}

impl ValidationError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingTitle => "title",
            ValidationError::MissingContent => "content",
            ValidationError::MissingOwner => "user_id",
            ValidationError::MissingAuthor => "author_id",
        }
    }
}
