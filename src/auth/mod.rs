use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub authorized: bool,
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::TokenGeneration(format!("expiry of {expiry_hours} hours is out of range")))?
            .timestamp();

        Ok(Self {
            authorized: true,
            user_id,
            exp,
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("Token is not authorized")]
    NotAuthorized,

    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Caller {caller} does not own a resource owned by {owner}")]
    NotOwner { caller: i64, owner: i64 },
}

pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verifies HS256 tokens signed with the configured secret
pub struct TokenVerifier {
    secret: String,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            validation: Validation::default(),
        }
    }

    /// Decode and check a token, returning the caller's user id
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if !token_data.claims.authorized {
            return Err(AuthError::NotAuthorized);
        }
        Ok(token_data.claims.user_id)
    }
}

/// The single ownership rule: the caller must be the stored owner
pub fn assert_owner(caller_id: i64, owner_id: i64) -> Result<(), AuthError> {
    if caller_id == owner_id {
        Ok(())
    } else {
        Err(AuthError::NotOwner {
            caller: caller_id,
            owner: owner_id,
        })
    }
}
