use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Parse a path id. Anything that is not a non-negative integer is a 400.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .and_then(|id| i64::try_from(id).ok())
        .ok_or_else(|| ApiError::bad_request(format!("invalid id: {raw}")))
}

/// Strictly decode a JSON body. Malformed, mistyped or unknown fields are a 422.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

/// `Location` for a freshly created resource under the collection path
pub fn location(collection_path: &str, id: i64) -> String {
    format!("{}/{}", collection_path.trim_end_matches('/'), id)
}
