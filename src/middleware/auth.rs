use axum::http::{header::AUTHORIZATION, HeaderMap, Uri};

use crate::auth::{AuthError, TokenVerifier};

/// Resolve the caller's user id from the request.
///
/// The token comes from `Authorization: Bearer <token>`, or from the `token`
/// query parameter when no header is present.
pub fn extract_caller_id(verifier: &TokenVerifier, headers: &HeaderMap, uri: &Uri) -> Result<i64, AuthError> {
    let token = extract_token(headers, uri)?;
    verifier.verify(&token)
}

fn extract_token(headers: &HeaderMap, uri: &Uri) -> Result<String, AuthError> {
    if let Some(auth_header) = headers.get(AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = auth_str.strip_prefix("Bearer ").ok_or(AuthError::MalformedHeader)?;
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }
        return Ok(token.trim().to_string());
    }

    uri.query()
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "token")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}
