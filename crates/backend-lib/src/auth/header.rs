//! `Authorization` header parsing.
use crate::error::AppError;

const BEARER: &str = "Bearer";

/// Extract the token from a `Bearer <token>` header value.
///
/// The value must split on single spaces into exactly two parts, the first
/// being the case-sensitive `Bearer` and the second non-empty.
pub fn bearer_token(header: &str) -> Result<&str, AppError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AppError::MalformedHeader),
    }
}
