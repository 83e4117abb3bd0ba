use axum::http::HeaderMap;

use crate::errors::AppError;

/// Bearer-token check for the console API. An empty expected token turns the
/// check off.
pub fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    check_token(token, expected_token)
}

pub fn check_token(token: Option<&str>, expected_token: &str) -> Result<(), AppError> {
    if expected_token.is_empty() || token == Some(expected_token) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}
