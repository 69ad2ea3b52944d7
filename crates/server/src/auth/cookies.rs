use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;
use shared_types::AppError;

use super::jwt::SessionKeys;

/// Build a Set-Cookie header that clears the session cookie.
pub fn build_clear_cookie(keys: &SessionKeys) -> Result<HeaderValue, AppError> {
    let cookie = Cookie::build((keys.cookie_name().to_string(), ""))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .secure(keys.settings.secure_cookie)
        .build();

    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::internal(format!("Invalid session cookie header: {e}")))
}

/// Extract the session token from the cookie (preferred) or Bearer header (fallback).
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = extract_cookie(headers, cookie_name) {
        return Some(token);
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

/// Parse a specific cookie value from the Cookie header.
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = header_value.to_str() {
            for piece in cookie_str.split(';') {
                if let Ok(c) = Cookie::parse(piece.trim().to_string()) {
                    if c.name() == name && !c.value().is_empty() {
                        return Some(c.value().to_string());
                    }
                }
            }
        }
    }
    None
}
