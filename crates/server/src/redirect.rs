use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `302 Found` to `location`. axum's `Redirect` only offers 303/307/308.
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
