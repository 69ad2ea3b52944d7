use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use super::cookies;
use super::jwt::SessionKeys;

/// Permissive session middleware.
///
/// Validates the session token (cookie, or Bearer header fallback) and
/// inserts its `Claims` into request extensions. Never rejects; the
/// `CurrentUser` / `GuestOnly` extractors decide what each route requires.
pub async fn session_middleware(
    State(keys): State<Arc<SessionKeys>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::extract_session_token(req.headers(), keys.cookie_name()) {
        match keys.validate(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid session token");
            }
        }
    }

    next.run(req).await
}
