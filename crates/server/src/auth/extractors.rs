use axum::{extract::FromRequestParts, http::request::Parts, response::Response};

use super::jwt::Claims;
use crate::redirect::found;
use crate::views::Viewer;

/// Extractor that requires a signed-in caller. Anyone else is sent to the
/// landing page with a `302 /`.
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.sub
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::from(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| found("/"))
    }
}

/// Extractor for pages only anonymous visitors should see. A signed-in
/// caller is sent to `/dashboard` instead.
pub struct GuestOnly;

impl<S: Send + Sync> FromRequestParts<S> for GuestOnly {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Claims>() {
            Some(_) => Err(found("/dashboard")),
            None => Ok(GuestOnly),
        }
    }
}
