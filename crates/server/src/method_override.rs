//! HTML forms can only submit GET and POST. Edit and delete forms post to
//! `...?_method=PUT` / `...?_method=DELETE`; this rewrite runs before
//! routing and swaps in the requested method.

use axum::extract::{Query, Request};
use axum::http::Method;
use axum::Router;
use serde::Deserialize;
use tower::util::MapRequest;

/// The router with the rewrite applied in front of it.
pub type OverriddenRouter = MapRequest<Router, fn(Request) -> Request>;

#[derive(Deserialize)]
struct Override {
    #[serde(rename = "_method")]
    method: Option<String>,
}

pub fn wrap(router: Router) -> OverriddenRouter {
    MapRequest::new(router, rewrite as fn(Request) -> Request)
}

/// Rewrite `POST ?_method=PUT|DELETE` into that method. Anything else
/// passes through untouched.
pub fn rewrite(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }

    let requested = Query::<Override>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(o)| o.method);

    let method = match requested.as_deref().map(str::to_ascii_uppercase).as_deref() {
        Some("PUT") => Method::PUT,
        Some("DELETE") => Method::DELETE,
        _ => return req,
    };

    tracing::debug!(%method, uri = %req.uri(), "method override");
    *req.method_mut() = method;
    req
}
