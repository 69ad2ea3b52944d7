use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use shared_types::AppError;
use std::sync::Arc;

use crate::auth::Claims;
use crate::views::{Viewer, Views};

/// Turn `AppError` responses into rendered error pages.
///
/// `AppError::into_response` leaves the error in the response extensions.
/// This middleware picks it up and swaps the JSON body for the `error/404`
/// or `error/500` view, keeping the status code. Server-side failures are
/// logged here, once, with the request they belong to.
pub async fn render_error_pages(
    State(views): State<Arc<Views>>,
    req: Request,
    next: Next,
) -> Response {
    let viewer = req.extensions().get::<Claims>().map(Viewer::from);
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut response = next.run(req).await;
    let Some(error) = response.extensions_mut().remove::<AppError>() else {
        return response;
    };

    if error.is_server_error() {
        tracing::error!(
            %method,
            %path,
            kind = %error.kind,
            message = %error.message,
            "request failed"
        );
    } else {
        tracing::debug!(%method, %path, kind = %error.kind, "request rejected");
    }

    let status = response.status();
    let mut page = views.error_page(&error, viewer.as_ref()).into_response();
    *page.status_mut() = status;
    page
}
