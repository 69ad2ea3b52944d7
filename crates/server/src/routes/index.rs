use axum::extract::State;
use axum::http::header;
use axum::response::{Html, Response};
use serde_json::json;
use shared_types::AppError;
use std::sync::Arc;

use crate::auth::cookies::build_clear_cookie;
use crate::auth::{CurrentUser, GuestOnly, SessionKeys};
use crate::redirect::found;
use crate::repo::TodoStore;
use crate::views::{TodoCard, Views};

/// `GET /`: landing page for visitors without a session.
pub async fn login_page(
    _guest: GuestOnly,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    views.page("login", "Login", None, &json!({}))
}

/// `GET /dashboard`: the caller's own to-dos, private ones included.
pub async fn dashboard(
    user: CurrentUser,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    let own = todos.find_by_owner(user.id()).await?;
    let cards: Vec<TodoCard> = own
        .iter()
        .map(|t| TodoCard::new(t, None, user.id()))
        .collect();

    let viewer = user.viewer();
    views.page(
        "dashboard",
        "Dashboard",
        Some(&viewer),
        &json!({ "viewer": &viewer, "todos": cards }),
    )
}

/// `GET /auth/logout`: drop the session cookie.
pub async fn logout(State(keys): State<Arc<SessionKeys>>) -> Result<Response, AppError> {
    let mut response = found("/");
    response
        .headers_mut()
        .append(header::SET_COOKIE, build_clear_cookie(&keys)?);
    Ok(response)
}
