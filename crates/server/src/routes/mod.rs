pub mod index;
pub mod todo;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use shared_types::AppError;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::auth::middleware::session_middleware;
use crate::db::AppState;
use crate::{error_pages, health, telemetry};

/// Build the router with every page route and the middleware stack.
///
/// Layer order, outermost first: request id, tracing, session, error pages.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::login_page))
        .route("/dashboard", get(index::dashboard))
        .route("/auth/logout", get(index::logout))
        .route("/health", get(health::health_check))
        .route("/todos", get(todo::list).post(todo::create))
        .route("/todos/add", get(todo::add_page))
        .route("/todos/edit/{id}", get(todo::edit_page))
        .route("/todos/user/{user_id}", get(todo::user_todos))
        .route(
            "/todos/{id}",
            get(todo::show).put(todo::update).delete(todo::delete),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.views.clone(),
            error_pages::render_error_pages,
        ))
        .layer(middleware::from_fn_with_state(
            state.session.clone(),
            session_middleware,
        ))
        .layer(telemetry::http_trace_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::not_found("No route matches this path")
}
