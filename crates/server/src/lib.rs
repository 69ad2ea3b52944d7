pub mod auth;
pub mod config;
pub mod db;
pub mod error_convert;
pub mod error_pages;
pub mod health;
pub mod method_override;
pub mod redirect;
pub mod repo;
pub mod routes;
pub mod telemetry;
pub mod views;

use crate::db::AppState;

/// The complete HTTP service: routes, middleware stack, and the method
/// override rewrite that runs before routing.
pub fn app(state: AppState) -> method_override::OverriddenRouter {
    method_override::wrap(routes::router(state))
}
