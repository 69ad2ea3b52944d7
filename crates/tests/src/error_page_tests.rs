use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::common::{self, FailingStore};

fn failing_app() -> (server::method_override::OverriddenRouter, String) {
    let app = common::app_over(Arc::new(FailingStore));
    let token = common::session_keys().issue(1, "Ada").unwrap();
    (app, format!("todo_session={token}"))
}

#[tokio::test]
async fn test_unknown_route_renders_404_page() {
    let t = common::test_app();
    let (_, session) = t.sign_up("Ada").await;
    let page = common::get(&t.app, "/no/such/page", Some(&session)).await;
    page.assert_not_found_page();
    assert!(page.body.contains("Signed in as Ada"));
}

#[tokio::test]
async fn test_store_failure_renders_500_page() {
    let (app, session) = failing_app();
    for uri in ["/todos", "/dashboard", "/todos/user/1"] {
        let page = common::get(&app, uri, Some(&session)).await;
        assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(page.body.contains("Something went wrong"));
        assert!(!page.body.contains("connection refused"));
    }
}

#[tokio::test]
async fn test_store_failure_on_show_is_500() {
    let (app, session) = failing_app();
    let page = common::get(
        &app,
        "/todos/00000000-0000-0000-0000-000000000000",
        Some(&session),
    )
    .await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_store_failure_on_create_is_500() {
    let (app, session) = failing_app();
    let page = common::post_form(&app, "/todos", "title=a&body=b", Some(&session)).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("500"));
}

const MISSING_ID: &str = "00000000-0000-0000-0000-000000000000";

#[tokio::test]
async fn test_store_failure_on_edit_page_is_500() {
    let (app, session) = failing_app();
    let page = common::get(&app, &format!("/todos/edit/{MISSING_ID}"), Some(&session)).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Something went wrong"));
    assert!(!page.body.contains("connection refused"));
}

#[tokio::test]
async fn test_store_failure_on_update_is_500() {
    let (app, session) = failing_app();
    let page = common::post_form(
        &app,
        &format!("/todos/{MISSING_ID}?_method=PUT"),
        "title=a&body=b",
        Some(&session),
    )
    .await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Something went wrong"));
}

#[tokio::test]
async fn test_store_failure_on_delete_is_500() {
    let (app, session) = failing_app();
    let uri = format!("/todos/{MISSING_ID}");
    let page = common::send_form(&app, "DELETE", &uri, "", &session).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.body.contains("Something went wrong"));

    let page = common::post_form(&app, &format!("{uri}?_method=DELETE"), "", Some(&session)).await;
    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_reports_store() {
    let t = common::test_app();
    let page = common::get(&t.app, "/health", None).await;
    assert_eq!(page.status, StatusCode::OK);

    let json: Value = serde_json::from_str(&page.body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store"], "connected");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_surfaces_store_error() {
    let (app, _) = failing_app();
    let page = common::get(&app, "/health", None).await;
    assert_eq!(page.status, StatusCode::OK);

    let json: Value = serde_json::from_str(&page.body).unwrap();
    assert!(json["store"].as_str().unwrap().starts_with("error"));
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let t = common::test_app();
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(req).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_incoming_request_id_is_kept() {
    let t = common::test_app();
    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
