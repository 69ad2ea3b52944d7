use axum::http::StatusCode;
use shared_types::TodoStatus;

use crate::common;

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in page"))
}

#[tokio::test]
async fn test_list_shows_only_public_todos() {
    let t = common::test_app();
    let (ada, session) = t.sign_up("Ada").await;
    t.seed(ada, "Visible item", TodoStatus::Public).await;
    t.seed(ada, "Hidden item", TodoStatus::Private).await;

    let page = common::get(&t.app, "/todos", Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Visible item"));
    assert!(!page.body.contains("Hidden item"));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let t = common::test_app();
    let (ada, session) = t.sign_up("Ada").await;
    t.seed(ada, "First entry", TodoStatus::Public).await;
    t.seed(ada, "Second entry", TodoStatus::Public).await;
    t.seed(ada, "Third entry", TodoStatus::Public).await;

    let body = common::get(&t.app, "/todos", Some(&session)).await.body;
    let third = position(&body, "Third entry");
    let second = position(&body, "Second entry");
    let first = position(&body, "First entry");
    assert!(third < second && second < first);
}

#[tokio::test]
async fn test_list_includes_owner_name() {
    let t = common::test_app();
    let (ada, _) = t.sign_up("Ada").await;
    let (_, bob_session) = t.sign_up("Bob").await;
    t.seed(ada, "Shared item", TodoStatus::Public).await;

    let page = common::get(&t.app, "/todos", Some(&bob_session)).await;
    assert!(page.body.contains(&format!("/todos/user/{ada}")));
    assert!(page.body.contains("Ada"));
}

#[tokio::test]
async fn test_user_listing_shows_that_users_public_todos() {
    let t = common::test_app();
    let (ada, _) = t.sign_up("Ada").await;
    let (bob, session) = t.sign_up("Bob").await;
    t.seed(ada, "Ada public", TodoStatus::Public).await;
    t.seed(ada, "Ada private", TodoStatus::Private).await;
    t.seed(bob, "Bob public", TodoStatus::Public).await;

    let page = common::get(&t.app, &format!("/todos/user/{ada}"), Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Todos by Ada"));
    assert!(page.body.contains("Ada public"));
    assert!(!page.body.contains("Ada private"));
    assert!(!page.body.contains("Bob public"));
}

#[tokio::test]
async fn test_user_listing_hides_own_private_todos_too() {
    let t = common::test_app();
    let (ada, session) = t.sign_up("Ada").await;
    t.seed(ada, "Ada private", TodoStatus::Private).await;

    let page = common::get(&t.app, &format!("/todos/user/{ada}"), Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("Ada private"));
}

#[tokio::test]
async fn test_user_listing_unknown_user_is_empty() {
    let t = common::test_app();
    let (_, session) = t.sign_up("Ada").await;
    let page = common::get(&t.app, "/todos/user/999", Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No todos to show"));
}

#[tokio::test]
async fn test_user_listing_bad_id_is_404() {
    let t = common::test_app();
    let (_, session) = t.sign_up("Ada").await;
    common::get(&t.app, "/todos/user/not-a-number", Some(&session))
        .await
        .assert_not_found_page();
}

#[tokio::test]
async fn test_dashboard_lists_own_todos_with_private() {
    let t = common::test_app();
    let (ada, session) = t.sign_up("Ada").await;
    let (bob, _) = t.sign_up("Bob").await;
    t.seed(ada, "Ada private", TodoStatus::Private).await;
    t.seed(ada, "Ada public", TodoStatus::Public).await;
    t.seed(bob, "Bob public", TodoStatus::Public).await;

    let page = common::get(&t.app, "/dashboard", Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome, Ada"));
    assert!(page.body.contains("Ada private"));
    assert!(page.body.contains("Ada public"));
    assert!(!page.body.contains("Bob public"));
    assert!(position(&page.body, "Ada public") < position(&page.body, "Ada private"));
}
