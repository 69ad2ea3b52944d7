use axum::http::StatusCode;
use shared_types::TodoStatus;

use crate::common;

#[tokio::test]
async fn test_owner_sees_private_todo() {
    let t = common::test_app();
    let (ada, session) = t.sign_up("Ada").await;
    let todo = t.seed(ada, "Diary", TodoStatus::Private).await;

    let page = common::get(&t.app, &format!("/todos/{}", todo.id), Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Diary body"));
    assert!(page.body.contains(&format!("/todos/edit/{}", todo.id)));
}

#[tokio::test]
async fn test_private_todo_is_404_for_others() {
    let t = common::test_app();
    let (ada, _) = t.sign_up("Ada").await;
    let (_, bob_session) = t.sign_up("Bob").await;
    let todo = t.seed(ada, "Diary", TodoStatus::Private).await;

    let page = common::get(&t.app, &format!("/todos/{}", todo.id), Some(&bob_session)).await;
    page.assert_not_found_page();
    assert!(!page.body.contains("Diary body"));
}

#[tokio::test]
async fn test_public_todo_visible_to_others_without_edit_link() {
    let t = common::test_app();
    let (ada, _) = t.sign_up("Ada").await;
    let (_, bob_session) = t.sign_up("Bob").await;
    let todo = t.seed(ada, "Groceries", TodoStatus::Public).await;

    let page = common::get(&t.app, &format!("/todos/{}", todo.id), Some(&bob_session)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Groceries body"));
    assert!(page.body.contains("More from Ada"));
    assert!(!page.body.contains(&format!("/todos/edit/{}", todo.id)));
}

#[tokio::test]
async fn test_missing_todo_is_404() {
    let t = common::test_app();
    let (_, session) = t.sign_up("Ada").await;
    common::get(
        &t.app,
        "/todos/00000000-0000-0000-0000-000000000000",
        Some(&session),
    )
    .await
    .assert_not_found_page();
}

#[tokio::test]
async fn test_malformed_id_is_404() {
    let t = common::test_app();
    let (_, session) = t.sign_up("Ada").await;
    common::get(&t.app, "/todos/not-a-uuid", Some(&session))
        .await
        .assert_not_found_page();
}
