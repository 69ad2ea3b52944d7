use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use server::auth::SessionKeys;
use server::db::{AppState, Backend};
use server::method_override::OverriddenRouter;
use server::repo::memory::MemoryStore;
use server::repo::{TodoStore, UserStore};
use server::views::Views;
use shared_types::{
    AppError, NewTodo, NewUser, SessionSettings, Todo, TodoInput, TodoStatus, TodoWithOwner, User,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration-test-session-secret-0123456789";

/// A router over its own in-memory store. Every test gets a fresh one, so
/// no cross-test locking is needed.
pub struct TestApp {
    pub app: OverriddenRouter,
    pub store: Arc<MemoryStore>,
    pub keys: SessionKeys,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    TestApp {
        app: app_over(store.clone()),
        store,
        keys: session_keys(),
    }
}

/// Build the full router over an arbitrary store.
pub fn app_over<S>(store: Arc<S>) -> OverriddenRouter
where
    S: TodoStore + UserStore + 'static,
{
    let views = Views::new().expect("templates should compile");
    let state = AppState::new(Backend::from_store(store), views, session_keys());
    server::app(state)
}

pub fn session_keys() -> SessionKeys {
    SessionKeys::new(TEST_SECRET, SessionSettings::default())
}

/// Create a user and return their id plus a `Cookie` header value that
/// signs them in.
pub async fn sign_up(store: &dyn UserStore, keys: &SessionKeys, name: &str) -> (i64, String) {
    let user = store
        .create_user(NewUser {
            display_name: name.to_string(),
            first_name: name.to_string(),
            last_name: "Tester".to_string(),
            image: None,
        })
        .await
        .expect("Failed to create user");
    let token = keys
        .issue(user.id, &user.display_name)
        .expect("Failed to issue token");
    (user.id, format!("{}={}", keys.cookie_name(), token))
}

impl TestApp {
    pub async fn sign_up(&self, name: &str) -> (i64, String) {
        sign_up(self.store.as_ref(), &self.keys, name).await
    }

    /// Insert a to-do directly into the store.
    pub async fn seed(&self, user_id: i64, title: &str, status: TodoStatus) -> Todo {
        self.store
            .create(NewTodo {
                user_id,
                input: TodoInput {
                    title: title.to_string(),
                    body: format!("{title} body"),
                    status,
                },
            })
            .await
            .expect("Failed to seed todo")
    }

    pub async fn find(&self, id: Uuid) -> Option<Todo> {
        self.store.find_by_id(id).await.expect("store lookup failed")
    }
}

/// What a test needs from a response.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }

    pub fn assert_not_found_page(&self) {
        assert_eq!(self.status, StatusCode::NOT_FOUND);
        assert!(self.body.contains("could not find that page"), "body: {}", self.body);
    }
}

/// GET a route, optionally with a session cookie.
pub async fn get(app: &OverriddenRouter, uri: &str, session: Option<&str>) -> Page {
    let mut req = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = session {
        req = req.header(header::COOKIE, cookie);
    }
    send(app, req.body(Body::empty()).unwrap()).await
}

/// Submit an urlencoded form the way a browser does: always `POST`, with
/// any override in the query string.
pub async fn post_form(app: &OverriddenRouter, uri: &str, form: &str, session: Option<&str>) -> Page {
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = session {
        req = req.header(header::COOKIE, cookie);
    }
    send(app, req.body(Body::from(form.to_string())).unwrap()).await
}

/// Send a request with an explicit method and an urlencoded body.
pub async fn send_form(
    app: &OverriddenRouter,
    method: &str,
    uri: &str,
    form: &str,
    session: &str,
) -> Page {
    send_body(app, method, uri, "application/x-www-form-urlencoded", form, session).await
}

/// Send a signed-in request with an arbitrary body and content type.
pub async fn send_body(
    app: &OverriddenRouter,
    method: &str,
    uri: &str,
    content_type: &str,
    body: &str,
    session: &str,
) -> Page {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::COOKIE, session)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// Send a request through the router and collect the response.
pub async fn send(app: &OverriddenRouter, req: Request<Body>) -> Page {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    Page {
        status,
        location,
        body: String::from_utf8_lossy(&body_bytes).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Store doubles
// ---------------------------------------------------------------------------

/// Wraps a `MemoryStore` and counts calls that write to-dos.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TodoStore for CountingStore {
    async fn create(&self, new: NewTodo) -> Result<Todo, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create(new).await
    }

    async fn find_public(&self) -> Result<Vec<TodoWithOwner>, AppError> {
        self.inner.find_public().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn find_with_owner(&self, id: Uuid) -> Result<Option<TodoWithOwner>, AppError> {
        self.inner.find_with_owner(id).await
    }

    async fn find_by_owner_and_status(
        &self,
        user_id: i64,
        status: TodoStatus,
    ) -> Result<Vec<TodoWithOwner>, AppError> {
        self.inner.find_by_owner_and_status(user_id, status).await
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Todo>, AppError> {
        self.inner.find_by_owner(user_id).await
    }

    async fn update_by_id(&self, id: Uuid, input: TodoInput) -> Result<Option<Todo>, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_by_id(id, input).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.inner.ping().await
    }
}

#[async_trait]
impl UserStore for CountingStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        self.inner.create_user(new).await
    }
}

/// Every to-do operation fails as if the database were unreachable.
pub struct FailingStore;

fn unreachable_db() -> AppError {
    AppError::database("connection refused")
}

#[async_trait]
impl TodoStore for FailingStore {
    async fn create(&self, _new: NewTodo) -> Result<Todo, AppError> {
        Err(unreachable_db())
    }

    async fn find_public(&self) -> Result<Vec<TodoWithOwner>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Todo>, AppError> {
        Err(unreachable_db())
    }

    async fn find_with_owner(&self, _id: Uuid) -> Result<Option<TodoWithOwner>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_owner_and_status(
        &self,
        _user_id: i64,
        _status: TodoStatus,
    ) -> Result<Vec<TodoWithOwner>, AppError> {
        Err(unreachable_db())
    }

    async fn find_by_owner(&self, _user_id: i64) -> Result<Vec<Todo>, AppError> {
        Err(unreachable_db())
    }

    async fn update_by_id(&self, _id: Uuid, _input: TodoInput) -> Result<Option<Todo>, AppError> {
        Err(unreachable_db())
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, AppError> {
        Err(unreachable_db())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unreachable_db())
    }
}

#[async_trait]
impl UserStore for FailingStore {
    async fn create_user(&self, _new: NewUser) -> Result<User, AppError> {
        Err(unreachable_db())
    }
}
