use axum::extract::FromRef;
use shared_types::{AppError, DatabaseSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::SessionKeys;
use crate::error_convert::SqlxErrorExt;
use crate::repo::memory::MemoryStore;
use crate::repo::postgres::PgStore;
use crate::repo::{TodoStore, UserStore};
use crate::views::Views;

/// Database URL prefix that selects the process-local store.
pub const MEMORY_SCHEME: &str = "memory://";

/// Shared application state passed to Axum handlers via `State`.
/// Derives `FromRef` so handlers and middleware can extract just the part
/// they need, e.g. `State<Arc<dyn TodoStore>>`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub todos: Arc<dyn TodoStore>,
    pub users: Arc<dyn UserStore>,
    pub views: Arc<Views>,
    pub session: Arc<SessionKeys>,
}

impl AppState {
    pub fn new(backend: Backend, views: Views, session: SessionKeys) -> Self {
        Self {
            todos: backend.todos,
            users: backend.users,
            views: Arc::new(views),
            session: Arc::new(session),
        }
    }
}

/// Both store handles, backed by the same underlying store.
#[derive(Clone)]
pub struct Backend {
    pub todos: Arc<dyn TodoStore>,
    pub users: Arc<dyn UserStore>,
}

impl Backend {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: TodoStore + UserStore + 'static,
    {
        Self {
            todos: store.clone(),
            users: store,
        }
    }

    pub fn memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }
}

/// Open the store named by `url` and make sure it is reachable.
///
/// A `memory://` URL needs no connection. Anything else is treated as a
/// Postgres URL: the pool connects eagerly, migrations run if enabled, and
/// the host is logged once the first connection succeeds.
pub async fn connect(url: &str, settings: &DatabaseSettings) -> Result<Backend, AppError> {
    if url.starts_with(MEMORY_SCHEME) {
        tracing::info!(host = "memory", "using in-memory store");
        return Ok(Backend::memory());
    }

    let options = PgConnectOptions::from_str(url)
        .map_err(|e| AppError::database(format!("Invalid DATABASE_URL: {e}")))?;
    let host = options.get_host().to_string();

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_with(options)
        .await
        .map_err(|e| e.into_app_error())?;

    if settings.run_migrations {
        run_migrations(&pool).await?;
    }

    tracing::info!(host = %host, "connected to database");
    Ok(Backend::from_store(Arc::new(PgStore::new(pool))))
}

/// Run database migrations against the given pool.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to run database migrations: {e}")))
}
