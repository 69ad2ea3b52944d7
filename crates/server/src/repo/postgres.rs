use async_trait::async_trait;
use shared_types::{AppError, NewTodo, NewUser, Todo, TodoInput, TodoStatus, TodoWithOwner, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{todo, user, TodoStore, UserStore};
use crate::error_convert::SqlxErrorExt;

/// Postgres-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn create(&self, new: NewTodo) -> Result<Todo, AppError> {
        todo::create(&self.pool, &new).await
    }

    async fn find_public(&self) -> Result<Vec<TodoWithOwner>, AppError> {
        todo::list_public(&self.pool).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        todo::find_by_id(&self.pool, id).await
    }

    async fn find_with_owner(&self, id: Uuid) -> Result<Option<TodoWithOwner>, AppError> {
        todo::find_with_owner(&self.pool, id).await
    }

    async fn find_by_owner_and_status(
        &self,
        user_id: i64,
        status: TodoStatus,
    ) -> Result<Vec<TodoWithOwner>, AppError> {
        todo::list_by_owner_and_status(&self.pool, user_id, status).await
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Todo>, AppError> {
        todo::list_by_owner(&self.pool, user_id).await
    }

    async fn update_by_id(&self, id: Uuid, input: TodoInput) -> Result<Option<Todo>, AppError> {
        todo::update(&self.pool, id, &input).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        todo::delete(&self.pool, id).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(SqlxErrorExt::into_app_error)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        user::create(&self.pool, &new).await
    }
}
