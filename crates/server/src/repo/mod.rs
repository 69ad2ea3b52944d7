//! Persistence for to-dos and the users that own them.
//!
//! Handlers only see the [`TodoStore`] and [`UserStore`] traits. Two
//! backends implement both: [`postgres::PgStore`] for deployments and
//! [`memory::MemoryStore`] for local runs and the test suite.

pub mod memory;
pub mod postgres;
pub mod todo;
pub mod user;

use async_trait::async_trait;
use shared_types::{AppError, NewTodo, NewUser, Todo, TodoInput, TodoStatus, TodoWithOwner, User};
use uuid::Uuid;

/// Accessor for the to-do collection. Every method is a single store
/// round-trip; list methods return newest first.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert a to-do and return it with its generated id and timestamp.
    async fn create(&self, new: NewTodo) -> Result<Todo, AppError>;

    /// All public to-dos with their owners.
    async fn find_public(&self) -> Result<Vec<TodoWithOwner>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError>;

    /// Like [`TodoStore::find_by_id`] but joined with the owner.
    async fn find_with_owner(&self, id: Uuid) -> Result<Option<TodoWithOwner>, AppError>;

    async fn find_by_owner_and_status(
        &self,
        user_id: i64,
        status: TodoStatus,
    ) -> Result<Vec<TodoWithOwner>, AppError>;

    /// Every to-do the user owns, whatever its status.
    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Todo>, AppError>;

    /// Replace the editable fields. Returns `None` if the id does not exist.
    async fn update_by_id(&self, id: Uuid, input: TodoInput) -> Result<Option<Todo>, AppError>;

    /// Returns true if a to-do was actually removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError>;
}
