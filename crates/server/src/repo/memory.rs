use async_trait::async_trait;
use chrono::Utc;
use shared_types::{
    AppError, NewTodo, NewUser, Owner, Todo, TodoInput, TodoStatus, TodoWithOwner, User,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TodoStore, UserStore};

/// Process-local store selected by a `memory://` database URL. Data is lost
/// on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    todos: HashMap<Uuid, Entry>,
    users: HashMap<i64, User>,
    next_user_id: i64,
    next_seq: u64,
}

/// `seq` breaks ties between to-dos created within the same clock tick.
struct Entry {
    seq: u64,
    todo: Todo,
}

impl Inner {
    fn owner_of(&self, todo: &Todo) -> Option<Owner> {
        self.users.get(&todo.user_id).map(Owner::from)
    }

    fn with_owner(&self, todo: &Todo) -> TodoWithOwner {
        TodoWithOwner {
            todo: todo.clone(),
            owner: self.owner_of(todo),
        }
    }

    /// Matching entries, newest first.
    fn newest_first(&self, keep: impl Fn(&Todo) -> bool) -> Vec<&Todo> {
        let mut entries: Vec<&Entry> = self.todos.values().filter(|e| keep(&e.todo)).collect();
        entries.sort_by(|a, b| {
            (b.todo.created_at, b.seq).cmp(&(a.todo.created_at, a.seq))
        });
        entries.into_iter().map(|e| &e.todo).collect()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored to-dos.
    pub async fn len(&self) -> usize {
        self.inner.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, new: NewTodo) -> Result<Todo, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&new.user_id) {
            return Err(AppError::bad_request("Referenced user does not exist"));
        }

        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.input.title,
            body: new.input.body,
            status: new.input.status,
            created_at: Utc::now(),
        };
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.todos.insert(
            todo.id,
            Entry {
                seq,
                todo: todo.clone(),
            },
        );
        Ok(todo)
    }

    async fn find_public(&self) -> Result<Vec<TodoWithOwner>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .newest_first(|t| t.status == TodoStatus::Public)
            .into_iter()
            .map(|t| inner.with_owner(t))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.todos.get(&id).map(|e| e.todo.clone()))
    }

    async fn find_with_owner(&self, id: Uuid) -> Result<Option<TodoWithOwner>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.todos.get(&id).map(|e| inner.with_owner(&e.todo)))
    }

    async fn find_by_owner_and_status(
        &self,
        user_id: i64,
        status: TodoStatus,
    ) -> Result<Vec<TodoWithOwner>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .newest_first(|t| t.user_id == user_id && t.status == status)
            .into_iter()
            .map(|t| inner.with_owner(t))
            .collect())
    }

    async fn find_by_owner(&self, user_id: i64) -> Result<Vec<Todo>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .newest_first(|t| t.user_id == user_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn update_by_id(&self, id: Uuid, input: TodoInput) -> Result<Option<Todo>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.todos.get_mut(&id).map(|entry| {
            entry.todo.title = input.title;
            entry.todo.body = input.body;
            entry.todo.status = input.status;
            entry.todo.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.todos.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            display_name: new.display_name,
            first_name: new.first_name,
            last_name: new.last_name,
            image: new.image,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }
}
