use chrono::{DateTime, Utc};
use shared_types::{AppError, NewTodo, Owner, Todo, TodoInput, TodoStatus, TodoWithOwner};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const TODO_COLUMNS: &str = "id, user_id, title, body, status, created_at";

const TODO_WITH_OWNER_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.title, t.body, t.status, t.created_at,
           u.id AS owner_id, u.display_name AS owner_display_name, u.image AS owner_image
    FROM todos t
    LEFT JOIN users u ON u.id = t.user_id
"#;

#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: i64,
    title: String,
    body: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = AppError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TodoStatus>()
            .map_err(|e| AppError::database(format!("Corrupt status on todo {}: {}", row.id, e.message)))?;
        Ok(Todo {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            body: row.body,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TodoOwnerRow {
    #[sqlx(flatten)]
    todo: TodoRow,
    owner_id: Option<i64>,
    owner_display_name: Option<String>,
    owner_image: Option<String>,
}

impl TryFrom<TodoOwnerRow> for TodoWithOwner {
    type Error = AppError;

    fn try_from(row: TodoOwnerRow) -> Result<Self, Self::Error> {
        let owner = match (row.owner_id, row.owner_display_name) {
            (Some(id), Some(display_name)) => Some(Owner {
                id,
                display_name,
                image: row.owner_image,
            }),
            _ => None,
        };
        Ok(TodoWithOwner {
            todo: Todo::try_from(row.todo)?,
            owner,
        })
    }
}

fn collect<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// Insert a new to-do item.
pub async fn create(pool: &Pool<Postgres>, new: &NewTodo) -> Result<Todo, AppError> {
    let row: TodoRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO todos (user_id, title, body, status)
        VALUES ($1, $2, $3, $4)
        RETURNING {TODO_COLUMNS}
        "#
    ))
    .bind(new.user_id)
    .bind(&new.input.title)
    .bind(&new.input.body)
    .bind(new.input.status.as_str())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Todo::try_from(row)
}

/// All public to-dos joined with their owners, newest first.
pub async fn list_public(pool: &Pool<Postgres>) -> Result<Vec<TodoWithOwner>, AppError> {
    let rows: Vec<TodoOwnerRow> = sqlx::query_as(&format!(
        "{TODO_WITH_OWNER_SELECT} WHERE t.status = 'public' ORDER BY t.created_at DESC, t.seq DESC"
    ))
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    collect(rows)
}

/// Find a to-do by ID.
pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Todo>, AppError> {
    let row: Option<TodoRow> =
        sqlx::query_as(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

    row.map(Todo::try_from).transpose()
}

/// Find a to-do by ID together with its owner.
pub async fn find_with_owner(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<TodoWithOwner>, AppError> {
    let row: Option<TodoOwnerRow> =
        sqlx::query_as(&format!("{TODO_WITH_OWNER_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(SqlxErrorExt::into_app_error)?;

    row.map(TodoWithOwner::try_from).transpose()
}

/// A user's to-dos with the given status, newest first.
pub async fn list_by_owner_and_status(
    pool: &Pool<Postgres>,
    user_id: i64,
    status: TodoStatus,
) -> Result<Vec<TodoWithOwner>, AppError> {
    let rows: Vec<TodoOwnerRow> = sqlx::query_as(&format!(
        "{TODO_WITH_OWNER_SELECT} WHERE t.user_id = $1 AND t.status = $2 ORDER BY t.created_at DESC, t.seq DESC"
    ))
    .bind(user_id)
    .bind(status.as_str())
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    collect(rows)
}

/// Every to-do a user owns, newest first.
pub async fn list_by_owner(pool: &Pool<Postgres>, user_id: i64) -> Result<Vec<Todo>, AppError> {
    let rows: Vec<TodoRow> = sqlx::query_as(&format!(
        "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY created_at DESC, seq DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    collect(rows)
}

/// Overwrite title, body and status. Returns the updated record or None.
pub async fn update(
    pool: &Pool<Postgres>,
    id: Uuid,
    input: &TodoInput,
) -> Result<Option<Todo>, AppError> {
    let row: Option<TodoRow> = sqlx::query_as(&format!(
        r#"
        UPDATE todos
        SET title = $2, body = $3, status = $4
        WHERE id = $1
        RETURNING {TODO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&input.title)
    .bind(&input.body)
    .bind(input.status.as_str())
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    row.map(Todo::try_from).transpose()
}

/// Delete a to-do. Returns true if a row was actually deleted.
pub async fn delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
