use shared_types::{AppError, NewUser, User};
use sqlx::{Pool, Postgres};

use crate::error_convert::SqlxErrorExt;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    display_name: String,
    first_name: String,
    last_name: String,
    image: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            display_name: r.display_name,
            first_name: r.first_name,
            last_name: r.last_name,
            image: r.image,
            created_at: r.created_at,
        }
    }
}

/// Insert a new user.
pub async fn create(pool: &Pool<Postgres>, new: &NewUser) -> Result<User, AppError> {
    let row: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (display_name, first_name, last_name, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, display_name, first_name, last_name, image, created_at
        "#,
    )
    .bind(&new.display_name)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.image.as_deref())
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row.into())
}
