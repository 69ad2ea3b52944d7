use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::{AppError, Owner};

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Who may read a to-do. Mutation is always owner-only regardless of status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Public,
    Private,
}

impl TodoStatus {
    /// Lowercase form used in storage and in form submissions.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Public => "public",
            TodoStatus::Private => "private",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(TodoStatus::Public),
            "private" => Ok(TodoStatus::Private),
            other => Err(AppError::bad_request(format!(
                "Unknown status '{other}', expected public or private"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain Structs
// ---------------------------------------------------------------------------

/// A to-do item. `user_id` is the owner and never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Public to-dos are readable by anyone signed in; private ones only by
    /// their owner.
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.status == TodoStatus::Public || self.is_owned_by(user_id)
    }
}

/// A to-do joined with its owner's public profile fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoWithOwner {
    pub todo: Todo,
    /// `None` when the owning user row no longer exists.
    pub owner: Option<Owner>,
}

/// Validated, allow-listed fields a client may set on a to-do.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoInput {
    pub title: String,
    pub body: String,
    pub status: TodoStatus,
}

/// Everything needed to insert a to-do. The owner comes from the session,
/// never from the submitted form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub user_id: i64,
    pub input: TodoInput,
}

// ---------------------------------------------------------------------------
// Form DTO
// ---------------------------------------------------------------------------

/// Raw add/edit form submission. Unknown fields (an injected `user`, say)
/// are dropped during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct TodoForm {
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))
    )]
    pub title: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 10000, message = "Body must be between 1 and 10000 characters"))
    )]
    pub body: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<&Todo> for TodoForm {
    fn from(t: &Todo) -> Self {
        Self {
            title: t.title.clone(),
            body: t.body.clone(),
            status: Some(t.status.as_str().to_string()),
        }
    }
}

#[cfg(feature = "validation")]
impl TodoForm {
    /// Trim, validate, and convert into the allow-listed input. A missing
    /// status defaults to public.
    pub fn into_input(mut self) -> Result<TodoInput, AppError> {
        self.title = self.title.trim().to_string();
        self.body = self.body.trim().to_string();

        let mut field_errors = match self.validate() {
            Ok(()) => std::collections::HashMap::new(),
            Err(errors) => AppError::from(errors).field_errors,
        };

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => TodoStatus::default(),
            Some(raw) => match raw.parse::<TodoStatus>() {
                Ok(status) => status,
                Err(e) => {
                    field_errors.insert("status".to_string(), e.message);
                    TodoStatus::default()
                }
            },
        };

        if !field_errors.is_empty() {
            return Err(AppError::validation("Validation failed", field_errors));
        }

        Ok(TodoInput {
            title: self.title,
            body: self.body,
            status,
        })
    }
}
