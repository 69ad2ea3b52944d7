use chrono::{DateTime, Utc};
use serde::Serialize;
use shared_types::{Owner, Todo, TodoForm, TodoStatus, TodoWithOwner};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Claims;

/// Longest body excerpt shown on list pages, in characters.
pub const EXCERPT_CHARS: usize = 150;

/// The signed-in caller, as the layout sees them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Viewer {
    pub id: i64,
    pub name: String,
}

impl From<&Claims> for Viewer {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name.clone(),
        }
    }
}

/// Display form of a to-do, used by the list, dashboard and detail pages.
#[derive(Debug, Clone, Serialize)]
pub struct TodoCard {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub excerpt: String,
    pub status: &'static str,
    pub is_private: bool,
    pub created_at: String,
    pub owner: Option<Owner>,
    /// The viewer owns this to-do and gets edit/delete controls.
    pub can_edit: bool,
}

impl TodoCard {
    pub fn new(todo: &Todo, owner: Option<Owner>, viewer_id: i64) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            body: todo.body.clone(),
            excerpt: excerpt(&todo.body, EXCERPT_CHARS),
            status: todo.status.as_str(),
            is_private: todo.status == TodoStatus::Private,
            created_at: format_date(&todo.created_at),
            owner,
            can_edit: todo.is_owned_by(viewer_id),
        }
    }

    pub fn with_owner(item: &TodoWithOwner, viewer_id: i64) -> Self {
        Self::new(&item.todo, item.owner.clone(), viewer_id)
    }
}

/// Add/edit form state: where it posts, what to prefill, and what went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub action: String,
    pub submit_label: &'static str,
    pub values: TodoForm,
    pub errors: HashMap<String, String>,
    pub is_private: bool,
}

impl FormView {
    pub fn add(values: TodoForm, errors: HashMap<String, String>) -> Self {
        Self::build("/todos".to_string(), "Save", values, errors)
    }

    /// The edit form posts back through the method override.
    pub fn edit(id: Uuid, values: TodoForm, errors: HashMap<String, String>) -> Self {
        Self::build(format!("/todos/{id}?_method=PUT"), "Update", values, errors)
    }

    fn build(
        action: String,
        submit_label: &'static str,
        values: TodoForm,
        errors: HashMap<String, String>,
    ) -> Self {
        let is_private = values
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("private"));
        Self {
            action,
            submit_label,
            values,
            errors,
            is_private,
        }
    }
}

/// e.g. "March 4, 2026"
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

/// First `max` characters of `text`, with an ellipsis if anything was cut.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
