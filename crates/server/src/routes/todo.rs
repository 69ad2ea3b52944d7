use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde_json::json;
use shared_types::{AppError, NewTodo, Todo, TodoForm, TodoInput, TodoStatus};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::redirect::found;
use crate::repo::TodoStore;
use crate::views::{FormView, TodoCard, Viewer, Views};

/// A malformed id cannot name an existing to-do.
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Todo not found"))
}

/// Load a to-do the caller is about to modify. `Ok(Err(redirect))` means it
/// exists but belongs to someone else.
async fn load_owned(
    todos: &dyn TodoStore,
    id: Uuid,
    user: &CurrentUser,
) -> Result<Result<Todo, Response>, AppError> {
    let todo = todos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Todo not found"))?;

    if !todo.is_owned_by(user.id()) {
        tracing::warn!(todo_id = %id, user_id = user.id(), "non-owner tried to modify todo");
        return Ok(Err(found("/todos")));
    }
    Ok(Ok(todo))
}

/// Shown when the body could not be decoded as a form at all.
const UNREADABLE_FORM: &str = "The form could not be read. Please try again.";

/// The submitted values to redisplay, plus the validated input. A body the
/// extractor rejected becomes an empty form with a form-level error.
fn read_form(
    submitted: Result<Form<TodoForm>, FormRejection>,
) -> (TodoForm, Result<TodoInput, AppError>) {
    match submitted {
        Ok(Form(form)) => {
            let input = form.clone().into_input();
            (form, input)
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "todo form body rejected");
            let errors = HashMap::from([("form".to_string(), UNREADABLE_FORM.to_string())]);
            (
                TodoForm::default(),
                Err(AppError::validation("Invalid form body", errors)),
            )
        }
    }
}

fn form_page(
    views: &Views,
    template: &str,
    title: &str,
    viewer: &Viewer,
    form: FormView,
    status: StatusCode,
) -> Result<Response, AppError> {
    let page = views.page(template, title, Some(viewer), &json!({ "form": form }))?;
    Ok((status, page).into_response())
}

/// `GET /todos/add`
pub async fn add_page(
    user: CurrentUser,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    let form = FormView::add(TodoForm::default(), HashMap::new());
    views.page("todos/add", "Add Todo", Some(&user.viewer()), &json!({ "form": form }))
}

/// `POST /todos`: the owner is always the caller, whatever the form says.
pub async fn create(
    user: CurrentUser,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
    submitted: Result<Form<TodoForm>, FormRejection>,
) -> Result<Response, AppError> {
    let (form, input) = read_form(submitted);
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            return form_page(
                &views,
                "todos/add",
                "Add Todo",
                &user.viewer(),
                FormView::add(form, e.field_errors),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    let todo = todos
        .create(NewTodo {
            user_id: user.id(),
            input,
        })
        .await?;

    tracing::info!(todo_id = %todo.id, user_id = user.id(), "todo created");
    Ok(found("/dashboard"))
}

/// `GET /todos`: every public to-do, newest first.
pub async fn list(
    user: CurrentUser,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    let items = todos.find_public().await?;
    let cards: Vec<TodoCard> = items
        .iter()
        .map(|item| TodoCard::with_owner(item, user.id()))
        .collect();

    views.page(
        "todos/index",
        "Todos",
        Some(&user.viewer()),
        &json!({ "heading": "Public Todos", "todos": cards }),
    )
}

/// `GET /todos/{id}`: private to-dos look missing to everyone but their owner.
pub async fn show(
    user: CurrentUser,
    Path(id): Path<String>,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    let id = parse_todo_id(&id)?;
    let item = todos
        .find_with_owner(id)
        .await?
        .ok_or_else(|| AppError::not_found("Todo not found"))?;

    if !item.todo.is_visible_to(user.id()) {
        return Err(AppError::not_found("Todo not found"));
    }

    let card = TodoCard::with_owner(&item, user.id());
    views.page(
        "todos/show",
        &item.todo.title,
        Some(&user.viewer()),
        &json!({ "todo": card }),
    )
}

/// `GET /todos/edit/{id}`
pub async fn edit_page(
    user: CurrentUser,
    Path(id): Path<String>,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
) -> Result<Response, AppError> {
    let id = parse_todo_id(&id)?;
    let todo = match load_owned(todos.as_ref(), id, &user).await? {
        Ok(todo) => todo,
        Err(redirect) => return Ok(redirect),
    };

    form_page(
        &views,
        "todos/edit",
        "Edit Todo",
        &user.viewer(),
        FormView::edit(todo.id, TodoForm::from(&todo), HashMap::new()),
        StatusCode::OK,
    )
}

/// `PUT /todos/{id}`: ownership is checked before the body is looked at.
pub async fn update(
    user: CurrentUser,
    Path(id): Path<String>,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
    submitted: Result<Form<TodoForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = parse_todo_id(&id)?;
    if let Err(redirect) = load_owned(todos.as_ref(), id, &user).await? {
        return Ok(redirect);
    }

    let (form, input) = read_form(submitted);
    let input = match input {
        Ok(input) => input,
        Err(e) => {
            return form_page(
                &views,
                "todos/edit",
                "Edit Todo",
                &user.viewer(),
                FormView::edit(id, form, e.field_errors),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    // Deleted between the ownership check and the write.
    todos
        .update_by_id(id, input)
        .await?
        .ok_or_else(|| AppError::not_found("Todo not found"))?;

    tracing::info!(todo_id = %id, user_id = user.id(), "todo updated");
    Ok(found("/dashboard"))
}

/// `DELETE /todos/{id}`
pub async fn delete(
    user: CurrentUser,
    Path(id): Path<String>,
    State(todos): State<Arc<dyn TodoStore>>,
) -> Result<Response, AppError> {
    let id = parse_todo_id(&id)?;
    if let Err(redirect) = load_owned(todos.as_ref(), id, &user).await? {
        return Ok(redirect);
    }

    if todos.delete_by_id(id).await? {
        tracing::info!(todo_id = %id, user_id = user.id(), "todo deleted");
    }
    Ok(found("/dashboard"))
}

/// `GET /todos/user/{user_id}`: one user's public to-dos.
pub async fn user_todos(
    user: CurrentUser,
    Path(user_id): Path<String>,
    State(todos): State<Arc<dyn TodoStore>>,
    State(views): State<Arc<Views>>,
) -> Result<Html<String>, AppError> {
    let owner_id: i64 = user_id
        .parse()
        .map_err(|_| AppError::not_found("User not found"))?;

    let items = todos
        .find_by_owner_and_status(owner_id, TodoStatus::Public)
        .await?;

    let heading = items
        .iter()
        .find_map(|item| item.owner.as_ref())
        .map(|owner| format!("Todos by {}", owner.display_name))
        .unwrap_or_else(|| "Public Todos".to_string());

    let cards: Vec<TodoCard> = items
        .iter()
        .map(|item| TodoCard::with_owner(item, user.id()))
        .collect();

    views.page(
        "todos/index",
        &heading,
        Some(&user.viewer()),
        &json!({ "heading": heading, "todos": cards }),
    )
}
