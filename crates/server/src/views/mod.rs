//! Server-side HTML rendering with Handlebars.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Every page is its body template rendered first, then wrapped in
//! `layouts/main`.

pub mod models;

pub use models::{FormView, TodoCard, Viewer};

use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;
use serde_json::json;
use shared_types::{AppError, AppErrorKind};

const LAYOUT: &str = "layouts/main";

const TEMPLATES: &[(&str, &str)] = &[
    (LAYOUT, include_str!("../../templates/layouts/main.hbs")),
    ("login", include_str!("../../templates/login.hbs")),
    ("dashboard", include_str!("../../templates/dashboard.hbs")),
    ("todos/add", include_str!("../../templates/todos/add.hbs")),
    ("todos/edit", include_str!("../../templates/todos/edit.hbs")),
    ("todos/index", include_str!("../../templates/todos/index.hbs")),
    ("todos/show", include_str!("../../templates/todos/show.hbs")),
    ("error/404", include_str!("../../templates/error/404.hbs")),
    ("error/500", include_str!("../../templates/error/500.hbs")),
];

const PARTIALS: &[(&str, &str)] = &[(
    "todo_form",
    include_str!("../../templates/partials/_todo_form.hbs"),
)];

/// The compiled template registry.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_partial(name, *source)?;
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, *source)?;
        }
        Ok(Self { registry })
    }

    /// Render a single template without the layout.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, AppError> {
        self.registry.render(template, data).map_err(|e| {
            AppError::internal(format!("Failed to render template '{template}': {e}"))
        })
    }

    /// Render `template` inside the site layout.
    pub fn page<T: Serialize>(
        &self,
        template: &str,
        title: &str,
        viewer: Option<&Viewer>,
        data: &T,
    ) -> Result<Html<String>, AppError> {
        let body = self.render(template, data)?;
        let page = self.render(
            LAYOUT,
            &json!({
                "title": title,
                "viewer": viewer,
                "body": body,
            }),
        )?;
        Ok(Html(page))
    }

    /// The 404 or 500 page for `error`. Falls back to plain text if the
    /// templates themselves fail, so an error page is always produced.
    pub fn error_page(&self, error: &AppError, viewer: Option<&Viewer>) -> Html<String> {
        let (template, title) = match error.kind {
            AppErrorKind::NotFound => ("error/404", "Not Found"),
            _ => ("error/500", "Something went wrong"),
        };
        match self.page(template, title, viewer, &json!({})) {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "error page failed to render");
                Html(title.to_string())
            }
        }
    }
}
