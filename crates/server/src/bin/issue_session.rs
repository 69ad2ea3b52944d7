//! Create a user and print a session token for them.
//!
//! ```text
//! issue-session <display name> [first name] [last name]
//! ```
//!
//! Uses the same `DATABASE_URL`, `SESSION_SECRET` and `config.toml` as the
//! server. Send the token as the `todo_session` cookie or as
//! `Authorization: Bearer <token>`.

use server::auth::SessionKeys;
use server::config::Settings;
use server::db;
use shared_types::NewUser;

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let Some(display_name) = args.next() else {
        eprintln!("usage: issue-session <display name> [first name] [last name]");
        std::process::exit(2);
    };
    let first_name = args.next().unwrap_or_else(|| display_name.clone());
    let last_name = args.next().unwrap_or_default();

    let settings = Settings::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    if settings.database_url.starts_with(db::MEMORY_SCHEME) {
        eprintln!("issue-session needs a persistent DATABASE_URL, not {}", db::MEMORY_SCHEME);
        std::process::exit(1);
    }

    let backend = db::connect(&settings.database_url, &settings.app.database)
        .await
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });

    let user = backend
        .users
        .create_user(NewUser {
            display_name,
            first_name,
            last_name,
            image: None,
        })
        .await
        .unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        });

    let keys = SessionKeys::new(settings.session_secret.as_bytes(), settings.app.session);
    let token = keys
        .issue(user.id, &user.display_name)
        .expect("Failed to sign session token");

    eprintln!("created user {} ({})", user.id, user.display_name);
    println!("{token}");
}
