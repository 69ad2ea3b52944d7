use axum::extract::Request;
use axum::ServiceExt;
use server::auth::SessionKeys;
use server::config::Settings;
use server::db::{self, AppState};
use server::views::Views;
use server::{health, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    health::record_start_time();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let backend = match db::connect(&settings.database_url, &settings.app.database).await {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            std::process::exit(1);
        }
    };

    let views = match Views::new() {
        Ok(views) => views,
        Err(e) => {
            tracing::error!(error = %e, "failed to compile templates");
            std::process::exit(1);
        }
    };

    let keys = SessionKeys::new(
        settings.session_secret.as_bytes(),
        settings.app.session.clone(),
    );
    let app = server::app(AppState::new(backend, views, keys));

    let addr = settings.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
