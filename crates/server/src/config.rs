use shared_types::{AppConfig, AppError};

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Env var that points at an alternative config file.
const CONFIG_PATH_ENV: &str = "TODO_CONFIG";

/// Shortest accepted session signing key, in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime: one year.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Parse the contents of a `config.toml`.
pub fn parse_app_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Read `config.toml` (or `$TODO_CONFIG`). A missing or unparseable file
/// falls back to defaults so the server can start with env vars alone.
pub fn load_app_config() -> AppConfig {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_app_config(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path, error = %e, "failed to parse config file, using defaults");
            AppConfig::default()
        }),
        Err(e) => {
            tracing::info!(path = %path, error = %e, "config file not found, using defaults");
            AppConfig::default()
        }
    }
}

/// Everything the process needs at startup: file config plus secrets.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub database_url: String,
    pub session_secret: String,
}

impl Settings {
    /// Load `.env`, the config file, and the required secrets.
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignored in production where env vars are set directly).
        let _ = dotenvy::dotenv();
        Self::from_parts(load_app_config(), |key| std::env::var(key).ok())
    }

    /// Resolve secrets and overrides through `lookup`. Split out from
    /// `from_env` so it can be exercised without touching the process env.
    pub fn from_parts(
        mut app: AppConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::internal("DATABASE_URL must be set"))?;

        let session_secret = lookup("SESSION_SECRET")
            .ok_or_else(|| AppError::internal("SESSION_SECRET must be set"))?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::internal(format!(
                "SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        validate_session(&app)?;

        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            app.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            app.server.port = port
                .parse()
                .map_err(|e| AppError::internal(format!("Invalid PORT: {e}")))?;
        }

        Ok(Self {
            app,
            database_url,
            session_secret,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.server.host, self.app.server.port)
    }
}

/// The `[session]` section must yield a usable cookie and token lifetime.
fn validate_session(app: &AppConfig) -> Result<(), AppError> {
    let session = &app.session;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&session.ttl_hours) {
        return Err(AppError::internal(format!(
            "session.ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
            session.ttl_hours
        )));
    }

    let name = &session.cookie_name;
    let name_ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if !name_ok {
        return Err(AppError::internal(format!(
            "session.cookie_name '{name}' must be non-empty ASCII letters, digits, '_' or '-'"
        )));
    }
    Ok(())
}
