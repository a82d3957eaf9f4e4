use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// A required environment variable is missing or a value does not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` and `JWT_SECRET` has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Apply embedded migrations at startup (default: `false`).
    pub run_db_migration: bool,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Initial administrator credentials, when both are provided.
    pub admin: Option<AdminCredentials>,
    /// Pub/Sub switches.
    pub pubsub: PubSubConfig,
}

/// Credentials used to provision the first administrator account.
#[derive(Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Pub/Sub configuration.
#[derive(Debug, Clone, Default)]
pub struct PubSubConfig {
    /// `ENABLE_PUBSUB=true` turns Pub/Sub on.
    pub enabled: bool,
    /// Topic the publish endpoint writes to.
    pub topic: Option<String>,
    /// Subscription drained by the startup subscriber.
    pub subscription: Option<String>,
    /// Service name stamped on published payloads (`CHART`).
    pub service: Option<String>,
}

impl PubSubConfig {
    /// Load from `ENABLE_PUBSUB`, `PUBSUB_TOPIC`, `PUBSUB_SUBSCRIPTION`, `CHART`.
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("ENABLE_PUBSUB"),
            topic: env_non_empty("PUBSUB_TOPIC"),
            subscription: env_non_empty("PUBSUB_SUBSCRIPTION"),
            service: env_non_empty("CHART"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `RUN_DB_MIGRATION`       | `false`                 |
    /// | `DATABASE_URL`           | required                |
    /// | `ADMIN_EMAIL`            | unset                   |
    /// | `ADMIN_PASSWORD`         | unset                   |
    ///
    /// JWT and Pub/Sub variables are documented on [`JwtConfig::from_env`]
    /// and [`PubSubConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env_parse("PORT", 3000)?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", 30)?;
        let run_db_migration = env_flag("RUN_DB_MIGRATION");
        let database_url =
            env_non_empty("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let admin = match (env_non_empty("ADMIN_EMAIL"), env_non_empty("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminCredentials { email, password }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            run_db_migration,
            database_url,
            jwt: JwtConfig::from_env()?,
            admin,
            pubsub: PubSubConfig::from_env(),
        })
    }
}

/// Read a variable, treating unset and empty the same.
pub(crate) fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable, falling back to `default` when unset.
pub(crate) fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env_non_empty(var) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

/// `true` only for a case-insensitive `"true"`.
fn env_flag(var: &str) -> bool {
    env_non_empty(var).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
