//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::JwtConfig;
use blog_infra::database::DatabaseConfig;

/// Default cap on urlencoded form bodies (2.5 MiB).
pub const DEFAULT_FORM_LIMIT_BYTES: usize = 2_621_440;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    /// Mark the session cookie `Secure` (HTTPS only).
    pub session_cookie_secure: bool,
    /// Largest accepted form body; post content is otherwise unbounded.
    pub form_limit_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            run_migrations: flag("RUN_MIGRATIONS", true),
            jwt: JwtConfig::from_env(),
            session_cookie_secure: flag("SESSION_COOKIE_SECURE", false),
            form_limit_bytes: parse_var("FORM_LIMIT_BYTES").unwrap_or(DEFAULT_FORM_LIMIT_BYTES),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Anything but `false`/`0` (case-insensitive) counts as set.
fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| {
            let v = v.trim().to_ascii_lowercase();
            v != "false" && v != "0"
        })
        .unwrap_or(default)
}
