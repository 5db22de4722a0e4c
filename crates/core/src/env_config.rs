//! Environment-driven configuration with warn-level logging for invalid values.

use crate::constants::{DEFAULT_HTTP_PORT, DEFAULT_OWNER, DEFAULT_OWNER_HEADER};

/// Parse a variable through `lookup` with a default fallback.
///
/// - Variable not set: returns `default` silently.
/// - Variable set but unparseable: logs a warning and returns `default`.
pub fn env_parse_with_default<T, F>(lookup: &F, var: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Runtime configuration for the server and CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL URL. `None` selects the in-memory backend.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Owner id applied when a request carries no owner header.
    pub default_owner: String,
    /// Header name the HTTP layer reads the owner id from.
    pub owner_header: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_HTTP_PORT,
            default_owner: DEFAULT_OWNER.to_owned(),
            owner_header: DEFAULT_OWNER_HEADER.to_owned(),
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            database_url: non_empty(&lookup, "LIFTLOG_DATABASE_URL")
                .or_else(|| non_empty(&lookup, "DATABASE_URL")),
            host: non_empty(&lookup, "LIFTLOG_HOST").unwrap_or(defaults.host),
            port: env_parse_with_default(&lookup, "LIFTLOG_PORT", defaults.port),
            default_owner: non_empty(&lookup, "LIFTLOG_OWNER").unwrap_or(defaults.default_owner),
            owner_header: non_empty(&lookup, "LIFTLOG_OWNER_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or(defaults.owner_header),
        }
    }
}
