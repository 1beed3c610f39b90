// Server configuration
//
// Loaded from environment variables (a `.env` file is read first by main).

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub bind_addr: SocketAddr,
    /// PostgreSQL URL. In-memory store when unset.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Prefix nesting all API routes, e.g. "/api"
    pub api_prefix: String,
    /// Allowed CORS origins. No CORS layer when empty.
    pub cors_allowed_origins: Vec<String>,
    /// How many times a fetch-mutate-replace cycle runs before giving up on conflicts
    pub max_write_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9000)),
            database_url: None,
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            api_prefix: String::new(),
            cors_allowed_origins: vec![],
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:9000")
    /// - `DATABASE_URL`: PostgreSQL URL (default: unset, in-memory store)
    /// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
    /// - `API_PREFIX`: route prefix starting with `/` (default: empty)
    /// - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: empty)
    /// - `ROLLCALL_MAX_WRITE_ATTEMPTS`: conflict retry budget (default: 3)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:9000")?;

        let database_max_connections: u32 = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };

        let max_write_attempts: u32 = match get("ROLLCALL_MAX_WRITE_ATTEMPTS") {
            Some(v) => v
                .parse()
                .context("ROLLCALL_MAX_WRITE_ATTEMPTS must be a positive integer")?,
            None => DEFAULT_MAX_WRITE_ATTEMPTS,
        };
        if max_write_attempts == 0 {
            anyhow::bail!("ROLLCALL_MAX_WRITE_ATTEMPTS must be at least 1");
        }

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        // Nested routes need a leading slash and no trailing one
        let api_prefix = match get("API_PREFIX") {
            Some(prefix) => {
                let prefix = prefix.trim().trim_end_matches('/');
                if !prefix.is_empty() && !prefix.starts_with('/') {
                    anyhow::bail!("API_PREFIX must start with '/'");
                }
                prefix.to_string()
            }
            None => String::new(),
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            database_max_connections,
            api_prefix,
            cors_allowed_origins,
            max_write_attempts,
        })
    }
}
