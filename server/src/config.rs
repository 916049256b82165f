//! Configuration management for the server.

use axum::http::HeaderValue;
use std::{env, net::Ipv6Addr};

/// Where books are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL via `database_url`
    Postgres,
    /// Process memory; lost on shutdown
    Memory,
}

/// Origins allowed to make cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub max_connections: u32,
    /// Storage backend for books
    pub storage: StorageBackend,
    /// CORS allowed origins
    pub cors_origins: CorsOrigins,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("HOST", "0.0.0.0");

        let port = var("PORT", "8000")
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let pg_port: u16 = var("POSTGRES_PORT", "5432")
                    .parse()
                    .map_err(|_| ConfigError::InvalidPostgresPort)?;
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    var("POSTGRES_USER", "library"),
                    var("POSTGRES_PASSWORD", "library"),
                    var("POSTGRES_HOST", "db"),
                    pg_port,
                    var("POSTGRES_DB", "library"),
                )
            }
        };

        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|_| ConfigError::InvalidMaxConnections)?;

        let storage = match var("STORAGE_BACKEND", "postgres").to_lowercase().as_str() {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => return Err(ConfigError::InvalidStorageBackend(other.to_string())),
        };

        let cors_origins = parse_cors_origins(&var("CORS_ALLOW_ORIGINS", "*"))?;

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            storage,
            cors_origins,
        })
    }

    /// Address to bind, as `host:port`. IPv6 literals are bracketed.
    pub fn bind_addr(&self) -> String {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn parse_cors_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    origins
        .into_iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| ConfigError::InvalidCorsOrigin(o.into())))
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid POSTGRES_PORT value")]
    InvalidPostgresPort,

    #[error("Invalid DATABASE_MAX_CONNECTIONS value")]
    InvalidMaxConnections,

    #[error("Unknown STORAGE_BACKEND '{0}', expected 'postgres' or 'memory'")]
    InvalidStorageBackend(String),

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),
}
