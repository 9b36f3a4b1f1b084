//! Server configuration read from the environment.

use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Settings the API server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `DATABASE_URL`, required.
    pub database_url: String,
    /// `HOST`, defaults to `0.0.0.0`.
    pub host: String,
    /// `PORT`, defaults to 3000.
    pub port: u16,
    /// `DATABASE_MAX_CONNECTIONS`, defaults to 10.
    pub max_connections: u32,
    /// `OTEL_EXPORTER_OTLP_ENDPOINT`; spans are exported only when set.
    pub otlp_endpoint: Option<String>,
}

impl ApiConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or a numeric
    /// variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                AppError::Config("DATABASE_URL environment variable must be set".into())
            })?;
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("DATABASE_MAX_CONNECTIONS must be a valid u32: {e}"))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let otlp_endpoint =
            lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|endpoint| !endpoint.is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            otlp_endpoint,
        })
    }

    /// Returns the address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
