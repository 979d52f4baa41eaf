//! Shared configuration loading for CineVault services
//!
//! Service-level settings are read from environment variables with the
//! `CINEVAULT_` prefix, falling back to the conventional unprefixed names
//! (`HOST`, `PORT`) where one exists. `RUST_LOG` is left to the tracing
//! filter. A `.env` file is honoured when present.
//!
//! # Example
//!
//! ```no_run
//! use cinevault_core::config::{load_dotenv, ConfigLoader, ServiceConfig};
//!
//! # fn example() -> Result<(), cinevault_core::CineVaultError> {
//! load_dotenv();
//!
//! let service_config = ServiceConfig::from_env()?;
//! service_config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::CineVaultError;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, applying defaults for
    /// anything optional that is not set.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a value is present but cannot be parsed.
    fn from_env() -> Result<Self, CineVaultError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), CineVaultError>;
}

/// HTTP service configuration
///
/// # Environment Variables
///
/// - `CINEVAULT_SERVICE_HOST` / `HOST` (optional): bind host (default: "0.0.0.0")
/// - `CINEVAULT_SERVICE_PORT` / `PORT` (optional): bind port (default: 8080)
/// - `CINEVAULT_SERVICE_LOG_LEVEL` (optional): default tracing filter (default: "info")
/// - `CINEVAULT_SERVICE_REQUEST_TIMEOUT` (optional): request timeout in seconds (default: 30)
/// - `CINEVAULT_SERVICE_PUBLIC_URL` (optional): externally visible base URL
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Default tracing filter, a bare level or an `EnvFilter` directive
    pub log_level: String,
    /// Request timeout duration
    pub request_timeout: Duration,
    /// Externally visible base URL, used in logs only
    pub public_url: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            request_timeout: Duration::from_secs(30),
            public_url: None,
        }
    }
}

impl ServiceConfig {
    /// `host:port` pair suitable for binding
    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, CineVaultError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var("CINEVAULT_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = match std::env::var("CINEVAULT_SERVICE_PORT") {
            Ok(_) => parse_env_var("CINEVAULT_SERVICE_PORT", defaults.port)?,
            Err(_) => parse_env_var("PORT", defaults.port)?,
        };

        let log_level =
            std::env::var("CINEVAULT_SERVICE_LOG_LEVEL").unwrap_or(defaults.log_level);

        let request_timeout_secs = parse_env_var(
            "CINEVAULT_SERVICE_REQUEST_TIMEOUT",
            defaults.request_timeout.as_secs(),
        )?;

        let public_url = std::env::var("CINEVAULT_SERVICE_PUBLIC_URL").ok();

        Ok(Self {
            host,
            port,
            log_level,
            request_timeout: Duration::from_secs(request_timeout_secs),
            public_url,
        })
    }

    fn validate(&self) -> Result<(), CineVaultError> {
        if self.port == 0 {
            return Err(CineVaultError::config(
                "port must be greater than 0",
                "CINEVAULT_SERVICE_PORT",
            ));
        }

        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            return Err(CineVaultError::config(
                format!("Invalid log_level '{}': {}", self.log_level, e),
                "CINEVAULT_SERVICE_LOG_LEVEL",
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(CineVaultError::config(
                "request_timeout must be greater than 0 seconds",
                "CINEVAULT_SERVICE_REQUEST_TIMEOUT",
            ));
        }

        if let Some(public_url) = &self.public_url {
            Url::parse(public_url).map_err(|e| {
                CineVaultError::config(
                    format!("Invalid public_url: {}", e),
                    "CINEVAULT_SERVICE_PUBLIC_URL",
                )
            })?;
        }

        Ok(())
    }
}

/// Parse an environment variable into `T`, returning `default` when unset
///
/// # Errors
///
/// Returns a `ConfigurationError` if the variable is set but cannot be parsed.
pub fn parse_env_var<T>(key: &str, default: T) -> Result<T, CineVaultError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| CineVaultError::config(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Load a `.env` file if present
///
/// A missing file is not an error; anything else is reported on stderr since
/// tracing is usually not initialised yet at this point.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
