//! # CineVault Core
//!
//! Shared building blocks for the CineVault catalog gateway services.
//!
//! ## Modules
//!
//! - `config`: Environment-driven service configuration and validation
//! - `error`: Error type for configuration and telemetry failures
//! - `telemetry`: Tracing subscriber setup and client-call spans
//! - `types`: Domain enums shared across crates

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::{load_dotenv, parse_env_var, ConfigLoader, ServiceConfig};
pub use error::CineVaultError;
pub use telemetry::{external_api_span, init_tracing, LogFormat, TelemetryError, TracingConfig};
pub use types::{MediaKind, UnknownMediaKind};

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CineVaultError>;
