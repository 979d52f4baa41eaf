//! Error type shared by CineVault services

use thiserror::Error;

/// Errors raised by the shared service plumbing (configuration, telemetry)
#[derive(Debug, Error)]
pub enum CineVaultError {
    /// A configuration value is missing, unparsable, or out of range
    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        /// Environment variable or config key at fault, if known
        key: Option<String>,
    },

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

impl CineVaultError {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        CineVaultError::ConfigurationError {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

impl From<crate::telemetry::TelemetryError> for CineVaultError {
    fn from(err: crate::telemetry::TelemetryError) -> Self {
        CineVaultError::TelemetryError(err.to_string())
    }
}
