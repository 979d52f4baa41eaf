//! Structured logging and client-call spans
//!
//! Every CineVault binary initialises tracing once at startup through
//! [`init_tracing`]. Library code only emits `tracing` events and spans.
//!
//! # Example
//!
//! ```rust,no_run
//! use cinevault_core::telemetry::{init_tracing, TracingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing(TracingConfig::from_env())?;
//!     Ok(())
//! }
//! ```

pub mod tracing;

pub use self::tracing::{external_api_span, init_tracing, LogFormat, TelemetryError, TracingConfig};
