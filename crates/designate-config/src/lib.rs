//! Typed configuration for the Designate API pipeline.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! The loaded [`DesignateConfig`] is immutable. Pipeline stages receive the
//! values they need when the pipeline is assembled.
//!
//! # Configuration File Format
//!
//! ```toml
//! [service_api]
//! maintenance-mode = false
//! maintenance-mode-role = "admin"
//! auth-strategy = "keystone"       # keystone | noauth | test
//! notify-api-faults = false
//! notification-timeout-ms = 5000
//! notification-queue-size = 1024
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"                  # json | pretty
//! ansi_enabled = false
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values are overridden with `PREFIX__SECTION__KEY`, keys upper-cased with
//! underscores:
//!
//! - `DESIGNATE__SERVICE_API__MAINTENANCE_MODE=true`
//! - `DESIGNATE__SERVICE_API__AUTH_STRATEGY=noauth`
//! - `DESIGNATE__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{DesignateConfig, DesignateConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use designate_telemetry::LogFormat;
pub use schema::{AuthStrategy, LoggingConfig, ServiceApiConfig};
