//! Observability for the Designate API pipeline.
//!
//! - **Logging**: structured logging through `tracing-subscriber`, JSON in
//!   production and pretty-printed in development
//! - **Metrics**: fault counters through the `metrics` facade
//!
//! No metrics exporter is installed here. Counters are no-ops until the
//! hosting process installs a recorder.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `designate_api_faults_total` | Counter | `type`, `status` | Error responses rendered by a fault boundary |
//! | `designate_maintenance_rejections_total` | Counter | - | Requests rejected by maintenance mode |
//! | `designate_fault_notifications_dropped_total` | Counter | `reason` | Fault notifications that were not delivered |
//!
//! # Example
//!
//! ```rust,ignore
//! use designate_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::info!(request_id = "req-1", "Processing request");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{
    describe_metrics, record_api_fault, record_maintenance_rejection,
    record_notification_dropped,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
