//! # Designate Middleware
//!
//! Request pipeline for the Designate DNS API.
//!
//! Every inbound request passes through a fixed, ordered pipeline that
//! derives a scoped request context, enforces maintenance windows,
//! normalizes the request path, and turns any error raised deeper in the
//! stack into a versioned JSON error envelope.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → RequestId → FaultWrapper → NormalizeUri → Context
//!         → Maintenance → ValidationError → Handler
//! ```
//!
//! | Stage | Middleware       | Purpose                                      |
//! |-------|------------------|----------------------------------------------|
//! | 1     | Request ID       | Adopt `X-Openstack-Request-Id` or generate   |
//! | 2     | Fault Wrapper    | Any error → error envelope                   |
//! | 3     | Normalize URI    | Strip trailing slashes                       |
//! | 4     | Context          | Identity strategy, then sudo/all-tenants     |
//! | 5     | Maintenance      | 503 unless the caller holds the bypass role  |
//! | 6     | Validation Error | v1/v2 rendering of validation failures       |
//!
//! ## Example
//!
//! ```
//! use designate_middleware::pipeline::Stage;
//!
//! let stages = Stage::all();
//! assert_eq!(stages.len(), 6);
//! assert_eq!(stages[0].name(), "request_id");
//! assert_eq!(stages[5].name(), "validation_error");
//! ```

#![doc(html_root_url = "https://docs.rs/designate-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapters;
pub mod context;
pub mod headers;
pub mod middleware;
pub mod notifications;
pub mod pipeline;
pub mod stages;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod test_logs;

pub use adapters::{ApiVersion, ValidationAdapter};
pub use context::MiddlewareContext;
pub use designate_core::BoxFuture;
pub use middleware::{Middleware, Next};
pub use notifications::{
    FaultEvent, FaultNotifier, FaultPayload, LogNotificationSink, NotificationError,
    NotificationSink, FAULT_EVENT_TYPE,
};
pub use pipeline::{api_pipeline, Pipeline, PipelineBuilder, Stage};
pub use strategy::{strategy_for, ContextStrategy, IdentityStatus};
pub use types::{request_url, Request, Response, ResponseExt};
