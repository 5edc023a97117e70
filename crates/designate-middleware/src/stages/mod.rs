//! API pipeline stages.
//!
//! 1. [`request_id`] - Adopt or generate the request id
//! 2. [`fault_wrapper`] - Outermost error boundary
//! 3. [`normalize_uri`] - Strip trailing slashes
//! 4. [`context`] - Build and attach the request context
//! 5. [`maintenance`] - Maintenance gate
//! 6. [`validation_error`] - Versioned validation error rendering

pub mod context;
mod fault;
pub mod fault_wrapper;
pub mod maintenance;
pub mod normalize_uri;
pub mod request_id;
pub mod validation_error;

pub use context::ContextMiddleware;
pub use fault_wrapper::FaultWrapperMiddleware;
pub use maintenance::MaintenanceMiddleware;
pub use normalize_uri::NormalizeUriMiddleware;
pub use request_id::RequestIdMiddleware;
pub use validation_error::ValidationErrorMiddleware;
