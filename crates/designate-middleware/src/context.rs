//! Middleware context types.
//!
//! The [`MiddlewareContext`] is the request's processing environment. It
//! carries the request id from the first stage on, and the
//! [`RequestContext`] once the context stage has attached it.

use designate_core::{RequestContext, RequestId};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;

/// Per-request state that flows through the middleware pipeline.
///
/// The request context can only be attached by the context stage. After
/// that it is handed out by shared reference only.
///
/// # Example
///
/// ```
/// use designate_middleware::MiddlewareContext;
///
/// let ctx = MiddlewareContext::new();
/// assert!(ctx.request_id().as_str().starts_with("req-"));
/// assert!(ctx.request_context().is_none());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: RequestId,

    request_context: Option<RequestContext>,

    url: Option<String>,

    started_at: Instant,

    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a new middleware context with a fresh request id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::generate())
    }

    /// Creates a context with a specific request id.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            request_context: None,
            url: None,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Sets the request id. Only the request-id stage calls this.
    pub(crate) fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the attached request context, if any.
    #[must_use]
    pub fn request_context(&self) -> Option<&RequestContext> {
        self.request_context.as_ref()
    }

    /// Stores the request context. Only the context stage calls this.
    pub(crate) fn attach_context(&mut self, context: RequestContext) {
        if self.request_context.is_some() {
            tracing::warn!(
                request_id = %self.request_id,
                "Request context attached more than once, replacing"
            );
        }
        self.request_context = Some(context);
    }

    /// Returns the request URL as last seen by the pipeline.
    ///
    /// Set by the fault wrapper and updated once the URI is normalized.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.url = Some(url);
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}
