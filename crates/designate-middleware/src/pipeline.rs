//! Ordered middleware pipeline.
//!
//! ## Pipeline Stages
//!
//! The API pipeline consists of 6 stages, outermost first:
//!
//! 1. **Request ID** - Adopt or generate the request id
//! 2. **Fault Wrapper** - Turn any error into an error envelope
//! 3. **Normalize URI** - Strip trailing slashes
//! 4. **Context** - Build and attach the request context
//! 5. **Maintenance** - Reject requests during maintenance
//! 6. **Validation Error** - Render validation failures per API version
//!
//! [`api_pipeline`] assembles this order from the configuration.

use crate::adapters::ApiVersion;
use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::notifications::FaultNotifier;
use crate::stages::{
    ContextMiddleware, FaultWrapperMiddleware, MaintenanceMiddleware, NormalizeUriMiddleware,
    RequestIdMiddleware, ValidationErrorMiddleware,
};
use crate::strategy::strategy_for;
use crate::types::{Request, Response};
use designate_config::ServiceApiConfig;
use designate_core::{ApiResult, BoxFuture};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered middleware pipeline.
///
/// Immutable once built; one pipeline serves every request.
///
/// # Example
///
/// ```ignore
/// use designate_middleware::{api_pipeline, ApiVersion, FaultNotifier, MiddlewareContext};
///
/// let pipeline = api_pipeline(&config.service_api, ApiVersion::V2, FaultNotifier::disabled());
/// let mut ctx = MiddlewareContext::new();
/// let response = pipeline.process(&mut ctx, request, handler).await?;
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Processes a request through every stage, then the handler.
    ///
    /// Errors are only returned when no stage turned them into a response.
    pub async fn process<H>(
        &self,
        ctx: &mut MiddlewareContext,
        request: Request,
        handler: H,
    ) -> ApiResult<Response>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, ApiResult<Response>>
            + Send
            + 'static,
    {
        let next = self.build_chain(handler);
        next.run(ctx, request).await
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, ApiResult<Response>>
            + Send
            + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage. Stages run in the order they are added.
    #[must_use]
    pub fn add_stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// The stages of the API pipeline, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: Request id adoption
    RequestId = 1,
    /// Stage 2: Error envelope rendering
    FaultWrapper = 2,
    /// Stage 3: Trailing slash removal
    NormalizeUri = 3,
    /// Stage 4: Request context construction
    Context = 4,
    /// Stage 5: Maintenance gate
    Maintenance = 5,
    /// Stage 6: Versioned validation error rendering
    ValidationError = 6,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::FaultWrapper => "fault_wrapper",
            Self::NormalizeUri => "normalize_uri",
            Self::Context => "context",
            Self::Maintenance => "maintenance",
            Self::ValidationError => "validation_error",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 6] {
        [
            Self::RequestId,
            Self::FaultWrapper,
            Self::NormalizeUri,
            Self::Context,
            Self::Maintenance,
            Self::ValidationError,
        ]
    }
}

/// Assembles the API pipeline for `version`.
///
/// The context strategy is picked by `auth-strategy`; maintenance settings
/// come from the same section.
pub fn api_pipeline(
    config: &ServiceApiConfig,
    version: ApiVersion,
    notifier: FaultNotifier,
) -> Pipeline {
    let pipeline = Pipeline::builder()
        .add_stage(RequestIdMiddleware::new())
        .add_stage(FaultWrapperMiddleware::new(notifier.clone()))
        .add_stage(NormalizeUriMiddleware::new())
        .add_stage(ContextMiddleware::new(strategy_for(config.auth_strategy)))
        .add_stage(MaintenanceMiddleware::from_config(config))
        .add_stage(ValidationErrorMiddleware::new(version, notifier.clone()))
        .build();

    tracing::info!(
        api_version = %version,
        auth_strategy = %config.auth_strategy,
        maintenance_mode = config.maintenance_mode,
        notify_api_faults = notifier.is_enabled(),
        stages = ?pipeline.stage_names(),
        "Assembled API pipeline"
    );
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::{Request as HttpRequest, StatusCode};
    use http_body_util::Full;
    use std::sync::Mutex;

    struct OrderTrackingMiddleware {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Middleware for OrderTrackingMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut MiddlewareContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, ApiResult<Response>> {
            self.order.lock().unwrap().push(self.name);
            Box::pin(next.run(ctx, request))
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .add_stage(OrderTrackingMiddleware {
                name: "a",
                order: order.clone(),
            })
            .add_stage(OrderTrackingMiddleware {
                name: "b",
                order: order.clone(),
            })
            .add_stage(OrderTrackingMiddleware {
                name: "c",
                order: order.clone(),
            })
            .build();

        let mut ctx = MiddlewareContext::new();
        let request = HttpRequest::builder()
            .uri("/")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = pipeline
            .process(&mut ctx, request, |_ctx, _req| {
                Box::pin(async { Ok(Response::empty(StatusCode::OK)) })
            })
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(pipeline.stage_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_stage_order() {
        let stages = Stage::all();
        assert_eq!(stages.len(), 6);
        assert!(stages.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(stages[0].name(), "request_id");
        assert_eq!(stages[5].name(), "validation_error");
    }

    #[test]
    fn test_api_pipeline_matches_stage_order() {
        let pipeline = api_pipeline(
            &ServiceApiConfig::default(),
            ApiVersion::V2,
            FaultNotifier::disabled(),
        );

        let expected: Vec<_> = Stage::all().iter().map(|s| s.name()).collect();
        assert_eq!(pipeline.stage_names(), expected);
        assert_eq!(pipeline.stage_count(), 6);
    }
}
