//! Validation error middleware.
//!
//! Innermost error boundary. Renders `InvalidObject` errors that carry
//! structured validation failures in the wire shape of the API version
//! being served. Every other error is returned untouched for the fault
//! wrapper.

use crate::adapters::ApiVersion;
use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::notifications::FaultNotifier;
use crate::stages::fault::render_fault;
use crate::types::{request_url, Request, Response};
use designate_core::{ApiError, ApiResult, BoxFuture, DomainError, DomainErrorKind, PartialEnvelope};

/// Middleware rendering validation failures for one API version.
#[derive(Debug, Clone)]
pub struct ValidationErrorMiddleware {
    version: ApiVersion,
    notifier: FaultNotifier,
}

impl ValidationErrorMiddleware {
    /// Creates the middleware for `version`.
    #[must_use]
    pub fn new(version: ApiVersion, notifier: FaultNotifier) -> Self {
        tracing::info!(api_version = %version, "Starting designate validation error middleware");
        Self { version, notifier }
    }

    /// Returns the API version served.
    #[must_use]
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    fn render(&self, ctx: &MiddlewareContext, url: &str, error: &DomainError) -> Option<Response> {
        let errors = error.validation_errors()?;
        let status = error.status_code();
        let partial = PartialEnvelope {
            code: Some(status.as_u16()),
            error_type: error.error_type().map(ToString::to_string),
            message: None,
            errors: Some(self.version.adapter().render(errors, error.object())),
        };
        Some(render_fault(ctx, &self.notifier, url, status, partial, &error.to_string()))
    }
}

impl Middleware for ValidationErrorMiddleware {
    fn name(&self) -> &'static str {
        "validation_error"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            let url = request_url(&request);
            match next.run(ctx, request).await {
                Err(ApiError::Domain(error)) if error.kind() == DomainErrorKind::InvalidObject => {
                    match self.render(ctx, &url, &error) {
                        Some(response) => Ok(response),
                        None => Err(ApiError::Domain(error)),
                    }
                }
                other => other,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use designate_core::{
        ErrorPayload, FailedObject, RequestContext, ValidationError, ValidationErrorList,
    };
    use http::StatusCode;
    use http_body_util::{BodyExt, Full};

    fn failures() -> ValidationErrorList {
        std::iter::once(
            ValidationError::new(["zone_id"], "format", "'x' is not a 'uuid'")
                .with_validator_value("uuid"),
        )
        .collect()
    }

    async fn run(version: ApiVersion, error: ApiError) -> ApiResult<Response> {
        let mut ctx = MiddlewareContext::new();
        ctx.attach_context(RequestContext::new(ctx.request_id().clone()));
        let request: Request = http::Request::builder()
            .uri("/v2/zones")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let next = Next::handler(move |_ctx, _req| Box::pin(async move { Err(error) }));
        ValidationErrorMiddleware::new(version, FaultNotifier::disabled())
            .process(&mut ctx, request, next)
            .await
    }

    async fn body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_v2_renders_wrapped_errors() {
        let response = run(ApiVersion::V2, ApiError::invalid_object(failures(), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body(response).await;
        assert_eq!(body["code"], 400);
        assert_eq!(body["type"], "invalid_object");
        assert_eq!(body["errors"]["errors"][0]["path"], serde_json::json!(["zone_id"]));
        assert!(body.get("message").is_none());
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_v1_renders_array() {
        let error = ApiError::invalid_object(failures(), Some(FailedObject::new("Zone")));
        let body = body(run(ApiVersion::V1, error).await.unwrap()).await;

        assert_eq!(body["code"], 400);
        assert_eq!(body["errors"][0]["path"], serde_json::json!(["domain_id"]));
    }

    #[tokio::test]
    async fn test_reraises_other_errors() {
        let result = run(ApiVersion::V2, ApiError::not_found("no zone")).await;
        assert_eq!(result.unwrap_err().domain_kind(), Some(DomainErrorKind::NotFound));

        let result = run(ApiVersion::V2, ApiError::timeout("slow")).await;
        assert!(matches!(result, Err(ApiError::MessagingTimeout(_))));
    }

    #[tokio::test]
    async fn test_reraises_invalid_object_without_structured_errors() {
        let error = DomainError::new(DomainErrorKind::InvalidObject)
            .with_errors(ErrorPayload::Raw(vec![serde_json::json!("bad")]));
        let result = run(ApiVersion::V2, error.into()).await;
        assert_eq!(result.unwrap_err().domain_kind(), Some(DomainErrorKind::InvalidObject));
    }
}
