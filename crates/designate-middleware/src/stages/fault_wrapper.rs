//! Fault wrapper middleware.
//!
//! The outermost error boundary. Every error raised by an inner stage or
//! the handler becomes a JSON error envelope:
//!
//! | Error              | Status                     | `type`               |
//! |--------------------|----------------------------|----------------------|
//! | Domain             | error code, or 500         | error type, or `unknown` |
//! | Messaging timeout  | 504                        | `timeout`            |
//! | Anything else      | 500                        | `unknown`            |
//!
//! Errors not marked as expected are logged at error level. Faults are
//! reported with the request URL as routed, after URI normalization. This
//! stage never returns an error.

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::notifications::FaultNotifier;
use crate::stages::fault::render_fault;
use crate::types::{request_url, Request, Response};
use designate_core::{ApiError, ApiResult, BoxFuture, PartialEnvelope};
use http::StatusCode;

/// Middleware turning errors into error envelopes.
#[derive(Debug, Clone, Default)]
pub struct FaultWrapperMiddleware {
    notifier: FaultNotifier,
}

impl FaultWrapperMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new(notifier: FaultNotifier) -> Self {
        tracing::info!("Starting designate faultwrapper middleware");
        Self { notifier }
    }

    fn handle_error(&self, ctx: &MiddlewareContext, error: &ApiError) -> Response {
        let url = ctx.url().unwrap_or_default();
        let (status, partial) = match error {
            ApiError::Domain(e) => (e.status_code(), e.to_partial_envelope()),
            ApiError::MessagingTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                PartialEnvelope {
                    code: Some(StatusCode::GATEWAY_TIMEOUT.as_u16()),
                    error_type: Some("timeout".to_string()),
                    ..PartialEnvelope::default()
                },
            ),
            ApiError::Unclassified(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, PartialEnvelope::default())
            }
        };

        if !error.is_expected() {
            tracing::error!(
                request_id = %ctx.request_id(),
                url,
                error = %error,
                details = ?error,
                "Unexpected error while handling request"
            );
        }

        render_fault(ctx, &self.notifier, url, status, partial, &error.to_string())
    }
}

impl Middleware for FaultWrapperMiddleware {
    fn name(&self) -> &'static str {
        "fault_wrapper"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            ctx.set_url(request_url(&request));
            match next.run(ctx, request).await {
                Ok(response) => Ok(response),
                Err(error) => Ok(self.handle_error(ctx, &error)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_logs::CapturedLogs;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use designate_core::{DomainError, DomainErrorKind, ErrorEnvelope, RequestContext};
    use http_body_util::{BodyExt, Full};
    use tracing::instrument::WithSubscriber;

    async fn run(error: ApiError, with_context: bool) -> (StatusCode, ErrorEnvelope) {
        let mut ctx = MiddlewareContext::new();
        if with_context {
            ctx.attach_context(RequestContext::new(ctx.request_id().clone()));
        }
        let request: Request = http::Request::builder()
            .uri("/v2/zones")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let next = Next::handler(move |_ctx, _req| Box::pin(async move { Err(error) }));

        let response = FaultWrapperMiddleware::new(FaultNotifier::disabled())
            .process(&mut ctx, request, next)
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_passes_success_through() {
        let mut ctx = MiddlewareContext::new();
        let request: Request = http::Request::new(Full::new(Bytes::new()));
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Ok(Response::empty(StatusCode::ACCEPTED)) })
        });

        let response = FaultWrapperMiddleware::default()
            .process(&mut ctx, request, next)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_domain_error() {
        let error = DomainError::new(DomainErrorKind::DuplicateZone).with_message("Zone exists");
        let (status, envelope) = run(error.into(), true).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(envelope.code, 409);
        assert_eq!(envelope.error_type, "duplicate_zone");
        assert_eq!(envelope.message.as_deref(), Some("Zone exists"));
        assert!(envelope.errors.is_none());
        assert!(envelope.request_id.is_some());
    }

    #[tokio::test]
    async fn test_domain_error_without_code_or_type() {
        let error = DomainError::new(DomainErrorKind::Generic);
        let (status, envelope) = run(error.into(), true).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.error_type, "unknown");
    }

    #[tokio::test]
    async fn test_out_of_range_code_falls_back_to_500() {
        let error = DomainError::new(DomainErrorKind::BadRequest).with_code(1234);
        let (status, envelope) = run(error.into(), true).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.error_type, "bad_request");
    }

    #[tokio::test]
    async fn test_messaging_timeout_ignores_carried_code() {
        let mut timeout = designate_core::MessagingTimeout::new("central did not reply");
        timeout.error_code = Some(400);
        let (status, envelope) = run(timeout.into(), true).await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(envelope.code, 504);
        assert_eq!(envelope.error_type, "timeout");
    }

    #[tokio::test]
    async fn test_unclassified_error() {
        let (status, envelope) = run(ApiError::unclassified(anyhow::anyhow!("boom")), true).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.error_type, "unknown");
        assert!(envelope.message.is_none());
    }

    #[tokio::test]
    async fn test_missing_context_still_responds() {
        let (status, envelope) = run(ApiError::not_found("no zone"), false).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(envelope.error_type, "not_found");
        assert!(envelope.request_id.is_none());
    }

    #[tokio::test]
    async fn test_unclassified_error_is_logged_with_exception() {
        let logs = CapturedLogs::new();
        let error = ApiError::unclassified(anyhow::anyhow!("zone backend exploded"));
        let (status, _) = run(error, true).with_subscriber(logs.subscriber()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let errors = logs.lines_at("ERROR");
        assert_eq!(errors.len(), 1, "{}", logs.contents());
        assert!(errors[0].contains("Unexpected error while handling request"));
        assert!(errors[0].contains("zone backend exploded"));
    }

    #[tokio::test]
    async fn test_expected_errors_are_not_logged_as_errors() {
        let logs = CapturedLogs::new();
        let (status, _) = run(ApiError::not_found("no zone"), true)
            .with_subscriber(logs.subscriber())
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(logs.lines_at("ERROR").is_empty(), "{}", logs.contents());
    }

    #[tokio::test]
    async fn test_unexpected_domain_error_is_logged() {
        let logs = CapturedLogs::new();
        let error = DomainError::new(DomainErrorKind::NotImplemented).with_message("not yet");
        run(error.into(), true).with_subscriber(logs.subscriber()).await;

        assert_eq!(logs.lines_at("ERROR").len(), 1, "{}", logs.contents());
    }
}
