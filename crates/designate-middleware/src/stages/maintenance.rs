//! Maintenance mode middleware.
//!
//! While maintenance mode is on, requests are rejected with
//! `503 Service Unavailable` and `Retry-After: 60`, unless the caller's
//! request context holds the bypass role.

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response, ResponseExt};
use designate_config::ServiceApiConfig;
use designate_core::{ApiResult, BoxFuture, ErrorEnvelope};
use designate_telemetry::record_maintenance_rejection;
use http::header::RETRY_AFTER;
use http::{HeaderValue, StatusCode};

/// Seconds clients are asked to wait before retrying.
pub const RETRY_AFTER_SECS: u32 = 60;

/// Middleware rejecting requests during maintenance windows.
#[derive(Debug, Clone)]
pub struct MaintenanceMiddleware {
    enabled: bool,
    role: String,
}

impl MaintenanceMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new(enabled: bool, role: impl Into<String>) -> Self {
        tracing::info!("Starting designate maintenance middleware");
        Self {
            enabled,
            role: role.into(),
        }
    }

    /// Creates the middleware from the `[service_api]` section.
    #[must_use]
    pub fn from_config(config: &ServiceApiConfig) -> Self {
        Self::new(config.maintenance_mode, config.maintenance_mode_role.clone())
    }

    /// Returns `true` if maintenance mode is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn unavailable() -> Response {
        let envelope = ErrorEnvelope::new(
            StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            "service_unavailable",
        );
        let mut response = Response::json(StatusCode::SERVICE_UNAVAILABLE, &envelope);
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        response
    }
}

impl Middleware for MaintenanceMiddleware {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            if !self.enabled {
                return next.run(ctx, request).await;
            }

            let bypass = ctx
                .request_context()
                .is_some_and(|context| context.has_role(&self.role));
            if bypass {
                tracing::warn!(
                    request_id = %ctx.request_id(),
                    role = %self.role,
                    "Request authorized to bypass maintenance mode"
                );
                return next.run(ctx, request).await;
            }

            record_maintenance_rejection();
            Ok(Self::unavailable())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use designate_core::RequestContext;
    use http_body_util::{BodyExt, Full};

    async fn run(middleware: &MaintenanceMiddleware, roles: Option<&[&str]>) -> Response {
        let mut ctx = MiddlewareContext::new();
        if let Some(roles) = roles {
            let mut context = RequestContext::new(ctx.request_id().clone());
            context.set_roles(roles.iter().copied());
            ctx.attach_context(context);
        }
        let request: Request = http::Request::new(Full::new(Bytes::new()));
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Ok(Response::empty(StatusCode::OK)) })
        });
        middleware.process(&mut ctx, request, next).await.unwrap()
    }

    #[tokio::test]
    async fn test_disabled_passes_through() {
        let middleware = MaintenanceMiddleware::from_config(&ServiceApiConfig::default());
        assert!(!middleware.is_enabled());
        assert_eq!(run(&middleware, Some(&["member"])).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bypass_role_passes_through() {
        let middleware = MaintenanceMiddleware::new(true, "admin");
        assert_eq!(run(&middleware, Some(&["admin", "member"])).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_without_role() {
        let middleware = MaintenanceMiddleware::new(true, "admin");
        let response = run(&middleware, Some(&["member"])).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "60");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({"code": 503, "type": "service_unavailable"}));
    }

    #[tokio::test]
    async fn test_rejects_without_context() {
        let middleware = MaintenanceMiddleware::new(true, "admin");
        assert_eq!(
            run(&middleware, None).await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_custom_role() {
        let middleware = MaintenanceMiddleware::new(true, "ops");
        assert_eq!(run(&middleware, Some(&["ops"])).await.status(), StatusCode::OK);
        assert_eq!(
            run(&middleware, Some(&["admin"])).await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
