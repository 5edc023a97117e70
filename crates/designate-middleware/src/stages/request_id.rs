//! Request ID middleware.
//!
//! Outermost stage. Adopts the request id assigned upstream in
//! `X-Openstack-Request-Id`, or generates a new `req-<uuid>` id, and
//! echoes it on the response so callers can correlate their requests with
//! server logs.
//!
//! ## Accepted Upstream Ids
//!
//! An upstream id is adopted when it is non-empty, printable ASCII and at
//! most [`MAX_REQUEST_ID_LEN`] bytes. Anything else is replaced.

use crate::context::MiddlewareContext;
use crate::headers::REQUEST_ID_HEADER;
use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response};
use designate_core::{ApiResult, BoxFuture, RequestId};
use http::HeaderValue;

/// Longest upstream request id that is adopted.
pub const MAX_REQUEST_ID_LEN: usize = 256;

/// Middleware that adopts or generates request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
    /// Creates a new Request ID middleware.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn extract_request_id(request: &Request) -> Option<RequestId> {
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|id| is_acceptable(id))
            .map(RequestId::from_upstream)
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic())
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            let request_id =
                Self::extract_request_id(&request).unwrap_or_else(RequestId::generate);
            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, request).await?;

            if let Ok(value) = HeaderValue::from_str(ctx.request_id().as_str()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}
