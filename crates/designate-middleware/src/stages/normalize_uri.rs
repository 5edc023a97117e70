//! URI normalization middleware.
//!
//! Removes trailing slashes from the request path before routing, so
//! `/v2/zones/` and `/v2/zones` reach the same handler. The query string
//! is kept as-is. The root path stays `/`.

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::types::{request_url, Request, Response};
use designate_core::{ApiResult, BoxFuture};
use http::uri::PathAndQuery;
use http::Uri;

/// Strips trailing slashes from `path`.
///
/// # Example
///
/// ```
/// use designate_middleware::stages::normalize_uri::normalize_path;
///
/// assert_eq!(normalize_path("/v2/zones///"), "/v2/zones");
/// assert_eq!(normalize_path("/"), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Returns `uri` with its path normalized, or `None` if it is unchanged.
fn normalize_uri(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    let normalized = normalize_path(path);
    if normalized == path {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{normalized}?{query}"),
        None => normalized.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

/// Middleware stripping trailing slashes from request paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeUriMiddleware;

impl NormalizeUriMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for NormalizeUriMiddleware {
    fn name(&self) -> &'static str {
        "normalize_uri"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            if let Some(uri) = normalize_uri(request.uri()) {
                tracing::trace!(from = %request.uri(), to = %uri, "Normalized request URI");
                *request.uri_mut() = uri;
                ctx.set_url(request_url(&request));
            }
            next.run(ctx, request).await
        })
    }
}
