//! Request context middleware.
//!
//! Builds the [`RequestContext`] for a request and attaches it to the
//! [`MiddlewareContext`] before any handler runs. The configured
//! [`ContextStrategy`] fills in identity; this stage then derives scoping:
//!
//! - **sudo**: `X-Auth-Sudo-Tenant-ID`, else `X-Auth-Sudo-Project-ID`
//! - **all tenants**: header `X-Auth-All-Projects`, else query
//!   `all_projects`, else query `all_tenants`, else `false`
//! - **edit managed records**: query `edit_managed_records`, else header
//!   `X-Designate-Edit-Managed-Records`, else `false`
//!
//! Empty headers count as absent; empty query values do not. The context
//! is attached even when identity or scoping fails part way, carrying
//! whatever was derived before the failure.

use crate::context::MiddlewareContext;
use crate::headers::{
    non_empty_header, ALL_PROJECTS_HEADER, EDIT_MANAGED_RECORDS_HEADER, SUDO_PROJECT_ID_HEADER,
    SUDO_TENANT_ID_HEADER,
};
use crate::middleware::{Middleware, Next};
use crate::strategy::{ContextStrategy, IdentityStatus};
use crate::types::{Request, Response, ResponseExt};
use designate_core::{bool_from_string, ApiError, ApiResult, BoxFuture, RequestContext};
use http::StatusCode;
use std::sync::Arc;

/// Attaches the context being built when dropped.
struct ContextGuard<'c> {
    target: &'c mut MiddlewareContext,
    context: RequestContext,
}

impl<'c> ContextGuard<'c> {
    fn new(target: &'c mut MiddlewareContext, context: RequestContext) -> Self {
        Self { target, context }
    }

    fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        let placeholder = RequestContext::new(self.context.request_id().clone());
        self.target
            .attach_context(std::mem::replace(&mut self.context, placeholder));
    }
}

/// Decoded query string. Later occurrences of a key win.
struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    fn parse(query: Option<&str>) -> ApiResult<Self> {
        let Some(query) = query else {
            return Ok(Self(Vec::new()));
        };
        serde_urlencoded::from_str(query)
            .map(Self)
            .map_err(|e| ApiError::invalid_input(format!("Malformed query string: {e}")))
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Derives the sudo, all-tenants and managed-record scoping of `context`.
fn apply_scoping(request: &Request, context: &mut RequestContext) -> ApiResult<()> {
    let sudo = match non_empty_header(request, SUDO_TENANT_ID_HEADER)? {
        Some(tenant) => Some(tenant),
        None => non_empty_header(request, SUDO_PROJECT_ID_HEADER)?,
    };
    if let Some(tenant) = sudo {
        context.sudo(tenant);
    }

    let params = QueryParams::parse(request.uri().query())?;

    if let Some(value) = non_empty_header(request, ALL_PROJECTS_HEADER)? {
        context.set_all_tenants(bool_from_string(value)?);
    } else if let Some(value) = params.get("all_projects") {
        context.set_all_tenants(bool_from_string(value)?);
    } else if let Some(value) = params.get("all_tenants") {
        context.set_all_tenants(bool_from_string(value)?);
    } else {
        context.set_all_tenants(false);
    }

    if let Some(value) = params.get("edit_managed_records") {
        context.set_edit_managed_records(bool_from_string(value)?);
    } else if let Some(value) = non_empty_header(request, EDIT_MANAGED_RECORDS_HEADER)? {
        context.set_edit_managed_records(bool_from_string(value)?);
    } else {
        context.set_edit_managed_records(false);
    }

    Ok(())
}

/// Middleware building and attaching the request context.
#[derive(Clone)]
pub struct ContextMiddleware {
    strategy: Arc<dyn ContextStrategy>,
}

impl ContextMiddleware {
    /// Creates the middleware around a strategy.
    #[must_use]
    pub fn new(strategy: Arc<dyn ContextStrategy>) -> Self {
        Self { strategy }
    }

    /// Returns the strategy in use.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

impl std::fmt::Debug for ContextMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMiddleware")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl Middleware for ContextMiddleware {
    fn name(&self) -> &'static str {
        "context"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ApiResult<Response>> {
        Box::pin(async move {
            if self.strategy.identity_status(&request) == IdentityStatus::Invalid {
                tracing::debug!(request_id = %ctx.request_id(), "Identity marked invalid");
                return Ok(Response::empty(StatusCode::UNAUTHORIZED));
            }

            let request_id = ctx.request_id().clone();
            let result = {
                let mut guard = ContextGuard::new(ctx, RequestContext::new(request_id));
                self.strategy
                    .build(&request, guard.context_mut())
                    .and_then(|()| apply_scoping(&request, guard.context_mut()))
            };
            result?;

            next.run(ctx, request).await
        })
    }
}
