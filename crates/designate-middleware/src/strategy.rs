//! Context strategies.
//!
//! A [`ContextStrategy`] populates the identity half of a
//! [`RequestContext`]: token, user, tenant, roles and service catalog. The
//! scoping half (sudo, all-tenants, managed-record edits) is derived
//! afterwards by the context stage, identically for every strategy.
//!
//! | Strategy  | Identity source                               |
//! |-----------|-----------------------------------------------|
//! | keystone  | Headers asserted by the identity proxy        |
//! | noauth    | Optional headers with fixed fallbacks         |
//! | test      | Construction-time defaults, header overrides  |

use crate::headers::{
    header_value, AUTH_TOKEN_HEADER, IDENTITY_STATUS_HEADER, NOAUTH_PROJECT_ID_HEADER,
    NOAUTH_USER_ID_HEADER, ROLES_HEADER, SERVICE_CATALOG_HEADER, TENANT_ID_HEADER,
    TEST_ALL_TENANTS_HEADER, TEST_TENANT_ID_HEADER, TEST_USER_ID_HEADER, USER_ID_HEADER,
};
use crate::types::Request;
use designate_config::AuthStrategy;
use designate_core::{bool_from_string, ApiError, ApiResult, RequestContext};
use std::sync::Arc;

/// Whether the identity proxy confirmed the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStatus {
    /// Identity confirmed, or no assertion made.
    Confirmed,
    /// The proxy marked the identity as invalid.
    Invalid,
}

/// Populates a request context's identity from a request.
pub trait ContextStrategy: Send + Sync + 'static {
    /// Returns the strategy name, as configured.
    fn name(&self) -> &'static str;

    /// Checks the identity assertion before any context is built.
    fn identity_status(&self, _request: &Request) -> IdentityStatus {
        IdentityStatus::Confirmed
    }

    /// Fills in the identity fields of `context`.
    ///
    /// Fields set before an error are kept.
    fn build(&self, request: &Request, context: &mut RequestContext) -> ApiResult<()>;
}

/// Returns the strategy configured by `auth-strategy`.
pub fn strategy_for(strategy: AuthStrategy) -> Arc<dyn ContextStrategy> {
    match strategy {
        AuthStrategy::Keystone => Arc::new(KeystoneStrategy::new()),
        AuthStrategy::NoAuth => Arc::new(NoAuthStrategy::new()),
        AuthStrategy::Test => Arc::new(TestStrategy::new(None, None)),
    }
}

fn split_roles(roles: &str) -> Vec<&str> {
    roles
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .collect()
}

/// Trusts identity headers asserted by the identity-verification proxy.
#[derive(Debug, Clone)]
pub struct KeystoneStrategy;

impl KeystoneStrategy {
    /// Creates the strategy.
    #[must_use]
    pub fn new() -> Self {
        tracing::info!("Starting designate keystonecontext middleware");
        Self
    }
}

impl Default for KeystoneStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStrategy for KeystoneStrategy {
    fn name(&self) -> &'static str {
        "keystone"
    }

    fn identity_status(&self, request: &Request) -> IdentityStatus {
        let invalid = request
            .headers()
            .get(IDENTITY_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("invalid"));

        if invalid {
            IdentityStatus::Invalid
        } else {
            IdentityStatus::Confirmed
        }
    }

    fn build(&self, request: &Request, context: &mut RequestContext) -> ApiResult<()> {
        if let Some(token) = header_value(request, AUTH_TOKEN_HEADER)? {
            context.set_auth_token(token);
        }
        if let Some(user) = header_value(request, USER_ID_HEADER)? {
            context.set_user(user);
        }
        if let Some(tenant) = header_value(request, TENANT_ID_HEADER)? {
            context.set_tenant(tenant);
        }

        let catalog = header_value(request, SERVICE_CATALOG_HEADER)?.filter(|v| !v.is_empty());
        if let Some(catalog) = catalog {
            let catalog: serde_json::Value = serde_json::from_str(catalog).map_err(|e| {
                ApiError::invalid_input(format!("Malformed service catalog: {e}"))
            })?;
            context.set_service_catalog(catalog);
        }

        let roles = header_value(request, ROLES_HEADER)?
            .ok_or_else(|| ApiError::invalid_input("Missing X-Roles header"))?;
        context.set_roles(split_roles(roles));

        Ok(())
    }
}

/// Fixed fallback identity for deployments without identity verification.
#[derive(Debug, Clone)]
pub struct NoAuthStrategy;

impl NoAuthStrategy {
    /// User assumed when no user header is sent.
    pub const DEFAULT_USER: &'static str = "noauth-user";
    /// Project assumed when no project header is sent.
    pub const DEFAULT_PROJECT: &'static str = "noauth-project";
    /// Roles assumed when no roles header is sent.
    pub const DEFAULT_ROLES: &'static str = "admin";

    /// Creates the strategy.
    #[must_use]
    pub fn new() -> Self {
        tracing::info!("Starting designate noauthcontext middleware");
        tracing::warn!(
            default_roles = Self::DEFAULT_ROLES,
            "No authentication in use, unauthenticated callers are granted the default roles"
        );
        Self
    }
}

impl Default for NoAuthStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStrategy for NoAuthStrategy {
    fn name(&self) -> &'static str {
        "noauth"
    }

    fn build(&self, request: &Request, context: &mut RequestContext) -> ApiResult<()> {
        if let Some(token) = header_value(request, AUTH_TOKEN_HEADER)? {
            context.set_auth_token(token);
        }
        context.set_user(
            header_value(request, NOAUTH_USER_ID_HEADER)?.unwrap_or(Self::DEFAULT_USER),
        );
        context.set_tenant(
            header_value(request, NOAUTH_PROJECT_ID_HEADER)?.unwrap_or(Self::DEFAULT_PROJECT),
        );
        context.set_roles(split_roles(
            header_value(request, ROLES_HEADER)?.unwrap_or(Self::DEFAULT_ROLES),
        ));
        Ok(())
    }
}

/// Fixed test identity, overridable per request.
///
/// Never for production: construction logs at error level.
#[derive(Debug, Clone)]
pub struct TestStrategy {
    default_user: Option<String>,
    default_tenant: Option<String>,
}

impl TestStrategy {
    /// Creates the strategy with default user and tenant ids.
    #[must_use]
    pub fn new(default_tenant: Option<String>, default_user: Option<String>) -> Self {
        tracing::error!("Starting designate testcontext middleware");
        tracing::error!("**** DO NOT USE IN PRODUCTION ****");
        Self {
            default_user,
            default_tenant,
        }
    }
}

impl Default for TestStrategy {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ContextStrategy for TestStrategy {
    fn name(&self) -> &'static str {
        "test"
    }

    fn build(&self, request: &Request, context: &mut RequestContext) -> ApiResult<()> {
        let user = header_value(request, TEST_USER_ID_HEADER)?.or(self.default_user.as_deref());
        if let Some(user) = user {
            context.set_user(user);
        }

        let tenant =
            header_value(request, TEST_TENANT_ID_HEADER)?.or(self.default_tenant.as_deref());
        if let Some(tenant) = tenant {
            context.set_tenant(tenant);
        }

        if let Some(all_tenants) = header_value(request, TEST_ALL_TENANTS_HEADER)? {
            context.set_all_tenants(bool_from_string(all_tenants)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_logs::CapturedLogs;
    use bytes::Bytes;
    use designate_core::{DomainErrorKind, RequestId};
    use http_body_util::Full;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/v2/zones");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn context() -> RequestContext {
        RequestContext::new(RequestId::from_upstream("req-test"))
    }

    #[test]
    fn test_strategy_for() {
        assert_eq!(strategy_for(AuthStrategy::Keystone).name(), "keystone");
        assert_eq!(strategy_for(AuthStrategy::NoAuth).name(), "noauth");
        assert_eq!(strategy_for(AuthStrategy::Test).name(), "test");
    }

    #[test]
    fn test_keystone_identity_status() {
        let strategy = KeystoneStrategy::new();
        assert_eq!(
            strategy.identity_status(&request(&[("X-Identity-Status", "Invalid")])),
            IdentityStatus::Invalid
        );
        assert_eq!(
            strategy.identity_status(&request(&[("X-Identity-Status", "invalid")])),
            IdentityStatus::Invalid
        );
        assert_eq!(
            strategy.identity_status(&request(&[("X-Identity-Status", "Confirmed")])),
            IdentityStatus::Confirmed
        );
        assert_eq!(strategy.identity_status(&request(&[])), IdentityStatus::Confirmed);
    }

    #[test]
    fn test_keystone_build() {
        let req = request(&[
            ("X-Auth-Token", "tok"),
            ("X-User-ID", "u-1"),
            ("X-Tenant-ID", "t-1"),
            ("X-Roles", "admin, member,,"),
            ("X-Service-Catalog", r#"[{"type": "dns"}]"#),
        ]);
        let mut ctx = context();
        KeystoneStrategy::new().build(&req, &mut ctx).unwrap();

        assert_eq!(ctx.auth_token(), Some("tok"));
        assert_eq!(ctx.user(), Some("u-1"));
        assert_eq!(ctx.tenant(), Some("t-1"));
        assert_eq!(ctx.roles().len(), 2);
        assert!(ctx.has_role("admin"));
        assert!(ctx.has_role("member"));
        assert_eq!(ctx.service_catalog().unwrap()[0]["type"], "dns");
    }

    #[test]
    fn test_keystone_missing_roles() {
        let req = request(&[("X-User-ID", "u-1"), ("X-Tenant-ID", "t-1")]);
        let mut ctx = context();
        let err = KeystoneStrategy::new().build(&req, &mut ctx).unwrap_err();

        assert_eq!(err.domain_kind(), Some(DomainErrorKind::InvalidInput));
        // Fields derived before the failure stay set.
        assert_eq!(ctx.tenant(), Some("t-1"));
    }

    #[test]
    fn test_keystone_malformed_catalog() {
        let req = request(&[("X-Roles", "member"), ("X-Service-Catalog", "{not json")]);
        let err = KeystoneStrategy::new().build(&req, &mut context()).unwrap_err();
        assert_eq!(err.domain_kind(), Some(DomainErrorKind::InvalidInput));
    }

    #[test]
    fn test_noauth_defaults() {
        let mut ctx = context();
        NoAuthStrategy::new().build(&request(&[]), &mut ctx).unwrap();

        assert_eq!(ctx.auth_token(), None);
        assert_eq!(ctx.user(), Some("noauth-user"));
        assert_eq!(ctx.tenant(), Some("noauth-project"));
        assert!(ctx.has_role("admin"));
    }

    #[test]
    fn test_noauth_headers_override() {
        let req = request(&[
            ("X-Auth-User-ID", "alice"),
            ("X-Auth-Project-ID", "p-9"),
            ("X-Roles", "member"),
        ]);
        let mut ctx = context();
        NoAuthStrategy::new().build(&req, &mut ctx).unwrap();

        assert_eq!(ctx.user(), Some("alice"));
        assert_eq!(ctx.tenant(), Some("p-9"));
        assert!(ctx.has_role("member"));
        assert!(!ctx.has_role("admin"));
    }

    #[test]
    fn test_test_strategy() {
        let strategy = TestStrategy::new(Some("t-default".into()), Some("u-default".into()));

        let mut ctx = context();
        strategy.build(&request(&[]), &mut ctx).unwrap();
        assert_eq!(ctx.user(), Some("u-default"));
        assert_eq!(ctx.tenant(), Some("t-default"));
        assert!(!ctx.all_tenants());

        let mut ctx = context();
        let req = request(&[
            ("X-Test-User-ID", "u-2"),
            ("X-Test-Tenant-ID", "t-2"),
            ("X-Test-All-Tenants", "True"),
        ]);
        strategy.build(&req, &mut ctx).unwrap();
        assert_eq!(ctx.user(), Some("u-2"));
        assert_eq!(ctx.tenant(), Some("t-2"));
        assert!(ctx.all_tenants());
    }

    #[test]
    fn test_test_strategy_bad_flag() {
        let strategy = TestStrategy::new(None, None);
        let err = strategy
            .build(&request(&[("X-Test-All-Tenants", "sometimes")]), &mut context())
            .unwrap_err();
        assert_eq!(err.domain_kind(), Some(DomainErrorKind::InvalidInput));
    }

    #[test]
    fn test_default_logs_startup_warnings() {
        let logs = CapturedLogs::new();
        tracing::subscriber::with_default(logs.subscriber(), || {
            let _ = NoAuthStrategy::default();
        });
        let warnings = logs.lines_at("WARN");
        assert_eq!(warnings.len(), 1, "{}", logs.contents());
        assert!(warnings[0].contains("No authentication in use"));

        let logs = CapturedLogs::new();
        tracing::subscriber::with_default(logs.subscriber(), || {
            let _ = TestStrategy::default();
        });
        let errors = logs.lines_at("ERROR");
        assert_eq!(errors.len(), 2, "{}", logs.contents());
        assert!(errors[1].contains("DO NOT USE IN PRODUCTION"));
    }
}
