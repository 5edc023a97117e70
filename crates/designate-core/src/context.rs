//! Request context types.
//!
//! The [`RequestContext`] carries the caller's identity and tenancy scoping
//! for a single request. It is built once by the context stage of the
//! pipeline and read by every stage and handler after it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// An opaque identifier for a request.
///
/// Generated identifiers have the form `req-<uuid v7>`. Identifiers assigned
/// by an upstream proxy are adopted verbatim.
///
/// # Example
///
/// ```
/// use designate_core::RequestId;
///
/// let id = RequestId::generate();
/// assert!(id.as_str().starts_with("req-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a fresh, time-ordered request id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("req-{}", Uuid::now_v7()))
    }

    /// Wraps an identifier assigned elsewhere.
    #[must_use]
    pub fn from_upstream(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-request identity and scoping record.
///
/// Every field except `request_id` starts empty (or `false`) and is filled
/// in by a context strategy and the scoping rules. Once the context is
/// stored in the request environment it is only handed out by shared
/// reference.
///
/// # Example
///
/// ```
/// use designate_core::{RequestContext, RequestId};
///
/// let mut ctx = RequestContext::new(RequestId::generate());
/// ctx.set_tenant("project-a");
/// ctx.set_roles(["member", "reader"]);
///
/// assert_eq!(ctx.tenant(), Some("project-a"));
/// assert!(ctx.has_role("member"));
/// assert!(!ctx.all_tenants());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContext {
    request_id: RequestId,

    #[serde(skip_serializing)]
    auth_token: Option<String>,

    user: Option<String>,

    tenant: Option<String>,

    /// The caller's own tenant while a sudo tenant is in effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    original_tenant: Option<String>,

    roles: BTreeSet<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    service_catalog: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sudo_tenant_id: Option<String>,

    all_tenants: bool,

    edit_managed_records: bool,
}

impl RequestContext {
    /// Creates an empty context for the given request.
    #[must_use]
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            auth_token: None,
            user: None,
            tenant: None,
            original_tenant: None,
            roles: BTreeSet::new(),
            service_catalog: None,
            sudo_tenant_id: None,
            all_tenants: false,
            edit_managed_records: false,
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Returns the auth token asserted by the identity proxy.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// Sets the auth token.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Returns the user id.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Sets the user id.
    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = Some(user.into());
    }

    /// Returns the tenant the request is scoped to.
    ///
    /// While a sudo tenant is in effect this is the impersonated tenant.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// Sets the tenant.
    pub fn set_tenant(&mut self, tenant: impl Into<String>) {
        self.tenant = Some(tenant.into());
    }

    /// Returns the caller's own tenant when sudo is in effect.
    #[must_use]
    pub fn original_tenant(&self) -> Option<&str> {
        self.original_tenant.as_deref()
    }

    /// Returns the caller's roles.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Replaces the caller's roles.
    pub fn set_roles<I, S>(&mut self, roles: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
    }

    /// Returns `true` if the caller holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns the service catalog, if one was asserted.
    #[must_use]
    pub fn service_catalog(&self) -> Option<&serde_json::Value> {
        self.service_catalog.as_ref()
    }

    /// Sets the service catalog.
    pub fn set_service_catalog(&mut self, catalog: serde_json::Value) {
        self.service_catalog = Some(catalog);
    }

    /// Returns the impersonated tenant, if any.
    #[must_use]
    pub fn sudo_tenant_id(&self) -> Option<&str> {
        self.sudo_tenant_id.as_deref()
    }

    /// Scopes the request to `tenant_id` instead of the caller's own tenant.
    ///
    /// The caller's tenant is kept in [`original_tenant`](Self::original_tenant).
    pub fn sudo(&mut self, tenant_id: impl Into<String>) {
        let tenant_id = tenant_id.into();
        tracing::info!(
            request_id = %self.request_id,
            original_tenant = ?self.tenant,
            sudo_tenant = %tenant_id,
            "Request scoped to sudo tenant"
        );
        self.original_tenant = self.tenant.take();
        self.tenant = Some(tenant_id.clone());
        self.sudo_tenant_id = Some(tenant_id);
    }

    /// Returns `true` if queries should span all tenants.
    #[must_use]
    pub fn all_tenants(&self) -> bool {
        self.all_tenants
    }

    /// Sets the all-tenants flag.
    pub fn set_all_tenants(&mut self, value: bool) {
        self.all_tenants = value;
    }

    /// Returns `true` if system-managed records may be edited.
    #[must_use]
    pub fn edit_managed_records(&self) -> bool {
        self.edit_managed_records
    }

    /// Sets the edit-managed-records flag.
    pub fn set_edit_managed_records(&mut self, value: bool) {
        self.edit_managed_records = value;
    }
}
