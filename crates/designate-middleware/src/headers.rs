//! Header names and lookup helpers.

use crate::types::Request;
use designate_core::{ApiError, ApiResult};

/// Upstream request id, adopted and echoed by the request-id stage.
pub const REQUEST_ID_HEADER: &str = "x-openstack-request-id";

/// Identity status asserted by the identity-verification proxy.
pub const IDENTITY_STATUS_HEADER: &str = "x-identity-status";

/// Authentication token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Verified user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Verified tenant id.
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Comma-separated role names.
pub const ROLES_HEADER: &str = "x-roles";

/// JSON service catalog.
pub const SERVICE_CATALOG_HEADER: &str = "x-service-catalog";

/// User id used by the no-auth strategy.
pub const NOAUTH_USER_ID_HEADER: &str = "x-auth-user-id";

/// Project id used by the no-auth strategy.
pub const NOAUTH_PROJECT_ID_HEADER: &str = "x-auth-project-id";

/// Impersonated tenant.
pub const SUDO_TENANT_ID_HEADER: &str = "x-auth-sudo-tenant-id";

/// Impersonated project.
pub const SUDO_PROJECT_ID_HEADER: &str = "x-auth-sudo-project-id";

/// Cross-tenant visibility flag.
pub const ALL_PROJECTS_HEADER: &str = "x-auth-all-projects";

/// Managed-record edit flag.
pub const EDIT_MANAGED_RECORDS_HEADER: &str = "x-designate-edit-managed-records";

/// Test strategy user override.
pub const TEST_USER_ID_HEADER: &str = "x-test-user-id";

/// Test strategy tenant override.
pub const TEST_TENANT_ID_HEADER: &str = "x-test-tenant-id";

/// Test strategy all-tenants override.
pub const TEST_ALL_TENANTS_HEADER: &str = "x-test-all-tenants";

/// Returns a header's value as text.
///
/// # Errors
///
/// Returns `InvalidInput` if the value is not visible ASCII.
pub fn header_value<'r>(request: &'r Request, name: &str) -> ApiResult<Option<&'r str>> {
    match request.headers().get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ApiError::invalid_input(format!("Header '{name}' is not valid text"))),
    }
}

/// Returns a header's value if it is present and non-empty.
pub fn non_empty_header<'r>(request: &'r Request, name: &str) -> ApiResult<Option<&'r str>> {
    Ok(header_value(request, name)?.filter(|v| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::HeaderValue;
    use http_body_util::Full;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request: Request = http::Request::builder()
            .header("X-Roles", "admin,member")
            .body(Full::new(Bytes::new()))
            .unwrap();

        assert_eq!(header_value(&request, ROLES_HEADER).unwrap(), Some("admin,member"));
        assert_eq!(header_value(&request, TENANT_ID_HEADER).unwrap(), None);
    }

    #[test]
    fn test_non_empty_header() {
        let request: Request = http::Request::builder()
            .header(SUDO_TENANT_ID_HEADER, "")
            .header(SUDO_PROJECT_ID_HEADER, "p-1")
            .body(Full::new(Bytes::new()))
            .unwrap();

        assert_eq!(non_empty_header(&request, SUDO_TENANT_ID_HEADER).unwrap(), None);
        assert_eq!(non_empty_header(&request, SUDO_PROJECT_ID_HEADER).unwrap(), Some("p-1"));
    }

    #[test]
    fn test_opaque_header_is_invalid_input() {
        let mut request: Request = http::Request::new(Full::new(Bytes::new()));
        request.headers_mut().insert(
            USER_ID_HEADER,
            HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap(),
        );

        let err = header_value(&request, USER_ID_HEADER).unwrap_err();
        assert_eq!(
            err.domain_kind(),
            Some(designate_core::DomainErrorKind::InvalidInput)
        );
    }
}
