//! Tenant isolation enforcement
//!
//! Every handler that accepts a client-supplied tenant identifier must route
//! it through [`TenantFilterService::validate_tenant_id`] before persistence,
//! so a request payload can never override the server-derived tenant. The
//! rejection message is a single fixed string for both "no tenant bound" and
//! "wrong tenant": responses must not reveal whether another tenant exists.

use crate::context::RequestContext;
use crate::error::{AppError, Result};

/// Stateless tenant-match enforcement over the ambient request context
pub struct TenantFilterService;

impl TenantFilterService {
    /// The tenant bound to the current flow, or `None`. Never errors.
    pub fn current_tenant_id() -> Option<String> {
        RequestContext::current_tenant_id()
    }

    /// True iff the current flow carries a non-empty tenant id.
    pub fn has_tenant_context() -> bool {
        RequestContext::has_tenant_context()
    }

    /// Validate a client-supplied tenant identifier against the bound tenant.
    ///
    /// Succeeds only when `candidate` equals the tenant bound to the current
    /// flow. Fails with the fixed authorization rejection when the candidate
    /// differs or when no tenant is bound at all.
    pub fn validate_tenant_id(candidate: &str) -> Result<()> {
        match RequestContext::current_tenant_id() {
            Some(bound) if bound == candidate => Ok(()),
            Some(_) => {
                tracing::warn!(candidate, "Rejected cross-tenant access attempt");
                Err(AppError::tenant_access_denied())
            }
            None => {
                tracing::warn!(candidate, "Rejected tenant access without tenant context");
                Err(AppError::tenant_access_denied())
            }
        }
    }

    /// The bound tenant id, or the fixed authorization rejection.
    ///
    /// For handlers that need the server-derived tenant for persistence;
    /// a missing tenant context is an authorization error, never a silent
    /// default.
    pub fn require_tenant_id() -> Result<String> {
        RequestContext::current_tenant_id().ok_or_else(AppError::tenant_access_denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context;
    use crate::domain::Identity;
    use crate::error::TENANT_ACCESS_DENIED;

    fn alice() -> Identity {
        Identity::new("user-123", "alice@example.com", "tenant-a")
    }

    #[tokio::test]
    async fn test_validate_matching_tenant() {
        context::scope(alice(), async {
            assert!(TenantFilterService::validate_tenant_id("tenant-a").is_ok());
        })
        .await;
    }

    #[tokio::test]
    async fn test_validate_mismatched_tenant() {
        context::scope(alice(), async {
            let err = TenantFilterService::validate_tenant_id("tenant-b").unwrap_err();
            assert_eq!(err.to_string(), format!("Forbidden: {}", TENANT_ACCESS_DENIED));
        })
        .await;
    }

    #[tokio::test]
    async fn test_validate_without_binding() {
        let err = TenantFilterService::validate_tenant_id("tenant-a").unwrap_err();
        assert_eq!(err.to_string(), format!("Forbidden: {}", TENANT_ACCESS_DENIED));
    }

    #[tokio::test]
    async fn test_absent_and_mismatch_are_indistinguishable() {
        let absent = TenantFilterService::validate_tenant_id("tenant-a")
            .unwrap_err()
            .to_string();

        let mismatch = context::scope(alice(), async {
            TenantFilterService::validate_tenant_id("tenant-b")
                .unwrap_err()
                .to_string()
        })
        .await;

        assert_eq!(absent, mismatch);
    }

    #[tokio::test]
    async fn test_require_tenant_id() {
        context::scope(alice(), async {
            assert_eq!(
                TenantFilterService::require_tenant_id().unwrap(),
                "tenant-a"
            );
        })
        .await;

        assert!(TenantFilterService::require_tenant_id().is_err());
    }

    #[tokio::test]
    async fn test_has_tenant_context_mirrors_request_context() {
        assert!(!TenantFilterService::has_tenant_context());

        context::scope(alice(), async {
            assert!(TenantFilterService::has_tenant_context());
            assert_eq!(
                TenantFilterService::current_tenant_id().as_deref(),
                Some("tenant-a")
            );
        })
        .await;
    }
}
