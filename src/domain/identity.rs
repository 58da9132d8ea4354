//! Identity domain model
//!
//! An `Identity` is the authenticated user+tenant snapshot produced by the
//! external authentication layer before any protected handler runs. It is
//! bound to exactly one flow, never persisted, and dropped when the flow ends.

use serde::{Deserialize, Serialize};

/// Authenticated user information bound to the current flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque user identifier from the authenticator
    pub user_id: String,
    /// User's email address
    pub email: String,
    /// Tenant the request is scoped to
    pub tenant_id: String,
    /// Role within the tenant, when the authenticator supplies one
    pub role: Option<String>,
}

impl Identity {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            tenant_id: tenant_id.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Whether this identity carries a non-empty tenant scope
    pub fn has_tenant(&self) -> bool {
        !self.tenant_id.is_empty()
    }
}
