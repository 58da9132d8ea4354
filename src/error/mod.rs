//! Unified error handling for Kite Core

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Fixed rejection message for every tenant authorization failure.
///
/// The same message is returned whether the tenant context is absent or the
/// candidate identifier belongs to a different tenant, so a caller can never
/// probe which tenant identifiers exist.
pub const TENANT_ACCESS_DENIED: &str = "Access denied";

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Protection error: {0}")]
    Protection(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Lifecycle(LifecycleFailures),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The fixed tenant authorization rejection.
    pub fn tenant_access_denied() -> Self {
        AppError::Forbidden(TENANT_ACCESS_DENIED.to_string())
    }
}

/// Lifecycle phase a hook failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    Bootstrap,
    Shutdown,
}

impl std::fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecyclePhase::Bootstrap => write!(f, "bootstrap"),
            LifecyclePhase::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// One recorded hook failure
#[derive(Debug, Clone, Serialize)]
pub struct HookFailure {
    /// Name of the plugin whose hook failed
    pub plugin: String,
    /// Phase the failure occurred in
    pub phase: LifecyclePhase,
    /// Error message reported by the hook
    pub message: String,
    /// When the failure was recorded
    pub occurred_at: DateTime<Utc>,
}

/// Aggregate of hook failures from one lifecycle pass.
///
/// Collected while the remaining hooks keep running and surfaced to the
/// caller only after the whole pass completes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LifecycleFailures {
    pub failures: Vec<HookFailure>,
}

impl LifecycleFailures {
    pub fn record(&mut self, plugin: &str, phase: LifecyclePhase, message: String) {
        self.failures.push(HookFailure {
            plugin: plugin.to_string(),
            phase,
            message,
            occurred_at: Utc::now(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Convert into a `Result`: `Ok(())` when nothing failed, otherwise the
    /// aggregate as an `AppError::Lifecycle`.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Lifecycle(self))
        }
    }
}

impl std::fmt::Display for LifecycleFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lifecycle hook(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, " [{} {}: {}]", failure.phase, failure.plugin, failure.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Configuration("duplicate plugin name: user".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: duplicate plugin name: user"
        );
    }

    #[test]
    fn test_error_conversion() {
        let err: AppError = anyhow::anyhow!("Something went wrong").into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_tenant_access_denied_is_fixed() {
        let err = AppError::tenant_access_denied();
        assert_eq!(err.to_string(), format!("Forbidden: {}", TENANT_ACCESS_DENIED));
    }

    #[test]
    fn test_lifecycle_failures_aggregate() {
        let mut failures = LifecycleFailures::default();
        assert!(failures.clone().into_result().is_ok());

        failures.record("mcp-gateway", LifecyclePhase::Bootstrap, "port in use".to_string());
        failures.record("seed", LifecyclePhase::Bootstrap, "missing tenant".to_string());

        assert_eq!(failures.len(), 2);
        let err = failures.into_result().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("2 lifecycle hook(s) failed"));
        assert!(msg.contains("bootstrap mcp-gateway: port in use"));
        assert!(msg.contains("bootstrap seed: missing tenant"));
    }
}
