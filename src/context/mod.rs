//! Ambient request context
//!
//! Binds the authenticated [`Identity`] to the lifetime of one logical flow.
//! The binding is flow-local, not thread-local: it rides on a tokio task
//! local, so it follows the logical continuation across `.await` points and
//! never leaks into an unrelated task multiplexed onto the same worker
//! thread. When a flow is cancelled the task-local value is dropped with the
//! task, so pooled workers never carry stale identity into the next flow.
//!
//! [`scope`] establishes the binding for an entire async continuation;
//! [`RequestContext`] provides the typed accessors handlers use.

use crate::domain::Identity;
use crate::error::{AppError, Result};
use std::cell::RefCell;
use std::future::Future;

tokio::task_local! {
    static AMBIENT_IDENTITY: RefCell<Option<Identity>>;
}

/// Run `fut` with `identity` bound for its entire asynchronous continuation.
///
/// The prior binding (or none) becomes visible again when the continuation
/// completes, on success and failure alike. Scopes nest: an inner scope
/// shadows the outer one and restores it on exit.
pub async fn scope<F>(identity: Identity, fut: F) -> F::Output
where
    F: Future,
{
    AMBIENT_IDENTITY.scope(RefCell::new(Some(identity)), fut).await
}

/// Run `fut` with an empty binding cell established.
///
/// Used by entry points that accept unauthenticated traffic: the cell exists
/// so [`RequestContext::set_current_user`] can bind an identity later in the
/// same flow (e.g. after the authenticator has run).
pub async fn scope_anonymous<F>(fut: F) -> F::Output
where
    F: Future,
{
    AMBIENT_IDENTITY.scope(RefCell::new(None), fut).await
}

/// The identity bound to the calling flow, or `None` outside any scope.
pub fn current() -> Option<Identity> {
    AMBIENT_IDENTITY
        .try_with(|cell| cell.borrow().clone())
        .unwrap_or(None)
}

/// Typed accessors over the ambient context store.
///
/// All reads go straight to the flow-local binding; nothing is cached across
/// flows.
pub struct RequestContext;

impl RequestContext {
    /// Bind `identity` to the current flow, replacing any prior binding.
    ///
    /// Fails when no ambient scope was established for this flow; binding
    /// outside a scope is a wiring bug in the caller, not an authorization
    /// condition.
    pub fn set_current_user(identity: Identity) -> Result<()> {
        AMBIENT_IDENTITY
            .try_with(|cell| {
                *cell.borrow_mut() = Some(identity);
            })
            .map_err(|_| {
                AppError::Configuration(
                    "No ambient context scope established for this flow".to_string(),
                )
            })
    }

    /// The identity bound to the current flow, if any.
    pub fn current_user() -> Option<Identity> {
        current()
    }

    /// The bound user id, if an identity is bound.
    pub fn current_user_id() -> Option<String> {
        current().map(|identity| identity.user_id)
    }

    /// The bound tenant id, if an identity with a non-empty tenant is bound.
    pub fn current_tenant_id() -> Option<String> {
        current().filter(Identity::has_tenant).map(|identity| identity.tenant_id)
    }

    /// True iff the bound identity carries a non-empty tenant id.
    pub fn has_tenant_context() -> bool {
        current().as_ref().is_some_and(Identity::has_tenant)
    }

    /// True iff any identity is bound to the current flow.
    pub fn is_authenticated() -> bool {
        current().is_some()
    }
}
