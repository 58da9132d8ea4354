//! Plugin lifecycle registry
//!
//! Ordered collection of [`PluginDescriptor`]s with their lifecycle hooks.
//! Bootstrap runs ascending by priority tier (ties broken by registration
//! order), awaiting each hook before the next, so foundational modules are
//! fully up before dependents run. Shutdown replays the recorded bootstrap
//! order in exact reverse. A hook failure marks that plugin Failed but never
//! blocks the remaining, independent plugins; the aggregate is surfaced once
//! the whole pass completes.
//!
//! The registry is mutated only during startup and shutdown under a single
//! writer (`&mut self`); steady-state serving only reads.

pub mod accessor;

pub use accessor::ModuleAccessor;

use crate::domain::{PluginDescriptor, PluginStatus};
use crate::error::{AppError, LifecycleFailures, LifecyclePhase, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use validator::Validate;

/// Asynchronous lifecycle hooks every feature module supplies
#[async_trait]
pub trait PluginLifecycle: Send + Sync {
    /// Called once at process startup, after all lower-tier plugins finished.
    async fn on_application_bootstrap(&self, accessor: &ModuleAccessor) -> Result<()>;

    /// Called once at process shutdown, before any lower-tier plugin.
    async fn on_application_shutdown(&self, accessor: &ModuleAccessor) -> Result<()>;
}

/// One registered plugin: its descriptor, hooks, and lifecycle status
pub struct PluginEntry {
    pub descriptor: PluginDescriptor,
    pub status: PluginStatus,
    pub registered_at: DateTime<Utc>,
    hooks: Arc<dyn PluginLifecycle>,
}

impl std::fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.descriptor.name)
            .field("priority", &self.descriptor.priority)
            .field("status", &self.status)
            .finish()
    }
}

/// Ordered plugin collection driving bootstrap and shutdown
#[derive(Default)]
pub struct PluginRegistry {
    /// All entries in registration order
    entries: Vec<PluginEntry>,
    /// Names of successfully bootstrapped plugins, in bootstrap order
    bootstrap_order: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Fails as a Configuration error on an invalid
    /// descriptor or a duplicate name; the registry is left unchanged.
    pub fn register(
        &mut self,
        descriptor: PluginDescriptor,
        hooks: Arc<dyn PluginLifecycle>,
    ) -> Result<()> {
        descriptor
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        if self.entries.iter().any(|e| e.descriptor.name == descriptor.name) {
            return Err(AppError::Configuration(format!(
                "Duplicate plugin name: {}",
                descriptor.name
            )));
        }

        tracing::info!(
            plugin = %descriptor.name,
            tier = %descriptor.priority,
            plugin_type = %descriptor.plugin_type,
            protected = descriptor.is_protected,
            "Registered plugin"
        );

        self.entries.push(PluginEntry {
            descriptor,
            status: PluginStatus::Registered,
            registered_at: Utc::now(),
            hooks,
        });

        Ok(())
    }

    /// Bootstrap every registered plugin, lowest priority tier first.
    ///
    /// Hooks run strictly sequentially; each is awaited before the next
    /// starts. A failing hook moves its plugin to Failed and is recorded,
    /// but the remaining plugins still bootstrap. The aggregate of failures
    /// is returned only after every hook has run.
    pub async fn bootstrap_all(&mut self, accessor: &ModuleAccessor) -> Result<()> {
        let order = self.active_order(|status| status == PluginStatus::Registered);
        let mut failures = LifecycleFailures::default();

        for idx in order {
            let (name, tier, hooks) = {
                let entry = &self.entries[idx];
                (
                    entry.descriptor.name.clone(),
                    entry.descriptor.priority,
                    entry.hooks.clone(),
                )
            };

            tracing::info!(plugin = %name, tier = %tier, "Bootstrapping plugin");

            match hooks.on_application_bootstrap(accessor).await {
                Ok(()) => {
                    self.entries[idx].status = PluginStatus::Bootstrapped;
                    self.bootstrap_order.push(name);
                }
                Err(e) => {
                    tracing::error!(plugin = %name, error = %e, "Plugin bootstrap failed");
                    self.entries[idx].status = PluginStatus::Failed;
                    failures.record(&name, LifecyclePhase::Bootstrap, e.to_string());
                }
            }
        }

        failures.into_result()
    }

    /// Shut down bootstrapped plugins in exact reverse of the recorded
    /// bootstrap order, best-effort: a failing hook is recorded and the
    /// remaining shutdowns still run.
    pub async fn shutdown_all(&mut self, accessor: &ModuleAccessor) -> Result<()> {
        let order: Vec<String> = self.bootstrap_order.drain(..).rev().collect();
        let mut failures = LifecycleFailures::default();

        for name in order {
            let Some(idx) = self.index_of(&name) else {
                // Removed after bootstrap; nothing left to shut down.
                continue;
            };
            let hooks = self.entries[idx].hooks.clone();

            tracing::info!(plugin = %name, "Shutting down plugin");

            match hooks.on_application_shutdown(accessor).await {
                Ok(()) => {
                    self.entries[idx].status = PluginStatus::ShutDown;
                }
                Err(e) => {
                    tracing::error!(plugin = %name, error = %e, "Plugin shutdown failed");
                    self.entries[idx].status = PluginStatus::Failed;
                    failures.record(&name, LifecyclePhase::Shutdown, e.to_string());
                }
            }
        }

        failures.into_result()
    }

    /// Disable a plugin, taking it out of the active ordering.
    ///
    /// Protected plugins are permanently non-disableable: the call fails and
    /// the status is left unchanged.
    pub fn disable(&mut self, name: &str) -> Result<()> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| AppError::NotFound(format!("Plugin not found: {}", name)))?;

        if self.entries[idx].descriptor.is_protected {
            return Err(AppError::Protection(format!(
                "Plugin '{}' is protected and cannot be disabled",
                name
            )));
        }

        tracing::warn!(plugin = %name, "Disabling plugin");
        self.entries[idx].status = PluginStatus::Disabled;
        Ok(())
    }

    /// Remove a plugin from the registry entirely.
    ///
    /// Protected plugins are permanently non-removable.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| AppError::NotFound(format!("Plugin not found: {}", name)))?;

        if self.entries[idx].descriptor.is_protected {
            return Err(AppError::Protection(format!(
                "Plugin '{}' is protected and cannot be removed",
                name
            )));
        }

        tracing::warn!(plugin = %name, "Removing plugin");
        self.entries.remove(idx);
        self.bootstrap_order.retain(|n| n != name);
        Ok(())
    }

    /// Look up a plugin entry by name.
    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.index_of(name).map(|idx| &self.entries[idx])
    }

    /// Lifecycle status of a plugin, if registered.
    pub fn status(&self, name: &str) -> Option<PluginStatus> {
        self.get(name).map(|entry| entry.status)
    }

    /// Active descriptors in priority order (disabled plugins excluded).
    pub fn descriptors(&self) -> Vec<&PluginDescriptor> {
        self.active_order(|status| status != PluginStatus::Disabled)
            .into_iter()
            .map(|idx| &self.entries[idx].descriptor)
            .collect()
    }

    /// Names of successfully bootstrapped plugins, in bootstrap order.
    pub fn bootstrap_order(&self) -> &[String] {
        &self.bootstrap_order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.descriptor.name == name)
    }

    /// Indices of entries passing `filter`, sorted by (tier rank,
    /// registration order). The sort is stable and entries are already in
    /// registration order, so ties keep registration order.
    fn active_order(&self, filter: impl Fn(PluginStatus) -> bool) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter(e.status))
            .map(|(idx, _)| idx)
            .collect();
        order.sort_by_key(|&idx| self.entries[idx].descriptor.priority.rank());
        order
    }
}
