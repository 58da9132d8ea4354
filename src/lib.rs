//! Kite Core - Modular Multi-Tenant Platform Core
//!
//! This crate provides the correctness core of the Kite platform: the plugin
//! lifecycle/priority registry and the ambient per-request identity context
//! with its tenant-isolation enforcement layer. Transport binding, entity
//! CRUD, and the feature plugins themselves live in the surrounding service
//! and plug into the contracts defined here.

pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod registry;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use context::RequestContext;
pub use domain::{Identity, PluginDescriptor, PluginStatus, PluginType, PriorityTier};
pub use error::{AppError, Result};
pub use registry::{ModuleAccessor, PluginLifecycle, PluginRegistry};
pub use service::TenantFilterService;
