//! Plugin domain model
//!
//! A `PluginDescriptor` is the static, declarative identity of one feature
//! module: name, priority tier, protection flag, declared permissions and API
//! surface. Descriptors are validated when built and immutable once
//! registered; the lifecycle hooks themselves live behind the
//! [`crate::registry::PluginLifecycle`] trait.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

/// Origin of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    /// Shipped with the platform; protected by default
    System,
    /// Installed by an operator or third party
    #[default]
    Community,
}

impl std::str::FromStr for PluginType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(PluginType::System),
            "community" => Ok(PluginType::Community),
            _ => Err(format!("Unknown plugin type: {}", s)),
        }
    }
}

impl std::fmt::Display for PluginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginType::System => write!(f, "system"),
            PluginType::Community => write!(f, "community"),
        }
    }
}

/// Bootstrap priority tier.
///
/// Lower tiers bootstrap first and shut down last, so foundational modules
/// (tenant, user) are up before anything that seeds records into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityTier {
    P0,
    P1,
    P2,
    P3,
    P4,
}

impl PriorityTier {
    /// Integer rank; lower starts first.
    pub fn rank(self) -> u8 {
        match self {
            PriorityTier::P0 => 0,
            PriorityTier::P1 => 1,
            PriorityTier::P2 => 2,
            PriorityTier::P3 => 3,
            PriorityTier::P4 => 4,
        }
    }
}

impl std::str::FromStr for PriorityTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "P0" => Ok(PriorityTier::P0),
            "P1" => Ok(PriorityTier::P1),
            "P2" => Ok(PriorityTier::P2),
            "P3" => Ok(PriorityTier::P3),
            "P4" => Ok(PriorityTier::P4),
            _ => Err(format!("Unknown priority tier: {}", s)),
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.rank())
    }
}

/// Lifecycle status of a registered plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Accepted by the registry, bootstrap not yet run
    #[default]
    Registered,
    /// Bootstrap hook completed successfully
    Bootstrapped,
    /// Shutdown hook completed
    ShutDown,
    /// A lifecycle hook returned an error
    Failed,
    /// Taken out of the active ordering by an operator
    Disabled,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Registered => write!(f, "registered"),
            PluginStatus::Bootstrapped => write!(f, "bootstrapped"),
            PluginStatus::ShutDown => write!(f, "shutdown"),
            PluginStatus::Failed => write!(f, "failed"),
            PluginStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// One declared API endpoint of a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl ApiEndpoint {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            description: description.into(),
        }
    }
}

/// Static declaration of one feature module
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PluginDescriptor {
    /// Unique plugin name
    #[validate(length(min = 1, message = "Plugin name must not be empty"))]
    pub name: String,
    /// Human-readable name for admin surfaces
    #[validate(length(min = 1, message = "Display name must not be empty"))]
    pub display_name: String,
    /// Semantic version string
    #[validate(length(min = 1, message = "Version must not be empty"))]
    pub version: String,
    /// System or community origin
    pub plugin_type: PluginType,
    /// Bootstrap priority tier
    pub priority: PriorityTier,
    /// Free-form category for grouping
    pub category: String,
    /// Author or vendor name
    pub author: String,
    /// Protected plugins can never be disabled or removed
    pub is_protected: bool,
    /// Whether the plugin exposes operator-editable settings
    pub is_configurable: bool,
    /// Permission strings the plugin introduces
    pub permissions: BTreeSet<String>,
    /// API endpoints the plugin declares
    pub api: Vec<ApiEndpoint>,
}

impl PluginDescriptor {
    pub fn builder(name: impl Into<String>) -> PluginDescriptorBuilder {
        PluginDescriptorBuilder::new(name)
    }
}

/// Fluent builder for [`PluginDescriptor`].
///
/// `build()` validates fields, resolves a textual priority tier, and applies
/// the protection default: system plugins are protected unless explicitly
/// overridden.
#[derive(Debug, Clone)]
pub struct PluginDescriptorBuilder {
    name: String,
    display_name: Option<String>,
    version: String,
    plugin_type: PluginType,
    priority: Option<PriorityTier>,
    priority_str: Option<String>,
    category: String,
    author: String,
    is_protected: Option<bool>,
    is_configurable: bool,
    permissions: BTreeSet<String>,
    api: Vec<ApiEndpoint>,
}

impl PluginDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            version: "0.1.0".to_string(),
            plugin_type: PluginType::Community,
            priority: None,
            priority_str: None,
            category: "general".to_string(),
            author: String::new(),
            is_protected: None,
            is_configurable: false,
            permissions: BTreeSet::new(),
            api: Vec::new(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn plugin_type(mut self, plugin_type: PluginType) -> Self {
        self.plugin_type = plugin_type;
        self
    }

    pub fn priority(mut self, priority: PriorityTier) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the priority from a manifest string; resolved at `build()` so an
    /// unknown tier fails as a Configuration error.
    pub fn priority_str(mut self, priority: impl Into<String>) -> Self {
        self.priority_str = Some(priority.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn protected(mut self, is_protected: bool) -> Self {
        self.is_protected = Some(is_protected);
        self
    }

    pub fn configurable(mut self, is_configurable: bool) -> Self {
        self.is_configurable = is_configurable;
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn api_endpoint(mut self, endpoint: ApiEndpoint) -> Self {
        self.api.push(endpoint);
        self
    }

    pub fn build(self) -> Result<PluginDescriptor> {
        let priority = match (self.priority, self.priority_str) {
            (Some(tier), _) => tier,
            (None, Some(raw)) => raw
                .parse::<PriorityTier>()
                .map_err(AppError::Configuration)?,
            (None, None) => {
                return Err(AppError::Configuration(format!(
                    "Plugin '{}' declares no priority tier",
                    self.name
                )))
            }
        };

        let descriptor = PluginDescriptor {
            display_name: self.display_name.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            version: self.version,
            plugin_type: self.plugin_type,
            priority,
            category: self.category,
            author: self.author,
            is_protected: self
                .is_protected
                .unwrap_or(self.plugin_type == PluginType::System),
            is_configurable: self.is_configurable,
            permissions: self.permissions,
            api: self.api,
        };

        descriptor
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("P0", PriorityTier::P0)]
    #[case("p1", PriorityTier::P1)]
    #[case("P4", PriorityTier::P4)]
    fn test_priority_tier_parse(#[case] input: &str, #[case] expected: PriorityTier) {
        assert_eq!(input.parse::<PriorityTier>().unwrap(), expected);
    }

    #[test]
    fn test_priority_tier_parse_unknown() {
        let err = "P9".parse::<PriorityTier>().unwrap_err();
        assert!(err.contains("Unknown priority tier"));
    }

    #[test]
    fn test_priority_tier_ordering() {
        assert!(PriorityTier::P0 < PriorityTier::P1);
        assert!(PriorityTier::P1 < PriorityTier::P4);
        assert_eq!(PriorityTier::P2.rank(), 2);
        assert_eq!(PriorityTier::P3.to_string(), "P3");
    }

    #[test]
    fn test_plugin_type_parse() {
        assert_eq!("system".parse::<PluginType>().unwrap(), PluginType::System);
        assert_eq!(
            "Community".parse::<PluginType>().unwrap(),
            PluginType::Community
        );
        assert!("vendor".parse::<PluginType>().is_err());
    }

    #[test]
    fn test_builder_minimal() {
        let descriptor = PluginDescriptor::builder("tenant")
            .priority(PriorityTier::P0)
            .build()
            .unwrap();

        assert_eq!(descriptor.name, "tenant");
        assert_eq!(descriptor.display_name, "tenant");
        assert_eq!(descriptor.plugin_type, PluginType::Community);
        assert!(!descriptor.is_protected);
    }

    #[test]
    fn test_builder_system_protected_by_default() {
        let descriptor = PluginDescriptor::builder("tenant")
            .plugin_type(PluginType::System)
            .priority(PriorityTier::P0)
            .build()
            .unwrap();

        assert!(descriptor.is_protected);
    }

    #[test]
    fn test_builder_explicit_protection_override() {
        let descriptor = PluginDescriptor::builder("sandbox")
            .plugin_type(PluginType::System)
            .priority(PriorityTier::P3)
            .protected(false)
            .build()
            .unwrap();

        assert!(!descriptor.is_protected);
    }

    #[test]
    fn test_builder_priority_from_string() {
        let descriptor = PluginDescriptor::builder("org")
            .priority_str("p1")
            .build()
            .unwrap();
        assert_eq!(descriptor.priority, PriorityTier::P1);
    }

    #[test]
    fn test_builder_unknown_tier_is_configuration_error() {
        let err = PluginDescriptor::builder("org")
            .priority_str("tier-7")
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_builder_missing_priority_fails() {
        let err = PluginDescriptor::builder("org").build().unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_builder_empty_name_fails() {
        let err = PluginDescriptor::builder("")
            .priority(PriorityTier::P2)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_builder_full_descriptor() {
        let descriptor = PluginDescriptor::builder("mcp-gateway")
            .display_name("MCP Gateway")
            .version("1.2.0")
            .plugin_type(PluginType::System)
            .priority(PriorityTier::P2)
            .category("integration")
            .author("Kite Team")
            .configurable(true)
            .permission("mcp:invoke")
            .permission("mcp:manage")
            .api_endpoint(ApiEndpoint::new("POST", "/mcp/invoke", "Invoke a tool"))
            .build()
            .unwrap();

        assert_eq!(descriptor.display_name, "MCP Gateway");
        assert_eq!(descriptor.permissions.len(), 2);
        assert_eq!(descriptor.api.len(), 1);
        assert!(descriptor.is_protected);
        assert!(descriptor.is_configurable);
    }

    #[test]
    fn test_descriptor_serde() {
        let descriptor = PluginDescriptor::builder("user")
            .plugin_type(PluginType::System)
            .priority(PriorityTier::P0)
            .build()
            .unwrap();

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["plugin_type"], "system");
        assert_eq!(json["priority"], "P0");
    }
}
