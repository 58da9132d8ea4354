//! Business logic layer

pub mod tenant_filter;

pub use tenant_filter::TenantFilterService;
