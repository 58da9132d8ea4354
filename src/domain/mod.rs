//! Domain models for Kite Core

pub mod identity;
pub mod plugin;

pub use identity::*;
pub use plugin::*;
