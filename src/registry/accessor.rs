//! Typed singleton resolution for lifecycle hooks
//!
//! A [`ModuleAccessor`] is handed to every bootstrap and shutdown hook so a
//! plugin can resolve shared resources (a storage handle, a message bus) by
//! type without the registry knowing anything about module internals.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe, type-keyed map of shared singletons
#[derive(Clone, Default)]
pub struct ModuleAccessor {
    inner: Arc<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>>,
}

impl ModuleAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared singleton, replacing any prior value of the same type.
    pub fn provide<T: Send + Sync + 'static>(&self, value: T) {
        let mut map = self.inner.write().expect("accessor lock poisoned");
        map.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Resolve a shared singleton by type.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let map = self.inner.read().expect("accessor lock poisoned");
        map.get(&TypeId::of::<T>())
            .cloned()
            .and_then(|any| any.downcast::<T>().ok())
    }

    /// Whether a singleton of type `T` has been provided.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        let map = self.inner.read().expect("accessor lock poisoned");
        map.contains_key(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for ModuleAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.inner.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("ModuleAccessor").field("entries", &len).finish()
    }
}
