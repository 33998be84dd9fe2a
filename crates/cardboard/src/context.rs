//! Resolution-scoped overrides.

use std::collections::HashMap;
use std::sync::Arc;

use crate::key::{Handle, TypeKey};

/// Values supplied for a single resolution call.
///
/// Entries match by exact key and take priority over the registry. Command
/// dispatch uses a context to expose the invoking sender to the command
/// instance being built.
#[derive(Debug, Clone, Default)]
pub struct InjectionContext {
    entries: HashMap<TypeKey, Handle>,
}

impl InjectionContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under the key of `T`, replacing any previous entry.
    pub fn insert<T>(&mut self, value: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert_handle(Handle::new(value));
    }

    /// Adds a pre-built handle under its own key.
    pub fn insert_handle(&mut self, handle: Handle) {
        self.entries.insert(handle.key(), handle);
    }

    /// Builder-style variant of [`InjectionContext::insert`].
    #[must_use]
    pub fn with<T>(mut self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.insert(value);
        self
    }

    /// Returns the entry for `key`.
    #[must_use]
    pub fn get(&self, key: &TypeKey) -> Option<&Handle> {
        self.entries.get(key)
    }

    /// Returns the entry for `T`.
    #[must_use]
    pub fn get_as<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get(&TypeKey::of::<T>())
            .and_then(Handle::downcast::<T>)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
