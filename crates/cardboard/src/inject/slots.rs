//! Field slots written by the injector.
//!
//! Slots are interior-mutable so a component can be injected while it is
//! already shared. Every write replaces the whole value, so a poisoned lock
//! still holds a consistent value and is recovered rather than propagated.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::host::ExternalPlugin;

/// A configuration-backed field.
pub struct Setting<T> {
    value: RwLock<T>,
}

impl<T> Setting<T> {
    /// Creates a slot holding `initial` until injection runs.
    #[must_use]
    pub const fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    /// Replaces the value.
    pub fn set(&self, value: T) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl<T: Clone> Setting<T> {
    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T: Default> Default for Setting<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_tuple("Setting").field(&*value).finish()
    }
}

/// A field referring to another component or context value.
pub struct Wired<T: ?Sized> {
    value: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Wired<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    /// Returns the wired value, if injection found one.
    #[must_use]
    pub fn get(&self) -> Option<Arc<T>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` once a value has been wired.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Replaces the wired value.
    pub fn set(&self, value: Arc<T>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }
}

impl<T: ?Sized> Default for Wired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Wired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wired")
            .field("wired", &self.is_wired())
            .finish()
    }
}

/// A field referring to a named external plugin.
#[derive(Default)]
pub struct PluginRef {
    value: RwLock<Option<Arc<dyn ExternalPlugin>>>,
}

impl PluginRef {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    /// Returns the plugin, if injected.
    #[must_use]
    pub fn get(&self) -> Option<Arc<dyn ExternalPlugin>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the plugin as its concrete type.
    #[must_use]
    pub fn get_as<P: ExternalPlugin>(&self) -> Option<Arc<P>> {
        let plugin: Arc<dyn Any + Send + Sync> = self.get()?.into_any();
        plugin.downcast::<P>().ok()
    }

    /// Replaces the plugin.
    pub fn set(&self, plugin: Arc<dyn ExternalPlugin>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(plugin);
    }
}

impl fmt::Debug for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.get().map(|plugin| plugin.name().to_owned());
        f.debug_tuple("PluginRef").field(&name).finish()
    }
}
