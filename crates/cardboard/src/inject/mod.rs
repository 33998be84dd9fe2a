//! Field injection.
//!
//! Injection targets implement [`Injectable`] and describe each injectable
//! field as a [`Binding`]: the field's name, where its value comes from, and
//! the slot to write into.
//!
//! ```rust,ignore
//! struct Shop {
//!     greeting: Setting<String>,
//!     economy: Wired<dyn Economy>,
//! }
//!
//! impl Injectable for Shop {
//!     fn bindings(&self) -> Vec<Binding<'_>> {
//!         vec![
//!             Binding::config("greeting", ConfigKey::new("shop.greeting").colored(), &self.greeting),
//!             Binding::component("economy", &self.economy),
//!         ]
//!     }
//! }
//! ```
//!
//! Configuration bindings never fail. Component bindings that cannot be
//! resolved leave the slot untouched. Plugin bindings fail with
//! [`InjectionError::ExternalDependency`] when the named plugin is not loaded.
//! Re-running injection overwrites every slot.

mod scalar;
mod slots;

use cardboard_config::ConfigSource;
use tracing::debug;

pub use scalar::{ConfigKey, ConfigScalar};
pub use slots::{PluginRef, Setting, Wired};

use crate::context::InjectionContext;
use crate::error::InjectionError;
use crate::key::{Handle, TypeKey};
use crate::registry::ComponentRegistry;

const INJECT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::inject");

/// A value whose fields can be injected.
pub trait Injectable {
    /// Describes the injectable fields. Targets without any keep the default.
    fn bindings(&self) -> Vec<Binding<'_>> {
        Vec::new()
    }
}

trait ConfigSlot: Sync {
    fn load(&self, source: &dyn ConfigSource, key: &ConfigKey);
}

impl<T: ConfigScalar> ConfigSlot for Setting<T> {
    fn load(&self, source: &dyn ConfigSource, key: &ConfigKey) {
        let value = T::read(source, key.path());
        self.set(if key.is_colored() {
            value.colorize()
        } else {
            value
        });
    }
}

trait ComponentSlot: Sync {
    fn key(&self) -> TypeKey;
    fn fill(&self, handle: &Handle) -> bool;
}

impl<T> ComponentSlot for Wired<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn fill(&self, handle: &Handle) -> bool {
        handle
            .downcast::<T>()
            .map(|value| self.set(value))
            .is_some()
    }
}

enum Source<'a> {
    Config {
        key: ConfigKey,
        slot: &'a dyn ConfigSlot,
    },
    Component {
        slot: &'a dyn ComponentSlot,
    },
    Plugin {
        name: String,
        slot: &'a PluginRef,
    },
}

/// One injectable field of a target.
pub struct Binding<'a> {
    field: &'static str,
    source: Source<'a>,
}

impl<'a> Binding<'a> {
    /// Binds a configuration value to a [`Setting`].
    #[must_use]
    pub fn config<T: ConfigScalar>(field: &'static str, key: ConfigKey, slot: &'a Setting<T>) -> Self {
        Self {
            field,
            source: Source::Config { key, slot },
        }
    }

    /// Binds a component, capability, or context value to a [`Wired`] slot.
    #[must_use]
    pub fn component<T>(field: &'static str, slot: &'a Wired<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            field,
            source: Source::Component { slot },
        }
    }

    /// Binds the external plugin registered as `name` to a [`PluginRef`].
    #[must_use]
    pub fn plugin(field: &'static str, name: impl Into<String>, slot: &'a PluginRef) -> Self {
        Self {
            field,
            source: Source::Plugin {
                name: name.into(),
                slot,
            },
        }
    }

    /// Name of the bound field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Configuration key for configuration bindings.
    #[must_use]
    pub const fn config_key(&self) -> Option<&ConfigKey> {
        match &self.source {
            Source::Config { key, .. } => Some(key),
            Source::Component { .. } | Source::Plugin { .. } => None,
        }
    }

    /// Requested type for component bindings.
    #[must_use]
    pub fn component_key(&self) -> Option<TypeKey> {
        match &self.source {
            Source::Component { slot } => Some(slot.key()),
            Source::Config { .. } | Source::Plugin { .. } => None,
        }
    }

    /// Plugin name for plugin bindings.
    #[must_use]
    pub fn plugin_name(&self) -> Option<&str> {
        match &self.source {
            Source::Plugin { name, .. } => Some(name),
            Source::Config { .. } | Source::Component { .. } => None,
        }
    }
}

/// Applies bindings using a registry's configuration, components, and
/// plugin directory.
#[derive(Clone, Copy)]
pub struct Injector<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> Injector<'a> {
    /// Creates an injector backed by `registry`.
    #[must_use]
    pub const fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Fills every configuration binding from its declared source.
    pub fn inject_config<T: Injectable + ?Sized>(&self, target: &T) {
        self.load_config(target, None);
    }

    /// Fills every configuration binding from the named source, ignoring the
    /// sources the bindings declare.
    pub fn inject_config_from<T: Injectable + ?Sized>(&self, target: &T, source: &str) {
        self.load_config(target, Some(source));
    }

    /// Fills component and plugin bindings, resolving components with
    /// `context` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::ExternalDependency`] when a named plugin is not
    /// loaded. Bindings before the failing one have already been written.
    pub fn inject_components<T: Injectable + ?Sized>(
        &self,
        target: &T,
        context: &InjectionContext,
    ) -> Result<(), InjectionError> {
        self.wire(target, context, &mut Vec::new())
    }

    /// Runs configuration injection followed by component injection.
    ///
    /// # Errors
    ///
    /// See [`Injector::inject_components`].
    pub fn inject<T: Injectable + ?Sized>(
        &self,
        target: &T,
        context: &InjectionContext,
    ) -> Result<(), InjectionError> {
        self.inject_config(target);
        self.inject_components(target, context)
    }

    pub(crate) fn wire<T: Injectable + ?Sized>(
        &self,
        target: &T,
        context: &InjectionContext,
        path: &mut Vec<TypeKey>,
    ) -> Result<(), InjectionError> {
        for binding in target.bindings() {
            match binding.source {
                Source::Config { .. } => {}
                Source::Component { slot } => {
                    self.wire_component(binding.field, slot, context, path);
                }
                Source::Plugin { name, slot } => {
                    let plugin = self
                        .registry
                        .plugins()
                        .plugin(&name)
                        .ok_or_else(|| InjectionError::external_dependency(binding.field, &name))?;
                    slot.set(plugin);
                }
            }
        }
        Ok(())
    }

    fn wire_component(
        &self,
        field: &'static str,
        slot: &dyn ComponentSlot,
        context: &InjectionContext,
        path: &mut Vec<TypeKey>,
    ) {
        let key = slot.key();
        match self.registry.resolve_on_path(&key, context, path) {
            Ok(handle) => {
                if !slot.fill(&handle) {
                    debug!(
                        target: INJECT_TARGET,
                        field,
                        requested = %key,
                        found = %handle.key(),
                        "resolved value has the wrong type; field left unset"
                    );
                }
            }
            Err(error) => {
                debug!(
                    target: INJECT_TARGET,
                    field,
                    requested = %key,
                    error = %error,
                    "component unavailable; field left unset"
                );
            }
        }
    }

    fn load_config<T: Injectable + ?Sized>(&self, target: &T, forced: Option<&str>) {
        let store = self.registry.config();
        for binding in target.bindings() {
            if let Source::Config { key, slot } = &binding.source {
                let source = store.source(forced.or_else(|| key.source()));
                slot.load(source.as_ref(), key);
            }
        }
    }
}

#[cfg(test)]
mod tests;
