//! Interfaces the embedding host implements.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::Dispatch;
use crate::inject::Injectable;

/// Whoever invoked a command: a player, the console, or an automation.
pub trait Invoker: Send + Sync {
    /// Display name of the invoker.
    fn name(&self) -> String;

    /// Returns `true` when the invoker holds the permission node.
    fn has_permission(&self, node: &str) -> bool;

    /// Returns `true` for operators, who bypass permission checks.
    fn is_operator(&self) -> bool;

    /// Delivers an already formatted message.
    fn send_message(&self, message: &str);

    /// The player facet when the invoker is a live player.
    fn player(&self) -> Option<Arc<dyn Player>> {
        None
    }
}

/// A live player.
pub trait Player: Send + Sync {
    /// Player name.
    fn name(&self) -> String;

    /// Stable unique identifier of the player.
    fn unique_id(&self) -> String;
}

/// Returns `true` when `invoker` may use something guarded by `node`.
#[must_use]
pub fn is_permitted(invoker: &dyn Invoker, node: &str) -> bool {
    invoker.has_permission(node) || invoker.is_operator()
}

/// Conversion of a shared value into `Any` so it can be downcast.
pub trait IntoAny: Any + Send + Sync {
    /// Erases the concrete type.
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> IntoAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Another plugin loaded by the host.
pub trait ExternalPlugin: IntoAny {
    /// Name the plugin is registered under.
    fn name(&self) -> &str;
}

/// Lookup of loaded external plugins by name.
pub trait PluginDirectory: Send + Sync {
    /// Returns the plugin registered under `name`.
    fn plugin(&self, name: &str) -> Option<Arc<dyn ExternalPlugin>>;
}

/// A fixed table of plugins, keyed by their names.
#[derive(Default, Clone)]
pub struct PluginTable {
    plugins: HashMap<String, Arc<dyn ExternalPlugin>>,
}

impl PluginTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin under its own name.
    #[must_use]
    pub fn with(mut self, plugin: Arc<dyn ExternalPlugin>) -> Self {
        self.plugins.insert(plugin.name().to_owned(), plugin);
        self
    }
}

impl fmt::Debug for PluginTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("PluginTable").field("plugins", &names).finish()
    }
}

impl PluginDirectory for PluginTable {
    fn plugin(&self, name: &str) -> Option<Arc<dyn ExternalPlugin>> {
        self.plugins.get(name).cloned()
    }
}

/// Marker for event listeners the host registers after injection.
pub trait Listener: Injectable + Send + Sync + 'static {}

/// The host's registration surfaces.
pub trait Host: Send + Sync {
    /// Registers an injected listener with the host's event system.
    fn register_listener(&self, name: &str, listener: Arc<dyn Listener>);

    /// Adds a command to the host's native command table.
    fn register_command(&self, command: Arc<dyn Dispatch>);
}
