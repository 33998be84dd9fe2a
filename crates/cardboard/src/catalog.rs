//! Type metadata the container loads from.
//!
//! A [`TypeCatalog`] answers "which components, listeners, and commands live
//! under this scope". [`StaticCatalog`] is the registration table hosts build
//! at compile time; the scope is a module-path prefix matched against each
//! type's name.

use std::fmt;
use std::sync::Arc;

use crate::command::CommandFactory;
use crate::component::ComponentDescriptor;
use crate::error::ConstructionError;
use crate::host::Listener;
use crate::key::TypeKey;

type ListenerConstructor = Arc<dyn Fn() -> Result<Arc<dyn Listener>, ConstructionError> + Send + Sync>;

/// Declares an event listener the container builds, injects, and hands to the
/// host.
#[derive(Clone)]
pub struct ListenerDescriptor {
    key: TypeKey,
    name: String,
    constructor: ListenerConstructor,
}

impl ListenerDescriptor {
    /// Declares a listener built by `constructor`.
    #[must_use]
    pub fn new<L, F>(name: impl Into<String>, constructor: F) -> Self
    where
        L: Listener,
        F: Fn() -> Result<L, ConstructionError> + Send + Sync + 'static,
    {
        Self {
            key: TypeKey::of::<L>(),
            name: name.into(),
            constructor: Arc::new(move || {
                constructor().map(|listener| Arc::new(listener) as Arc<dyn Listener>)
            }),
        }
    }

    /// Declares a listener built with [`Default`].
    #[must_use]
    pub fn with_default<L: Listener + Default>(name: impl Into<String>) -> Self {
        Self::new(name, || Ok(L::default()))
    }

    /// Listener type.
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Name the listener is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds a fresh listener.
    ///
    /// # Errors
    ///
    /// Propagates the constructor's failure.
    pub fn construct(&self) -> Result<Arc<dyn Listener>, ConstructionError> {
        (self.constructor)()
    }
}

impl fmt::Debug for ListenerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Supplies the declarations found under a scope.
pub trait TypeCatalog {
    /// Component declarations whose type lives under `scope`.
    fn components(&self, scope: &str) -> Vec<ComponentDescriptor>;

    /// Listener declarations whose type lives under `scope`.
    fn listeners(&self, scope: &str) -> Vec<ListenerDescriptor>;

    /// Commands whose backing type lives under `scope`.
    fn commands(&self, scope: &str) -> Vec<Arc<dyn CommandFactory>>;
}

/// Registration table assembled by the host.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    components: Vec<ComponentDescriptor>,
    listeners: Vec<ListenerDescriptor>,
    commands: Vec<Arc<dyn CommandFactory>>,
}

impl StaticCatalog {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component declaration.
    #[must_use]
    pub fn component(mut self, descriptor: impl Into<ComponentDescriptor>) -> Self {
        self.components.push(descriptor.into());
        self
    }

    /// Adds a listener declaration.
    #[must_use]
    pub fn listener(mut self, descriptor: ListenerDescriptor) -> Self {
        self.listeners.push(descriptor);
        self
    }

    /// Adds a command declaration.
    #[must_use]
    pub fn command<F: CommandFactory + 'static>(mut self, factory: F) -> Self {
        self.commands.push(Arc::new(factory));
        self
    }
}

impl TypeCatalog for StaticCatalog {
    fn components(&self, scope: &str) -> Vec<ComponentDescriptor> {
        self.components
            .iter()
            .filter(|descriptor| descriptor.key().in_scope(scope))
            .cloned()
            .collect()
    }

    fn listeners(&self, scope: &str) -> Vec<ListenerDescriptor> {
        self.listeners
            .iter()
            .filter(|descriptor| descriptor.key().in_scope(scope))
            .cloned()
            .collect()
    }

    fn commands(&self, scope: &str) -> Vec<Arc<dyn CommandFactory>> {
        self.commands
            .iter()
            .filter(|factory| factory.component().in_scope(scope))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for StaticCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<&str> = self
            .commands
            .iter()
            .map(|factory| factory.command_name())
            .collect();
        f.debug_struct("StaticCatalog")
            .field("components", &self.components)
            .field("listeners", &self.listeners)
            .field("commands", &commands)
            .finish()
    }
}
