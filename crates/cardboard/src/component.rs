//! Component declarations and lifecycle.
//!
//! A component type is declared with a [`ComponentDescriptor`], built through
//! [`ComponentDescriptor::singleton`] or [`ComponentDescriptor::instanced`].
//! The descriptor records the component's name and description, its scope,
//! the singletons it depends on, the capabilities (trait-object views) it can
//! be resolved as, and the zero-argument constructor used to build it.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use strum::Display;

use crate::error::ConstructionError;
use crate::inject::Injectable;
use crate::key::{Handle, TypeKey};

/// A managed component.
///
/// Components are shared behind `Arc`, so injected fields use the interior
/// mutability slots from [`crate::inject`]. The lifecycle hooks run once for
/// each singleton, after its fields have been injected.
pub trait Component: Injectable + Send + Sync + 'static {
    /// Loads configuration that cannot be expressed as field bindings.
    ///
    /// Always runs before [`Component::init`].
    fn load_config(&self) {}

    /// Initialises the component. Returning `false` marks initialisation as
    /// failed; the component remains registered.
    fn init(&self) -> bool {
        true
    }
}

/// Lifetime policy of a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ComponentKind {
    /// One shared instance, built eagerly in dependency order.
    Singleton,
    /// Built and injected afresh on every resolution.
    Instanced,
}

/// A constructed component, viewable both as a typed handle and as a
/// lifecycle target.
#[derive(Clone)]
pub struct Instance {
    handle: Handle,
    component: Arc<dyn Component>,
}

impl Instance {
    /// Wraps a shared component.
    #[must_use]
    pub fn new<C: Component>(component: Arc<C>) -> Self {
        Self {
            handle: Handle::new(Arc::clone(&component)),
            component,
        }
    }

    /// Handle keyed by the concrete component type.
    #[must_use]
    pub const fn handle(&self) -> &Handle {
        &self.handle
    }

    /// The component as a lifecycle and injection target.
    #[must_use]
    pub fn component(&self) -> &dyn Component {
        self.component.as_ref()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("key", &self.handle.key())
            .finish_non_exhaustive()
    }
}

type Constructor = Arc<dyn Fn() -> Result<Instance, ConstructionError> + Send + Sync>;
type Cast = Arc<dyn Fn(&Handle) -> Option<Handle> + Send + Sync>;

#[derive(Clone)]
struct Capability {
    key: TypeKey,
    cast: Cast,
}

/// Metadata describing one component type.
#[derive(Clone)]
pub struct ComponentDescriptor {
    key: TypeKey,
    kind: ComponentKind,
    name: String,
    description: String,
    dependencies: Vec<TypeKey>,
    capabilities: Vec<Capability>,
    constructor: Option<Constructor>,
}

impl ComponentDescriptor {
    /// Starts a singleton declaration for `C`.
    #[must_use]
    pub fn singleton<C: Component>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> DescriptorBuilder<C> {
        DescriptorBuilder::new(ComponentKind::Singleton, name.into(), description.into())
    }

    /// Starts an instanced declaration for `C`.
    #[must_use]
    pub fn instanced<C: Component>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> DescriptorBuilder<C> {
        DescriptorBuilder::new(ComponentKind::Instanced, name.into(), description.into())
    }

    /// Key of the concrete component type.
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Lifetime policy.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Administrative name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Singleton types this component depends on, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> &[TypeKey] {
        &self.dependencies
    }

    /// Keys this component can be resolved as, starting with its own.
    pub fn provided_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        std::iter::once(self.key).chain(self.capabilities.iter().map(|cap| cap.key))
    }

    /// Returns `true` when the component's type is `key` or it declares a
    /// capability for `key`.
    #[must_use]
    pub fn is_assignable_to(&self, key: &TypeKey) -> bool {
        self.provided_keys().any(|provided| provided == *key)
    }

    /// Returns `true` when a constructor was declared.
    #[must_use]
    pub const fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Builds a new instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::MissingConstructor`] when no constructor was
    /// declared, otherwise whatever the constructor reports.
    pub fn construct(&self) -> Result<Instance, ConstructionError> {
        let constructor = self
            .constructor
            .as_ref()
            .ok_or_else(|| ConstructionError::missing_constructor(self.key))?;
        constructor()
    }

    /// Produces the view of `instance` requested by `key`.
    ///
    /// Returns `None` when the component is not assignable to `key`.
    #[must_use]
    pub fn cast(&self, instance: &Instance, key: &TypeKey) -> Option<Handle> {
        if *key == self.key {
            return Some(instance.handle().clone());
        }
        self.capabilities
            .iter()
            .find(|cap| cap.key == *key)
            .and_then(|cap| (cap.cast)(instance.handle()))
    }

    pub(crate) fn into_adopted(mut self) -> Self {
        self.kind = ComponentKind::Singleton;
        self.dependencies.clear();
        self
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field(
                "capabilities",
                &self.capabilities.iter().map(|cap| cap.key).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Typed builder for a [`ComponentDescriptor`].
#[must_use]
pub struct DescriptorBuilder<C> {
    descriptor: ComponentDescriptor,
    marker: PhantomData<fn() -> C>,
}

impl<C: Component> DescriptorBuilder<C> {
    fn new(kind: ComponentKind, name: String, description: String) -> Self {
        Self {
            descriptor: ComponentDescriptor {
                key: TypeKey::of::<C>(),
                kind,
                name,
                description,
                dependencies: Vec::new(),
                capabilities: Vec::new(),
                constructor: None,
            },
            marker: PhantomData,
        }
    }

    /// Declares a dependency on the singleton component `D`.
    ///
    /// Dependencies are constructed first. Declaring one on an instanced
    /// component is a configuration error detected when components are
    /// classified.
    pub fn depends_on<D: Component>(mut self) -> Self {
        let key = TypeKey::of::<D>();
        if !self.descriptor.dependencies.contains(&key) {
            self.descriptor.dependencies.push(key);
        }
        self
    }

    /// Declares that the component can be resolved as `T`.
    ///
    /// The cast is usually an unsizing coercion: `|shop| shop`.
    pub fn provides<T>(mut self, cast: fn(Arc<C>) -> Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.descriptor.capabilities.retain(|cap| cap.key != key);
        self.descriptor.capabilities.push(Capability {
            key,
            cast: Arc::new(move |handle: &Handle| {
                handle
                    .downcast::<C>()
                    .map(|component| Handle::new(cast(component)))
            }),
        });
        self
    }

    /// Sets a fallible zero-argument constructor.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<C, ConstructionError> + Send + Sync + 'static,
    {
        self.descriptor.constructor = Some(Arc::new(move || {
            constructor().map(|component| Instance::new(Arc::new(component)))
        }));
        self
    }

    /// Finishes the declaration.
    #[must_use]
    pub fn build(self) -> ComponentDescriptor {
        self.descriptor
    }
}

impl<C: Component + Default> DescriptorBuilder<C> {
    /// Uses [`Default`] as the constructor.
    pub fn default_constructor(self) -> Self {
        self.constructor(|| Ok(C::default()))
    }
}

impl<C: Component> From<DescriptorBuilder<C>> for ComponentDescriptor {
    fn from(builder: DescriptorBuilder<C>) -> Self {
        builder.build()
    }
}
