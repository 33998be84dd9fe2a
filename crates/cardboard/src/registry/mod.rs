//! Component registry and resolution.
//!
//! The registry holds every declared component. Singletons are built once, in
//! dependency order, and kept for the life of the registry; instanced
//! components are built and injected on every resolution and handed to the
//! caller without being retained.
//!
//! Resolution of a key tries, in order:
//!
//! 1. an exact match in the caller's [`InjectionContext`];
//! 2. the singleton whose concrete type is the key;
//! 3. the first built singleton, in registration order, assignable to the key;
//! 4. the first instanced component, in registration order, assignable to the
//!    key, which is built and injected with the same context.
//!
//! The registry is mutated only during startup. Afterwards it is shared
//! read-only behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cardboard_config::ConfigStore;
use cardboard_graph::{DirectedGraph, dependency_order};
use tracing::{debug, info, warn};

use crate::component::{Component, ComponentDescriptor, ComponentKind, DescriptorBuilder, Instance};
use crate::context::InjectionContext;
use crate::error::{ConstructionError, RegistryError, ResolveError};
use crate::host::PluginDirectory;
use crate::inject::Injector;
use crate::key::{Handle, TypeKey};

const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Declared components and the singletons built from them.
pub struct ComponentRegistry {
    config: Arc<ConfigStore>,
    plugins: Arc<dyn PluginDirectory>,
    descriptors: HashMap<TypeKey, ComponentDescriptor>,
    declared: Vec<TypeKey>,
    instanced: Vec<TypeKey>,
    graph: DirectedGraph<TypeKey>,
    singletons: Vec<Instance>,
    singleton_index: HashMap<TypeKey, usize>,
}

impl ComponentRegistry {
    /// Creates an empty registry that injects from `config` and `plugins`.
    #[must_use]
    pub fn new(config: Arc<ConfigStore>, plugins: Arc<dyn PluginDirectory>) -> Self {
        Self {
            config,
            plugins,
            descriptors: HashMap::new(),
            declared: Vec::new(),
            instanced: Vec::new(),
            graph: DirectedGraph::new(),
            singletons: Vec::new(),
            singleton_index: HashMap::new(),
        }
    }

    /// Registers component declarations and records singleton dependencies.
    ///
    /// Instanced components without a constructor are excluded and returned
    /// as failures; everything else is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateComponent`] when a type is declared
    /// twice and [`RegistryError::InvalidDependency`] when a singleton depends
    /// on anything other than a singleton.
    pub fn classify<I>(&mut self, descriptors: I) -> Result<Vec<ConstructionError>, RegistryError>
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        let mut rejected = Vec::new();
        let mut singletons = Vec::new();
        for descriptor in descriptors {
            let key = descriptor.key();
            self.ensure_new(key)?;
            match descriptor.kind() {
                ComponentKind::Singleton => {
                    self.graph.add_node(key);
                    singletons.push(key);
                }
                ComponentKind::Instanced if descriptor.is_constructible() => {
                    self.instanced.push(key);
                }
                ComponentKind::Instanced => {
                    rejected.push(ConstructionError::missing_constructor(key));
                }
            }
            debug!(
                target: REGISTRY_TARGET,
                component = %key,
                kind = %descriptor.kind(),
                "classified component"
            );
            self.declared.push(key);
            self.descriptors.insert(key, descriptor);
        }
        for key in singletons {
            self.link_dependencies(key)?;
        }
        Ok(rejected)
    }

    /// Registers an already constructed singleton, such as the host plugin
    /// itself. Dependencies declared on an adopted component are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateComponent`] when `C` is already
    /// registered.
    pub fn adopt<C: Component>(
        &mut self,
        declaration: DescriptorBuilder<C>,
        instance: Arc<C>,
    ) -> Result<(), RegistryError> {
        let descriptor = declaration.build().into_adopted();
        let key = descriptor.key();
        self.ensure_new(key)?;
        self.graph.add_node(key);
        self.insert_singleton(key, Instance::new(instance));
        self.declared.push(key);
        self.descriptors.insert(key, descriptor);
        info!(target: REGISTRY_TARGET, component = %key, "adopted singleton component");
        Ok(())
    }

    /// Builds every classified singleton in dependency order.
    ///
    /// When a singleton cannot be built, it and every singleton that depends
    /// on it, directly or transitively, are left out. The returned failures
    /// list each of them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Cycle`] when singleton dependencies are
    /// cyclic. No singleton is built in that case.
    pub fn instantiate_singletons(&mut self) -> Result<Vec<ConstructionError>, RegistryError> {
        let order = dependency_order(&self.graph)?;
        let mut failures = Vec::new();
        let mut disabled: HashMap<TypeKey, TypeKey> = HashMap::new();
        for key in order {
            if self.singleton_index.contains_key(&key) {
                continue;
            }
            if let Some(cause) = disabled.get(&key) {
                warn!(
                    target: REGISTRY_TARGET,
                    component = %key,
                    dependency = %cause,
                    "singleton disabled by failed dependency"
                );
                failures.push(ConstructionError::dependency_unavailable(key, *cause));
                continue;
            }
            let descriptor = self
                .descriptors
                .get(&key)
                .ok_or_else(|| RegistryError::not_a_component(key))?;
            match descriptor.construct() {
                Ok(instance) => {
                    info!(target: REGISTRY_TARGET, component = %key, "loaded new singleton component");
                    self.insert_singleton(key, instance);
                }
                Err(error) => {
                    warn!(
                        target: REGISTRY_TARGET,
                        component = %key,
                        error = %error,
                        "singleton construction failed"
                    );
                    for dependent in self.graph.transitive_dependents(&key) {
                        disabled.entry(dependent).or_insert(key);
                    }
                    failures.push(error);
                }
            }
        }
        Ok(failures)
    }

    /// Resolves `key` with `context` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when nothing is assignable to `key`,
    /// or the failure of building an instanced component.
    pub fn resolve(
        &self,
        key: &TypeKey,
        context: &InjectionContext,
    ) -> Result<Handle, ResolveError> {
        self.resolve_on_path(key, context, &mut Vec::new())
    }

    /// Typed variant of [`ComponentRegistry::resolve`].
    ///
    /// # Errors
    ///
    /// See [`ComponentRegistry::resolve`].
    pub fn resolve_as<T>(&self, context: &InjectionContext) -> Result<Arc<T>, ResolveError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let handle = self.resolve(&key, context)?;
        handle.downcast::<T>().ok_or_else(|| ResolveError::TypeMismatch {
            expected: key,
            found: handle.key(),
        })
    }

    pub(crate) fn resolve_on_path(
        &self,
        key: &TypeKey,
        context: &InjectionContext,
        path: &mut Vec<TypeKey>,
    ) -> Result<Handle, ResolveError> {
        if let Some(handle) = context.get(key) {
            return Ok(handle.clone());
        }
        if let Some(instance) = self.singleton(key) {
            return Ok(instance.handle().clone());
        }
        if let Some(handle) = self.declared.iter().find_map(|candidate| {
            let instance = self.singleton(candidate)?;
            self.descriptors.get(candidate)?.cast(instance, key)
        }) {
            return Ok(handle);
        }
        let descriptor = self
            .instanced
            .iter()
            .filter_map(|candidate| self.descriptors.get(candidate))
            .find(|descriptor| descriptor.is_assignable_to(key))
            .ok_or_else(|| ResolveError::not_found(*key))?;
        self.build_instanced(descriptor, key, context, path)
    }

    fn build_instanced(
        &self,
        descriptor: &ComponentDescriptor,
        key: &TypeKey,
        context: &InjectionContext,
        path: &mut Vec<TypeKey>,
    ) -> Result<Handle, ResolveError> {
        let component = descriptor.key();
        if path.contains(&component) {
            let mut repeated = path.clone();
            repeated.push(component);
            return Err(ResolveError::Recursive { path: repeated });
        }
        let instance = descriptor.construct()?;
        let injector = Injector::new(self);
        injector.inject_config(instance.component());
        path.push(component);
        let wired = injector.wire(instance.component(), context, path);
        path.pop();
        wired.map_err(|source| ResolveError::Injection { component, source })?;
        debug!(target: REGISTRY_TARGET, component = %component, "built instanced component");
        descriptor
            .cast(&instance, key)
            .ok_or(ResolveError::TypeMismatch {
                expected: *key,
                found: component,
            })
    }

    /// Administrative name of a component type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAComponent`] for undeclared types.
    pub fn component_name(&self, key: &TypeKey) -> Result<&str, RegistryError> {
        self.declared_descriptor(key).map(ComponentDescriptor::name)
    }

    /// Description of a component type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAComponent`] for undeclared types.
    pub fn component_description(&self, key: &TypeKey) -> Result<&str, RegistryError> {
        self.declared_descriptor(key)
            .map(ComponentDescriptor::description)
    }

    /// Declaration of a component type.
    #[must_use]
    pub fn descriptor(&self, key: &TypeKey) -> Option<&ComponentDescriptor> {
        self.descriptors.get(key)
    }

    /// First declaration, in registration order, whose name matches `name`
    /// ignoring ASCII case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.declared
            .iter()
            .filter_map(|key| self.descriptors.get(key))
            .find(|descriptor| descriptor.name().eq_ignore_ascii_case(name))
    }

    /// Built singletons in construction order.
    pub fn singleton_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.singletons.iter().map(|instance| instance.handle().key())
    }

    /// Built singleton instances in construction order.
    pub fn singleton_instances(&self) -> impl Iterator<Item = &Instance> {
        self.singletons.iter()
    }

    /// Instanced components in registration order.
    pub fn instanced_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.instanced.iter().copied()
    }

    /// Returns `true` when `key` names a built singleton or a constructible
    /// instanced component.
    #[must_use]
    pub fn is_available(&self, key: &TypeKey) -> bool {
        self.singleton_index.contains_key(key) || self.instanced.contains(key)
    }

    /// Singleton dependency graph, edges pointing from dependent to
    /// dependency.
    #[must_use]
    pub const fn dependency_graph(&self) -> &DirectedGraph<TypeKey> {
        &self.graph
    }

    /// Configuration store used for injection.
    #[must_use]
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// External plugins available to plugin bindings.
    #[must_use]
    pub fn plugins(&self) -> &dyn PluginDirectory {
        self.plugins.as_ref()
    }

    /// Injector backed by this registry.
    #[must_use]
    pub const fn injector(&self) -> Injector<'_> {
        Injector::new(self)
    }

    fn singleton(&self, key: &TypeKey) -> Option<&Instance> {
        self.singleton_index
            .get(key)
            .and_then(|position| self.singletons.get(*position))
    }

    fn declared_descriptor(&self, key: &TypeKey) -> Result<&ComponentDescriptor, RegistryError> {
        self.descriptors
            .get(key)
            .ok_or_else(|| RegistryError::not_a_component(*key))
    }

    fn ensure_new(&self, key: TypeKey) -> Result<(), RegistryError> {
        if self.descriptors.contains_key(&key) {
            return Err(RegistryError::duplicate_component(key));
        }
        Ok(())
    }

    fn link_dependencies(&mut self, key: TypeKey) -> Result<(), RegistryError> {
        let dependencies = self
            .descriptors
            .get(&key)
            .map(|descriptor| descriptor.dependencies().to_vec())
            .unwrap_or_default();
        for dependency in dependencies {
            let is_singleton = self
                .descriptors
                .get(&dependency)
                .is_some_and(|declared| declared.kind() == ComponentKind::Singleton);
            if !is_singleton {
                return Err(RegistryError::invalid_dependency(key, dependency));
            }
            self.graph.add_edge(&key, &dependency)?;
        }
        Ok(())
    }

    fn insert_singleton(&mut self, key: TypeKey, instance: Instance) {
        self.singleton_index.insert(key, self.singletons.len());
        self.singletons.push(instance);
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("config", &self.config)
            .field("declared", &self.declared)
            .field("instanced", &self.instanced)
            .field("singletons", &self.singletons)
            .finish_non_exhaustive()
    }
}
