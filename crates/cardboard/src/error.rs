//! Error types for component loading, resolution, injection, and commands.
//!
//! Load-time structural problems ([`RegistryError`]) abort startup. Problems
//! confined to a single type ([`ConstructionError`], [`CommandLoadError`])
//! are recorded in the startup report and only disable that type.

use thiserror::Error;

use cardboard_graph::GraphError;

use crate::key::TypeKey;

fn render_chain(keys: &[TypeKey]) -> String {
    let mut rendered: Vec<&str> = keys.iter().map(TypeKey::name).collect();
    if let Some(first) = keys.first() {
        rendered.push(first.name());
    }
    rendered.join(" -> ")
}

fn render_path(keys: &[TypeKey]) -> String {
    keys.iter()
        .map(TypeKey::name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Structural errors in the set of declared components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A singleton declared a dependency that is not a singleton component.
    #[error("singleton {component} depends on {dependency}, which is not a singleton component")]
    InvalidDependency {
        /// The declaring singleton.
        component: TypeKey,
        /// The offending dependency.
        dependency: TypeKey,
    },

    /// Singleton dependencies form a cycle.
    #[error("singleton dependency cycle: {}", render_chain(cycle))]
    Cycle {
        /// Members of the cycle, each depending on the next.
        cycle: Vec<TypeKey>,
    },

    /// The same type was registered twice.
    #[error("component {component} is already registered")]
    DuplicateComponent {
        /// The repeated type.
        component: TypeKey,
    },

    /// The type carries no component metadata.
    #[error("{key} isn't a component")]
    NotAComponent {
        /// The queried type.
        key: TypeKey,
    },
}

impl RegistryError {
    /// Creates a new `InvalidDependency` error.
    #[must_use]
    pub const fn invalid_dependency(component: TypeKey, dependency: TypeKey) -> Self {
        Self::InvalidDependency {
            component,
            dependency,
        }
    }

    /// Creates a new `DuplicateComponent` error.
    #[must_use]
    pub const fn duplicate_component(component: TypeKey) -> Self {
        Self::DuplicateComponent { component }
    }

    /// Creates a new `NotAComponent` error.
    #[must_use]
    pub const fn not_a_component(key: TypeKey) -> Self {
        Self::NotAComponent { key }
    }
}

impl From<GraphError<TypeKey>> for RegistryError {
    fn from(error: GraphError<TypeKey>) -> Self {
        match error {
            GraphError::Cycle { cycle } => Self::Cycle { cycle },
            // Edges are only added between classified singletons.
            GraphError::UnknownNode { node } => Self::NotAComponent { key: node },
        }
    }
}

/// Failure to build an instance of a component type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// No zero-argument constructor was declared.
    #[error("component {component} has no constructor")]
    MissingConstructor {
        /// The type that could not be built.
        component: TypeKey,
    },

    /// The constructor reported an error.
    #[error("failed to construct {component}: {message}")]
    Failed {
        /// The type that could not be built.
        component: TypeKey,
        /// Constructor-supplied reason.
        message: String,
    },

    /// A singleton this one depends on failed, so it was not built.
    #[error("{component} disabled because its dependency {dependency} is unavailable")]
    DependencyUnavailable {
        /// The disabled type.
        component: TypeKey,
        /// The failed singleton that caused it.
        dependency: TypeKey,
    },
}

impl ConstructionError {
    /// Creates a new `MissingConstructor` error.
    #[must_use]
    pub const fn missing_constructor(component: TypeKey) -> Self {
        Self::MissingConstructor { component }
    }

    /// Creates a new `Failed` error for `C`.
    ///
    /// Constructors call this to report why an instance could not be built.
    #[must_use]
    pub fn failed<C: ?Sized + 'static>(message: impl Into<String>) -> Self {
        Self::Failed {
            component: TypeKey::of::<C>(),
            message: message.into(),
        }
    }

    /// Creates a new `DependencyUnavailable` error.
    #[must_use]
    pub const fn dependency_unavailable(component: TypeKey, dependency: TypeKey) -> Self {
        Self::DependencyUnavailable {
            component,
            dependency,
        }
    }

    /// The type that could not be built.
    #[must_use]
    pub const fn component(&self) -> TypeKey {
        match self {
            Self::MissingConstructor { component }
            | Self::Failed { component, .. }
            | Self::DependencyUnavailable { component, .. } => *component,
        }
    }
}

/// Failure to inject a target's bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    /// A named external plugin is not loaded.
    #[error("field {field} requires plugin {plugin}, which is not loaded")]
    ExternalDependency {
        /// Field declaring the binding.
        field: &'static str,
        /// Plugin name that was looked up.
        plugin: String,
    },
}

impl InjectionError {
    /// Creates a new `ExternalDependency` error.
    #[must_use]
    pub fn external_dependency(field: &'static str, plugin: impl Into<String>) -> Self {
        Self::ExternalDependency {
            field,
            plugin: plugin.into(),
        }
    }
}

/// Failure to resolve a type through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Nothing in the context or registry is assignable to the key.
    #[error("no component assignable to {key}")]
    NotFound {
        /// The requested key.
        key: TypeKey,
    },

    /// An instanced component could not be built.
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    /// An instanced component could not be injected.
    #[error("failed to inject {component}: {source}")]
    Injection {
        /// The instanced type being built.
        component: TypeKey,
        /// Underlying injection failure.
        #[source]
        source: InjectionError,
    },

    /// Building an instanced component required itself.
    #[error("recursive resolution: {}", render_path(path))]
    Recursive {
        /// Instanced types on the resolution path, ending with the repeat.
        path: Vec<TypeKey>,
    },

    /// A resolved value did not have the requested type.
    #[error("resolved {found} when {expected} was requested")]
    TypeMismatch {
        /// The requested type.
        expected: TypeKey,
        /// The type actually produced.
        found: TypeKey,
    },
}

impl ResolveError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub const fn not_found(key: TypeKey) -> Self {
        Self::NotFound { key }
    }

    /// Returns `true` when the failure only means nothing matched.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Invalid command declarations, detected when the command is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLoadError {
    /// Two subcommands share a name, ignoring case.
    #[error("subcommand '{subcommand}' of command '{command}' is already registered")]
    DuplicateSubcommand {
        /// Command being built.
        command: String,
        /// Lower-cased repeated name.
        subcommand: String,
    },

    /// More than one default handler was declared.
    #[error("command '{command}' already has a default handler")]
    DuplicateDefault {
        /// Command being built.
        command: String,
    },

    /// A command or subcommand name is blank.
    #[error("command '{command}' declares a blank name")]
    EmptyName {
        /// Command being built; empty when the command name itself is blank.
        command: String,
    },
}

impl CommandLoadError {
    /// Creates a new `DuplicateSubcommand` error.
    #[must_use]
    pub fn duplicate_subcommand(command: impl Into<String>, subcommand: impl Into<String>) -> Self {
        Self::DuplicateSubcommand {
            command: command.into(),
            subcommand: subcommand.into(),
        }
    }

    /// Creates a new `DuplicateDefault` error.
    #[must_use]
    pub fn duplicate_default(command: impl Into<String>) -> Self {
        Self::DuplicateDefault {
            command: command.into(),
        }
    }

    /// Creates a new `EmptyName` error.
    #[must_use]
    pub fn empty_name(command: impl Into<String>) -> Self {
        Self::EmptyName {
            command: command.into(),
        }
    }
}

/// Failures while executing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The command's backing component could not be resolved. This signals a
    /// registration bug rather than bad user input.
    #[error("command '{command}' has no backing {component} instance: {source}")]
    InternalInconsistency {
        /// Command being executed.
        command: String,
        /// Backing component type.
        component: TypeKey,
        /// Why resolution failed.
        #[source]
        source: ResolveError,
    },
}

impl DispatchError {
    /// Creates a new `InternalInconsistency` error.
    #[must_use]
    pub fn internal_inconsistency(
        command: impl Into<String>,
        component: TypeKey,
        source: ResolveError,
    ) -> Self {
        Self::InternalInconsistency {
            command: command.into(),
            component,
            source,
        }
    }
}

/// Errors that abort startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    /// The declared components are structurally inconsistent.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A singleton could not be injected.
    #[error("failed to inject singleton {component}: {source}")]
    Injection {
        /// The singleton being injected.
        component: TypeKey,
        /// Underlying injection failure.
        #[source]
        source: InjectionError,
    },
}
