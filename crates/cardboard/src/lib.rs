//! Component container and command dispatch for game-server plugins.
//!
//! Cardboard discovers the components a plugin declares, builds the shared
//! singletons in dependency order, injects configuration values and component
//! references into their fields, and routes commands typed by players to
//! typed handlers behind permission checks.
//!
//! A host wires it up in three steps:
//!
//! 1. declare components, listeners, and commands in a [`StaticCatalog`];
//! 2. create a [`ComponentRegistry`] over a [`ConfigStore`] and the host's
//!    [`PluginDirectory`], adopting the plugin object itself if components
//!    depend on it;
//! 3. call [`Cardboard::load`] with the host's [`Host`] registration surface.
//!
//! Components come in two kinds. Singletons are built once at startup and
//! live as long as the container. Instanced components are built and injected
//! every time something resolves them, with an [`InjectionContext`] that can
//! override what they receive. Commands rely on this: every execution builds
//! a fresh backing instance that sees the invoking [`Invoker`].
//!
//! Field injection replaces reflection with explicit [`Binding`] lists; see
//! the [`inject`] module.
//!
//! [`ConfigStore`]: cardboard_config::ConfigStore

mod catalog;
pub mod command;
mod component;
mod container;
mod context;
mod error;
pub mod host;
pub mod inject;
mod key;
pub mod message;
mod registry;
mod report;
pub mod telemetry;

pub use catalog::{ListenerDescriptor, StaticCatalog, TypeCatalog};
pub use command::{
    CommandBuilder, CommandDescriptor, CommandFactory, CommandRouter, Dispatch, DispatchOutcome,
    Subcommand, SubcommandDescriptor,
};
pub use component::{
    Component, ComponentDescriptor, ComponentKind, DescriptorBuilder, Instance,
};
pub use container::Cardboard;
pub use context::InjectionContext;
pub use error::{
    CommandLoadError, ConstructionError, DispatchError, InjectionError, RegistryError,
    ResolveError, StartupError,
};
pub use host::{ExternalPlugin, Host, Invoker, Listener, Player, PluginDirectory, PluginTable};
pub use inject::{Binding, ConfigKey, ConfigScalar, Injectable, Injector, PluginRef, Setting, Wired};
pub use key::{Handle, TypeKey};
pub use registry::ComponentRegistry;
pub use report::{
    Outcome, ReportEntry, StartupReport, StartupReporter, StructuredStartupReporter, Subject,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
