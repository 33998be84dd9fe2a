//! Container startup orchestration.
//!
//! [`Cardboard::load`] runs the whole startup sequence against a host:
//!
//! 1. read the component declarations under the scope and classify them;
//! 2. build the singletons in dependency order;
//! 3. inject every singleton and run its `load_config` and `init` hooks;
//! 4. freeze the registry;
//! 5. build, inject, and register the listeners;
//! 6. build and register the commands.
//!
//! Structural problems (duplicate declarations, invalid dependencies, cycles)
//! and missing external plugins on singletons abort startup. Everything else
//! is recorded in the [`StartupReport`] and startup continues.

use std::fmt;
use std::sync::Arc;

use cardboard_config::ConfigSource;
use tracing::warn;

use crate::catalog::TypeCatalog;
use crate::command::Dispatch;
use crate::context::InjectionContext;
use crate::error::{ResolveError, StartupError};
use crate::host::Host;
use crate::key::TypeKey;
use crate::registry::ComponentRegistry;
use crate::report::{
    Outcome, ReportEntry, StartupReport, StartupReporter, StructuredStartupReporter, Subject,
};

const STARTUP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::startup");

/// A started container: the frozen registry plus the commands it registered.
pub struct Cardboard {
    registry: Arc<ComponentRegistry>,
    commands: Vec<Arc<dyn Dispatch>>,
    report: StartupReport,
}

impl Cardboard {
    /// Starts the container, logging progress with the
    /// [`StructuredStartupReporter`].
    ///
    /// # Errors
    ///
    /// See [`Cardboard::load_with`].
    pub fn load(
        registry: ComponentRegistry,
        catalog: &dyn TypeCatalog,
        scope: &str,
        host: &dyn Host,
    ) -> Result<Self, StartupError> {
        Self::load_with(
            registry,
            catalog,
            scope,
            host,
            Arc::new(StructuredStartupReporter::new()),
        )
    }

    /// Starts the container from the declarations `catalog` lists under
    /// `scope`, reporting progress to `reporter`.
    ///
    /// `registry` may already hold adopted singletons, such as the host
    /// plugin itself.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Registry`] when the declarations are
    /// structurally invalid and [`StartupError::Injection`] when a singleton
    /// names an external plugin that is not loaded.
    pub fn load_with(
        registry: ComponentRegistry,
        catalog: &dyn TypeCatalog,
        scope: &str,
        host: &dyn Host,
        reporter: Arc<dyn StartupReporter>,
    ) -> Result<Self, StartupError> {
        reporter.startup_starting(scope);
        let mut startup = Startup {
            reporter: reporter.as_ref(),
            report: StartupReport::default(),
        };
        match startup.run(registry, catalog, scope, host) {
            Ok((registry, commands)) => {
                let report = startup.report;
                reporter.startup_succeeded(&report);
                Ok(Self {
                    registry,
                    commands,
                    report,
                })
            }
            Err(error) => {
                reporter.startup_failed(&error);
                Err(error)
            }
        }
    }

    /// The frozen registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    /// What happened to every declaration.
    #[must_use]
    pub const fn report(&self) -> &StartupReport {
        &self.report
    }

    /// Registered commands in registration order.
    #[must_use]
    pub fn commands(&self) -> &[Arc<dyn Dispatch>] {
        &self.commands
    }

    /// The registered command answering to `name`, ignoring ASCII case.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<&Arc<dyn Dispatch>> {
        self.commands
            .iter()
            .find(|command| command.descriptor().answers_to(name))
    }

    /// Resolves a component without context overrides.
    ///
    /// # Errors
    ///
    /// See [`ComponentRegistry::resolve`].
    pub fn component<T>(&self) -> Result<Arc<T>, ResolveError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.resolve_as::<T>(&InjectionContext::new())
    }

    /// The configuration source registered or stored as `name`.
    #[must_use]
    pub fn config_source(&self, name: &str) -> Arc<dyn ConfigSource> {
        self.registry.config().named_source(name)
    }
}

impl fmt::Debug for Cardboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: Vec<&str> = self
            .commands
            .iter()
            .map(|command| command.descriptor().name())
            .collect();
        f.debug_struct("Cardboard")
            .field("registry", &self.registry)
            .field("commands", &commands)
            .field("report", &self.report)
            .finish()
    }
}

struct Startup<'a> {
    reporter: &'a dyn StartupReporter,
    report: StartupReport,
}

impl Startup<'_> {
    fn run(
        &mut self,
        mut registry: ComponentRegistry,
        catalog: &dyn TypeCatalog,
        scope: &str,
        host: &dyn Host,
    ) -> Result<(Arc<ComponentRegistry>, Vec<Arc<dyn Dispatch>>), StartupError> {
        let rejected = registry.classify(catalog.components(scope))?;
        for error in rejected {
            let key = error.component();
            self.record_component(&registry, key, Outcome::Failed(error));
        }
        let instanced: Vec<TypeKey> = registry.instanced_keys().collect();
        for key in instanced {
            self.record_component(&registry, key, Outcome::Registered);
        }

        for error in registry.instantiate_singletons()? {
            let key = error.component();
            self.record_component(&registry, key, Outcome::from(error));
        }
        self.initialise_singletons(&registry)?;

        let frozen = Arc::new(registry);
        self.register_listeners(&frozen, catalog, scope, host);
        let commands = self.register_commands(&frozen, catalog, scope, host);
        Ok((frozen, commands))
    }

    fn initialise_singletons(&mut self, registry: &ComponentRegistry) -> Result<(), StartupError> {
        let injector = registry.injector();
        let context = InjectionContext::new();
        for instance in registry.singleton_instances() {
            let key = instance.handle().key();
            let component = instance.component();
            injector
                .inject(component, &context)
                .map_err(|source| StartupError::Injection {
                    component: key,
                    source,
                })?;
            component.load_config();
            let outcome = if component.init() {
                Outcome::Loaded
            } else {
                warn!(target: STARTUP_TARGET, component = %key, "component init reported failure");
                Outcome::InitFailed
            };
            self.record_component(registry, key, outcome);
        }
        Ok(())
    }

    fn register_listeners(
        &mut self,
        registry: &ComponentRegistry,
        catalog: &dyn TypeCatalog,
        scope: &str,
        host: &dyn Host,
    ) {
        let context = InjectionContext::new();
        for descriptor in catalog.listeners(scope) {
            let outcome = match descriptor.construct() {
                Ok(listener) => match registry.injector().inject(listener.as_ref(), &context) {
                    Ok(()) => {
                        host.register_listener(descriptor.name(), listener);
                        Outcome::Registered
                    }
                    Err(error) => Outcome::InjectionFailed(error),
                },
                Err(error) => Outcome::Failed(error),
            };
            self.record(ReportEntry::new(
                Subject::Listener,
                descriptor.key(),
                descriptor.name(),
                outcome,
            ));
        }
    }

    fn register_commands(
        &mut self,
        registry: &Arc<ComponentRegistry>,
        catalog: &dyn TypeCatalog,
        scope: &str,
        host: &dyn Host,
    ) -> Vec<Arc<dyn Dispatch>> {
        let mut commands = Vec::new();
        for factory in catalog.commands(scope) {
            let component = factory.component();
            if !registry.is_available(&component) {
                warn!(
                    target: STARTUP_TARGET,
                    command = factory.command_name(),
                    component = %component,
                    "command backing type is not a registered component"
                );
            }
            let outcome = match factory.build(Arc::clone(registry)) {
                Ok(command) => {
                    host.register_command(Arc::clone(&command));
                    self.reporter.command_registered(command.descriptor());
                    commands.push(command);
                    Outcome::Registered
                }
                Err(error) => Outcome::Rejected(error),
            };
            self.record(ReportEntry::new(
                Subject::Command,
                component,
                factory.command_name(),
                outcome,
            ));
        }
        commands
    }

    fn record_component(&mut self, registry: &ComponentRegistry, key: TypeKey, outcome: Outcome) {
        let name = registry
            .component_name(&key)
            .map_or_else(|_| key.short_name().to_owned(), str::to_owned);
        self.record(ReportEntry::new(Subject::Component, key, name, outcome));
    }

    fn record(&mut self, entry: ReportEntry) {
        if entry.outcome().is_failure() {
            self.reporter.component_failed(&entry);
        } else {
            match entry.subject() {
                Subject::Component => self.reporter.component_loaded(&entry),
                Subject::Listener => self.reporter.listener_registered(&entry),
                Subject::Command => {}
            }
        }
        self.report.push(entry);
    }
}
