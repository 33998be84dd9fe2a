//! Startup outcomes and the observers that surface them.

use std::sync::Arc;

use crate::command::CommandDescriptor;
use crate::error::{CommandLoadError, ConstructionError, InjectionError, StartupError};
use crate::key::TypeKey;

const STARTUP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::startup");

/// What a report entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Subject {
    /// A declared component.
    Component,
    /// An event listener.
    Listener,
    /// A command.
    Command,
}

/// Result of loading one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A singleton was built, injected, and initialised.
    Loaded,
    /// An instanced component, listener, or command was registered.
    Registered,
    /// A singleton's `init` hook reported failure. It stays registered.
    InitFailed,
    /// Construction failed.
    Failed(ConstructionError),
    /// A singleton was not built because a dependency is unavailable.
    Skipped {
        /// The unavailable dependency.
        dependency: TypeKey,
    },
    /// A listener could not be injected and was not registered.
    InjectionFailed(InjectionError),
    /// A command declaration was invalid and was not registered.
    Rejected(CommandLoadError),
}

impl Outcome {
    /// Returns `true` for every outcome other than [`Outcome::Loaded`] and
    /// [`Outcome::Registered`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Loaded | Self::Registered)
    }
}

impl From<ConstructionError> for Outcome {
    fn from(error: ConstructionError) -> Self {
        match error {
            ConstructionError::DependencyUnavailable { dependency, .. } => {
                Self::Skipped { dependency }
            }
            other => Self::Failed(other),
        }
    }
}

/// One line of the startup report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    subject: Subject,
    key: TypeKey,
    name: String,
    outcome: Outcome,
}

impl ReportEntry {
    pub(crate) fn new(subject: Subject, key: TypeKey, name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            subject,
            key,
            name: name.into(),
            outcome,
        }
    }

    /// Kind of declaration.
    #[must_use]
    pub const fn subject(&self) -> Subject {
        self.subject
    }

    /// Declared type. Commands report their backing component type.
    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    /// Administrative name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What happened.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// Every outcome recorded while the container started, in the order they
/// happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupReport {
    entries: Vec<ReportEntry>,
}

impl StartupReport {
    pub(crate) fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// All entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Outcome recorded for `key` as `subject`.
    #[must_use]
    pub fn outcome_of(&self, subject: Subject, key: &TypeKey) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.subject == subject && entry.key == *key)
            .map(ReportEntry::outcome)
    }

    /// Entries whose outcome is a failure.
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_failure())
    }

    /// Returns `true` when nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Observer for container startup.
pub trait StartupReporter: Send + Sync {
    /// Invoked before any declaration is read.
    fn startup_starting(&self, scope: &str);

    /// Invoked when a component is built or registered.
    fn component_loaded(&self, entry: &ReportEntry);

    /// Invoked for every entry whose outcome is a failure.
    fn component_failed(&self, entry: &ReportEntry);

    /// Invoked after a listener is handed to the host.
    fn listener_registered(&self, entry: &ReportEntry);

    /// Invoked after a command is handed to the host.
    fn command_registered(&self, command: &CommandDescriptor);

    /// Invoked once startup completes.
    fn startup_succeeded(&self, report: &StartupReport);

    /// Invoked when startup aborts.
    fn startup_failed(&self, error: &StartupError);
}

impl<T> StartupReporter for Arc<T>
where
    T: StartupReporter,
{
    fn startup_starting(&self, scope: &str) {
        (**self).startup_starting(scope);
    }

    fn component_loaded(&self, entry: &ReportEntry) {
        (**self).component_loaded(entry);
    }

    fn component_failed(&self, entry: &ReportEntry) {
        (**self).component_failed(entry);
    }

    fn listener_registered(&self, entry: &ReportEntry) {
        (**self).listener_registered(entry);
    }

    fn command_registered(&self, command: &CommandDescriptor) {
        (**self).command_registered(command);
    }

    fn startup_succeeded(&self, report: &StartupReport) {
        (**self).startup_succeeded(report);
    }

    fn startup_failed(&self, error: &StartupError) {
        (**self).startup_failed(error);
    }
}

/// Default reporter that records startup events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredStartupReporter;

impl StructuredStartupReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StartupReporter for StructuredStartupReporter {
    fn startup_starting(&self, scope: &str) {
        tracing::info!(
            target: STARTUP_TARGET,
            event = "startup_starting",
            scope,
            "loading components"
        );
    }

    fn component_loaded(&self, entry: &ReportEntry) {
        tracing::info!(
            target: STARTUP_TARGET,
            event = "component_loaded",
            component = %entry.key(),
            name = entry.name(),
            "loaded component"
        );
    }

    fn component_failed(&self, entry: &ReportEntry) {
        tracing::warn!(
            target: STARTUP_TARGET,
            event = "component_failed",
            subject = %entry.subject(),
            component = %entry.key(),
            name = entry.name(),
            outcome = ?entry.outcome(),
            "failed loading"
        );
    }

    fn listener_registered(&self, entry: &ReportEntry) {
        tracing::info!(
            target: STARTUP_TARGET,
            event = "listener_registered",
            listener = %entry.key(),
            name = entry.name(),
            "registered listener"
        );
    }

    fn command_registered(&self, command: &CommandDescriptor) {
        tracing::info!(
            target: STARTUP_TARGET,
            event = "command_registered",
            command = command.name(),
            label = command.label(),
            component = %command.component(),
            "registered command"
        );
    }

    fn startup_succeeded(&self, report: &StartupReport) {
        tracing::info!(
            target: STARTUP_TARGET,
            event = "startup_succeeded",
            entries = report.entries().len(),
            failures = report.failures().count(),
            "container started"
        );
    }

    fn startup_failed(&self, error: &StartupError) {
        tracing::error!(
            target: STARTUP_TARGET,
            event = "startup_failed",
            error = %error,
            "container startup failed"
        );
    }
}
