//! Declarative commands backed by components.
//!
//! A command is declared with a [`CommandBuilder`] naming the component type
//! that backs it, its permission node, and the [`Subcommand`] handlers and
//! default handler it routes to. Building it against a frozen registry yields
//! a [`CommandRouter`], which the host registers through [`Dispatch`].
//!
//! Every execution resolves a fresh backing instance with the invoker (and,
//! for live players, the player) in the injection context, so the backing
//! type is normally an instanced component.

mod builder;
mod defaults;
mod router;

use std::sync::Arc;

pub use builder::{CommandBuilder, Handler, Subcommand};
pub use defaults::{
    DEFAULT_DESCRIPTION, DEFAULT_LABEL, DEFAULT_PERMISSION_MESSAGE, DEFAULT_USAGE,
};
pub use router::CommandRouter;

use crate::error::{CommandLoadError, DispatchError};
use crate::host::Invoker;
use crate::key::TypeKey;
use crate::registry::ComponentRegistry;

/// Tracing target for command dispatch.
pub(crate) const COMMAND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::command");

/// Metadata of a built command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: String,
    pub(crate) usage: String,
    pub(crate) label: String,
    pub(crate) permission: String,
    pub(crate) permission_message: String,
    pub(crate) component: TypeKey,
}

impl CommandDescriptor {
    /// Primary command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Usage text, sent whenever an execution is not handled.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Namespace the host registers the command under.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Permission node required to run the command at all.
    #[must_use]
    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Message sent when a permission check fails.
    #[must_use]
    pub fn permission_message(&self) -> &str {
        &self.permission_message
    }

    /// Component type that backs every execution.
    #[must_use]
    pub const fn component(&self) -> TypeKey {
        self.component
    }

    /// Returns `true` when `name` is the command name or one of its aliases,
    /// ignoring ASCII case.
    #[must_use]
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// Metadata of one subcommand name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcommandDescriptor {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) usage: String,
    pub(crate) permission: String,
}

impl SubcommandDescriptor {
    /// Lower-cased name the subcommand is routed by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Usage text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Permission node checked in addition to the command's.
    #[must_use]
    pub fn permission(&self) -> &str {
        &self.permission
    }
}

/// How an execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DispatchOutcome {
    /// A handler ran and reported the invocation handled.
    Handled,
    /// A permission check failed and the denial message was sent.
    PermissionDenied,
    /// No handler accepted the invocation and the usage text was sent.
    UsageShown,
}

/// A command the host can execute.
pub trait Dispatch: Send + Sync {
    /// Command metadata.
    fn descriptor(&self) -> &CommandDescriptor;

    /// Subcommands in name order.
    fn subcommands(&self) -> Vec<&SubcommandDescriptor>;

    /// Executes the command for `invoker`. `label` is the name the command
    /// was invoked by.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InternalInconsistency`] when the backing
    /// component cannot be resolved. The invoker has already been sent the
    /// usage text.
    fn execute(
        &self,
        invoker: &Arc<dyn Invoker>,
        label: &str,
        args: &[String],
    ) -> Result<DispatchOutcome, DispatchError>;

    /// Suggests subcommand names `invoker` may use for the partially typed
    /// arguments.
    fn complete(&self, invoker: &dyn Invoker, args: &[String]) -> Vec<String>;
}

/// A command declaration that can be built once the registry is frozen.
pub trait CommandFactory: Send + Sync {
    /// Name the command is declared with.
    fn command_name(&self) -> &str;

    /// Component type backing the command.
    fn component(&self) -> TypeKey;

    /// Validates the declaration and builds the dispatchable command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandLoadError`] for blank names, repeated subcommand
    /// names, or more than one default handler.
    fn build(&self, registry: Arc<ComponentRegistry>) -> Result<Arc<dyn Dispatch>, CommandLoadError>;
}
