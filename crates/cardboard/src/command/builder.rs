//! Command declarations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::defaults::{DEFAULT_DESCRIPTION, DEFAULT_LABEL, DEFAULT_PERMISSION_MESSAGE, DEFAULT_USAGE};
use super::router::{CommandRouter, Route};
use super::{CommandDescriptor, CommandFactory, Dispatch, SubcommandDescriptor};
use crate::component::Component;
use crate::error::CommandLoadError;
use crate::key::TypeKey;
use crate::registry::ComponentRegistry;

/// A command handler. It receives the backing instance, a label or the joined
/// remaining arguments, and the arguments themselves, and returns `false`
/// when it did not handle the invocation.
pub type Handler<C> = Arc<dyn Fn(&C, &str, &[String]) -> bool + Send + Sync>;

/// A handler routed to by one or more names given as the first argument.
pub struct Subcommand<C> {
    names: Vec<String>,
    description: String,
    usage: String,
    permission: String,
    handler: Handler<C>,
}

impl<C> Subcommand<C> {
    /// Declares a subcommand answering to every name in `names`.
    ///
    /// The handler receives the arguments after the subcommand name, both
    /// joined with spaces and as a slice.
    #[must_use]
    pub fn new<I, S, F>(names: I, permission: impl Into<String>, handler: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&C, &str, &[String]) -> bool + Send + Sync + 'static,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            usage: DEFAULT_USAGE.to_owned(),
            permission: permission.into(),
            handler: Arc::new(handler),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the usage text.
    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

impl<C> fmt::Debug for Subcommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subcommand")
            .field("names", &self.names)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

/// Declares a command backed by the component type `C`.
///
/// Nothing is validated until the command is built, so a declaration can be
/// assembled freely and rejected as a whole.
pub struct CommandBuilder<C> {
    name: String,
    aliases: Vec<String>,
    description: String,
    usage: String,
    label: String,
    permission: String,
    permission_message: String,
    subcommands: Vec<Subcommand<C>>,
    default_handlers: Vec<Handler<C>>,
}

impl<C: Component> CommandBuilder<C> {
    /// Starts a command called `name` guarded by the `permission` node.
    #[must_use]
    pub fn new(name: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: DEFAULT_DESCRIPTION.to_owned(),
            usage: DEFAULT_USAGE.to_owned(),
            label: DEFAULT_LABEL.to_owned(),
            permission: permission.into(),
            permission_message: DEFAULT_PERMISSION_MESSAGE.to_owned(),
            subcommands: Vec::new(),
            default_handlers: Vec::new(),
        }
    }

    /// Adds an alternative name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several alternative names.
    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the usage text.
    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Sets the namespace label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the message sent when a permission check fails.
    #[must_use]
    pub fn permission_message(mut self, message: impl Into<String>) -> Self {
        self.permission_message = message.into();
        self
    }

    /// Adds a subcommand.
    #[must_use]
    pub fn subcommand(mut self, subcommand: Subcommand<C>) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Adds the handler used when no subcommand matches. It receives the
    /// invocation label and every argument.
    #[must_use]
    pub fn default_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&C, &str, &[String]) -> bool + Send + Sync + 'static,
    {
        self.default_handlers.push(Arc::new(handler));
        self
    }

    /// Validates the declaration and builds its router.
    ///
    /// # Errors
    ///
    /// Returns [`CommandLoadError::EmptyName`] when the command or a
    /// subcommand name is blank, [`CommandLoadError::DuplicateSubcommand`]
    /// when two subcommand names collide ignoring case, and
    /// [`CommandLoadError::DuplicateDefault`] when more than one default
    /// handler was added.
    pub fn build_router(
        &self,
        registry: Arc<ComponentRegistry>,
    ) -> Result<CommandRouter<C>, CommandLoadError> {
        if self.name.trim().is_empty() {
            return Err(CommandLoadError::empty_name(self.name.as_str()));
        }
        let routes = self.routes()?;
        let default = match self.default_handlers.as_slice() {
            [] => None,
            [handler] => Some(Arc::clone(handler)),
            _ => return Err(CommandLoadError::duplicate_default(self.name.as_str())),
        };
        Ok(CommandRouter::new(self.descriptor(), registry, routes, default))
    }

    fn routes(&self) -> Result<BTreeMap<String, Route<C>>, CommandLoadError> {
        let mut routes = BTreeMap::new();
        for subcommand in &self.subcommands {
            for name in &subcommand.names {
                let lower = name.trim().to_lowercase();
                if lower.is_empty() {
                    return Err(CommandLoadError::empty_name(self.name.as_str()));
                }
                if routes.contains_key(&lower) {
                    return Err(CommandLoadError::duplicate_subcommand(
                        self.name.as_str(),
                        lower,
                    ));
                }
                let descriptor = SubcommandDescriptor {
                    name: lower.clone(),
                    description: subcommand.description.clone(),
                    usage: subcommand.usage.clone(),
                    permission: subcommand.permission.clone(),
                };
                routes.insert(lower, Route::new(descriptor, Arc::clone(&subcommand.handler)));
            }
        }
        Ok(routes)
    }

    fn descriptor(&self) -> CommandDescriptor {
        CommandDescriptor {
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            description: self.description.clone(),
            usage: self.usage.clone(),
            label: self.label.clone(),
            permission: self.permission.clone(),
            permission_message: self.permission_message.clone(),
            component: TypeKey::of::<C>(),
        }
    }
}

impl<C: Component> CommandFactory for CommandBuilder<C> {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn component(&self) -> TypeKey {
        TypeKey::of::<C>()
    }

    fn build(&self, registry: Arc<ComponentRegistry>) -> Result<Arc<dyn Dispatch>, CommandLoadError> {
        let router = self.build_router(registry)?;
        Ok(Arc::new(router))
    }
}

impl<C> fmt::Debug for CommandBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("permission", &self.permission)
            .field("subcommands", &self.subcommands)
            .field("default_handlers", &self.default_handlers.len())
            .finish_non_exhaustive()
    }
}
