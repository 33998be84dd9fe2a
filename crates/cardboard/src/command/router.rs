//! Routing an invocation to a subcommand or the default handler.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use super::builder::Handler;
use super::{COMMAND_TARGET, CommandDescriptor, Dispatch, DispatchOutcome, SubcommandDescriptor};
use crate::component::Component;
use crate::context::InjectionContext;
use crate::error::DispatchError;
use crate::host::{Invoker, is_permitted};
use crate::message::send_message;
use crate::registry::ComponentRegistry;

pub(crate) struct Route<C> {
    descriptor: SubcommandDescriptor,
    handler: Handler<C>,
}

impl<C> Route<C> {
    pub(crate) const fn new(descriptor: SubcommandDescriptor, handler: Handler<C>) -> Self {
        Self {
            descriptor,
            handler,
        }
    }
}

/// A built command backed by the component type `C`.
pub struct CommandRouter<C> {
    descriptor: CommandDescriptor,
    registry: Arc<ComponentRegistry>,
    routes: BTreeMap<String, Route<C>>,
    default: Option<Handler<C>>,
}

impl<C: Component> CommandRouter<C> {
    pub(crate) const fn new(
        descriptor: CommandDescriptor,
        registry: Arc<ComponentRegistry>,
        routes: BTreeMap<String, Route<C>>,
        default: Option<Handler<C>>,
    ) -> Self {
        Self {
            descriptor,
            registry,
            routes,
            default,
        }
    }

    /// Returns `true` when a default handler is registered.
    #[must_use]
    pub const fn has_default_handler(&self) -> bool {
        self.default.is_some()
    }

    fn context_for(invoker: &Arc<dyn Invoker>) -> InjectionContext {
        let mut context = InjectionContext::new().with(Arc::clone(invoker));
        if let Some(player) = invoker.player() {
            context.insert(player);
        }
        context
    }

    fn route<'a>(&self, args: &'a [String]) -> Option<(&Route<C>, &'a [String])> {
        let (first, rest) = args.split_first()?;
        self.routes
            .get(&first.to_lowercase())
            .map(|route| (route, rest))
    }

    fn deny(&self, invoker: &dyn Invoker, node: &str) -> DispatchOutcome {
        debug!(
            target: COMMAND_TARGET,
            command = %self.descriptor.name,
            invoker = %invoker.name(),
            permission = node,
            "permission denied"
        );
        send_message(invoker, [self.descriptor.permission_message()]);
        DispatchOutcome::PermissionDenied
    }

    fn show_usage(&self, invoker: &dyn Invoker) {
        send_message(invoker, [self.descriptor.usage()]);
    }
}

impl<C: Component> Dispatch for CommandRouter<C> {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    fn subcommands(&self) -> Vec<&SubcommandDescriptor> {
        self.routes.values().map(|route| &route.descriptor).collect()
    }

    fn execute(
        &self,
        invoker: &Arc<dyn Invoker>,
        label: &str,
        args: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        let sender = invoker.as_ref();
        if !is_permitted(sender, self.descriptor.permission()) {
            return Ok(self.deny(sender, self.descriptor.permission()));
        }

        let context = Self::context_for(invoker);
        let instance = self.registry.resolve_as::<C>(&context).map_err(|source| {
            self.show_usage(sender);
            let failure = DispatchError::internal_inconsistency(
                self.descriptor.name(),
                self.descriptor.component(),
                source,
            );
            error!(target: COMMAND_TARGET, error = %failure, "command has no backing instance");
            failure
        })?;
        let target: &C = &instance;

        let handled = match self.route(args) {
            Some((route, rest)) => {
                if !is_permitted(sender, route.descriptor.permission()) {
                    return Ok(self.deny(sender, route.descriptor.permission()));
                }
                debug!(
                    target: COMMAND_TARGET,
                    command = %self.descriptor.name,
                    subcommand = %route.descriptor.name,
                    "routing to subcommand"
                );
                (route.handler)(target, &rest.join(" "), rest)
            }
            None => self
                .default
                .as_ref()
                .is_some_and(|handler| handler(target, label, args)),
        };

        if handled {
            Ok(DispatchOutcome::Handled)
        } else {
            self.show_usage(sender);
            Ok(DispatchOutcome::UsageShown)
        }
    }

    fn complete(&self, invoker: &dyn Invoker, args: &[String]) -> Vec<String> {
        let [prefix] = args else {
            return Vec::new();
        };
        if !is_permitted(invoker, self.descriptor.permission()) {
            return Vec::new();
        }
        let typed = prefix.to_lowercase();
        self.routes
            .values()
            .filter(|route| route.descriptor.name.starts_with(&typed))
            .filter(|route| is_permitted(invoker, route.descriptor.permission()))
            .map(|route| route.descriptor.name.clone())
            .collect()
    }
}

impl<C> fmt::Debug for CommandRouter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRouter")
            .field("descriptor", &self.descriptor)
            .field("subcommands", &self.routes.keys().collect::<Vec<_>>())
            .field("has_default", &self.default.is_some())
            .finish_non_exhaustive()
    }
}
