//! Default text used when a command or subcommand leaves a field unset.

/// Description shown for commands and subcommands that do not set one.
pub const DEFAULT_DESCRIPTION: &str = "A really cool command.";

/// Usage text sent when a command is not handled.
pub const DEFAULT_USAGE: &str = "No usage specified.";

/// Namespace label commands are registered under.
pub const DEFAULT_LABEL: &str = "cardboard";

/// Message sent to invokers without the required permission node.
pub const DEFAULT_PERMISSION_MESSAGE: &str = "You don't have permission to do that!";
