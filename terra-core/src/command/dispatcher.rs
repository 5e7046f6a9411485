//! The command registry and dispatch loop (§6 "A dispatcher maps a name to
//! a handler with a required permission level").

use std::sync::Arc;

use crate::error::CommandError;

use super::commands;
use super::context::CommandContext;

/// A registered command: name, required permission level, and the handler
/// body. `0` = usable by any player, `4` = full operator (§6).
pub trait CommandHandler: Send + Sync {
    /// The canonical, lowercase command name (without the leading `/`).
    fn name(&self) -> &'static str;
    /// Additional lowercase names this command also answers to.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
    /// Minimum permission level required to run this command (§6).
    fn permission_level(&self) -> u8;
    /// A one-line usage string shown by `/help`.
    fn usage(&self) -> &'static str;
    /// Runs the command, returning the feedback message on success.
    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError>;
}

/// Maps command names to handlers and dispatches invocations (§6).
pub struct CommandDispatcher {
    handlers: scc::HashMap<&'static str, Arc<dyn CommandHandler>>,
    /// Primary names only, used for `/help` listing and prefix completion;
    /// aliases resolve through `handlers` but don't appear here.
    primary_names: scc::HashSet<&'static str>,
}

impl CommandDispatcher {
    /// Builds a dispatcher with every built-in command registered (§6).
    #[must_use]
    pub fn new() -> Self {
        let dispatcher = Self::new_empty();
        for handler in commands::built_ins() {
            dispatcher.register(handler);
        }
        dispatcher
    }

    /// Builds a dispatcher with no commands registered.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            handlers: scc::HashMap::new(),
            primary_names: scc::HashSet::new(),
        }
    }

    /// Registers a handler under its primary name and all aliases.
    pub fn register(&self, handler: Arc<dyn CommandHandler>) {
        let _ = self.primary_names.insert_sync(handler.name());
        let _ = self.handlers.insert_sync(handler.name(), handler.clone());
        for &alias in handler.aliases() {
            let _ = self.handlers.insert_sync(alias, handler.clone());
        }
    }

    /// Removes a command and its aliases by primary name.
    pub fn unregister(&self, name: &str) {
        if let Some(handler) = self.handlers.read_sync(name, |_, v| v.clone()) {
            let _ = self.handlers.remove_sync(handler.name());
            for &alias in handler.aliases() {
                let _ = self.handlers.remove_sync(alias);
            }
            let _ = self.primary_names.remove_sync(handler.name());
        }
    }

    /// Looks a name up exactly first, then by unambiguous case-insensitive
    /// prefix (§6 "Name-matching for completion is case-insensitive
    /// prefix").
    fn resolve(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        let lower = name.to_lowercase();
        if let Some(handler) = self.handlers.read_sync(lower.as_str(), |_, v| v.clone()) {
            return Some(handler);
        }

        let mut matches: Vec<Arc<dyn CommandHandler>> = Vec::new();
        self.handlers.iter_sync(|registered_name, handler| {
            if registered_name.starts_with(lower.as_str()) {
                matches.push(handler.clone());
            }
            true
        });
        match matches.len() {
            1 => Some(matches.remove(0)),
            _ => None,
        }
    }

    /// Splits `line` into a command name and its raw argument tokens.
    fn split(line: &str) -> Result<(&str, Vec<&str>), CommandError> {
        let line = line.strip_prefix('/').unwrap_or(line).trim();
        if line.is_empty() {
            return Err(CommandError::BadArgument("empty command".to_string()));
        }
        let mut parts = line.split_whitespace();
        let name = parts.next().expect("checked non-empty above");
        Ok((name, parts.collect()))
    }

    /// Parses and runs one command line, enforcing the handler's
    /// permission level against `ctx.permission_level`.
    pub fn dispatch(&self, line: &str, ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (name, args) = Self::split(line)?;
        let handler = self
            .resolve(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        if ctx.permission_level < handler.permission_level() {
            return Err(CommandError::PermissionDenied);
        }

        handler.execute(&args, ctx)
    }

    /// Lists every registered primary command name, for `/help` and
    /// completion (§6).
    #[must_use]
    pub fn command_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.primary_names.iter_sync(|name| {
            names.push(*name);
            true
        });
        names.sort_unstable();
        names
    }

    /// Returns the primary names matching `prefix`, case-insensitively,
    /// sorted (§6 "case-insensitive prefix" completion).
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<&'static str> {
        let lower = prefix.to_lowercase();
        let mut names: Vec<_> = self.command_names().into_iter().filter(|n| n.starts_with(lower.as_str())).collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn unknown_command_is_rejected() {
        let dispatcher = CommandDispatcher::new();
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = dispatcher.dispatch("/bogus", &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::UnknownCommand(_)));
    }

    #[test]
    fn unambiguous_prefix_resolves_to_a_command() {
        let dispatcher = CommandDispatcher::new();
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = dispatcher.dispatch("/sto", &mut ctx).unwrap();
        assert_eq!(result, "Stopping the server");
        assert!(backend.stop_requested);
    }

    #[test]
    fn insufficient_permission_is_denied() {
        let dispatcher = CommandDispatcher::new();
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 0, &mut backend);
        let err = dispatcher.dispatch("/stop", &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::PermissionDenied));
    }

    #[test]
    fn command_names_lists_every_builtin() {
        let dispatcher = CommandDispatcher::new();
        assert_eq!(dispatcher.command_names().len(), commands::built_ins().len());
    }
}
