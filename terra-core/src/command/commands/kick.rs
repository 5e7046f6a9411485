//! Handler for `/kick`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct KickCommand;

impl CommandHandler for KickCommand {
    fn name(&self) -> &'static str {
        "kick"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/kick <player> [reason...]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [name, reason @ ..] = args else {
            return Err(CommandError::BadArgument("missing player name".to_string()));
        };
        let reason = if reason.is_empty() { "Kicked by an operator".to_string() } else { reason.join(" ") };
        if ctx.backend.kick(name, &reason) {
            Ok(format!("Kicked {name}: {reason}"))
        } else {
            Err(CommandError::Failed(format!("player not found: {name}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn defaults_the_reason_when_none_is_given() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = KickCommand.execute(&["Notch"], &mut ctx).unwrap();
        assert_eq!(result, "Kicked Notch: Kicked by an operator");
    }

    #[test]
    fn joins_a_multi_word_reason() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = KickCommand.execute(&["Notch", "being", "mean"], &mut ctx).unwrap();
        assert_eq!(result, "Kicked Notch: being mean");
    }
}
