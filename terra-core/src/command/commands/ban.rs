//! Handler for `/ban`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct BanCommand;

impl CommandHandler for BanCommand {
    fn name(&self) -> &'static str {
        "ban"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/ban <player> [reason...]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [name, reason @ ..] = args else {
            return Err(CommandError::BadArgument("missing player name".to_string()));
        };
        let reason = if reason.is_empty() { "Banned by an operator".to_string() } else { reason.join(" ") };
        if ctx.backend.ban(name, &reason) {
            Ok(format!("Banned {name}: {reason}"))
        } else {
            Err(CommandError::Failed(format!("could not ban {name}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn bans_a_player_and_records_the_name() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = BanCommand.execute(&["Notch", "griefing"], &mut ctx).unwrap();
        assert_eq!(result, "Banned Notch: griefing");
        assert!(ctx.backend.banned.contains("Notch"));
    }
}
