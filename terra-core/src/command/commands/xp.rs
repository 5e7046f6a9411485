//! Handler for `/xp`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct XpCommand;

impl CommandHandler for XpCommand {
    fn name(&self) -> &'static str {
        "xp"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/xp <amount> [player]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let amount_arg = args.first().ok_or_else(|| CommandError::BadArgument("missing amount".to_string()))?;
        let amount = amount_arg
            .trim_end_matches('L')
            .parse::<i32>()
            .map_err(|_| CommandError::BadArgument(format!("not a number: {amount_arg}")))?;

        let target = match args.get(1) {
            Some(name) => ctx
                .backend
                .resolve_player(name)
                .ok_or_else(|| CommandError::Failed(format!("player not found: {name}")))?,
            None => ctx
                .sender_entity_id()
                .ok_or_else(|| CommandError::BadArgument("console must specify a player".to_string()))?,
        };

        if ctx.backend.give_xp(target, amount) {
            Ok(format!("Gave {amount} experience"))
        } else {
            Err(CommandError::Failed("player not found".to_string()))
        }
    }
}
