//! Handler for `/kill`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct KillCommand;

impl CommandHandler for KillCommand {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/kill [player]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let target = match args.first() {
            Some(name) => ctx
                .backend
                .resolve_player(name)
                .ok_or_else(|| CommandError::Failed(format!("player not found: {name}")))?,
            None => ctx
                .sender_entity_id()
                .ok_or_else(|| CommandError::BadArgument("console must specify a player".to_string()))?,
        };

        if ctx.backend.kill(target) {
            Ok("Killed entity".to_string())
        } else {
            Err(CommandError::Failed("entity not found".to_string()))
        }
    }
}
