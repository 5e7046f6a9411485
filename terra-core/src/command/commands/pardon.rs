//! Handler for `/pardon`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct PardonCommand;

impl CommandHandler for PardonCommand {
    fn name(&self) -> &'static str {
        "pardon"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/pardon <player>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let name = args.first().ok_or_else(|| CommandError::BadArgument("missing player name".to_string()))?;
        if ctx.backend.pardon(name) {
            Ok(format!("Unbanned {name}"))
        } else {
            Err(CommandError::Failed(format!("{name} was not banned")))
        }
    }
}
