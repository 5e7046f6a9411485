//! Handler for `/deop`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct DeopCommand;

impl CommandHandler for DeopCommand {
    fn name(&self) -> &'static str {
        "deop"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/deop <player>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let name = args.first().ok_or_else(|| CommandError::BadArgument("missing player name".to_string()))?;
        if ctx.backend.deop(name) {
            Ok(format!("Revoked operator status from {name}"))
        } else {
            Err(CommandError::Failed(format!("could not deop {name}")))
        }
    }
}
