//! Handler for `/op`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct OpCommand;

impl CommandHandler for OpCommand {
    fn name(&self) -> &'static str {
        "op"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/op <player>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let name = args.first().ok_or_else(|| CommandError::BadArgument("missing player name".to_string()))?;
        if ctx.backend.op(name) {
            Ok(format!("Made {name} a server operator"))
        } else {
            Err(CommandError::Failed(format!("could not op {name}")))
        }
    }
}
