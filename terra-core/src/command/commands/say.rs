//! Handler for `/say`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct SayCommand;

impl CommandHandler for SayCommand {
    fn name(&self) -> &'static str {
        "say"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/say <message...>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        if args.is_empty() {
            return Err(CommandError::BadArgument("empty message".to_string()));
        }
        let message = format!("[{}] {}", ctx.sender.display_name(), args.join(" "));
        ctx.backend.broadcast(&message);
        Ok(message)
    }
}
