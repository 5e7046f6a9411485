//! Handler for `/save-all`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct SaveAllCommand;

impl CommandHandler for SaveAllCommand {
    fn name(&self) -> &'static str {
        "save-all"
    }

    fn permission_level(&self) -> u8 {
        4
    }

    fn usage(&self) -> &'static str {
        "/save-all"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        if ctx.backend.save_all() {
            Ok("Saved the world".to_string())
        } else {
            Err(CommandError::Failed("save failed".to_string()))
        }
    }
}
