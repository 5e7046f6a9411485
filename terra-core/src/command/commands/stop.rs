//! Handler for `/stop`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct StopCommand;

impl CommandHandler for StopCommand {
    fn name(&self) -> &'static str {
        "stop"
    }

    fn permission_level(&self) -> u8 {
        4
    }

    fn usage(&self) -> &'static str {
        "/stop"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        ctx.backend.request_stop();
        Ok("Stopping the server".to_string())
    }
}
