//! Handler for `/seed`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct SeedCommand;

impl CommandHandler for SeedCommand {
    fn name(&self) -> &'static str {
        "seed"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/seed"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        Ok(format!("Seed: {}", ctx.backend.seed()))
    }
}
