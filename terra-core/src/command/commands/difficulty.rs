//! Handler for `/difficulty`.

use crate::command::commands::parse_difficulty;
use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct DifficultyCommand;

impl CommandHandler for DifficultyCommand {
    fn name(&self) -> &'static str {
        "difficulty"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/difficulty <peaceful|easy|normal|hard>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let arg = args.first().ok_or_else(|| CommandError::BadArgument("missing difficulty".to_string()))?;
        let difficulty = parse_difficulty(arg).ok_or_else(|| CommandError::BadArgument(format!("unknown difficulty: {arg}")))?;
        ctx.backend.set_difficulty(difficulty);
        Ok(format!("Set difficulty to {difficulty:?}"))
    }
}
