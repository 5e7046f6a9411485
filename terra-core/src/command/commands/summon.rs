//! Handler for `/summon`.

use terra_utils::BlockPos;

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct SummonCommand;

impl CommandHandler for SummonCommand {
    fn name(&self) -> &'static str {
        "summon"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/summon <entityType> <x> <y> <z>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [kind, x, y, z] = args else {
            return Err(CommandError::BadArgument(self.usage().to_string()));
        };
        let x: i32 = x.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {x}")))?;
        let y: i32 = y.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {y}")))?;
        let z: i32 = z.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {z}")))?;

        match ctx.backend.summon(kind, BlockPos::new(x, y, z)) {
            Some(id) => Ok(format!("Summoned {kind} as entity {id}")),
            None => Err(CommandError::Failed(format!("unknown entity type: {kind}"))),
        }
    }
}
