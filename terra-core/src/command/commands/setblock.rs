//! Handler for `/setblock`.

use terra_utils::BlockPos;

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct SetBlockCommand;

impl CommandHandler for SetBlockCommand {
    fn name(&self) -> &'static str {
        "setblock"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/setblock <x> <y> <z> <block_id>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [x, y, z, block_id] = args else {
            return Err(CommandError::BadArgument(self.usage().to_string()));
        };
        let x: i32 = x.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {x}")))?;
        let y: i32 = y.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {y}")))?;
        let z: i32 = z.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {z}")))?;
        let block_id: u16 = block_id.parse().map_err(|_| CommandError::BadArgument(format!("not a block id: {block_id}")))?;

        let pos = BlockPos::new(x, y, z);
        if !pos.is_valid() {
            return Err(CommandError::BadArgument("position out of world bounds".to_string()));
        }

        if ctx.backend.set_block(pos, block_id) {
            Ok(format!("Set block at {x} {y} {z} to {block_id}"))
        } else {
            Err(CommandError::Failed("setblock failed".to_string()))
        }
    }
}
