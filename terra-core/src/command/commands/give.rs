//! Handler for `/give`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct GiveCommand;

impl CommandHandler for GiveCommand {
    fn name(&self) -> &'static str {
        "give"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/give <player> <item_id> [count]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [player, item_id, rest @ ..] = args else {
            return Err(CommandError::BadArgument(self.usage().to_string()));
        };
        let target = ctx
            .backend
            .resolve_player(player)
            .ok_or_else(|| CommandError::Failed(format!("player not found: {player}")))?;
        let item_id: u16 = item_id.parse().map_err(|_| CommandError::BadArgument(format!("not an item id: {item_id}")))?;
        let count = match rest.first() {
            Some(raw) => raw.parse::<i32>().map_err(|_| CommandError::BadArgument(format!("not a number: {raw}")))?,
            None => 1,
        };

        if ctx.backend.give_item(target, item_id, count) {
            Ok(format!("Gave {count} of item {item_id} to {player}"))
        } else {
            Err(CommandError::Failed("give failed".to_string()))
        }
    }
}
