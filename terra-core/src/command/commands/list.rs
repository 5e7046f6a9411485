//! Handler for `/list`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct ListCommand;

impl CommandHandler for ListCommand {
    fn name(&self) -> &'static str {
        "list"
    }

    fn permission_level(&self) -> u8 {
        0
    }

    fn usage(&self) -> &'static str {
        "/list"
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let players = ctx.backend.list_players();
        let names: Vec<&str> = players.iter().map(|(_, name)| name.as_str()).collect();
        Ok(format!("There are {} player(s) online: {}", names.len(), names.join(", ")))
    }
}
