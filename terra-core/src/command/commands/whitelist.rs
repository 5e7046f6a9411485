//! Handler for `/whitelist`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct WhitelistCommand;

impl CommandHandler for WhitelistCommand {
    fn name(&self) -> &'static str {
        "whitelist"
    }

    fn permission_level(&self) -> u8 {
        3
    }

    fn usage(&self) -> &'static str {
        "/whitelist <add|remove> <player>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [mode, name] = args else {
            return Err(CommandError::BadArgument(self.usage().to_string()));
        };
        match *mode {
            "add" => {
                if ctx.backend.whitelist_add(name) {
                    Ok(format!("Added {name} to the whitelist"))
                } else {
                    Err(CommandError::Failed(format!("could not whitelist {name}")))
                }
            }
            "remove" => {
                if ctx.backend.whitelist_remove(name) {
                    Ok(format!("Removed {name} from the whitelist"))
                } else {
                    Err(CommandError::Failed(format!("{name} was not whitelisted")))
                }
            }
            other => Err(CommandError::BadArgument(format!("unknown mode: {other}"))),
        }
    }
}
