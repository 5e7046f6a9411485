//! Handler for `/help`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn permission_level(&self) -> u8 {
        0
    }

    fn usage(&self) -> &'static str {
        "/help [command]"
    }

    fn execute(&self, args: &[&str], _ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        match args.first() {
            Some(name) => {
                let handler = super::built_ins()
                    .into_iter()
                    .find(|h| h.name() == name.to_lowercase())
                    .ok_or_else(|| CommandError::UnknownCommand((*name).to_string()))?;
                Ok(handler.usage().to_string())
            }
            None => {
                let names: Vec<&str> = super::built_ins().iter().map(|h| h.name()).collect();
                Ok(format!("Available commands: {}", names.join(", ")))
            }
        }
    }
}
