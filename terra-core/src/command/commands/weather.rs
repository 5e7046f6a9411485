//! Handler for `/weather`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct WeatherCommand;

impl CommandHandler for WeatherCommand {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/weather <clear|rain|thunder> [duration]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let mode = args.first().ok_or_else(|| CommandError::BadArgument("missing weather type".to_string()))?;
        let duration = match args.get(1) {
            Some(raw) => raw.parse::<i32>().map_err(|_| CommandError::BadArgument(format!("not a number: {raw}")))?,
            None => 6000,
        };

        match mode.to_lowercase().as_str() {
            "clear" => {
                ctx.backend.set_weather(false, duration);
                Ok("Cleared the weather".to_string())
            }
            "rain" => {
                ctx.backend.set_weather(true, duration);
                Ok("Set the weather to rain".to_string())
            }
            "thunder" => {
                ctx.backend.set_weather(true, duration);
                Ok("Set the weather to thunder".to_string())
            }
            other => Err(CommandError::BadArgument(format!("unknown weather type: {other}"))),
        }
    }
}
