//! Handler for `/time`.

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct TimeCommand;

impl CommandHandler for TimeCommand {
    fn name(&self) -> &'static str {
        "time"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/time <set|add> <value|day|night>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [mode, value] = args else {
            return Err(CommandError::BadArgument("usage: /time <set|add> <value>".to_string()));
        };

        let parsed = match value.to_lowercase().as_str() {
            "day" => 1000,
            "night" => 13000,
            other => other
                .parse::<i64>()
                .map_err(|_| CommandError::BadArgument(format!("not a number: {other}")))?,
        };

        match *mode {
            "set" => {
                ctx.backend.set_world_time(parsed);
                Ok(format!("Set the time to {parsed}"))
            }
            "add" => {
                let new_time = ctx.backend.world_time() + parsed;
                ctx.backend.set_world_time(new_time);
                Ok(format!("Added {parsed} to the time"))
            }
            other => Err(CommandError::BadArgument(format!("unknown mode: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn set_day_uses_the_fixed_tick_value() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        TimeCommand.execute(&["set", "day"], &mut ctx).unwrap();
        assert_eq!(ctx.backend.world_time(), 1000);
    }

    #[test]
    fn add_accumulates_onto_the_current_time() {
        let mut backend = FakeBackend::default();
        backend.set_world_time(100);
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        TimeCommand.execute(&["add", "50"], &mut ctx).unwrap();
        assert_eq!(ctx.backend.world_time(), 150);
    }

    #[test]
    fn rejects_a_non_numeric_non_keyword_value() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = TimeCommand.execute(&["set", "soon"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }
}
