//! Handler for `/gamerule`.

use terra_registry::game_rules::GameRuleValue;

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct GameRuleCommand;

impl CommandHandler for GameRuleCommand {
    fn name(&self) -> &'static str {
        "gamerule"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/gamerule <name> [value]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let Some(key) = args.first() else {
            let keys = ctx.backend.game_rule_keys().join(", ");
            return Ok(format!("Game rules: {keys}"));
        };

        let current = ctx
            .backend
            .game_rule(key)
            .ok_or_else(|| CommandError::BadArgument(format!("unknown game rule: {key}")))?;

        let Some(raw) = args.get(1) else {
            return Ok(format!("{key} = {current}"));
        };

        let value = match current {
            GameRuleValue::Bool(_) => {
                let parsed = raw.parse::<bool>().map_err(|_| CommandError::BadArgument(format!("not a boolean: {raw}")))?;
                GameRuleValue::Bool(parsed)
            }
            GameRuleValue::Int(_) => {
                let parsed = raw.parse::<i32>().map_err(|_| CommandError::BadArgument(format!("not an integer: {raw}")))?;
                GameRuleValue::Int(parsed)
            }
        };

        if ctx.backend.set_game_rule(key, value) {
            Ok(format!("Set {key} to {value}"))
        } else {
            Err(CommandError::Failed(format!("value out of range for {key}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn reads_a_bool_rule_without_a_value() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = GameRuleCommand.execute(&["doFireTick"], &mut ctx).unwrap();
        assert_eq!(result, "doFireTick = true");
    }

    #[test]
    fn sets_a_bool_rule() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        GameRuleCommand.execute(&["doFireTick", "false"], &mut ctx).unwrap();
        assert_eq!(ctx.backend.game_rule("doFireTick"), Some(GameRuleValue::Bool(false)));
    }

    #[test]
    fn rejects_a_non_integer_value_for_an_int_rule() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = GameRuleCommand.execute(&["randomTickSpeed", "fast"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }

    #[test]
    fn unknown_rule_name_is_rejected() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = GameRuleCommand.execute(&["bogusRule"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }
}
