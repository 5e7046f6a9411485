//! Handler for `/gamemode`.

use crate::command::commands::parse_game_mode;
use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct GameModeCommand;

impl CommandHandler for GameModeCommand {
    fn name(&self) -> &'static str {
        "gamemode"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/gamemode <mode> [player]"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let mode_arg = args.first().ok_or_else(|| CommandError::BadArgument("missing game mode".to_string()))?;
        let mode = parse_game_mode(mode_arg).ok_or_else(|| CommandError::BadArgument(format!("unknown game mode: {mode_arg}")))?;

        let target = match args.get(1) {
            Some(name) => ctx
                .backend
                .resolve_player(name)
                .ok_or_else(|| CommandError::Failed(format!("player not found: {name}")))?,
            None => ctx
                .sender_entity_id()
                .ok_or_else(|| CommandError::BadArgument("console must specify a player".to_string()))?,
        };

        if ctx.backend.set_game_mode(target, mode) {
            Ok(format!("Set game mode to {mode:?}"))
        } else {
            Err(CommandError::Failed("player not found".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;
    use crate::entity::GameMode;

    #[test]
    fn sets_the_named_players_mode() {
        let mut backend = FakeBackend::default();
        let notch = backend.resolve_player("Notch").unwrap();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = GameModeCommand.execute(&["creative", "Notch"], &mut ctx).unwrap();
        assert_eq!(result, "Set game mode to Creative");
        assert_eq!(ctx.backend.game_mode_of(notch), Some(GameMode::Creative));
    }

    #[test]
    fn rejects_an_unknown_mode_name() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = GameModeCommand.execute(&["bogus", "Notch"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }

    #[test]
    fn console_without_a_target_player_is_rejected() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = GameModeCommand.execute(&["creative"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }
}
