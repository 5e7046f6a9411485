//! Handler for `/tp`.

use terra_utils::BlockPos;

use crate::command::context::CommandContext;
use crate::command::dispatcher::CommandHandler;
use crate::error::CommandError;

pub struct TpCommand;

impl CommandHandler for TpCommand {
    fn name(&self) -> &'static str {
        "tp"
    }

    fn permission_level(&self) -> u8 {
        2
    }

    fn usage(&self) -> &'static str {
        "/tp <player> <x> <y> <z>  |  /tp <player> <destination>"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let target_name = args.first().ok_or_else(|| CommandError::BadArgument("missing target player".to_string()))?;
        let target = ctx
            .backend
            .resolve_player(target_name)
            .ok_or_else(|| CommandError::Failed(format!("player not found: {target_name}")))?;

        let pos = match args.len() {
            2 => {
                let destination = ctx
                    .backend
                    .resolve_player(args[1])
                    .ok_or_else(|| CommandError::Failed(format!("player not found: {}", args[1])))?;
                ctx.backend
                    .position_of(destination)
                    .ok_or_else(|| CommandError::Failed("destination has no known position".to_string()))?
            }
            4 => parse_coords(&args[1..4])?,
            _ => return Err(CommandError::BadArgument(self.usage().to_string())),
        };

        if ctx.backend.teleport(target, pos) {
            Ok(format!("Teleported {target_name}"))
        } else {
            Err(CommandError::Failed("teleport failed".to_string()))
        }
    }
}

fn parse_coords(args: &[&str]) -> Result<BlockPos, CommandError> {
    let [x, y, z] = args else {
        return Err(CommandError::BadArgument("expected x y z".to_string()));
    };
    let x: i32 = x.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {x}")))?;
    let y: i32 = y.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {y}")))?;
    let z: i32 = z.parse().map_err(|_| CommandError::BadArgument(format!("not a number: {z}")))?;
    Ok(BlockPos::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::sender::CommandSender;
    use crate::command::tests_support::FakeBackend;

    #[test]
    fn teleports_to_explicit_coordinates() {
        let mut backend = FakeBackend::default();
        let notch = backend.resolve_player("Notch").unwrap();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let result = TpCommand.execute(&["Notch", "10", "20", "30"], &mut ctx).unwrap();
        assert_eq!(result, "Teleported Notch");
        assert_eq!(ctx.backend.position_of(notch), Some(BlockPos::new(10, 20, 30)));
    }

    #[test]
    fn teleports_to_another_players_position() {
        let mut backend = FakeBackend::default();
        let notch = backend.resolve_player("Notch").unwrap();
        let steve = backend.add_player("Steve", BlockPos::new(5, 70, 5));
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        TpCommand.execute(&["Notch", "Steve"], &mut ctx).unwrap();
        assert_eq!(ctx.backend.position_of(notch), ctx.backend.position_of(steve));
    }

    #[test]
    fn unknown_target_player_is_rejected() {
        let mut backend = FakeBackend::default();
        let mut ctx = CommandContext::new(CommandSender::Console, 4, &mut backend);
        let err = TpCommand.execute(&["Ghost", "0", "0", "0"], &mut ctx).unwrap_err();
        assert!(matches!(err, CommandError::Failed(_)));
    }
}
