//! Who issued a command (§6 "Command surface").

use crate::entity::EntityId;

/// The origin of a command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    /// The server console / an RCON-style operator connection — always
    /// permission level 4.
    Console,
    /// A connected player, identified by entity id and display name.
    Player { entity_id: EntityId, name: String },
}

impl CommandSender {
    /// The sender's entity id, if it's a player.
    #[must_use]
    pub const fn entity_id(&self) -> Option<EntityId> {
        match self {
            Self::Console => None,
            Self::Player { entity_id, .. } => Some(*entity_id),
        }
    }

    /// The name shown in feedback and broadcast messages.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Console => "Server",
            Self::Player { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_has_no_entity_id() {
        assert_eq!(CommandSender::Console.entity_id(), None);
        assert_eq!(CommandSender::Console.display_name(), "Server");
    }

    #[test]
    fn player_sender_reports_its_identity() {
        let sender = CommandSender::Player {
            entity_id: 7,
            name: "Notch".to_string(),
        };
        assert_eq!(sender.entity_id(), Some(7));
        assert_eq!(sender.display_name(), "Notch");
    }
}
