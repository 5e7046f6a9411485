//! Built-in command handlers (§6). Permission levels follow the reference
//! implementation's four-tier convention: `0` everyone, `2` gamemaster
//! commands, `3` commands affecting other players' accounts, `4` commands
//! affecting the server process itself.

pub mod ban;
pub mod deop;
pub mod difficulty;
pub mod gamemode;
pub mod gamerule;
pub mod give;
pub mod help;
pub mod kick;
pub mod kill;
pub mod list;
pub mod op;
pub mod pardon;
pub mod save_all;
pub mod say;
pub mod seed;
pub mod setblock;
pub mod stop;
pub mod summon;
pub mod time;
pub mod tp;
pub mod weather;
pub mod whitelist;
pub mod xp;

use std::sync::Arc;

use crate::entity::GameMode;
use crate::world::Difficulty;

use super::dispatcher::CommandHandler;

/// All built-in handlers, in the order `/help` lists them.
#[must_use]
pub fn built_ins() -> Vec<Arc<dyn CommandHandler>> {
    vec![
        Arc::new(help::HelpCommand),
        Arc::new(stop::StopCommand),
        Arc::new(time::TimeCommand),
        Arc::new(gamemode::GameModeCommand),
        Arc::new(difficulty::DifficultyCommand),
        Arc::new(kill::KillCommand),
        Arc::new(weather::WeatherCommand),
        Arc::new(xp::XpCommand),
        Arc::new(tp::TpCommand),
        Arc::new(give::GiveCommand),
        Arc::new(say::SayCommand),
        Arc::new(gamerule::GameRuleCommand),
        Arc::new(setblock::SetBlockCommand),
        Arc::new(summon::SummonCommand),
        Arc::new(seed::SeedCommand),
        Arc::new(list::ListCommand),
        Arc::new(op::OpCommand),
        Arc::new(deop::DeopCommand),
        Arc::new(kick::KickCommand),
        Arc::new(ban::BanCommand),
        Arc::new(pardon::PardonCommand),
        Arc::new(whitelist::WhitelistCommand),
        Arc::new(save_all::SaveAllCommand),
    ]
}

/// Parses a free-text game mode name or its numeric shorthand (§6).
#[must_use]
pub fn parse_game_mode(s: &str) -> Option<GameMode> {
    match s.to_lowercase().as_str() {
        "survival" | "s" | "0" => Some(GameMode::Survival),
        "creative" | "c" | "1" => Some(GameMode::Creative),
        "adventure" | "a" | "2" => Some(GameMode::Adventure),
        "spectator" | "sp" | "3" => Some(GameMode::Spectator),
        _ => None,
    }
}

/// Parses a free-text difficulty name or its numeric shorthand (§6).
#[must_use]
pub fn parse_difficulty(s: &str) -> Option<Difficulty> {
    match s.to_lowercase().as_str() {
        "peaceful" | "p" | "0" => Some(Difficulty::Peaceful),
        "easy" | "e" | "1" => Some(Difficulty::Easy),
        "normal" | "n" | "2" => Some(Difficulty::Normal),
        "hard" | "h" | "3" => Some(Difficulty::Hard),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_cover_every_listed_command() {
        let names: Vec<&str> = built_ins().iter().map(|h| h.name()).collect();
        for expected in [
            "help", "stop", "time", "gamemode", "difficulty", "kill", "weather", "xp", "tp", "give", "say",
            "gamerule", "setblock", "summon", "seed", "list", "op", "deop", "kick", "ban", "pardon", "whitelist",
            "save-all",
        ] {
            assert!(names.contains(&expected), "missing builtin: {expected}");
        }
    }

    #[test]
    fn game_mode_parses_names_and_shorthand() {
        assert_eq!(parse_game_mode("creative"), Some(GameMode::Creative));
        assert_eq!(parse_game_mode("1"), Some(GameMode::Creative));
        assert_eq!(parse_game_mode("bogus"), None);
    }

    #[test]
    fn difficulty_parses_names_and_shorthand() {
        assert_eq!(parse_difficulty("hard"), Some(Difficulty::Hard));
        assert_eq!(parse_difficulty("3"), Some(Difficulty::Hard));
        assert_eq!(parse_difficulty("bogus"), None);
    }
}
