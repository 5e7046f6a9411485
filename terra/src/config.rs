//! Server configuration loading (§10.4): a `load_or_create` entry point that
//! reads `config.json5` if present or writes the bundled default and reads
//! that back.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use terra_core::world::Difficulty;

const DEFAULT_CONFIG_STR: &str = include_str!("default_config.json5");

/// Top-level server configuration, loaded from `config.json5`.
///
/// No `online_mode` field (§10.4): there is no networking layer in this
/// crate, so the field would have no caller.
#[derive(Debug, Clone, Deserialize)]
pub struct TerraConfig {
    /// World seed, as typed by an operator. Hashed to an `i64` the way
    /// vanilla hashes a `String`-typed seed, unless it parses directly as
    /// an integer.
    pub seed: String,
    pub level_name: String,
    pub view_distance: u8,
    pub simulation_distance: u8,
    pub max_players: u32,
    pub difficulty: ConfigDifficulty,
    pub hardcore: bool,
}

/// A serde-friendly mirror of [`Difficulty`], since the core type doesn't
/// derive `Deserialize` (library crates stay decoupled from the config
/// format, per §10.1's crate split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDifficulty {
    Peaceful,
    Easy,
    Normal,
    Hard,
}

impl From<ConfigDifficulty> for Difficulty {
    fn from(value: ConfigDifficulty) -> Self {
        match value {
            ConfigDifficulty::Peaceful => Self::Peaceful,
            ConfigDifficulty::Easy => Self::Easy,
            ConfigDifficulty::Normal => Self::Normal,
            ConfigDifficulty::Hard => Self::Hard,
        }
    }
}

impl TerraConfig {
    /// Loads the configuration from `path`, writing the bundled default if
    /// the file doesn't exist yet (§10.4).
    ///
    /// # Errors
    /// Returns an error if the file can't be read/written or fails to
    /// parse, or if [`Self::validate`] rejects it.
    pub fn load_or_create(path: &Path) -> anyhow::Result<Self> {
        let raw = if path.exists() {
            fs::read_to_string(path)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG_STR)?;
            DEFAULT_CONFIG_STR.to_string()
        };
        let config: Self = serde_json5::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Clamps and checks configured values per §8 boundary behaviour.
    ///
    /// # Errors
    /// Returns an error string describing the first invalid field found.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(3..=20).contains(&self.view_distance) {
            anyhow::bail!("view_distance must be in 3..=20 (got {})", self.view_distance);
        }
        if self.simulation_distance == 0 || self.simulation_distance > 32 {
            anyhow::bail!(
                "simulation_distance must be in 1..=32 (got {})",
                self.simulation_distance
            );
        }
        if self.max_players == 0 {
            anyhow::bail!("max_players must be greater than 0");
        }
        Ok(())
    }

    /// Resolves the configured seed string to the `i64` the world generator
    /// consumes, mirroring vanilla's `String::hashCode`-derived seed when
    /// the text isn't itself a valid integer.
    #[must_use]
    pub fn resolve_seed(&self) -> i64 {
        if let Ok(parsed) = self.seed.trim().parse::<i64>() {
            return parsed;
        }
        if self.seed.is_empty() {
            return 0;
        }
        java_string_hash_code(&self.seed) as i64
    }
}

/// `java.lang.String::hashCode`: `s[0] * 31^(n-1) + ... + s[n-1]`, computed
/// over UTF-16 code units with wrapping 32-bit arithmetic, matching vanilla's
/// text-seed convention.
fn java_string_hash_code(s: &str) -> i32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_seed_strings_parse_directly() {
        let config = TerraConfig {
            seed: "42".to_string(),
            level_name: "world".to_string(),
            view_distance: 10,
            simulation_distance: 10,
            max_players: 20,
            difficulty: ConfigDifficulty::Normal,
            hardcore: false,
        };
        assert_eq!(config.resolve_seed(), 42);
    }

    #[test]
    fn text_seeds_hash_like_java_string_hash_code() {
        assert_eq!(java_string_hash_code(""), 0);
        assert_eq!(java_string_hash_code("a"), 97);
        assert_eq!(java_string_hash_code("hello"), 99_162_322);
    }

    #[test]
    fn view_distance_below_three_is_rejected() {
        let config = TerraConfig {
            seed: "0".to_string(),
            level_name: "world".to_string(),
            view_distance: 2,
            simulation_distance: 10,
            max_players: 20,
            difficulty: ConfigDifficulty::Normal,
            hardcore: false,
        };
        assert!(config.validate().is_err());
    }
}
