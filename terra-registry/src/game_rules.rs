//! Game rule registry and per-world values (§3 "game-rule map").
use rustc_hash::FxHashMap;

/// Categories for game rules, used only for organizing command completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRuleCategory {
    Drops,
    Misc,
    Mobs,
    Player,
    Spawning,
    Updates,
}

/// The type of a game rule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRuleType {
    Bool,
    Int,
}

/// A game rule value, either boolean or integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRuleValue {
    Bool(bool),
    Int(i32),
}

impl GameRuleValue {
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(_) => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Bool(_) => None,
            Self::Int(i) => Some(*i),
        }
    }

    #[must_use]
    pub const fn matches_type(&self, value_type: GameRuleType) -> bool {
        matches!(
            (self, value_type),
            (Self::Bool(_), GameRuleType::Bool) | (Self::Int(_), GameRuleType::Int)
        )
    }
}

impl std::fmt::Display for GameRuleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

/// A game rule definition.
#[derive(Debug)]
pub struct GameRule {
    pub key: &'static str,
    pub category: GameRuleCategory,
    pub value_type: GameRuleType,
    pub default_value: GameRuleValue,
    pub min_value: Option<i32>,
    pub max_value: Option<i32>,
}

pub type GameRuleRef = &'static GameRule;

macro_rules! bool_rule {
    ($key:expr, $category:expr, $default:expr) => {
        GameRule {
            key: $key,
            category: $category,
            value_type: GameRuleType::Bool,
            default_value: GameRuleValue::Bool($default),
            min_value: None,
            max_value: None,
        }
    };
}

macro_rules! int_rule {
    ($key:expr, $category:expr, $default:expr, $min:expr, $max:expr) => {
        GameRule {
            key: $key,
            category: $category,
            value_type: GameRuleType::Int,
            default_value: GameRuleValue::Int($default),
            min_value: Some($min),
            max_value: Some($max),
        }
    };
}

/// The classic (1.7.10-era) game rule set.
pub static GAME_RULES: &[GameRule] = &[
    bool_rule!("commandBlockOutput", GameRuleCategory::Misc, true),
    bool_rule!("doDaylightCycle", GameRuleCategory::Updates, true),
    bool_rule!("doFireTick", GameRuleCategory::Updates, true),
    bool_rule!("doMobLoot", GameRuleCategory::Drops, true),
    bool_rule!("doMobSpawning", GameRuleCategory::Spawning, true),
    bool_rule!("doTileDrops", GameRuleCategory::Drops, true),
    bool_rule!("keepInventory", GameRuleCategory::Player, false),
    bool_rule!("logAdminCommands", GameRuleCategory::Misc, true),
    bool_rule!("mobGriefing", GameRuleCategory::Mobs, true),
    bool_rule!("naturalRegeneration", GameRuleCategory::Player, true),
    bool_rule!("sendCommandFeedback", GameRuleCategory::Misc, true),
    bool_rule!("showDeathMessages", GameRuleCategory::Misc, true),
    int_rule!("randomTickSpeed", GameRuleCategory::Updates, 3, 0, i32::MAX),
    int_rule!("spawnRadius", GameRuleCategory::Spawning, 10, 0, i32::MAX),
];

/// A registry of game rule definitions, populated once at startup.
pub struct GameRuleRegistry {
    by_id: Vec<GameRuleRef>,
    by_key: FxHashMap<&'static str, usize>,
}

impl GameRuleRegistry {
    /// Builds the standard registry from [`GAME_RULES`].
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self {
            by_id: Vec::new(),
            by_key: FxHashMap::default(),
        };
        for rule in GAME_RULES {
            registry.register(rule);
        }
        registry
    }

    fn register(&mut self, rule: GameRuleRef) -> usize {
        let id = self.by_id.len();
        self.by_key.insert(rule.key, id);
        self.by_id.push(rule);
        id
    }

    #[must_use]
    pub fn by_id(&self, id: usize) -> Option<GameRuleRef> {
        self.by_id.get(id).copied()
    }

    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<GameRuleRef> {
        self.by_key.get(key).and_then(|&id| self.by_id(id))
    }

    #[must_use]
    pub fn get_id(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, GameRuleRef)> + '_ {
        self.by_id.iter().enumerate().map(|(id, &r)| (id, r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for GameRuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-world mutable game rule values, indexed against a [`GameRuleRegistry`].
#[derive(Debug, Clone)]
pub struct GameRuleValues {
    values: Vec<GameRuleValue>,
}

impl GameRuleValues {
    /// Builds a values table seeded with every rule's default.
    #[must_use]
    pub fn new(registry: &GameRuleRegistry) -> Self {
        Self {
            values: registry.iter().map(|(_, r)| r.default_value).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str, registry: &GameRuleRegistry) -> Option<GameRuleValue> {
        let id = registry.get_id(name)?;
        self.values.get(id).copied()
    }

    /// Sets a rule's value by name. Returns `false` if the rule is unknown,
    /// the value's type doesn't match, or an integer value is out of bounds.
    pub fn set(&mut self, name: &str, value: GameRuleValue, registry: &GameRuleRegistry) -> bool {
        let Some(rule) = registry.by_key(name) else {
            return false;
        };
        if !value.matches_type(rule.value_type) {
            return false;
        }
        if let GameRuleValue::Int(v) = value {
            if rule.min_value.is_some_and(|min| v < min) || rule.max_value.is_some_and(|max| v > max) {
                return false;
            }
        }
        let id = registry.get_id(name).expect("rule looked up above");
        self.values[id] = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_inventory_defaults_to_false() {
        let registry = GameRuleRegistry::standard();
        let values = GameRuleValues::new(&registry);
        assert_eq!(values.get("keepInventory", &registry), Some(GameRuleValue::Bool(false)));
    }

    #[test]
    fn setting_wrong_type_is_rejected() {
        let registry = GameRuleRegistry::standard();
        let mut values = GameRuleValues::new(&registry);
        assert!(!values.set("keepInventory", GameRuleValue::Int(5), &registry));
    }

    #[test]
    fn random_tick_speed_respects_bounds() {
        let registry = GameRuleRegistry::standard();
        let mut values = GameRuleValues::new(&registry);
        assert!(!values.set("randomTickSpeed", GameRuleValue::Int(-1), &registry));
        assert!(values.set("randomTickSpeed", GameRuleValue::Int(10), &registry));
    }
}
