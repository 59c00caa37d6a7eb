// ═══════════════════════════════════════════════════════════════════════
// Setup configuration — one immutable value, validated before any state
// is built, then threaded through setup, phases, and the validator.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ConfigError;
use crate::map::{Map, MapSelection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest seat count a `PlayerIndex` can address.
pub const MAX_PLAYERS: usize = u8::MAX as usize;

/// Who sits in a seat: a human at the console, or a named automated agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerIdentity {
    Human,
    Agent(String),
}

impl PlayerIdentity {
    pub fn is_human(&self) -> bool {
        matches!(self, PlayerIdentity::Human)
    }

    /// Name sent to suppliers as `agentIdentity`.
    pub fn name(&self) -> &str {
        match self {
            PlayerIdentity::Human => "human",
            PlayerIdentity::Agent(name) => name,
        }
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerIdentity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("human") {
            Ok(PlayerIdentity::Human)
        } else {
            Ok(PlayerIdentity::Agent(s.to_ascii_lowercase()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatMode {
    #[default]
    Deterministic,
    /// Accepted by the parser, rejected by validation.
    Dice,
}

impl FromStr for CombatMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deterministic" => Ok(CombatMode::Deterministic),
            "dice" => Ok(CombatMode::Dice),
            _ => Err(ConfigError::UnknownCombatMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub players: Vec<PlayerIdentity>,
    pub map: MapSelection,
    pub units_per_player: u32,
    #[serde(default)]
    pub random_initial_occupation: bool,
    #[serde(default)]
    pub combat: CombatMode,
    /// Seeds the random initial occupation shuffle.
    #[serde(default)]
    pub seed: u64,
}

impl GameConfig {
    /// A deterministic-combat, manual-occupation config.
    pub fn new(players: Vec<PlayerIdentity>, map: MapSelection, units_per_player: u32) -> Self {
        GameConfig {
            players,
            map,
            units_per_player,
            random_initial_occupation: false,
            combat: CombatMode::Deterministic,
            seed: 0,
        }
    }

    pub fn with_random_occupation(mut self, enabled: bool) -> Self {
        self.random_initial_occupation = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_combat(mut self, combat: CombatMode) -> Self {
        self.combat = combat;
        self
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Check everything that does not depend on the map.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.players.len();
        if n < 2 {
            return Err(ConfigError::TooFewPlayers(n));
        }
        if n > MAX_PLAYERS {
            return Err(ConfigError::TooManyPlayers { got: n, max: MAX_PLAYERS });
        }
        if self.units_per_player == 0 {
            return Err(ConfigError::NonPositiveUnits);
        }
        if self.combat == CombatMode::Dice {
            return Err(ConfigError::DiceCombatUnsupported);
        }
        Ok(())
    }

    /// Full validation against the map the game will be played on.
    pub fn validate_for(&self, map: &Map) -> Result<(), ConfigError> {
        self.validate()?;
        // A seat with no territory could never empty its pool in Reinforcement.
        if self.players.len() > map.len() {
            return Err(ConfigError::MorePlayersThanTerritories {
                players: self.players.len(),
                territories: map.len(),
            });
        }
        let supply = self.players.len() as u64 * self.units_per_player as u64;
        if supply < map.len() as u64 {
            return Err(ConfigError::InsufficientUnits {
                players: self.players.len(),
                units: self.units_per_player,
                territories: map.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_agents() -> Vec<PlayerIdentity> {
        vec![
            PlayerIdentity::Agent("passive".into()),
            PlayerIdentity::Agent("aggressive".into()),
        ]
    }

    #[test]
    fn test_valid_config() {
        let cfg = GameConfig::new(two_agents(), MapSelection::World, 27);
        let map = cfg.map.load().unwrap();
        assert!(cfg.validate_for(&map).is_ok());
    }

    #[test]
    fn test_too_few_players() {
        let cfg = GameConfig::new(vec![PlayerIdentity::Human], MapSelection::World, 27);
        assert_eq!(cfg.validate(), Err(ConfigError::TooFewPlayers(1)));
    }

    #[test]
    fn test_zero_units() {
        let cfg = GameConfig::new(two_agents(), MapSelection::World, 0);
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveUnits));
    }

    #[test]
    fn test_dice_rejected() {
        let cfg = GameConfig::new(two_agents(), MapSelection::World, 27).with_combat(CombatMode::Dice);
        assert_eq!(cfg.validate(), Err(ConfigError::DiceCombatUnsupported));
    }

    #[test]
    fn test_insufficient_units_for_map() {
        let cfg = GameConfig::new(two_agents(), MapSelection::World, 20);
        let map = cfg.map.load().unwrap();
        assert_eq!(
            cfg.validate_for(&map),
            Err(ConfigError::InsufficientUnits { players: 2, units: 20, territories: 42 })
        );
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "players": ["human", {"agent": "pacifist"}],
            "map": "usa",
            "units_per_player": 30,
            "random_initial_occupation": true
        }"#;
        let cfg: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.players[0], PlayerIdentity::Human);
        assert_eq!(cfg.players[1], PlayerIdentity::Agent("pacifist".into()));
        assert_eq!(cfg.map, MapSelection::Usa);
        assert_eq!(cfg.combat, CombatMode::Deterministic);
        assert!(cfg.random_initial_occupation);
        assert_eq!(cfg.seed, 0);
    }

    #[test]
    fn test_identity_parse() {
        assert_eq!("Human".parse::<PlayerIdentity>().unwrap(), PlayerIdentity::Human);
        assert_eq!(
            " Aggressive ".parse::<PlayerIdentity>().unwrap(),
            PlayerIdentity::Agent("aggressive".into())
        );
    }
}
