// ═══════════════════════════════════════════════════════════════════════
// Errors surfaced by the engine
//
// Illegal moves are NOT errors: the validator absorbs them and the state
// is left untouched. Only setup, lookup, and protocol failures escape.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::TerritoryId;
use thiserror::Error;

/// A move or query referenced a territory outside the active map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown territory id {0}")]
pub struct LookupError(pub TerritoryId);

/// Structural problems with a map definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no territories")]
    Empty,

    #[error("map has {0} territories, more than a territory id can address")]
    TooLarge(usize),

    #[error("duplicate territory name '{0}'")]
    DuplicateName(String),

    #[error("edge references unknown territory '{0}'")]
    UnknownName(String),

    #[error("territory {0} is adjacent to itself")]
    SelfLoop(TerritoryId),

    #[error("adjacency {0} -> {1} has no reverse edge")]
    Asymmetric(TerritoryId, TerritoryId),

    #[error("{rows} adjacency rows given for {territories} territories")]
    ExtraAdjacencyRows { rows: usize, territories: usize },

    #[error("adjacency of {0} references {1}, which is outside the map")]
    DanglingEdge(TerritoryId, TerritoryId),
}

/// Rejected setup configuration. Raised before any GameState exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least 2 players are required, got {0}")]
    TooFewPlayers(usize),

    #[error("at most {max} players are supported, got {got}")]
    TooManyPlayers { got: usize, max: usize },

    #[error("units per player must be positive")]
    NonPositiveUnits,

    #[error("unknown map '{0}'")]
    UnknownMap(String),

    #[error("unknown combat mode '{0}'")]
    UnknownCombatMode(String),

    #[error("dice combat has no resolution rules; use deterministic combat")]
    DiceCombatUnsupported,

    #[error("{players} players with {units} units each cannot claim {territories} territories")]
    InsufficientUnits {
        players: usize,
        units: u32,
        territories: usize,
    },

    #[error("{players} players cannot each hold a territory on a map of {territories}")]
    MorePlayersThanTerritories { players: usize, territories: usize },

    #[error("invalid map: {0}")]
    InvalidMap(#[from] MapError),
}

/// A supplier response that could not be decoded.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed supplier payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unrecognised move kind '{0}'")]
    UnknownMoveKind(String),
}
