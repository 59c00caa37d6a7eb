pub mod types;
pub mod error;
pub mod map;
pub mod config;
pub mod setup;
pub mod phase;
pub mod rules;
pub mod victory;
pub mod engine;
pub mod protocol;
pub mod invariants;

mod tests;

pub use types::*;
pub use error::{ConfigError, LookupError, MapError, ProtocolError};
pub use map::{Map, MapSelection, TerritoryInfo};
pub use config::{CombatMode, GameConfig, PlayerIdentity};
pub use engine::{Game, GameEvent, MoveOutcome, TurnReport};
pub use rules::Rejection;
pub use protocol::{parse_response, MoveDescriptor, StateSnapshot, TurnRequest, TurnResponse};
