pub mod agent;
pub mod random;
pub mod heuristic;
pub mod kind;

pub use agent::{Agent, TurnView};
pub use random::RandomAgent;
pub use heuristic::{AggressiveAgent, PacifistAgent, PassiveAgent};
pub use kind::{AgentKind, UnknownAgent};
