// ═══════════════════════════════════════════════════════════════════════
// Agent registry — maps identity names to built-in agents
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use crate::heuristic::{AggressiveAgent, PacifistAgent, PassiveAgent};
use crate::random::RandomAgent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown agent '{0}' (expected one of: passive, pacifist, aggressive, random)")]
pub struct UnknownAgent(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Passive,
    Pacifist,
    Aggressive,
    Random,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Passive,
        AgentKind::Pacifist,
        AgentKind::Aggressive,
        AgentKind::Random,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Passive => "passive",
            AgentKind::Pacifist => "pacifist",
            AgentKind::Aggressive => "aggressive",
            AgentKind::Random => "random",
        }
    }

    /// Build a fresh agent. `seed` only matters for `Random`.
    pub fn create(self, seed: u64) -> Box<dyn Agent> {
        match self {
            AgentKind::Passive => Box::new(PassiveAgent),
            AgentKind::Pacifist => Box::new(PacifistAgent),
            AgentKind::Aggressive => Box::new(AggressiveAgent),
            AgentKind::Random => Box::new(RandomAgent::new(seed)),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = UnknownAgent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AgentKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownAgent(name.to_string()))
    }
}
