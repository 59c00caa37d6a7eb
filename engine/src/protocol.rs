// ═══════════════════════════════════════════════════════════════════════
// Move-supplier protocol — the JSON boundary to automated players
//
// Request:  { turn, stateSnapshot, adjacencyGraph, agentIdentity }
// Response: { turn?, moves: [ {kind: "occupy", target}, ... ] }
//
// Everything a supplier sends is untrusted. Decoding failures become a
// ProtocolError here and never reach the game state; decoded moves are
// still re-validated by the rules like any other move.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::ProtocolError;
use crate::map::Map;
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ── Request ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// Turn number the response should echo back.
    pub turn: u64,
    pub state_snapshot: StateSnapshot,
    pub adjacency_graph: BTreeMap<TerritoryId, Vec<TerritoryId>>,
    pub agent_identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub phase: Phase,
    pub current_player: Option<PlayerIndex>,
    pub territories: BTreeMap<TerritoryId, Territory>,
    pub unassigned_units: BTreeMap<PlayerIndex, u32>,
}

impl StateSnapshot {
    pub fn of(state: &GameState) -> Self {
        StateSnapshot {
            phase: state.phase(),
            current_player: state.current_player(),
            territories: state.territories().map(|(id, t)| (id, *t)).collect(),
            unassigned_units: state.players().map(|p| (p, state.unassigned(p))).collect(),
        }
    }
}

impl TurnRequest {
    pub fn build(state: &GameState, map: &Map, agent_identity: &str) -> Self {
        TurnRequest {
            turn: state.turn(),
            state_snapshot: StateSnapshot::of(state),
            adjacency_graph: map.adjacency(),
            agent_identity: agent_identity.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(raw)?)
    }
}

// ── Response ───────────────────────────────────────────────────────────

/// One proposed move on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MoveDescriptor {
    Occupy { target: TerritoryId },
    Reinforce { target: TerritoryId, count: u32 },
    Attack { source: TerritoryId, dest: TerritoryId },
    Fortify,
}

impl From<MoveDescriptor> for Move {
    fn from(d: MoveDescriptor) -> Self {
        match d {
            MoveDescriptor::Occupy { target } => Move::Occupy { target },
            MoveDescriptor::Reinforce { target, count } => Move::Reinforce { target, count },
            MoveDescriptor::Attack { source, dest } => Move::Attack { source, dest },
            MoveDescriptor::Fortify => Move::Fortify,
        }
    }
}

impl From<Move> for MoveDescriptor {
    fn from(m: Move) -> Self {
        match m {
            Move::Occupy { target } => MoveDescriptor::Occupy { target },
            Move::Reinforce { target, count } => MoveDescriptor::Reinforce { target, count },
            Move::Attack { source, dest } => MoveDescriptor::Attack { source, dest },
            Move::Fortify => MoveDescriptor::Fortify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Turn being answered. Responses without one are taken as current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<u64>,
    pub moves: Vec<MoveDescriptor>,
}

impl TurnResponse {
    /// A response answering `request` with `moves`.
    pub fn answering(request: &TurnRequest, moves: Vec<Move>) -> Self {
        TurnResponse {
            turn: Some(request.turn),
            moves: moves.into_iter().map(MoveDescriptor::from).collect(),
        }
    }

    pub fn moves(&self) -> Vec<Move> {
        self.moves.iter().copied().map(Move::from).collect()
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a supplier response.
///
/// Move kinds are checked before the typed decode so an unknown kind is
/// reported by name instead of as a generic serde failure.
pub fn parse_response(raw: &str) -> Result<TurnResponse, ProtocolError> {
    let value: Value = serde_json::from_str(raw)?;
    if let Some(moves) = value.get("moves").and_then(Value::as_array) {
        for kind in moves.iter().filter_map(|m| m.get("kind")).filter_map(Value::as_str) {
            if !MoveKind::ALL.iter().any(|k| k.as_str() == kind) {
                return Err(ProtocolError::UnknownMoveKind(kind.to_string()));
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}
