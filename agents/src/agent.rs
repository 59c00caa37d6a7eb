// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all automated move suppliers implement
//
// KEY DESIGN PRINCIPLE:
//   Agents only ever see a `TurnRequest`, the same payload a remote
//   supplier would receive over the wire. They never touch a `Game`, so
//   anything they propose is re-validated by the engine like any other
//   untrusted move.
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::error::ProtocolError;
use conquest_engine::protocol::{TurnRequest, TurnResponse};
use conquest_engine::types::*;
use std::cmp::Reverse;

/// Trait that all automated agents must implement.
/// Each phase has its own decision method; `decide` dispatches to them.
pub trait Agent: Send {
    /// Identity name, as sent in `agentIdentity` (e.g. "passive").
    fn name(&self) -> &str;

    /// Choose this turn's moves. This is the universal entry point.
    fn decide(&mut self, request: &TurnRequest) -> TurnResponse {
        let Some(view) = TurnView::new(request) else {
            return TurnResponse::answering(request, Vec::new());
        };
        let moves = match view.phase() {
            Phase::Occupation => self.occupy(&view),
            Phase::Reinforcement => self.reinforce(&view),
            Phase::War => self.war(&view),
            Phase::Terminal => Vec::new(),
        };
        TurnResponse::answering(request, moves)
    }

    /// Wire-level entry point: JSON request in, JSON response out.
    fn respond(&mut self, raw_request: &str) -> Result<String, ProtocolError> {
        let request = TurnRequest::from_json(raw_request)?;
        self.decide(&request).to_json()
    }

    // ── Per-phase decisions ────────────────────────────────────────────

    /// Occupation allows one claim per turn.
    fn occupy(&mut self, view: &TurnView) -> Vec<Move>;

    /// Reinforcement allows one placement per turn.
    fn reinforce(&mut self, view: &TurnView) -> Vec<Move>;

    /// Any number of reinforcements and attacks, applied in order.
    fn war(&mut self, view: &TurnView) -> Vec<Move>;
}

// ── Turn view ──────────────────────────────────────────────────────────

/// Read helpers over a request, from the point of view of the player to
/// move. Ties between territories are broken towards the lower id.
pub struct TurnView<'a> {
    request: &'a TurnRequest,
    me: PlayerIndex,
}

impl<'a> TurnView<'a> {
    /// None when nobody is to move.
    pub fn new(request: &'a TurnRequest) -> Option<Self> {
        let me = request.state_snapshot.current_player?;
        Some(TurnView { request, me })
    }

    pub fn me(&self) -> PlayerIndex {
        self.me
    }

    pub fn phase(&self) -> Phase {
        self.request.state_snapshot.phase
    }

    pub fn unassigned(&self) -> u32 {
        self.request
            .state_snapshot
            .unassigned_units
            .get(&self.me)
            .copied()
            .unwrap_or(0)
    }

    pub fn territory(&self, id: TerritoryId) -> Territory {
        self.request
            .state_snapshot
            .territories
            .get(&id)
            .copied()
            .unwrap_or_default()
    }

    pub fn soldiers(&self, id: TerritoryId) -> u32 {
        self.territory(id).soldiers
    }

    pub fn is_mine(&self, id: TerritoryId) -> bool {
        self.territory(id).is_owned_by(self.me)
    }

    pub fn is_enemy(&self, id: TerritoryId) -> bool {
        let t = self.territory(id);
        !t.is_unclaimed() && !t.is_owned_by(self.me)
    }

    pub fn neighbors(&self, id: TerritoryId) -> &'a [TerritoryId] {
        self.request
            .adjacency_graph
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn unclaimed(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        self.request
            .state_snapshot
            .territories
            .iter()
            .filter(|(_, t)| t.is_unclaimed())
            .map(|(&id, _)| id)
    }

    /// My territories with their soldier counts, in id order.
    pub fn owned(&self) -> impl Iterator<Item = (TerritoryId, u32)> + '_ {
        let me = self.me;
        self.request
            .state_snapshot
            .territories
            .iter()
            .filter(move |(_, t)| t.is_owned_by(me))
            .map(|(&id, t)| (id, t.soldiers))
    }

    /// Territories held by any other player, in id order.
    pub fn enemies(&self) -> impl Iterator<Item = (TerritoryId, u32)> + '_ {
        let me = self.me;
        self.request
            .state_snapshot
            .territories
            .iter()
            .filter(move |(_, t)| t.owner.is_some_and(|o| o != me))
            .map(|(&id, t)| (id, t.soldiers))
    }

    pub fn weakest_owned(&self) -> Option<TerritoryId> {
        self.owned().min_by_key(|&(id, s)| (s, id)).map(|(id, _)| id)
    }

    pub fn strongest_owned(&self) -> Option<TerritoryId> {
        self.owned().max_by_key(|&(id, s)| (s, Reverse(id))).map(|(id, _)| id)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::line_request;
    use super::*;

    #[test]
    fn test_view_extremes_break_ties_by_id() {
        let req = line_request(Phase::War, 0, 4, &[(Some(0), 3), (Some(1), 9), (Some(0), 1), (Some(0), 3), (Some(0), 1)]);
        let view = TurnView::new(&req).unwrap();
        assert_eq!(view.weakest_owned(), Some(TerritoryId(2)));
        assert_eq!(view.strongest_owned(), Some(TerritoryId(0)));
        assert_eq!(view.unassigned(), 4);
        assert_eq!(view.enemies().collect::<Vec<_>>(), vec![(TerritoryId(1), 9)]);
        assert_eq!(view.neighbors(TerritoryId(1)), &[TerritoryId(0), TerritoryId(2)]);
    }

    #[test]
    fn test_view_absent_without_current_player() {
        let mut req = line_request(Phase::Terminal, 0, 0, &[(Some(0), 1)]);
        req.state_snapshot.current_player = None;
        assert!(TurnView::new(&req).is_none());
    }
}
