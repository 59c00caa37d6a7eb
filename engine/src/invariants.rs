//! State invariants - bug detectors for the rules engine.
//!
//! No sequence of moves, legal or not, should ever make these fire.
//! Property tests run them on every reachable state and headless sessions
//! assert them in debug builds.

use crate::map::Map;
use crate::types::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    pub message: String,
}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

/// Check every state invariant against the map the game runs on.
///
/// Returns the violations found, empty when all hold.
#[must_use]
pub fn check_invariants(state: &GameState, map: &Map) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let players = state.player_count();

    if state.territory_count() != map.len() {
        violations.push(violation(format!(
            "state tracks {} territories, map has {}",
            state.territory_count(),
            map.len()
        )));
    }

    for (id, t) in state.territories() {
        match t.owner {
            Some(p) if p.index() >= players => violations.push(violation(format!(
                "territory {} owned by {}, only {} players",
                id, p, players
            ))),
            Some(_) if t.soldiers == 0 => {
                violations.push(violation(format!("territory {} is owned but empty", id)))
            }
            None if t.soldiers != 0 => violations.push(violation(format!(
                "territory {} is unclaimed but holds {} soldiers",
                id, t.soldiers
            ))),
            _ => {}
        }
    }

    // No unit creation: placed + unplaced never exceeds what was handed out.
    for p in state.players() {
        let held = state.unassigned(p) as u64 + state.soldiers_of(p);
        let allotted = state.allotted(p) as u64;
        if held > allotted {
            violations.push(violation(format!(
                "{} holds {} units but was only allotted {}",
                p, held, allotted
            )));
        }
    }

    if matches!(state.phase(), Phase::Occupation | Phase::Reinforcement) {
        let initial = state.players().map(|p| state.allotted(p)).max().unwrap_or(0);
        if state.players().any(|p| state.allotted(p) != initial) {
            violations.push(violation(format!(
                "allotments diverged before War in phase {}",
                state.phase()
            )));
        }
    }

    match (state.phase(), state.winner()) {
        (Phase::Terminal, None) => violations.push(violation("terminal state without a winner".into())),
        (phase, Some(w)) if phase != Phase::Terminal => violations.push(violation(format!(
            "winner {} recorded while still in phase {}",
            w, phase
        ))),
        (Phase::Terminal, Some(w)) if state.territories().any(|(_, t)| !t.is_owned_by(w)) => {
            violations.push(violation(format!("winner {} does not own every territory", w)))
        }
        _ => {}
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_map() -> Map {
        Map::from_edges("pair", &[("A", ""), ("B", "")], &[("A", "B")]).unwrap()
    }

    #[test]
    fn test_fresh_state_is_clean() {
        let state = GameState::new(2, 2, 1);
        assert!(check_invariants(&state, &pair_map()).is_empty());
    }

    #[test]
    fn test_detects_empty_owned_territory() {
        let mut state = GameState::new(2, 2, 1);
        state.territories[0].owner = Some(PlayerIndex(0));
        let v = check_invariants(&state, &pair_map());
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("owned but empty"));
    }

    #[test]
    fn test_detects_unit_creation() {
        let mut state = GameState::new(2, 2, 1);
        state.territories[0] = Territory { owner: Some(PlayerIndex(0)), soldiers: 1 };
        // pool was not decremented
        let v = check_invariants(&state, &pair_map());
        assert!(v.iter().any(|v| v.message.contains("allotted")));
    }

    #[test]
    fn test_detects_bad_owner_and_terminal_without_winner() {
        let mut state = GameState::new(2, 2, 1);
        state.territories[1] = Territory { owner: Some(PlayerIndex(7)), soldiers: 1 };
        state.phase = Phase::Terminal;
        let v = check_invariants(&state, &pair_map());
        assert!(v.iter().any(|v| v.message.contains("only 2 players")));
        assert!(v.iter().any(|v| v.message.contains("without a winner")));
    }
}
