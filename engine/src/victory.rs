// ═══════════════════════════════════════════════════════════════════════
// Victory detection — run after every committed move
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;

/// The sole owner of the whole map, if there is one.
///
/// Any unclaimed territory means no winner, so a lone occupier early in
/// Occupation never counts.
pub fn check_winner(state: &GameState) -> Option<PlayerIndex> {
    let mut owners = state.territories().map(|(_, t)| t.owner);
    let first = owners.next()??;
    owners.all(|o| o == Some(first)).then_some(first)
}
