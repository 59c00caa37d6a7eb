// ═══════════════════════════════════════════════════════════════════════
// Move validation — pure legality checks for every move kind
//
// `validate` never touches the state. It either produces an Effect that
// `GameState::commit` can apply without further checks, or a Rejection
// explaining why the move is a no-op. Unknown territory ids are the only
// failure that escapes as an error.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::LookupError;
use crate::map::Map;
use crate::phase::PhaseSpec;
use crate::types::*;
use serde::Serialize;
use std::fmt;

/// Why a proposed move was absorbed without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    GameOver,
    NotAllowedInPhase { kind: MoveKind, phase: Phase },
    AlreadyClaimed,
    NoUnassignedUnits,
    ZeroCount,
    NotOwner,
    InsufficientUnits { available: u32, requested: u32 },
    OwnTerritory,
    NotAdjacent,
    InsufficientMargin { attackers: u32, defenders: u32 },
    /// Recognised move kind without an effect (fortify).
    Inert,
    /// Part of a supplier response answering an earlier turn.
    StaleTurn { answered: u64, current: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::GameOver => write!(f, "the game is over"),
            Rejection::NotAllowedInPhase { kind, phase } => write!(f, "{kind} is not allowed in the {phase} phase"),
            Rejection::AlreadyClaimed => write!(f, "territory is already claimed"),
            Rejection::NoUnassignedUnits => write!(f, "no unassigned units left"),
            Rejection::ZeroCount => write!(f, "count must be at least 1"),
            Rejection::NotOwner => write!(f, "you do not own that territory"),
            Rejection::InsufficientUnits { available, requested } => {
                write!(f, "only {available} unassigned units, {requested} requested")
            }
            Rejection::OwnTerritory => write!(f, "cannot attack your own territory"),
            Rejection::NotAdjacent => write!(f, "territories are not adjacent"),
            Rejection::InsufficientMargin { attackers, defenders } => {
                write!(f, "{attackers} attackers cannot beat {defenders} defenders (need a lead of {ATTACK_MARGIN})")
            }
            Rejection::Inert => write!(f, "move has no effect"),
            Rejection::StaleTurn { answered, current } => {
                write!(f, "response answers turn {answered}, current turn is {current}")
            }
        }
    }
}

/// Outcome of validating one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Legal(Effect),
    Rejected(Rejection),
}

/// Minimum soldier lead an attacker needs over the defender.
pub const ATTACK_MARGIN: u32 = 2;

/// Check `mv` on behalf of `player` against the current phase.
/// `phase` is None once the game is over.
pub fn validate(
    state: &GameState,
    map: &Map,
    phase: Option<&PhaseSpec>,
    player: PlayerIndex,
    mv: &Move,
) -> Result<Verdict, LookupError> {
    for id in mv.territories() {
        map.lookup(id)?;
        if state.territory(id).is_none() {
            return Err(LookupError(id));
        }
    }

    let Some(spec) = phase.filter(|_| state.winner().is_none()) else {
        return Ok(Verdict::Rejected(Rejection::GameOver));
    };
    if !spec.allows(mv.kind()) {
        return Ok(Verdict::Rejected(Rejection::NotAllowedInPhase {
            kind: mv.kind(),
            phase: spec.phase,
        }));
    }

    let verdict = match *mv {
        Move::Occupy { target } => check_occupy(state, player, target),
        Move::Reinforce { target, count } => check_reinforce(state, player, target, count),
        Move::Attack { source, dest } => check_attack(state, map, player, source, dest),
        Move::Fortify => Err(Rejection::Inert),
    };
    Ok(match verdict {
        Ok(effect) => Verdict::Legal(effect),
        Err(reason) => Verdict::Rejected(reason),
    })
}

// Territory ids are already known to be valid below.
fn territory(state: &GameState, id: TerritoryId) -> Territory {
    state.territory(id).copied().unwrap_or_default()
}

fn check_occupy(state: &GameState, player: PlayerIndex, target: TerritoryId) -> Result<Effect, Rejection> {
    if !territory(state, target).is_unclaimed() {
        return Err(Rejection::AlreadyClaimed);
    }
    if state.unassigned(player) == 0 {
        return Err(Rejection::NoUnassignedUnits);
    }
    Ok(Effect::Claim { target })
}

fn check_reinforce(
    state: &GameState,
    player: PlayerIndex,
    target: TerritoryId,
    count: u32,
) -> Result<Effect, Rejection> {
    if count == 0 {
        return Err(Rejection::ZeroCount);
    }
    if !territory(state, target).is_owned_by(player) {
        return Err(Rejection::NotOwner);
    }
    let available = state.unassigned(player);
    if available < count {
        return Err(Rejection::InsufficientUnits { available, requested: count });
    }
    Ok(Effect::Reinforce { target, count })
}

/// Deterministic combat: the attacker needs a lead of at least
/// ATTACK_MARGIN. The source keeps one soldier and the destination is
/// taken with `lead - 1` survivors.
fn check_attack(
    state: &GameState,
    map: &Map,
    player: PlayerIndex,
    source: TerritoryId,
    dest: TerritoryId,
) -> Result<Effect, Rejection> {
    let from = territory(state, source);
    let to = territory(state, dest);
    if !from.is_owned_by(player) {
        return Err(Rejection::NotOwner);
    }
    if to.is_owned_by(player) {
        return Err(Rejection::OwnTerritory);
    }
    if !map.are_adjacent(source, dest) {
        return Err(Rejection::NotAdjacent);
    }
    let lead = from.soldiers.saturating_sub(to.soldiers);
    if from.soldiers < to.soldiers || lead < ATTACK_MARGIN {
        return Err(Rejection::InsufficientMargin {
            attackers: from.soldiers,
            defenders: to.soldiers,
        });
    }
    Ok(Effect::Conquer {
        source,
        dest,
        survivors: lead - 1,
    })
}
