// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agents — fixed one-rule personalities.
//
//   passive:    claims the first free territory, props up its weakest
//               territory, never attacks
//   pacifist:   as passive, but picks off the weakest enemy it can beat
//   aggressive: stacks its strongest territory and attacks from it
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{Agent, TurnView};
use conquest_engine::rules::ATTACK_MARGIN;
use conquest_engine::types::*;
use std::cmp::Reverse;

/// The shared opening: claim the lowest-id unclaimed territory.
fn claim_first(view: &TurnView) -> Vec<Move> {
    view.unclaimed()
        .next()
        .map(|target| vec![Move::Occupy { target }])
        .unwrap_or_default()
}

fn place_one(target: Option<TerritoryId>) -> Vec<Move> {
    target
        .map(|target| vec![Move::Reinforce { target, count: 1 }])
        .unwrap_or_default()
}

/// Place the whole pool on `target`, if there is anything to place.
fn place_all(view: &TurnView, target: TerritoryId) -> Option<Move> {
    let count = view.unassigned();
    (count > 0).then_some(Move::Reinforce { target, count })
}

fn beats(attackers: u32, defenders: u32) -> bool {
    attackers >= defenders + ATTACK_MARGIN
}

// ── Passive ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PassiveAgent;

impl Agent for PassiveAgent {
    fn name(&self) -> &str {
        "passive"
    }

    fn occupy(&mut self, view: &TurnView) -> Vec<Move> {
        claim_first(view)
    }

    fn reinforce(&mut self, view: &TurnView) -> Vec<Move> {
        place_one(view.weakest_owned())
    }

    fn war(&mut self, view: &TurnView) -> Vec<Move> {
        view.weakest_owned()
            .and_then(|weakest| place_all(view, weakest))
            .into_iter()
            .collect()
    }
}

// ── Pacifist ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PacifistAgent;

impl Agent for PacifistAgent {
    fn name(&self) -> &str {
        "pacifist"
    }

    fn occupy(&mut self, view: &TurnView) -> Vec<Move> {
        claim_first(view)
    }

    fn reinforce(&mut self, view: &TurnView) -> Vec<Move> {
        place_one(view.weakest_owned())
    }

    /// Reinforce the weakest territory, then attack the weakest enemy
    /// territory any of ours can beat, from the strongest such neighbour.
    fn war(&mut self, view: &TurnView) -> Vec<Move> {
        let Some(weakest) = view.weakest_owned() else {
            return Vec::new();
        };
        let mut moves: Vec<Move> = place_all(view, weakest).into_iter().collect();
        let strength = |id: TerritoryId| {
            view.soldiers(id) + if id == weakest { view.unassigned() } else { 0 }
        };

        let mut targets: Vec<(TerritoryId, u32)> = view.enemies().collect();
        targets.sort_by_key(|&(id, soldiers)| (soldiers, id));

        for (target, defenders) in targets {
            let attacker = view
                .neighbors(target)
                .iter()
                .copied()
                .filter(|&n| view.is_mine(n) && beats(strength(n), defenders))
                .max_by_key(|&n| (strength(n), Reverse(n)));
            if let Some(source) = attacker {
                moves.push(Move::Attack { source, dest: target });
                break;
            }
        }
        moves
    }
}

// ── Aggressive ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AggressiveAgent;

impl Agent for AggressiveAgent {
    fn name(&self) -> &str {
        "aggressive"
    }

    fn occupy(&mut self, view: &TurnView) -> Vec<Move> {
        claim_first(view)
    }

    fn reinforce(&mut self, view: &TurnView) -> Vec<Move> {
        place_one(view.strongest_owned())
    }

    /// Stack the strongest territory, then hit the strongest adjacent
    /// enemy it still beats by the required margin.
    fn war(&mut self, view: &TurnView) -> Vec<Move> {
        let Some(base) = view.strongest_owned() else {
            return Vec::new();
        };
        let mut moves: Vec<Move> = place_all(view, base).into_iter().collect();
        let strength = view.soldiers(base) + view.unassigned();

        let target = view
            .neighbors(base)
            .iter()
            .copied()
            .filter(|&n| view.is_enemy(n) && beats(strength, view.soldiers(n)))
            .max_by_key(|&n| (view.soldiers(n), Reverse(n)));
        if let Some(dest) = target {
            moves.push(Move::Attack { source: base, dest });
        }
        moves
    }
}
