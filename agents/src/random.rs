// ═══════════════════════════════════════════════════════════════════════
// Random Agent — picks uniformly among plausible moves.
// Serves as baseline and for exercising engine stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::{Agent, TurnView};
use conquest_engine::rules::ATTACK_MARGIN;
use conquest_engine::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Upper bound on attacks proposed in one War turn.
const MAX_ATTACKS: usize = 3;

pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn random_owned(&mut self, view: &TurnView) -> Option<TerritoryId> {
        let owned: Vec<TerritoryId> = view.owned().map(|(id, _)| id).collect();
        owned.choose(&mut self.rng).copied()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn occupy(&mut self, view: &TurnView) -> Vec<Move> {
        let free: Vec<TerritoryId> = view.unclaimed().collect();
        free.choose(&mut self.rng)
            .map(|&target| vec![Move::Occupy { target }])
            .unwrap_or_default()
    }

    fn reinforce(&mut self, view: &TurnView) -> Vec<Move> {
        if view.unassigned() == 0 {
            return Vec::new();
        }
        self.random_owned(view)
            .map(|target| vec![Move::Reinforce { target, count: 1 }])
            .unwrap_or_default()
    }

    /// Drop a random share of the pool on a random territory, then try a
    /// few attacks. Attack candidates are judged on the request snapshot,
    /// so later ones may no longer hold; the engine rejects those.
    fn war(&mut self, view: &TurnView) -> Vec<Move> {
        let mut moves = Vec::new();
        let pool = view.unassigned();
        let mut boost = None;
        if pool > 0 {
            if let Some(target) = self.random_owned(view) {
                let count = self.rng.gen_range(1..=pool);
                moves.push(Move::Reinforce { target, count });
                boost = Some((target, count));
            }
        }
        let strength = |id: TerritoryId| match boost {
            Some((t, extra)) if t == id => view.soldiers(id) + extra,
            _ => view.soldiers(id),
        };

        let mut candidates: Vec<(TerritoryId, TerritoryId)> = view
            .owned()
            .flat_map(|(src, _)| view.neighbors(src).iter().map(move |&dst| (src, dst)))
            .filter(|&(src, dst)| view.is_enemy(dst) && strength(src) >= view.soldiers(dst) + ATTACK_MARGIN)
            .collect();
        candidates.shuffle(&mut self.rng);

        let attacks = self.rng.gen_range(0..=MAX_ATTACKS.min(candidates.len()));
        moves.extend(
            candidates
                .into_iter()
                .take(attacks)
                .map(|(source, dest)| Move::Attack { source, dest }),
        );
        moves
    }
}
