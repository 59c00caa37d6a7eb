// ═══════════════════════════════════════════════════════════════════════
// Phase table — declarative description of every phase of a game
//
// The table is a pure function of the config, built once and never
// mutated. Each phase owns its turn order outright: entering a phase
// always starts at that phase's `first()`, whatever cursor the previous
// phase ended on.
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::types::*;

// ── Turn order policy ──────────────────────────────────────────────────

/// Per-phase rotation rule. `current player = players[cursor mod N]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOrder {
    /// first() = `start`, next(c) = (c + 1) mod N.
    RoundRobin { start: usize },
}

impl TurnOrder {
    pub fn first(&self) -> usize {
        match *self {
            TurnOrder::RoundRobin { start } => start,
        }
    }

    pub fn next(&self, cursor: usize, players: usize) -> usize {
        match self {
            TurnOrder::RoundRobin { .. } => (cursor + 1) % players,
        }
    }
}

// ── End conditions and hooks ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCondition {
    NoUnclaimedTerritory,
    NoUnassignedUnits,
    /// Only victory ends the phase.
    Never,
}

impl EndCondition {
    pub fn is_met(&self, state: &GameState) -> bool {
        match self {
            EndCondition::NoUnclaimedTerritory => state.unclaimed_count() == 0,
            EndCondition::NoUnassignedUnits => state.total_unassigned() == 0,
            EndCondition::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnHook {
    /// Add `max(floor(owned / 3), 3)` to the current player's pool.
    GrantIncome,
}

/// Reinforcement income for a player owning `owned` territories.
pub fn income_for(owned: usize) -> u32 {
    ((owned / 3) as u32).max(3)
}

// ── Phase spec ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSpec {
    pub phase: Phase,
    pub allowed: &'static [MoveKind],
    pub end_condition: EndCondition,
    pub on_turn_begin: Option<TurnHook>,
    pub turn_order: TurnOrder,
    /// Committed moves after which the turn ends by itself.
    pub moves_per_turn: Option<u32>,
}

impl PhaseSpec {
    pub fn allows(&self, kind: MoveKind) -> bool {
        self.allowed.contains(&kind)
    }

    fn occupation() -> Self {
        PhaseSpec {
            phase: Phase::Occupation,
            allowed: &[MoveKind::Occupy],
            end_condition: EndCondition::NoUnclaimedTerritory,
            on_turn_begin: None,
            turn_order: TurnOrder::RoundRobin { start: 0 },
            moves_per_turn: Some(1),
        }
    }

    fn reinforcement() -> Self {
        PhaseSpec {
            phase: Phase::Reinforcement,
            allowed: &[MoveKind::Reinforce],
            end_condition: EndCondition::NoUnassignedUnits,
            on_turn_begin: None,
            turn_order: TurnOrder::RoundRobin { start: 0 },
            moves_per_turn: Some(1),
        }
    }

    fn war() -> Self {
        PhaseSpec {
            phase: Phase::War,
            allowed: &[MoveKind::Attack, MoveKind::Reinforce],
            end_condition: EndCondition::Never,
            on_turn_begin: Some(TurnHook::GrantIncome),
            turn_order: TurnOrder::RoundRobin { start: 0 },
            moves_per_turn: None,
        }
    }
}

/// Ordered list of the active phases of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTable {
    phases: Vec<PhaseSpec>,
}

impl PhaseTable {
    /// Occupation is left out entirely when territories are dealt at setup.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut phases = Vec::with_capacity(3);
        if !config.random_initial_occupation {
            phases.push(PhaseSpec::occupation());
        }
        phases.push(PhaseSpec::reinforcement());
        phases.push(PhaseSpec::war());
        PhaseTable { phases }
    }

    pub fn get(&self, index: usize) -> Option<&PhaseSpec> {
        self.phases.get(index)
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phases.iter().map(|p| p.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerIdentity;
    use crate::map::MapSelection;

    #[test]
    fn test_round_robin_three_players() {
        let order = TurnOrder::RoundRobin { start: 0 };
        let mut cursor = order.first();
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(cursor % 3);
            cursor = order.next(cursor, 3);
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_income() {
        assert_eq!(income_for(0), 3);
        assert_eq!(income_for(8), 3);
        assert_eq!(income_for(11), 3);
        assert_eq!(income_for(12), 4);
        assert_eq!(income_for(42), 14);
    }

    #[test]
    fn test_table_with_manual_occupation() {
        let cfg = GameConfig::new(vec![PlayerIdentity::Human; 2], MapSelection::World, 30);
        let table = PhaseTable::from_config(&cfg);
        let phases: Vec<Phase> = table.phases().collect();
        assert_eq!(phases, vec![Phase::Occupation, Phase::Reinforcement, Phase::War]);
    }

    #[test]
    fn test_table_with_random_occupation_drops_occupation() {
        let cfg = GameConfig::new(vec![PlayerIdentity::Human; 2], MapSelection::World, 30)
            .with_random_occupation(true);
        let table = PhaseTable::from_config(&cfg);
        let phases: Vec<Phase> = table.phases().collect();
        assert_eq!(phases, vec![Phase::Reinforcement, Phase::War]);
        // Reinforcement still starts at player 0
        assert_eq!(table.get(0).unwrap().turn_order.first(), 0);
    }

    #[test]
    fn test_allowed_moves() {
        let cfg = GameConfig::new(vec![PlayerIdentity::Human; 2], MapSelection::World, 30);
        let table = PhaseTable::from_config(&cfg);
        let war = table.get(2).unwrap();
        assert!(war.allows(MoveKind::Attack));
        assert!(war.allows(MoveKind::Reinforce));
        assert!(!war.allows(MoveKind::Occupy));
        assert!(!war.allows(MoveKind::Fortify));
    }
}
