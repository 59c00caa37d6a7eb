// ═══════════════════════════════════════════════════════════════════════
// Core types — identifiers, territory state, moves, and the GameState
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Identifiers ────────────────────────────────────────────────────────
// Compact, copyable ids. TerritoryId indexes into the active map's
// territory table; PlayerIndex indexes into the configured seats.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub u16);

impl TerritoryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerIndex(pub u8);

impl PlayerIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

// ── Territory ──────────────────────────────────────────────────────────

/// Dynamic per-territory state.
/// `soldiers >= 1` whenever owned, `soldiers == 0` whenever unclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Territory {
    pub owner: Option<PlayerIndex>,
    pub soldiers: u32,
}

impl Territory {
    pub fn is_unclaimed(&self) -> bool {
        self.owner.is_none()
    }

    pub fn is_owned_by(&self, player: PlayerIndex) -> bool {
        self.owner == Some(player)
    }
}

// ── Phases ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Occupation,
    Reinforcement,
    War,
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Occupation => write!(f, "Occupation"),
            Phase::Reinforcement => write!(f, "Reinforcement"),
            Phase::War => write!(f, "War"),
            Phase::Terminal => write!(f, "Terminal"),
        }
    }
}

// ── Moves ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Occupy,
    Reinforce,
    Attack,
    Fortify,
}

impl MoveKind {
    pub const ALL: [MoveKind; 4] = [
        MoveKind::Occupy,
        MoveKind::Reinforce,
        MoveKind::Attack,
        MoveKind::Fortify,
    ];

    /// Wire name, as used by the supplier protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            MoveKind::Occupy => "occupy",
            MoveKind::Reinforce => "reinforce",
            MoveKind::Attack => "attack",
            MoveKind::Fortify => "fortify",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move proposed by the current player.
/// Fortify is recognised but has no effect in any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Occupy { target: TerritoryId },
    Reinforce { target: TerritoryId, count: u32 },
    Attack { source: TerritoryId, dest: TerritoryId },
    Fortify,
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Occupy { .. } => MoveKind::Occupy,
            Move::Reinforce { .. } => MoveKind::Reinforce,
            Move::Attack { .. } => MoveKind::Attack,
            Move::Fortify => MoveKind::Fortify,
        }
    }

    /// Every territory the move references, for id validation.
    pub fn territories(&self) -> Vec<TerritoryId> {
        match *self {
            Move::Occupy { target } => vec![target],
            Move::Reinforce { target, .. } => vec![target],
            Move::Attack { source, dest } => vec![source, dest],
            Move::Fortify => Vec::new(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Occupy { target } => write!(f, "occupy {}", target),
            Move::Reinforce { target, count } => write!(f, "reinforce {} x{}", target, count),
            Move::Attack { source, dest } => write!(f, "attack {} -> {}", source, dest),
            Move::Fortify => write!(f, "fortify"),
        }
    }
}

// ── Game State ─────────────────────────────────────────────────────────

/// The mutable simulation state.
///
/// Reads are public. Writes go through [`GameState::commit`] (moves, only
/// ever called by the validator with an already-checked effect) and
/// [`GameState::grant_income`] (the War turn-begin hook).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Indexed by TerritoryId.
    pub(crate) territories: Vec<Territory>,
    /// Unplaced soldiers per player, indexed by PlayerIndex.
    pub(crate) unassigned: Vec<u32>,
    /// Units ever handed to each player: setup allotment plus War income.
    pub(crate) allotted: Vec<u32>,
    pub(crate) phase: Phase,
    /// Rotation position inside the current phase.
    pub(crate) turn_cursor: usize,
    /// Global turn counter, bumped on every new turn.
    pub(crate) turn: u64,
    /// Committed moves in the current turn.
    pub(crate) moves_this_turn: u32,
    pub(crate) winner: Option<PlayerIndex>,
}

/// An already-validated state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Claim { target: TerritoryId },
    Reinforce { target: TerritoryId, count: u32 },
    Conquer { source: TerritoryId, dest: TerritoryId, survivors: u32 },
}

impl GameState {
    pub(crate) fn new(territory_count: usize, player_count: usize, units_per_player: u32) -> Self {
        GameState {
            territories: vec![Territory::default(); territory_count],
            unassigned: vec![units_per_player; player_count],
            allotted: vec![units_per_player; player_count],
            phase: Phase::Occupation,
            turn_cursor: 0,
            turn: 0,
            moves_this_turn: 0,
            winner: None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.unassigned.len()
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerIndex> {
        (0..self.unassigned.len()).map(|i| PlayerIndex(i as u8))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn turn_cursor(&self) -> usize {
        self.turn_cursor
    }

    pub fn moves_this_turn(&self) -> u32 {
        self.moves_this_turn
    }

    pub fn winner(&self) -> Option<PlayerIndex> {
        self.winner
    }

    /// `players[cursor mod numPlayers]`. None once the game is over.
    pub fn current_player(&self) -> Option<PlayerIndex> {
        if self.phase == Phase::Terminal {
            return None;
        }
        Some(PlayerIndex((self.turn_cursor % self.player_count()) as u8))
    }

    /// Territory state, or None for an id outside the map.
    pub fn territory(&self, id: TerritoryId) -> Option<&Territory> {
        self.territories.get(id.index())
    }

    pub fn territories(&self) -> impl Iterator<Item = (TerritoryId, &Territory)> {
        self.territories
            .iter()
            .enumerate()
            .map(|(i, t)| (TerritoryId(i as u16), t))
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn unassigned(&self, player: PlayerIndex) -> u32 {
        self.unassigned.get(player.index()).copied().unwrap_or(0)
    }

    pub fn total_unassigned(&self) -> u64 {
        self.unassigned.iter().map(|&u| u as u64).sum()
    }

    pub fn allotted(&self, player: PlayerIndex) -> u32 {
        self.allotted.get(player.index()).copied().unwrap_or(0)
    }

    pub fn owned_count(&self, player: PlayerIndex) -> usize {
        self.territories.iter().filter(|t| t.is_owned_by(player)).count()
    }

    pub fn soldiers_of(&self, player: PlayerIndex) -> u64 {
        self.territories
            .iter()
            .filter(|t| t.is_owned_by(player))
            .map(|t| t.soldiers as u64)
            .sum()
    }

    pub fn unclaimed_count(&self) -> usize {
        self.territories.iter().filter(|t| t.is_unclaimed()).count()
    }

    // ── Mutation ───────────────────────────────────────────────────────

    /// Apply a validated effect on behalf of `player`. Cannot fail.
    pub(crate) fn commit(&mut self, player: PlayerIndex, effect: Effect) {
        match effect {
            Effect::Claim { target } => {
                self.territories[target.index()] = Territory {
                    owner: Some(player),
                    soldiers: 1,
                };
                self.unassigned[player.index()] -= 1;
            }
            Effect::Reinforce { target, count } => {
                self.territories[target.index()].soldiers += count;
                self.unassigned[player.index()] -= count;
            }
            Effect::Conquer { source, dest, survivors } => {
                self.territories[source.index()].soldiers = 1;
                self.territories[dest.index()] = Territory {
                    owner: Some(player),
                    soldiers: survivors,
                };
            }
        }
        self.moves_this_turn += 1;
    }

    pub(crate) fn grant_income(&mut self, player: PlayerIndex, units: u32) {
        self.unassigned[player.index()] += units;
        self.allotted[player.index()] += units;
    }
}
