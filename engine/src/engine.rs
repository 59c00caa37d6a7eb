// ═══════════════════════════════════════════════════════════════════════
// Game — the phase controller and single entry point for moves
//
// Architecture:
//   The game is a pure state machine. It never does I/O or calls a move
//   supplier. Callers ask who is to move (`current_player`, or the
//   `TurnBegan` event), obtain moves from a human or an agent, and feed
//   them back through `submit` / `play_turn` / `play_response`.
//
// Flow per move:
//   1. rules::validate checks phase legality and move-specific rules
//   2. a legal effect is committed, an illegal one is logged and dropped
//   3. victory is checked; a sole owner ends the game
//   4. the phase end condition is checked; if met the next phase starts
//      at its own first player, otherwise the per-turn move limit may
//      end the turn
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::error::{ConfigError, LookupError};
use crate::map::Map;
use crate::phase::{income_for, PhaseSpec, PhaseTable, TurnHook};
use crate::protocol::{TurnRequest, TurnResponse};
use crate::rules::{self, Rejection, Verdict};
use crate::setup::create_initial_state;
use crate::types::*;
use crate::victory;
use serde::Serialize;
use tracing::{debug, info};

/// Everything observable that happened, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    PhaseEntered { phase: Phase },
    /// The "your turn" notification. Emitted exactly once per turn.
    TurnBegan { player: PlayerIndex, turn: u64 },
    IncomeGranted { player: PlayerIndex, units: u32 },
    MoveApplied { player: PlayerIndex, mv: Move },
    MoveRejected { player: Option<PlayerIndex>, mv: Move, reason: Rejection },
    GameWon { winner: PlayerIndex },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied)
    }
}

/// Summary of one batch of moves played for a single turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u64,
    pub player: Option<PlayerIndex>,
    pub applied: usize,
    pub rejected: usize,
    /// Moves left unplayed because the turn ended before reaching them.
    pub discarded: usize,
    /// Moves naming territories outside the map. Counted as rejected.
    pub unknown: Vec<LookupError>,
    /// The response answered an earlier turn and was ignored.
    pub stale: bool,
}

pub struct Game {
    config: GameConfig,
    map: Map,
    phases: PhaseTable,
    phase_idx: usize,
    state: GameState,
    events: Vec<GameEvent>,
}

impl Game {
    /// Validate `config`, load its map, and start the first phase.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let map = config.map.load()?;
        Game::with_map(config, map)
    }

    /// Start a game on a caller-supplied map. `config.map` is ignored.
    pub fn with_map(config: GameConfig, map: Map) -> Result<Self, ConfigError> {
        let state = create_initial_state(&config, &map)?;
        let phases = PhaseTable::from_config(&config);
        info!(
            map = map.name(),
            players = config.num_players(),
            units = config.units_per_player,
            random_occupation = config.random_initial_occupation,
            "game created"
        );
        let mut game = Game {
            config,
            map,
            phases,
            phase_idx: 0,
            state,
            events: Vec::new(),
        };
        game.enter_phase(0);
        Ok(game)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phases(&self) -> &PhaseTable {
        &self.phases
    }

    pub fn current_player(&self) -> Option<PlayerIndex> {
        self.state.current_player()
    }

    pub fn winner(&self) -> Option<PlayerIndex> {
        self.state.winner()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase() == Phase::Terminal
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The request an automated supplier needs to choose this turn's moves.
    pub fn turn_request(&self, agent_identity: &str) -> TurnRequest {
        TurnRequest::build(&self.state, &self.map, agent_identity)
    }

    fn active_phase(&self) -> Option<&PhaseSpec> {
        if self.is_over() {
            return None;
        }
        self.phases.get(self.phase_idx)
    }

    // ── Per-move entry points ──────────────────────────────────────────
    // Each returns the resulting state, unchanged when the move was
    // illegal. Only an unknown territory id is an error.

    pub fn occupy(&mut self, target: TerritoryId) -> Result<&GameState, LookupError> {
        self.submit(Move::Occupy { target })?;
        Ok(&self.state)
    }

    pub fn reinforce(&mut self, target: TerritoryId, count: u32) -> Result<&GameState, LookupError> {
        self.submit(Move::Reinforce { target, count })?;
        Ok(&self.state)
    }

    pub fn attack(&mut self, source: TerritoryId, dest: TerritoryId) -> Result<&GameState, LookupError> {
        self.submit(Move::Attack { source, dest })?;
        Ok(&self.state)
    }

    pub fn fortify(&mut self) -> Result<&GameState, LookupError> {
        self.submit(Move::Fortify)?;
        Ok(&self.state)
    }

    /// Validate and apply one move for the current player.
    pub fn submit(&mut self, mv: Move) -> Result<MoveOutcome, LookupError> {
        let player = self.state.current_player();
        let verdict = match player {
            Some(p) => rules::validate(&self.state, &self.map, self.active_phase(), p, &mv)?,
            None => rules::validate(&self.state, &self.map, None, PlayerIndex(0), &mv)?,
        };

        match (verdict, player) {
            (Verdict::Legal(effect), Some(p)) => {
                self.state.commit(p, effect);
                debug!(player = %p, turn = self.state.turn, mv = %mv, "move applied");
                self.events.push(GameEvent::MoveApplied { player: p, mv });
                self.after_commit();
                Ok(MoveOutcome::Applied)
            }
            (Verdict::Rejected(reason), _) => {
                self.reject(player, mv, reason);
                Ok(MoveOutcome::Rejected(reason))
            }
            // validate() never approves a move when nobody is to play
            (Verdict::Legal(_), None) => {
                self.reject(None, mv, Rejection::GameOver);
                Ok(MoveOutcome::Rejected(Rejection::GameOver))
            }
        }
    }

    fn reject(&mut self, player: Option<PlayerIndex>, mv: Move, reason: Rejection) {
        debug!(player = ?player, turn = self.state.turn, mv = %mv, reason = ?reason, "move rejected");
        self.events.push(GameEvent::MoveRejected { player, mv, reason });
    }

    /// Pass the turn to the next player. No-op once the game is over.
    pub fn end_turn(&mut self) {
        let Some(spec) = self.active_phase() else {
            return;
        };
        let next = spec.turn_order.next(self.state.turn_cursor, self.state.player_count());
        self.state.turn_cursor = next;
        self.begin_turn();
    }

    // ── Whole-turn entry points ────────────────────────────────────────

    /// Apply `moves` in order as the current player's turn, then end the
    /// turn. Moves still queued when the turn ends early (move limit,
    /// phase change, victory) are discarded.
    pub fn play_turn(&mut self, moves: &[Move]) -> TurnReport {
        let turn = self.state.turn;
        let mut report = TurnReport {
            turn,
            player: self.state.current_player(),
            ..TurnReport::default()
        };

        for (i, &mv) in moves.iter().enumerate() {
            if self.state.turn != turn || self.is_over() {
                report.discarded = moves.len() - i;
                break;
            }
            match self.submit(mv) {
                Ok(MoveOutcome::Applied) => report.applied += 1,
                Ok(MoveOutcome::Rejected(_)) => report.rejected += 1,
                Err(e) => {
                    report.rejected += 1;
                    report.unknown.push(e);
                }
            }
        }

        if self.state.turn == turn {
            self.end_turn();
        }
        report
    }

    /// Apply a decoded supplier response. A response echoing a turn other
    /// than the current one is stale: every move is rejected and the
    /// current turn keeps going.
    pub fn play_response(&mut self, response: &TurnResponse) -> TurnReport {
        let current = self.state.turn;
        match response.turn {
            Some(answered) if answered != current => {
                let player = self.state.current_player();
                for mv in response.moves() {
                    self.reject(player, mv, Rejection::StaleTurn { answered, current });
                }
                TurnReport {
                    turn: current,
                    player,
                    rejected: response.moves.len(),
                    stale: true,
                    ..TurnReport::default()
                }
            }
            _ => self.play_turn(&response.moves()),
        }
    }

    // ── Phase machinery ────────────────────────────────────────────────

    fn after_commit(&mut self) {
        if let Some(winner) = victory::check_winner(&self.state) {
            self.state.winner = Some(winner);
            self.state.phase = Phase::Terminal;
            info!(winner = %winner, turn = self.state.turn, "game won");
            self.events.push(GameEvent::GameWon { winner });
            return;
        }

        let Some(spec) = self.phases.get(self.phase_idx) else {
            return;
        };
        let phase_over = spec.end_condition.is_met(&self.state);
        let limit = spec.moves_per_turn;
        if phase_over {
            self.enter_phase(self.phase_idx + 1);
        } else if limit.is_some_and(|n| self.state.moves_this_turn >= n) {
            self.end_turn();
        }
    }

    /// Enter phase `idx`, resetting the rotation to that phase's first
    /// player. A phase whose end condition already holds is left at once.
    fn enter_phase(&mut self, mut idx: usize) {
        loop {
            let Some(spec) = self.phases.get(idx) else {
                // The last phase never ends by condition; nothing to enter.
                return;
            };
            self.phase_idx = idx;
            self.state.phase = spec.phase;
            self.state.turn_cursor = spec.turn_order.first();
            info!(phase = %spec.phase, "phase entered");
            self.events.push(GameEvent::PhaseEntered { phase: spec.phase });

            if !spec.end_condition.is_met(&self.state) {
                break;
            }
            info!(phase = %spec.phase, "end condition already met on entry");
            idx += 1;
        }
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        self.state.turn += 1;
        self.state.moves_this_turn = 0;
        let Some(player) = self.state.current_player() else {
            return;
        };
        debug!(player = %player, turn = self.state.turn, phase = %self.state.phase, "turn began");
        self.events.push(GameEvent::TurnBegan {
            player,
            turn: self.state.turn,
        });

        let hook = self.phases.get(self.phase_idx).and_then(|s| s.on_turn_begin);
        if let Some(TurnHook::GrantIncome) = hook {
            let units = income_for(self.state.owned_count(player));
            self.state.grant_income(player, units);
            debug!(player = %player, units, "income granted");
            self.events.push(GameEvent::IncomeGranted { player, units });
        }
    }

    /// Jump straight into `phase` and edit the state by hand.
    #[cfg(test)]
    pub(crate) fn arrange(&mut self, phase: Phase, f: impl FnOnce(&mut GameState)) {
        if let Some(idx) = self.phases.phases().position(|p| p == phase) {
            self.phase_idx = idx;
        }
        self.state.phase = phase;
        f(&mut self.state);
    }
}
