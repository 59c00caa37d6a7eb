// ═══════════════════════════════════════════════════════════════════════
// Game Runner — runs a complete headless game between agents
//
// Every turn goes over the wire format: the request is encoded to JSON,
// handed to the seat's agent, and its reply is decoded by the engine's
// protocol adapter. A reply that fails to decode costs the seat its turn.
// ═══════════════════════════════════════════════════════════════════════

use conquest_agents::{Agent, AgentKind, UnknownAgent};
use conquest_engine::config::{GameConfig, PlayerIdentity};
use conquest_engine::engine::{Game, GameEvent, TurnReport};
use conquest_engine::error::{ConfigError, ProtocolError};
use conquest_engine::invariants::check_invariants;
use conquest_engine::protocol::{parse_response, TurnResponse};
use conquest_engine::types::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    UnknownAgent(#[from] UnknownAgent),

    #[error("seat {seat} is a human; headless sessions need an agent in every seat")]
    HumanSeat { seat: usize },

    #[error("{players} seats configured but {agents} agents supplied")]
    AgentCount { players: usize, agents: usize },
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Winner(PlayerIndex),
    TurnLimit,
}

/// Result of a completed game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub seed: u64,
    pub outcome: Outcome,
    pub turns_played: u64,
    pub moves_applied: u64,
    pub moves_rejected: u64,
    pub protocol_errors: u32,
    pub player_results: Vec<PlayerResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerResult {
    pub player: PlayerIndex,
    pub agent_name: String,
    pub territories: usize,
    pub soldiers: u64,
    pub unassigned: u32,
}

impl GameResult {
    pub fn winner(&self) -> Option<PlayerIndex> {
        match self.outcome {
            Outcome::Winner(p) => Some(p),
            Outcome::TurnLimit => None,
        }
    }
}

/// Build one agent per seat from the configured identities. Agent seeds
/// are derived from the game seed so a session replays exactly.
pub fn agents_for(config: &GameConfig) -> Result<Vec<Box<dyn Agent>>, SessionError> {
    (0..config.num_players())
        .map(|seat| agent_for_seat(config, seat)?.ok_or(SessionError::HumanSeat { seat }))
        .collect()
}

/// The agent sitting in `seat`, or None for a human seat.
pub fn agent_for_seat(config: &GameConfig, seat: usize) -> Result<Option<Box<dyn Agent>>, UnknownAgent> {
    match config.players.get(seat) {
        Some(PlayerIdentity::Agent(name)) => {
            let kind: AgentKind = name.parse()?;
            Ok(Some(kind.create(config.seed.wrapping_add(seat as u64))))
        }
        _ => Ok(None),
    }
}

/// Run a complete game with the given agents, one per seat in order.
/// Stops at victory or once `max_turns` turns have been played.
pub fn run_game(
    config: &GameConfig,
    agents: &mut [Box<dyn Agent>],
    max_turns: u64,
) -> Result<GameResult, SessionError> {
    if let Some(seat) = config.players.iter().position(PlayerIdentity::is_human) {
        return Err(SessionError::HumanSeat { seat });
    }
    if agents.len() != config.num_players() {
        return Err(SessionError::AgentCount {
            players: config.num_players(),
            agents: agents.len(),
        });
    }

    let mut game = Game::new(config.clone())?;
    let mut protocol_errors = 0u32;
    let (mut applied, mut rejected) = (0u64, 0u64);

    while !game.is_over() && game.state().turn() <= max_turns {
        let Some(player) = game.current_player() else {
            break;
        };
        if play_agent_turn(&mut game, agents[player.index()].as_mut()).is_err() {
            protocol_errors += 1;
        }

        for event in game.drain_events() {
            match event {
                GameEvent::MoveApplied { .. } => applied += 1,
                GameEvent::MoveRejected { .. } => rejected += 1,
                _ => {}
            }
        }
        debug_assert!(
            check_invariants(game.state(), game.map()).is_empty(),
            "invariants broken at turn {}",
            game.state().turn()
        );
    }

    let outcome = match game.winner() {
        Some(w) => Outcome::Winner(w),
        None => {
            warn!(max_turns, "turn limit reached without a winner");
            Outcome::TurnLimit
        }
    };
    info!(seed = config.seed, outcome = ?outcome, turns = game.state().turn(), "session finished");

    Ok(build_result(&game, outcome, protocol_errors, applied, rejected))
}

/// Play the current turn for `agent`: one request/response round trip
/// through the JSON protocol, then the reply is applied. A protocol error
/// or a stale reply ends the turn with no moves.
pub fn play_agent_turn(game: &mut Game, agent: &mut dyn Agent) -> Result<TurnReport, ProtocolError> {
    let turn = game.state().turn();
    let player = game.current_player();
    let identity = player
        .and_then(|p| game.config().players.get(p.index()))
        .map(|id| id.name().to_string())
        .unwrap_or_default();

    let response = match ask(agent, game, &identity) {
        Ok(response) => response,
        Err(e) => {
            warn!(player = ?player, turn, error = %e, "protocol error, turn ends with no moves");
            game.end_turn();
            return Err(e);
        }
    };

    let report = game.play_response(&response);
    for missing in &report.unknown {
        warn!(player = ?player, turn, error = %missing, "agent named an unknown territory");
    }
    if report.stale {
        // Agents answer the request they were given; pass so the session moves on.
        warn!(player = ?player, turn, "stale agent response, passing");
        game.end_turn();
    }
    Ok(report)
}

fn ask(agent: &mut dyn Agent, game: &Game, identity: &str) -> Result<TurnResponse, ProtocolError> {
    let request = game.turn_request(identity).to_json()?;
    let reply = agent.respond(&request)?;
    debug!(agent = agent.name(), turn = game.state().turn(), reply = %reply, "agent replied");
    parse_response(&reply)
}

fn build_result(game: &Game, outcome: Outcome, protocol_errors: u32, applied: u64, rejected: u64) -> GameResult {
    let state = game.state();
    let player_results = state
        .players()
        .map(|p| PlayerResult {
            player: p,
            agent_name: game.config().players[p.index()].name().to_string(),
            territories: state.owned_count(p),
            soldiers: state.soldiers_of(p),
            unassigned: state.unassigned(p),
        })
        .collect();

    GameResult {
        seed: game.config().seed,
        outcome,
        turns_played: state.turn(),
        moves_applied: applied,
        moves_rejected: rejected,
        protocol_errors,
        player_results,
    }
}
