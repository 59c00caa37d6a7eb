pub mod runner;
pub mod tournament;

pub use runner::{agent_for_seat, agents_for, play_agent_turn, run_game, GameResult, Outcome, PlayerResult, SessionError};
pub use tournament::{run_tournament, TournamentPlan, TournamentSummary};
