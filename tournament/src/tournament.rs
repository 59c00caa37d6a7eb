// ═══════════════════════════════════════════════════════════════════════
// Tournament — many seeded headless games in parallel, tallied per seat
// and per agent
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{agents_for, run_game, GameResult, SessionError};
use conquest_agents::AgentKind;
use conquest_engine::config::{GameConfig, PlayerIdentity};
use conquest_engine::error::ConfigError;
use conquest_engine::map::MapSelection;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentPlan {
    pub seats: Vec<AgentKind>,
    pub map: MapSelection,
    pub units_per_player: u32,
    #[serde(default)]
    pub random_initial_occupation: bool,
    pub games: u32,
    pub base_seed: u64,
    pub max_turns: u64,
}

impl TournamentPlan {
    /// Config for game `g`, seeded with `base_seed + g`.
    pub fn config_for(&self, g: u32) -> GameConfig {
        let players = self
            .seats
            .iter()
            .map(|k| PlayerIdentity::Agent(k.as_str().to_string()))
            .collect();
        GameConfig::new(players, self.map, self.units_per_player)
            .with_random_occupation(self.random_initial_occupation)
            .with_seed(self.base_seed.wrapping_add(g as u64))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentSummary {
    pub games: u32,
    pub decided: u32,
    pub turn_limited: u32,
    pub failed: u32,
    /// Wins by seat index.
    pub seat_wins: Vec<u32>,
    /// Wins by agent name, summed over every seat it held.
    pub agent_wins: BTreeMap<String, u32>,
    pub mean_turns: f64,
    pub protocol_errors: u64,
}

impl TournamentSummary {
    fn tally(plan: &TournamentPlan, results: &[Result<GameResult, SessionError>]) -> Self {
        let mut summary = TournamentSummary {
            games: results.len() as u32,
            seat_wins: vec![0; plan.seats.len()],
            agent_wins: plan.seats.iter().map(|k| (k.as_str().to_string(), 0)).collect(),
            ..TournamentSummary::default()
        };
        let mut total_turns = 0u64;

        for result in results {
            let result = match result {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "tournament game failed");
                    summary.failed += 1;
                    continue;
                }
            };
            total_turns += result.turns_played;
            summary.protocol_errors += result.protocol_errors as u64;
            match result.winner() {
                Some(w) => {
                    summary.decided += 1;
                    summary.seat_wins[w.index()] += 1;
                    *summary
                        .agent_wins
                        .entry(plan.seats[w.index()].as_str().to_string())
                        .or_insert(0) += 1;
                }
                None => summary.turn_limited += 1,
            }
        }

        let played = summary.games - summary.failed;
        if played > 0 {
            summary.mean_turns = total_turns as f64 / played as f64;
        }
        summary
    }

    /// Share of games won by `seat`, in percent.
    pub fn seat_win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.seat_wins.get(seat).copied().unwrap_or(0) as f64 / self.games as f64 * 100.0
    }
}

/// Run `plan.games` games in parallel. The setup is validated once up
/// front so a bad plan fails fast instead of once per game.
pub fn run_tournament(plan: &TournamentPlan) -> Result<TournamentSummary, SessionError> {
    let probe = plan.config_for(0);
    let map = probe.map.load().map_err(ConfigError::from)?;
    probe.validate_for(&map)?;
    agents_for(&probe)?;

    info!(games = plan.games, seats = plan.seats.len(), map = %plan.map, "tournament started");
    let results: Vec<Result<GameResult, SessionError>> = (0..plan.games)
        .into_par_iter()
        .map(|g| {
            let config = plan.config_for(g);
            let mut agents = agents_for(&config)?;
            run_game(&config, &mut agents, plan.max_turns)
        })
        .collect();

    let summary = TournamentSummary::tally(plan, &results);
    info!(decided = summary.decided, turn_limited = summary.turn_limited, failed = summary.failed, "tournament finished");
    Ok(summary)
}
