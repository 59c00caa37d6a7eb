// ═══════════════════════════════════════════════════════════════════════
// Game setup — builds the initial GameState from a validated config
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::map::Map;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create the initial state: every territory unclaimed and every pool at
/// `units_per_player`, optionally followed by the random occupation pass.
/// Fails before building anything if the config is invalid for `map`.
pub fn create_initial_state(config: &GameConfig, map: &Map) -> Result<GameState, ConfigError> {
    config.validate_for(map)?;

    let mut state = GameState::new(map.len(), config.num_players(), config.units_per_player);
    if config.random_initial_occupation {
        random_occupation(&mut state, config.seed);
    }
    Ok(state)
}

/// Deal shuffled territories round-robin from player 0, one soldier each,
/// until territories or pools run out. A player with an empty pool is
/// skipped rather than ending the pass.
fn random_occupation(state: &mut GameState, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..state.territories.len()).collect();
    order.shuffle(&mut rng);

    let players = state.player_count();
    let mut next = 0;
    for idx in order {
        let Some(p) = (0..players)
            .map(|k| (next + k) % players)
            .find(|&p| state.unassigned[p] > 0)
        else {
            break;
        };
        state.territories[idx] = Territory {
            owner: Some(PlayerIndex(p as u8)),
            soldiers: 1,
        };
        state.unassigned[p] -= 1;
        next = (p + 1) % players;
    }
}
