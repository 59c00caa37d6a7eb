// ═══════════════════════════════════════════════════════════════════════
// Scenario and whole-game test suite for the conquest engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::config::{CombatMode, GameConfig, PlayerIdentity};
    use crate::engine::{Game, GameEvent, MoveOutcome};
    use crate::error::{ConfigError, LookupError};
    use crate::invariants::check_invariants;
    use crate::map::{Map, MapSelection};
    use crate::protocol::{parse_response, TurnResponse};
    use crate::rules::Rejection;
    use crate::types::*;

    // ── Helpers ─────────────────────────────────────────────────────────

    fn t(id: u16) -> TerritoryId {
        TerritoryId(id)
    }

    fn p(idx: u8) -> PlayerIndex {
        PlayerIndex(idx)
    }

    fn config(players: usize, units: u32) -> GameConfig {
        GameConfig::new(vec![PlayerIdentity::Human; players], MapSelection::World, units)
    }

    /// Two adjacent territories, ids 0 and 1.
    fn pair_map() -> Map {
        Map::from_edges("pair", &[("West", "r"), ("East", "r")], &[("West", "East")]).unwrap()
    }

    /// Three territories in a line: 0 - 1 - 2.
    fn line_map() -> Map {
        Map::from_edges(
            "line",
            &[("A", "r"), ("B", "r"), ("C", "r")],
            &[("A", "B"), ("B", "C")],
        )
        .unwrap()
    }

    /// Four territories in a cycle: 0 - 1 - 2 - 3 - 0.
    fn ring_map() -> Map {
        Map::from_edges(
            "ring",
            &[("N", "r"), ("E", "r"), ("S", "r"), ("W", "r")],
            &[("N", "E"), ("E", "S"), ("S", "W"), ("W", "N")],
        )
        .unwrap()
    }

    /// A War-phase game on `map` with territories laid out as given and
    /// empty pools. Allotments are raised to cover what was placed.
    fn war_game(map: Map, layout: &[(u8, u32)]) -> Game {
        war_game_for(2, map, layout)
    }

    fn war_game_for(players: usize, map: Map, layout: &[(u8, u32)]) -> Game {
        let units = layout.len() as u32;
        let mut game = Game::with_map(config(players, units), map).unwrap();
        game.arrange(Phase::War, |s| {
            for (i, &(owner, soldiers)) in layout.iter().enumerate() {
                s.territories[i] = Territory { owner: Some(PlayerIndex(owner)), soldiers };
            }
            for player in 0..s.unassigned.len() {
                let held = s.soldiers_of(PlayerIndex(player as u8)) as u32;
                s.unassigned[player] = 0;
                s.allotted[player] = held;
            }
            s.turn_cursor = 0;
        });
        game
    }

    fn phases_entered(game: &Game) -> Vec<Phase> {
        game.events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseEntered { phase } => Some(*phase),
                _ => None,
            })
            .collect()
    }

    // ── Scenarios ───────────────────────────────────────────────────────

    #[test]
    fn test_scenario_a_occupation_ends_when_map_is_claimed() {
        let mut game = Game::with_map(config(2, 1), pair_map()).unwrap();
        assert_eq!(game.state().phase(), Phase::Occupation);
        assert_eq!(game.current_player(), Some(p(0)));

        let state = game.occupy(t(0)).unwrap();
        assert_eq!(state.territory(t(0)).unwrap(), &Territory { owner: Some(p(0)), soldiers: 1 });
        assert_eq!(state.unassigned(p(0)), 0);
        assert_eq!(state.current_player(), Some(p(1)));

        game.occupy(t(1)).unwrap();
        assert_eq!(game.state().unclaimed_count(), 0);
        // Occupation ended at once; Reinforcement has nothing to place.
        assert_ne!(game.state().phase(), Phase::Occupation);
        assert_eq!(
            phases_entered(&game),
            vec![Phase::Occupation, Phase::Reinforcement, Phase::War]
        );
    }

    #[test]
    fn test_scenario_b_empty_pools_skip_reinforcement() {
        let mut game = Game::with_map(config(2, 1), pair_map()).unwrap();
        game.occupy(t(0)).unwrap();
        game.occupy(t(1)).unwrap();

        assert_eq!(game.state().phase(), Phase::War);
        // No reinforce move was ever played.
        assert!(!game.events().iter().any(|e| matches!(
            e,
            GameEvent::MoveApplied { mv: Move::Reinforce { .. }, .. }
        )));
        assert_eq!(game.current_player(), Some(p(0)));
    }

    #[test]
    fn test_scenario_c_attack_succeeds() {
        let mut game = war_game(line_map(), &[(0, 5), (1, 2), (1, 1)]);
        let state = game.attack(t(0), t(1)).unwrap();
        assert_eq!(state.territory(t(0)).unwrap(), &Territory { owner: Some(p(0)), soldiers: 1 });
        assert_eq!(state.territory(t(1)).unwrap(), &Territory { owner: Some(p(0)), soldiers: 2 });
        assert_eq!(state.winner(), None);
        assert!(check_invariants(game.state(), game.map()).is_empty());
    }

    #[test]
    fn test_scenario_d_insufficient_margin_fizzles() {
        let mut game = war_game(line_map(), &[(0, 5), (1, 4), (1, 1)]);
        let before = game.state().clone();
        let outcome = game.submit(Move::Attack { source: t(0), dest: t(1) }).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Rejected(Rejection::InsufficientMargin { attackers: 5, defenders: 4 })
        );
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_scenario_e_sole_owner_wins() {
        let mut game = war_game(line_map(), &[(0, 9), (1, 2), (1, 1)]);
        game.attack(t(0), t(1)).unwrap();
        assert_eq!(game.winner(), None);
        // 1 -> 2 now holds 6 against 1
        game.attack(t(1), t(2)).unwrap();

        assert_eq!(game.winner(), Some(p(0)));
        assert_eq!(game.state().phase(), Phase::Terminal);
        assert_eq!(game.current_player(), None);
        assert!(matches!(game.events().last(), Some(GameEvent::GameWon { winner }) if *winner == p(0)));
        assert!(check_invariants(game.state(), game.map()).is_empty());
    }

    // ── Turn order ──────────────────────────────────────────────────────

    #[test]
    fn test_turn_order_three_players() {
        let mut game = Game::new(config(3, 35)).unwrap();
        let mut seen = Vec::new();
        for _ in 0..9 {
            seen.push(game.current_player().unwrap().0);
            game.end_turn();
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_reinforcement_restarts_at_player_zero() {
        // 5 territories, 3 players: P0 P1 P2 P0 P1 claim, so P2 would be next.
        let map = Map::from_edges(
            "five",
            &[("A", ""), ("B", ""), ("C", ""), ("D", ""), ("E", "")],
            &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")],
        )
        .unwrap();
        let mut game = Game::with_map(config(3, 2), map).unwrap();
        for id in 0..5 {
            game.occupy(t(id)).unwrap();
        }
        assert_eq!(game.state().phase(), Phase::Reinforcement);
        assert_eq!(game.state().unassigned(p(2)), 1);
        assert_eq!(game.current_player(), Some(p(0)));
    }

    #[test]
    fn test_one_move_per_turn_outside_war() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let report = game.play_turn(&[Move::Occupy { target: t(0) }, Move::Occupy { target: t(1) }]);
        assert_eq!(report.applied, 1);
        assert_eq!(report.discarded, 1);
        assert_eq!(game.state().territory(t(1)).unwrap().owner, None);
        assert_eq!(game.current_player(), Some(p(1)));
    }

    #[test]
    fn test_war_turn_allows_many_moves() {
        let mut game = war_game(ring_map(), &[(0, 8), (1, 1), (1, 1), (1, 1)]);
        let report = game.play_turn(&[
            Move::Attack { source: t(0), dest: t(1) },
            Move::Attack { source: t(1), dest: t(2) },
        ]);
        assert_eq!(report.applied, 2);
        assert_eq!(report.rejected, 0);
        assert_eq!(game.current_player(), Some(p(1)));
    }

    #[test]
    fn test_zero_territory_player_stays_in_rotation() {
        let mut game = war_game_for(3, ring_map(), &[(0, 3), (0, 3), (1, 1), (1, 1)]);
        assert_eq!(game.state().owned_count(p(2)), 0);
        game.end_turn();
        assert_eq!(game.current_player(), Some(p(1)));
        game.end_turn();
        assert_eq!(game.current_player(), Some(p(2)));
        // Income still arrives, with nowhere to place it.
        assert_eq!(game.state().unassigned(p(2)), 3);
        game.end_turn();
        assert_eq!(game.current_player(), Some(p(0)));
        assert!(check_invariants(game.state(), game.map()).is_empty());
    }

    // ── Income ──────────────────────────────────────────────────────────

    #[test]
    fn test_war_turn_grants_income_once() {
        let mut game = Game::with_map(config(2, 1), pair_map()).unwrap();
        game.occupy(t(0)).unwrap();
        game.occupy(t(1)).unwrap();

        assert_eq!(game.state().unassigned(p(0)), 3);
        assert_eq!(game.state().allotted(p(0)), 4);
        assert_eq!(game.state().unassigned(p(1)), 0);

        game.reinforce(t(0), 3).unwrap();
        game.end_turn();
        assert_eq!(game.state().unassigned(p(1)), 3);
        let grants = game
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::IncomeGranted { .. }))
            .count();
        assert_eq!(grants, 2);
    }

    // ── Legality edge cases ─────────────────────────────────────────────

    #[test]
    fn test_illegal_move_is_idempotent() {
        let mut game = Game::new(config(2, 30)).unwrap();
        game.occupy(t(5)).unwrap();
        let before = game.state().clone();
        let state = game.occupy(t(5)).unwrap();
        assert_eq!(state, &before);
        assert!(matches!(
            game.events().last(),
            Some(GameEvent::MoveRejected { reason: Rejection::AlreadyClaimed, .. })
        ));
    }

    #[test]
    fn test_wrong_phase_moves_are_noops() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let before = game.state().clone();
        game.reinforce(t(0), 1).unwrap();
        game.attack(t(0), t(1)).unwrap();
        game.fortify().unwrap();
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_unknown_territory_is_lookup_error() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let before = game.state().clone();
        assert_eq!(game.occupy(t(42)).unwrap_err(), LookupError(t(42)));
        assert_eq!(game.attack(t(0), t(900)).unwrap_err(), LookupError(t(900)));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_attack_pair_ends_with_the_lead() {
        let mut game = war_game(line_map(), &[(0, 12), (1, 4), (1, 1)]);
        game.attack(t(0), t(1)).unwrap();
        let s = game.state();
        let total_after = s.territory(t(0)).unwrap().soldiers + s.territory(t(1)).unwrap().soldiers;
        assert_eq!(s.territory(t(0)).unwrap().soldiers, 1);
        assert_eq!(s.territory(t(1)).unwrap().soldiers, 12 - 4 - 1);
        // source keeps 1 and dest gets S - D - 1, so the pair ends with S - D
        assert_eq!(total_after, 12 - 4);
    }

    #[test]
    fn test_occupation_never_declares_early_winner() {
        let mut game = Game::with_map(config(2, 3), line_map()).unwrap();
        game.occupy(t(0)).unwrap();
        game.end_turn();
        game.occupy(t(1)).unwrap();
        assert_eq!(game.state().owned_count(p(0)), 2);
        assert_eq!(game.winner(), None);
        assert_eq!(game.state().phase(), Phase::Occupation);
    }

    #[test]
    fn test_end_turn_after_victory_is_noop() {
        let mut game = war_game(pair_map(), &[(0, 5), (1, 1)]);
        game.attack(t(0), t(1)).unwrap();
        assert!(game.is_over());
        let before = game.state().clone();
        let events = game.events().len();
        game.end_turn();
        assert_eq!(game.state(), &before);
        assert_eq!(game.events().len(), events);
        assert!(matches!(
            game.submit(Move::Fortify).unwrap(),
            MoveOutcome::Rejected(Rejection::GameOver)
        ));
    }

    // ── Setup ───────────────────────────────────────────────────────────

    #[test]
    fn test_random_occupation_starts_in_reinforcement() {
        let cfg = config(2, 30).with_random_occupation(true).with_seed(9);
        let game = Game::new(cfg).unwrap();
        assert_eq!(game.state().phase(), Phase::Reinforcement);
        assert_eq!(game.state().unclaimed_count(), 0);
        assert_eq!(game.current_player(), Some(p(0)));
        assert_eq!(phases_entered(&game), vec![Phase::Reinforcement]);
    }

    #[test]
    fn test_setup_errors() {
        assert_eq!(Game::new(config(1, 30)).err(), Some(ConfigError::TooFewPlayers(1)));
        assert_eq!(Game::new(config(2, 0)).err(), Some(ConfigError::NonPositiveUnits));
        assert_eq!(
            Game::new(config(2, 30).with_combat(CombatMode::Dice)).err(),
            Some(ConfigError::DiceCombatUnsupported)
        );
        assert!(matches!(
            Game::with_map(config(2, 1), line_map()).err(),
            Some(ConfigError::InsufficientUnits { territories: 3, .. })
        ));
    }

    #[test]
    fn test_every_seat_needs_a_territory() {
        for random in [false, true] {
            let cfg = config(3, 1).with_random_occupation(random);
            assert_eq!(
                Game::with_map(cfg, pair_map()).err(),
                Some(ConfigError::MorePlayersThanTerritories { players: 3, territories: 2 })
            );
        }
        // one territory per seat: the dealt pools are spent and War starts
        let game = Game::with_map(config(2, 1).with_random_occupation(true), pair_map()).unwrap();
        assert_eq!(game.state().phase(), Phase::War);
        assert_eq!(game.state().owned_count(p(0)), 1);
        assert_eq!(game.state().owned_count(p(1)), 1);
        // only P0's War income is pending
        assert_eq!(game.state().unassigned(p(0)), 3);
        assert_eq!(game.state().unassigned(p(1)), 0);
    }

    // ── Turn notifications and supplier responses ──────────────────────

    #[test]
    fn test_turn_began_exactly_once_per_turn() {
        let mut game = Game::with_map(config(2, 3), ring_map()).unwrap();
        for id in 0..4 {
            game.occupy(t(id)).unwrap();
        }
        game.end_turn();
        game.reinforce(t(1), 1).unwrap();

        let turns: Vec<u64> = game
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::TurnBegan { turn, .. } => Some(*turn),
                _ => None,
            })
            .collect();
        let expected: Vec<u64> = (1..=game.state().turn()).collect();
        assert_eq!(turns, expected);
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let request = game.turn_request("passive");
        game.end_turn();

        let response = TurnResponse::answering(&request, vec![Move::Occupy { target: t(3) }]);
        let turn = game.state().turn();
        let report = game.play_response(&response);
        assert!(report.stale);
        assert_eq!(report.rejected, 1);
        assert_eq!(game.state().turn(), turn);
        assert_eq!(game.state().territory(t(3)).unwrap().owner, None);
    }

    #[test]
    fn test_response_plays_and_ends_turn() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let request = game.turn_request("passive");
        let raw = format!(
            r#"{{"turn": {}, "moves": [{{"kind": "fortify"}}, {{"kind": "occupy", "target": 7}}]}}"#,
            request.turn
        );
        let response = parse_response(&raw).unwrap();
        let report = game.play_response(&response);
        assert!(!report.stale);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.applied, 1);
        assert_eq!(game.state().territory(t(7)).unwrap().owner, Some(p(0)));
        assert_eq!(game.current_player(), Some(p(1)));
    }

    #[test]
    fn test_all_illegal_response_still_ends_turn() {
        let mut game = Game::new(config(2, 30)).unwrap();
        let report = game.play_turn(&[Move::Reinforce { target: t(0), count: 1 }, Move::Occupy { target: t(99) }]);
        assert_eq!(report.applied, 0);
        assert_eq!(report.rejected, 2);
        assert_eq!(report.unknown, vec![LookupError(t(99))]);
        assert_eq!(game.current_player(), Some(p(1)));
    }

    // ── Whole games ─────────────────────────────────────────────────────

    /// Strongest-first play: stack everything on the strongest territory
    /// and attack any neighbour it can take.
    fn greedy_moves(game: &Game) -> Vec<Move> {
        let state = game.state();
        let Some(me) = state.current_player() else {
            return Vec::new();
        };
        match state.phase() {
            Phase::Occupation => state
                .territories()
                .find(|(_, t)| t.is_unclaimed())
                .map(|(id, _)| vec![Move::Occupy { target: id }])
                .unwrap_or_default(),
            Phase::Reinforcement | Phase::War => {
                let mut moves = Vec::new();
                let strongest = state
                    .territories()
                    .filter(|(_, t)| t.is_owned_by(me))
                    .max_by_key(|(_, t)| t.soldiers)
                    .map(|(id, _)| id);
                let Some(base) = strongest else {
                    return moves;
                };
                let pool = state.unassigned(me);
                if pool > 0 {
                    let count = if state.phase() == Phase::War { pool } else { 1 };
                    moves.push(Move::Reinforce { target: base, count });
                }
                if state.phase() == Phase::War {
                    for &n in game.map().neighbors(base).unwrap() {
                        if !state.territory(n).unwrap().is_owned_by(me) {
                            moves.push(Move::Attack { source: base, dest: n });
                            break;
                        }
                    }
                }
                moves
            }
            Phase::Terminal => Vec::new(),
        }
    }

    #[test]
    fn test_full_game_keeps_invariants() {
        for seed in 0..4 {
            let cfg = config(3, 20).with_random_occupation(seed % 2 == 0).with_seed(seed);
            let mut game = Game::new(cfg).unwrap();
            for _ in 0..3_000 {
                if game.is_over() {
                    break;
                }
                let moves = greedy_moves(&game);
                game.play_turn(&moves);
                let violations = check_invariants(game.state(), game.map());
                assert!(violations.is_empty(), "seed {}: {:?}", seed, violations);
            }
        }
    }

    // ── Property tests ──────────────────────────────────────────────────

    mod props {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Play(Move),
            EndTurn,
        }

        fn op() -> impl Strategy<Value = Op> {
            let id = 0u16..5;
            prop_oneof![
                id.clone().prop_map(|a| Op::Play(Move::Occupy { target: TerritoryId(a) })),
                (id.clone(), 0u32..5).prop_map(|(a, c)| Op::Play(Move::Reinforce { target: TerritoryId(a), count: c })),
                (id.clone(), id).prop_map(|(a, b)| Op::Play(Move::Attack { source: TerritoryId(a), dest: TerritoryId(b) })),
                Just(Op::Play(Move::Fortify)),
                Just(Op::EndTurn),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            /// Every reachable state satisfies the invariants, and a rejected
            /// or unknown-id move leaves the state untouched.
            #[test]
            fn prop_random_moves_keep_invariants(
                players in 2usize..4,
                units in 2u32..6,
                random_start in any::<bool>(),
                seed in any::<u64>(),
                ops in prop::collection::vec(op(), 1..200),
            ) {
                let cfg = config(players, units).with_random_occupation(random_start).with_seed(seed);
                let mut game = Game::with_map(cfg, ring_map()).unwrap();

                for op in ops {
                    let before = game.state().clone();
                    match op {
                        Op::EndTurn => game.end_turn(),
                        Op::Play(mv) => match game.submit(mv) {
                            Ok(MoveOutcome::Applied) => {}
                            Ok(MoveOutcome::Rejected(_)) | Err(_) => {
                                prop_assert_eq!(game.state(), &before);
                            }
                        },
                    }
                    let violations = check_invariants(game.state(), game.map());
                    prop_assert!(violations.is_empty(), "{:?}", violations);
                }
            }
        }
    }
}
