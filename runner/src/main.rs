// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for playing games and running tournaments
// ═══════════════════════════════════════════════════════════════════════

mod console;

use clap::{Parser, Subcommand};
use conquest_agents::{Agent, AgentKind};
use conquest_engine::config::{GameConfig, PlayerIdentity};
use conquest_engine::engine::Game;
use conquest_engine::error::ConfigError;
use conquest_engine::map::MapSelection;
use conquest_engine::types::PlayerIndex;
use conquest_tournament::{agent_for_seat, play_agent_turn, run_tournament, SessionError, TournamentPlan};
use console::{human_turn, Board, TurnEnd};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conquest", about = "Turn-based territorial conquest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game; human seats are prompted on stdin
    Play {
        /// Comma-separated seats: human, passive, pacifist, aggressive, random
        #[arg(long, value_delimiter = ',', default_value = "human,aggressive")]
        seats: Vec<PlayerIdentity>,
        #[arg(short, long, default_value = "world")]
        map: MapSelection,
        #[arg(short, long, default_value_t = 27)]
        units: u32,
        /// Deal out every territory at random instead of an Occupation phase
        #[arg(long)]
        random_occupation: bool,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Read the game setup from a JSON file instead of the flags above
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 10_000)]
        max_turns: u64,
    },
    /// Run a batch of agent-only games
    Tournament {
        /// Comma-separated agent seats
        #[arg(long, value_delimiter = ',', default_value = "aggressive,pacifist,passive,random")]
        seats: Vec<AgentKind>,
        #[arg(short, long, default_value_t = 100)]
        games: u32,
        #[arg(short, long, default_value = "world")]
        map: MapSelection,
        #[arg(short, long, default_value_t = 27)]
        units: u32,
        #[arg(long)]
        random_occupation: bool,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 2_000)]
        max_turns: u64,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List a map's territories and borders
    Map {
        #[arg(default_value = "world")]
        map: MapSelection,
    },
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("cannot read config {}: {source}", path.display())]
    ConfigFile { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", path.display())]
    ConfigFormat { path: PathBuf, source: serde_json::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play {
            seats,
            map,
            units,
            random_occupation,
            seed,
            config,
            max_turns,
        } => {
            let config = match config {
                Some(path) => load_config(&path),
                None => Ok(GameConfig::new(seats, map, units)
                    .with_random_occupation(random_occupation)
                    .with_seed(seed)),
            };
            config.and_then(|c| cmd_play(c, max_turns))
        }
        Commands::Tournament {
            seats,
            games,
            map,
            units,
            random_occupation,
            seed,
            max_turns,
            json,
        } => cmd_tournament(
            TournamentPlan {
                seats,
                map,
                units_per_player: units,
                random_initial_occupation: random_occupation,
                games,
                base_seed: seed,
                max_turns,
            },
            json,
        ),
        Commands::Map { map } => cmd_map(map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> Result<GameConfig, RunError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| RunError::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_play(config: GameConfig, max_turns: u64) -> Result<(), RunError> {
    let mut seats: Vec<Option<Box<dyn Agent>>> = (0..config.num_players())
        .map(|seat| agent_for_seat(&config, seat).map_err(SessionError::from))
        .collect::<Result<_, _>>()?;
    let mut game = Game::new(config)?;

    let names: Vec<&str> = game.config().players.iter().map(PlayerIdentity::name).collect();
    println!("=== Conquest: {} on {} ===\n", names.join(" vs "), game.map().name());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    while !game.is_over() && game.state().turn() <= max_turns {
        let Some(player) = game.current_player() else {
            break;
        };
        match seats.get_mut(player.index()) {
            Some(Some(agent)) => {
                if let Ok(report) = play_agent_turn(&mut game, agent.as_mut()) {
                    println!(
                        "{player} ({}): {} applied, {} rejected",
                        agent.name(),
                        report.applied,
                        report.rejected
                    );
                }
            }
            _ => {
                if human_turn(&mut game, &mut input, &mut stdout)? == TurnEnd::Quit {
                    println!("\nGame abandoned at turn {}.", game.state().turn());
                    return Ok(());
                }
            }
        }
        game.drain_events();
        println!("{}", Board(&game));
    }

    match game.winner() {
        Some(w) => println!("{w} ({}) wins after {} turns.", identity_of(&game, w), game.state().turn()),
        None => println!("No winner after {max_turns} turns."),
    }
    Ok(())
}

fn identity_of(game: &Game, player: PlayerIndex) -> &str {
    game.config().players.get(player.index()).map_or("?", PlayerIdentity::name)
}

fn cmd_tournament(plan: TournamentPlan, json: bool) -> Result<(), RunError> {
    let summary = run_tournament(&plan)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let seats: Vec<&str> = plan.seats.iter().map(|k| k.as_str()).collect();
    println!(
        "=== Tournament: {} games on {}, seats {} ===\n",
        summary.games,
        plan.map,
        seats.join(",")
    );
    println!("{:<6} {:<12} {:>6} {:>8}", "Seat", "Agent", "Wins", "Win %");
    println!("{}", "-".repeat(35));
    for (seat, kind) in plan.seats.iter().enumerate() {
        println!(
            "{:<6} {:<12} {:>6} {:>7.1}%",
            seat,
            kind.as_str(),
            summary.seat_wins.get(seat).copied().unwrap_or(0),
            summary.seat_win_rate(seat)
        );
    }
    println!();
    for (agent, wins) in &summary.agent_wins {
        println!("  {agent:<12} {wins:>6} wins");
    }
    println!(
        "\n  decided: {}, turn limit: {}, failed: {}, mean turns: {:.1}, protocol errors: {}",
        summary.decided, summary.turn_limited, summary.failed, summary.mean_turns, summary.protocol_errors
    );
    Ok(())
}

fn cmd_map(selection: MapSelection) -> Result<(), RunError> {
    let map = selection.load().map_err(ConfigError::from)?;
    println!("=== {} map: {} territories ===\n", map.name(), map.len());
    println!("{:>4}  {:<26} {:<16} Borders", "id", "Territory", "Region");
    for info in map.territories() {
        let borders: Vec<String> = map
            .neighbors(info.id)
            .unwrap_or(&[])
            .iter()
            .map(|&n| format!("{} {}", n, map.display_name(n)))
            .collect();
        println!("{:>4}  {:<26} {:<16} {}", info.id.0, info.name, info.region, borders.join(", "));
    }
    Ok(())
}
