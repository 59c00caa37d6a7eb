// ═══════════════════════════════════════════════════════════════════════
// Console — the human move supplier and the text board
//
// A human seat reads one command per line. Moves go straight to the
// engine, which validates them like any supplier's; the prompt repeats
// until the turn ends (move limit, `end`, phase change, or victory).
// ═══════════════════════════════════════════════════════════════════════

use conquest_engine::engine::{Game, MoveOutcome};
use conquest_engine::types::*;
use std::fmt;
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  occupy <id>               claim an unclaimed territory (Occupation)
  reinforce <id> <count>    place unassigned units on your territory
  attack <src> <dst>        attack an adjacent enemy territory (War)
  fortify                   accepted, has no effect
  end                       end your turn
  show                      print the board
  help                      this text
  quit                      leave the game";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' takes {expected} argument(s), got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("'{0}' is not a number")]
    NotANumber(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Move),
    End,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Keywords are case-insensitive and have
/// one-letter short forms for the moves.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let (command, expected) = match head.to_ascii_lowercase().as_str() {
        "occupy" | "o" => ("occupy", 1),
        "reinforce" | "r" => ("reinforce", 2),
        "attack" | "a" => ("attack", 2),
        "fortify" | "f" => ("fortify", 0),
        "end" | "pass" => ("end", 0),
        "show" | "board" => ("show", 0),
        "help" | "?" => ("help", 0),
        "quit" | "exit" => ("quit", 0),
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    if args.len() != expected {
        return Err(CommandError::Arity {
            command,
            expected,
            got: args.len(),
        });
    }

    Ok(match command {
        "occupy" => Command::Play(Move::Occupy { target: territory(args[0])? }),
        "reinforce" => Command::Play(Move::Reinforce {
            target: territory(args[0])?,
            count: number(args[1])?,
        }),
        "attack" => Command::Play(Move::Attack {
            source: territory(args[0])?,
            dest: territory(args[1])?,
        }),
        "fortify" => Command::Play(Move::Fortify),
        "end" => Command::End,
        "show" => Command::Show,
        "help" => Command::Help,
        _ => Command::Quit,
    })
}

fn territory(word: &str) -> Result<TerritoryId, CommandError> {
    word.parse()
        .map(TerritoryId)
        .map_err(|_| CommandError::NotANumber(word.to_string()))
}

fn number(word: &str) -> Result<u32, CommandError> {
    word.parse().map_err(|_| CommandError::NotANumber(word.to_string()))
}

// ── Human turn ─────────────────────────────────────────────────────────

/// How a human turn finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEnd {
    Ended,
    /// `quit` or end of input.
    Quit,
}

/// Read and apply commands for the current player until their turn ends.
pub fn human_turn<R: BufRead, W: Write>(game: &mut Game, input: &mut R, out: &mut W) -> io::Result<TurnEnd> {
    let turn = game.state().turn();
    let Some(player) = game.current_player() else {
        return Ok(TurnEnd::Ended);
    };
    writeln!(
        out,
        "{player}, your turn ({} phase, turn {turn}, {} unassigned). Type 'help' for commands.",
        game.state().phase(),
        game.state().unassigned(player)
    )?;

    while !game.is_over() && game.state().turn() == turn {
        write!(out, "> ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(TurnEnd::Quit);
        }

        match parse_command(&line) {
            Ok(Command::Play(mv)) => match game.submit(mv) {
                Ok(MoveOutcome::Applied) => writeln!(out, "ok: {mv}")?,
                Ok(MoveOutcome::Rejected(reason)) => writeln!(out, "rejected: {reason}")?,
                Err(e) => writeln!(out, "error: {e}")?,
            },
            Ok(Command::End) => game.end_turn(),
            Ok(Command::Show) => write!(out, "{}", Board(game))?,
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(Command::Quit) => return Ok(TurnEnd::Quit),
            Err(CommandError::Empty) => {}
            Err(e) => writeln!(out, "{e}")?,
        }
    }
    Ok(TurnEnd::Ended)
}

// ── Board ──────────────────────────────────────────────────────────────

/// Text view of a game: header, one row per territory, one per player.
pub struct Board<'a>(pub &'a Game);

impl fmt::Display for Board<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.0;
        let state = game.state();
        match (game.winner(), game.current_player()) {
            (Some(w), _) => writeln!(f, "Turn {} | {} wins", state.turn(), w)?,
            (None, Some(p)) => writeln!(f, "Turn {} | {} phase | {} to move", state.turn(), state.phase(), p)?,
            (None, None) => writeln!(f, "Turn {} | {} phase", state.turn(), state.phase())?,
        }

        writeln!(f, "{:>4}  {:<26} {:<16} {:>5} {:>8}", "id", "territory", "region", "owner", "soldiers")?;
        for info in game.map().territories() {
            let t = state.territory(info.id).copied().unwrap_or_default();
            let owner = t.owner.map_or_else(|| "-".to_string(), |p| p.to_string());
            writeln!(
                f,
                "{:>4}  {:<26} {:<16} {:>5} {:>8}",
                info.id.0, info.name, info.region, owner, t.soldiers
            )?;
        }

        for p in state.players() {
            let identity = game.config().players.get(p.index()).map_or("?", |id| id.name());
            writeln!(
                f,
                "{p} ({identity}): {} territories, {} soldiers, {} unassigned",
                state.owned_count(p),
                state.soldiers_of(p),
                state.unassigned(p)
            )?;
        }
        Ok(())
    }
}
