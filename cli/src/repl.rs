//! In-game command line
//!
//! Each input line is split with shlex and parsed by clap, so the in-game
//! commands get the same help and error output as the binary itself.

use std::io::Write;

use clap::{Parser, Subcommand};
use tickbomb_core::{BombGame, GameState};
use tickbomb_types::GameMode;

#[derive(Parser, Debug)]
#[command(name = "tickbomb", no_binary_name = true, disable_version_flag = true)]
struct Repl {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReplCommand {
    /// Start a round (defaults come from the config)
    Start {
        players: Option<u32>,
        mode: Option<GameMode>,
    },
    /// Clear the prompt and draw the next one (an empty line does the same)
    #[command(alias = "n")]
    Next,
    /// Toggle reading prompts aloud
    Speech,
    /// Play again after an explosion
    Restart,
    /// Back to setup
    Home,
    /// Show the current state
    Status,
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line. An empty line means `next`.
pub fn parse(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Next);
    }
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    let repl = Repl::try_parse_from(args).map_err(|e| e.to_string())?;
    Ok(repl.command)
}

/// Run one input line against the game. Returns true to quit.
pub fn respond(line: &str, game: &BombGame) -> Result<bool, String> {
    let command = parse(line)?;

    // Enter outside a round does nothing
    if line.trim().is_empty() && game.state() != GameState::Active {
        return Ok(false);
    }

    match command {
        ReplCommand::Start { players, mode } => {
            let config = game.config();
            game.start(
                players.unwrap_or(config.default_players),
                mode.unwrap_or(config.default_mode),
            )
            .map_err(|e| e.to_string())?;
        }
        ReplCommand::Next => {
            game.advance_prompt().map_err(|e| e.to_string())?;
        }
        ReplCommand::Speech => {
            game.toggle_speech().map_err(|e| e.to_string())?;
        }
        ReplCommand::Restart => game.restart().map_err(|e| e.to_string())?,
        ReplCommand::Home => game.home().map_err(|e| e.to_string())?,
        ReplCommand::Status => print_status(game),
        ReplCommand::Quit => {
            println!("quitting...");
            return Ok(true);
        }
    }
    Ok(false)
}

fn print_status(game: &BombGame) {
    let mut out = std::io::stdout();
    let _ = writeln!(
        out,
        "\nstate: {} · players: {} · mode: {} · speech: {}",
        game.state(),
        game.player_count(),
        game.mode(),
        if game.speech_enabled() { "on" } else { "off" }
    );
    if let Some(prompt) = game.prompt() {
        let _ = writeln!(out, "prompt: {prompt}");
    }
    let _ = writeln!(out, "phase: {:?}", game.phase());
}
