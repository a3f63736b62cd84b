use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tickbomb_cli::audio::RodioAudio;
use tickbomb_cli::speech::PlatformSpeech;
use tickbomb_cli::{TerminalView, commands, logging, repl};
use tickbomb_core::{
    AudioBackend, BombGame, GameConfig, NoSpeech, PromptBank, RealtimeDriver, Scheduler,
    SilentAudio, SpeechBackend, SpeechEngine, VirtualClock,
};
use tickbomb_types::GameMode;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(version, about = "Pass-the-bomb party game for the terminal")]
struct Cli {
    /// Config file to use instead of the platform config dir
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively (the default)
    Play(PlayArgs),
    /// Print the speech schedule for a prompt
    Segments {
        text: String,
        #[arg(short, long, default_value_t = GameMode::Friend)]
        mode: GameMode,
    },
    /// Print urgency, heartbeat interval and phase for each second
    Curve {
        #[arg(short, long, default_value_t = 60)]
        total: u32,
    },
    /// Print the effective configuration and where it lives
    Config {
        /// Also write it back, filling in any missing settings
        #[arg(long)]
        save: bool,
    },
}

#[derive(clap::Args, Default)]
struct PlayArgs {
    /// Start right away with this many players
    #[arg(short, long)]
    players: Option<u32>,
    #[arg(short, long)]
    mode: Option<GameMode>,
    /// No sound effects
    #[arg(long)]
    mute: bool,
    /// Never read prompts aloud
    #[arg(long)]
    no_speech: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Play(args)) => play(config, args).await,
        None => play(config, PlayArgs::default()).await,
        Some(Commands::Segments { text, mode }) => {
            commands::show_segments(&text, mode, &config);
            Ok(())
        }
        Some(Commands::Curve { total }) => commands::show_curve(total),
        Some(Commands::Config { save }) => {
            if save {
                commands::save_config(&config, cli.config.as_deref())?;
            }
            commands::show_config(&config, cli.config.as_deref())
        }
    }
}

fn build_game(config: &GameConfig, args: &PlayArgs, scheduler: Rc<dyn Scheduler>) -> Result<BombGame, String> {
    let audio: Rc<dyn AudioBackend> = if args.mute || !config.audio.enabled {
        Rc::new(SilentAudio)
    } else {
        Rc::new(RodioAudio::new(&config.audio))
    };
    let speech: Rc<dyn SpeechBackend> = if args.no_speech {
        Rc::new(NoSpeech)
    } else {
        Rc::new(PlatformSpeech::new(&config.speech.voice_language))
    };

    let engine = SpeechEngine::new(Rc::clone(&scheduler), speech, config.speech.clone());
    let prompts = Box::new(PromptBank::from_config(config));
    let game = BombGame::new(config.clone(), scheduler, audio, engine, prompts)
        .map_err(|err| commands::error_chain(&err))?;
    game.add_handler(Box::new(TerminalView::new(std::io::stdout())));
    Ok(game)
}

async fn play(config: GameConfig, args: PlayArgs) -> Result<(), String> {
    let clock = Rc::new(VirtualClock::new());
    let scheduler: Rc<dyn Scheduler> = clock.clone();
    let game = build_game(&config, &args, scheduler)?;
    let driver = RealtimeDriver::new(clock);

    println!("💣 tickbomb: start [players] [friend|pink], Enter for next, quit to leave");
    if args.players.is_some() || args.mode.is_some() {
        let line = format!(
            "start {} {}",
            args.players.unwrap_or(config.default_players),
            args.mode.unwrap_or(config.default_mode)
        );
        if let Err(err) = repl::respond(&line, &game) {
            println!("{err}");
        }
    }
    prompt_marker()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = driver.wait_for_due() => {}
            line = lines.next_line() => {
                let Some(line) = line.map_err(|e| e.to_string())? else {
                    break;
                };
                // Logical time must be current before the command schedules anything
                driver.catch_up();
                match repl::respond(&line, &game) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(err) => println!("{err}"),
                }
                prompt_marker()?;
            }
        }
        driver.catch_up();
    }

    Ok(())
}

fn prompt_marker() -> Result<(), String> {
    let mut out = std::io::stdout();
    write!(out, "\n> ").map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())
}

