use std::error::Error;
use std::fmt::Write as _;
use std::path::Path;

use tickbomb_core::countdown::{CountdownState, Urgency};
use tickbomb_core::speech::plan;
use tickbomb_core::{GameConfig, GameConfigExt, GameMode};

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(message, ": {cause}");
        source = cause.source();
    }
    message
}

/// Load from `path` when given, otherwise from the platform config dir.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    let result = match path {
        Some(path) => GameConfig::load_from(path),
        None => GameConfig::load(),
    };
    result.map_err(|err| error_chain(&err))
}

/// Speech schedule for `text`: one row per segment.
pub fn segments_table(text: &str, mode: GameMode, ms_per_char: u32) -> String {
    let segments = plan(text, &mode.preset(), ms_per_char);
    let mut out = String::new();
    let _ = writeln!(out, "{:>9} {:>9} {:>7}  Segment", "Start ms", "Speak ms", "Pause");
    let _ = writeln!(out, "{}", "-".repeat(48));
    for segment in &segments {
        let _ = writeln!(
            out,
            "{:>9.0} {:>9.0} {:>7}  {}",
            segment.offset_ms, segment.speak_ms, segment.pause_ms, segment.text
        );
    }
    if segments.is_empty() {
        let _ = writeln!(out, "(nothing to speak)");
    }
    out
}

pub fn show_segments(text: &str, mode: GameMode, config: &GameConfig) {
    print!("{}", segments_table(text, mode, config.speech.ms_per_char));
}

/// Urgency, heartbeat interval and phase for each second of a countdown.
pub fn curve_table(total_secs: u32) -> Result<String, String> {
    let countdown = CountdownState::new(total_secs).map_err(|err| err.to_string())?;
    let mut out = String::new();
    let _ = writeln!(out, "{:>7} {:>8} {:>11}  Phase", "Elapsed", "Urgency", "Beat ms");
    let _ = writeln!(out, "{}", "-".repeat(40));
    for elapsed in 0..=countdown.total() {
        let urgency = Urgency::at(elapsed, countdown.total());
        let _ = writeln!(
            out,
            "{:>7} {:>8.3} {:>11.1}  {:?}",
            elapsed,
            urgency.value(),
            urgency.heartbeat_interval_ms(),
            urgency.phase()
        );
    }
    Ok(out)
}

pub fn show_curve(total_secs: u32) -> Result<(), String> {
    print!("{}", curve_table(total_secs)?);
    Ok(())
}

/// Write `config` to `explicit`, or to the platform config dir.
pub fn save_config(config: &GameConfig, explicit: Option<&Path>) -> Result<(), String> {
    let result = match explicit {
        Some(path) => config.store_to(path),
        None => config.store(),
    };
    result.map_err(|err| error_chain(&err))
}

pub fn show_config(config: &GameConfig, explicit: Option<&Path>) -> Result<(), String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => GameConfig::config_path().map_err(|err| error_chain(&err))?,
    };
    let body = toml::to_string_pretty(config).map_err(|err| err.to_string())?;
    println!("# {}", path.display());
    print!("{body}");
    Ok(())
}
