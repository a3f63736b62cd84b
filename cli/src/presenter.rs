//! Terminal rendering of game signals
//!
//! The remaining time is never printed: the colour, the bar and the shake
//! are the only hints, as with the bomb itself.

use std::f64::consts::TAU;
use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tickbomb_core::{GameSignal, SignalHandler, Urgency};
use tickbomb_types::{Color, PhaseStyle, PresentationPhase};
use tracing::debug;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const CLEAR_LINE: &str = "\r\x1b[2K";
const BAR_WIDTH: usize = 30;

const BURST_EMOJIS: [&str; 8] = ["💥", "🔥", "💣", "😱", "🤯", "⚡", "💀", "🎆"];
const BURST_PARTICLES: usize = 16;
/// Grid of double-width cells the burst is drawn on
const BURST_COLS: usize = 17;
const BURST_ROWS: usize = 7;

/// ANSI true-colour background escape
pub fn bg(color: Color) -> String {
    let [r, g, b, _] = color;
    format!("\x1b[48;2;{r};{g};{b}m")
}

/// ANSI true-colour foreground escape
pub fn fg(color: Color) -> String {
    let [r, g, b, _] = color;
    format!("\x1b[38;2;{r};{g};{b}m")
}

/// Filled/empty bar for `urgency`, `width` cells wide.
pub fn urgency_bar(urgency: Urgency, width: usize) -> String {
    let filled = ((urgency.value() * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Emoji particles thrown out from the centre at jittered angles and
/// distances, one row per line.
pub fn explosion_burst(rng: &mut dyn RngCore) -> Vec<String> {
    let mut grid = [[None::<&str>; BURST_COLS]; BURST_ROWS];
    let (cx, cy) = ((BURST_COLS / 2) as f64, (BURST_ROWS / 2) as f64);

    for i in 0..BURST_PARTICLES {
        let angle = (i as f64 / BURST_PARTICLES as f64) * TAU + rng.gen_range(-0.25..0.25);
        let distance = rng.gen_range(0.55..1.0);
        let col = (cx + angle.cos() * distance * cx).round() as usize;
        let row = (cy + angle.sin() * distance * cy).round() as usize;
        grid[row.min(BURST_ROWS - 1)][col.min(BURST_COLS - 1)] =
            Some(BURST_EMOJIS[i % BURST_EMOJIS.len()]);
    }

    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.unwrap_or("  "))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

fn phase_label(phase: PresentationPhase) -> &'static str {
    match phase {
        PresentationPhase::Calm => "calm",
        PresentationPhase::Warning => "warning",
        PresentationPhase::Critical => "critical",
        PresentationPhase::Panic => "PANIC",
    }
}

/// Renders signals as coloured lines on a terminal.
pub struct TerminalView<W: Write> {
    out: W,
    /// Phase of the last tick; prompts are drawn in its colours
    phase: PresentationPhase,
    /// Scatters the explosion particles
    rng: Box<dyn RngCore>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self::with_rng(out, Box::new(StdRng::from_entropy()))
    }

    pub fn with_rng(out: W, rng: Box<dyn RngCore>) -> Self {
        Self {
            out,
            phase: PresentationPhase::Calm,
            rng,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, signal: &GameSignal) -> std::io::Result<()> {
        match signal {
            GameSignal::RoundStarted {
                round,
                players,
                mode,
                prompt,
                ..
            } => {
                self.phase = PresentationPhase::Calm;
                let style = self.phase.style();
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "{}━━ round {round} · {players} players · {mode} ━━{RESET}",
                    fg(style.button.0)
                )?;
                self.render_prompt(prompt, &style)?;
            }
            GameSignal::Tick {
                elapsed,
                urgency,
                phase,
                ..
            } => {
                self.phase = *phase;
                let style = phase.style();
                // Panic shakes the bar back and forth every second
                let shake = if style.shake && elapsed % 2 == 1 { " " } else { "" };
                write!(
                    self.out,
                    "{CLEAR_LINE}{shake}{}{} {} {:<8}{RESET}",
                    bg(style.background.0),
                    fg(style.button.1),
                    urgency_bar(*urgency, BAR_WIDTH),
                    phase_label(*phase)
                )?;
            }
            GameSignal::PhaseChanged { to, .. } => {
                self.phase = *to;
                if let Some(animation) = to.style().flash.animation_name() {
                    debug!(animation, "phase flash");
                }
            }
            GameSignal::PromptAdvanced { prompt } => {
                writeln!(self.out, "{CLEAR_LINE}✔ クリア！次へ")?;
                let style = self.phase.style();
                self.render_prompt(prompt, &style)?;
            }
            GameSignal::SpeechToggled { enabled } => {
                let label = if *enabled { "🔊 speech on" } else { "🔇 speech off" };
                writeln!(self.out, "{CLEAR_LINE}{label}")?;
            }
            GameSignal::Exploded { round } => {
                let style = PresentationPhase::Panic.style();
                writeln!(self.out, "{CLEAR_LINE}")?;
                for line in explosion_burst(&mut *self.rng) {
                    writeln!(self.out, "{line}")?;
                }
                writeln!(
                    self.out,
                    "{}{BOLD}   💥 BOOM 💥   {RESET}  round {round} is over",
                    bg(style.button.0)
                )?;
                writeln!(self.out, "restart | home | quit")?;
            }
            GameSignal::ReturnedToSetup => {
                writeln!(self.out, "{CLEAR_LINE}back to setup: start [players] [friend|pink]")?;
            }
        }
        self.out.flush()
    }

    fn render_prompt(&mut self, prompt: &str, style: &PhaseStyle) -> std::io::Result<()> {
        writeln!(self.out, "{BOLD}{}  {prompt}{RESET}", fg(style.button.1))
    }
}

impl<W: Write> SignalHandler for TerminalView<W> {
    fn handle_signal(&mut self, signal: &GameSignal) {
        if let Err(err) = self.render(signal) {
            debug!(error = %err, "failed to render signal");
        }
    }
}
