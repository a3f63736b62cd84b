//! Countdown-to-explosion state machine
//!
//! ```text
//! Setup ──start──▶ Active ──countdown runs out──▶ Exploded
//!   ▲                │  ▲                            │
//!   └──────home──────┘  └──────────restart───────────┤
//!   ▲                                                │
//!   └────────────────────────home────────────────────┘
//! ```
//!
//! Leaving Active (by explosion or `home`) cancels every timer the round
//! owns: the countdown tick, the heartbeat and any queued speech.

mod machine;
mod signal;

#[cfg(test)]
mod machine_tests;

pub use machine::BombGame;
pub use signal::{GameSignal, SignalHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Setup,
    Active,
    Exploded,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Setup => "setup",
            GameState::Active => "active",
            GameState::Exploded => "exploded",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
