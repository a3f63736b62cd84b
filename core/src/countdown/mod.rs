//! Countdown and urgency
//!
//! This module provides:
//! - **Urgency**: the non-linear tension curve over elapsed/total time
//! - **Heartbeat**: a repeating sound whose cadence follows urgency
//! - **UrgencyClock**: the whole-second countdown that retunes both each tick
//!
//! # Lifecycle
//!
//! 1. `UrgencyClock::start` renders the first beat at urgency 0
//! 2. Each `tick` counts a second, plays one beat and re-arms the cadence
//! 3. The tick that reaches the total silences the heartbeat and reports
//!    `Expired`; later ticks report `Idle`

mod clock;
mod heartbeat;
mod urgency;


pub use clock::{CountdownState, TickOutcome, TickReport, UrgencyClock};
pub use heartbeat::{Heartbeat, HeartbeatSchedule};
pub use urgency::{CALM_INTERVAL_MS, PANIC_INTERVAL_MS, Urgency};
