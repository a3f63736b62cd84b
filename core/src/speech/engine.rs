//! Speech sequencing with session-based cancellation
//!
//! Every `speak` starts a new session. Segment tasks capture the session id
//! they were scheduled under and do nothing once it is no longer current, so
//! two prompts can never interleave even if a superseded timer still fires.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tickbomb_types::{GameMode, ModePreset, SpeechSettings};
use tracing::{debug, trace, warn};

use crate::scheduler::{Scheduler, TaskHandle};

use super::segment::{self, Segment};
use super::{SpeechBackend, Utterance, VoiceSelector};

pub const MIN_PITCH: f64 = 0.5;
pub const MAX_PITCH: f64 = 2.0;

/// A sequence accepted by [`SpeechEngine::speak`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSession {
    pub id: u64,
    pub segments: Vec<Segment>,
}

/// Sequences prompt speech on a [`Scheduler`].
///
/// Cheap to clone; clones share the same session counter.
#[derive(Clone)]
pub struct SpeechEngine {
    inner: Rc<EngineInner>,
}

struct EngineInner {
    scheduler: Rc<dyn Scheduler>,
    backend: Rc<dyn SpeechBackend>,
    settings: SpeechSettings,
    selector: VoiceSelector,
    /// Id of the live session; anything else is stale
    current_session: Cell<u64>,
    /// Segment timers of the live session
    pending: RefCell<Vec<TaskHandle>>,
    rng: RefCell<Box<dyn RngCore>>,
}

impl SpeechEngine {
    pub fn new(
        scheduler: Rc<dyn Scheduler>,
        backend: Rc<dyn SpeechBackend>,
        settings: SpeechSettings,
    ) -> Self {
        Self::with_rng(scheduler, backend, settings, Box::new(StdRng::from_entropy()))
    }

    /// Engine with an injected random source for the pitch jitter.
    pub fn with_rng(
        scheduler: Rc<dyn Scheduler>,
        backend: Rc<dyn SpeechBackend>,
        settings: SpeechSettings,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let selector = VoiceSelector::from_settings(&settings);
        Self {
            inner: Rc::new(EngineInner {
                scheduler,
                backend,
                settings,
                selector,
                current_session: Cell::new(0),
                pending: RefCell::new(Vec::new()),
                rng: RefCell::new(rng),
            }),
        }
    }

    pub fn is_available(&self) -> bool {
        self.inner.backend.is_available()
    }

    /// Id of the most recent session (0 before the first `speak`/`stop`)
    pub fn session_id(&self) -> u64 {
        self.inner.current_session.get()
    }

    /// Number of segment timers still owned by the live session
    pub fn pending_segments(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Invalidate the live session, drop its timers, and cut off the
    /// current utterance. Safe to call at any time, any number of times.
    pub fn stop(&self) {
        let inner = &self.inner;
        inner.current_session.set(inner.current_session.get() + 1);

        let pending: Vec<TaskHandle> = inner.pending.borrow_mut().drain(..).collect();
        for handle in pending {
            inner.scheduler.cancel(handle);
        }

        if inner.backend.is_available()
            && let Err(err) = inner.backend.cancel()
        {
            warn!(error = %err, "failed to cancel utterance");
        }
    }

    /// Speak `text` segment by segment, superseding any sequence in flight.
    ///
    /// Returns `None` without side effects when speech is unavailable.
    pub fn speak(&self, text: &str, mode: GameMode) -> Option<SpeechSession> {
        if !self.is_available() {
            debug!("speech unavailable, skipping prompt");
            return None;
        }

        self.stop();
        let inner = &self.inner;
        let session_id = inner.current_session.get() + 1;
        inner.current_session.set(session_id);

        let preset = mode.preset();
        let segments = segment::plan(text, &preset, inner.settings.ms_per_char);
        debug!(session_id, segments = segments.len(), %mode, "speech session started");

        let mut pending = inner.pending.borrow_mut();
        for seg in &segments {
            let weak = Rc::downgrade(&self.inner);
            let text = seg.text.clone();
            let handle = inner.scheduler.schedule(
                seg.offset(),
                Box::new(move || speak_segment(&weak, session_id, &text, &preset)),
            );
            pending.push(handle);
        }

        Some(SpeechSession {
            id: session_id,
            segments,
        })
    }

    /// Speak an empty, silent utterance. Some platforms only allow speech
    /// after it was first triggered from a user gesture.
    pub fn prime(&self) {
        let inner = &self.inner;
        if !inner.backend.is_available() {
            return;
        }
        let utterance = Utterance {
            text: String::new(),
            language: inner.settings.utterance_language.clone(),
            rate: 1.0,
            pitch: 1.0,
            volume: 0.0,
            voice: None,
        };
        if let Err(err) = inner.backend.speak(&utterance) {
            debug!(error = %err, "speech priming failed");
        }
    }
}

fn speak_segment(engine: &Weak<EngineInner>, session_id: u64, text: &str, preset: &ModePreset) {
    let Some(inner) = engine.upgrade() else {
        return;
    };
    if session_id != inner.current_session.get() {
        trace!(session_id, current = inner.current_session.get(), "stale segment skipped");
        return;
    }

    if let Err(err) = inner.backend.cancel() {
        warn!(error = %err, "failed to cancel utterance");
    }

    let voices = inner.backend.voices().unwrap_or_else(|err| {
        debug!(error = %err, "voice list unavailable");
        Vec::new()
    });
    let voice = inner.selector.select(&voices).cloned();

    let utterance = Utterance {
        text: text.to_string(),
        language: inner.settings.utterance_language.clone(),
        rate: preset.rate,
        pitch: jittered_pitch(&mut **inner.rng.borrow_mut(), preset.pitch, inner.settings.pitch_jitter),
        volume: 1.0,
        voice,
    };

    if let Err(err) = inner.backend.speak(&utterance) {
        warn!(error = %err, session_id, "failed to speak segment");
    }
}

/// `base` plus a uniform wobble of total width `jitter`, clamped to the
/// valid pitch range.
fn jittered_pitch(rng: &mut dyn RngCore, base: f64, jitter: f64) -> f64 {
    let wobble = rng.gen_range(-0.5f64..0.5) * jitter;
    (base + wobble).clamp(MIN_PITCH, MAX_PITCH)
}
