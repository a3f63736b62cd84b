//! Recording backends and schedulers shared by unit tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::audio::AudioBackend;
use crate::error::BackendError;
use crate::scheduler::{Scheduler, Task, TaskHandle, VirtualClock};
use crate::speech::{SpeechBackend, Utterance, Voice};

#[derive(Debug, Clone, PartialEq)]
pub enum Sound {
    Unlock,
    Heartbeat(f64),
    Explosion,
    Success,
}

#[derive(Default)]
pub struct RecordingAudio {
    pub sounds: RefCell<Vec<Sound>>,
}

impl RecordingAudio {
    pub fn heartbeats(&self) -> usize {
        self.sounds
            .borrow()
            .iter()
            .filter(|s| matches!(s, Sound::Heartbeat(_)))
            .count()
    }

    pub fn count(&self, sound: &Sound) -> usize {
        self.sounds.borrow().iter().filter(|s| *s == sound).count()
    }
}

impl AudioBackend for RecordingAudio {
    fn unlock(&self) {
        self.sounds.borrow_mut().push(Sound::Unlock);
    }

    fn play_heartbeat(&self, urgency: f64) {
        self.sounds.borrow_mut().push(Sound::Heartbeat(urgency));
    }

    fn play_explosion(&self) {
        self.sounds.borrow_mut().push(Sound::Explosion);
    }

    fn play_success(&self) {
        self.sounds.borrow_mut().push(Sound::Success);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechCall {
    Speak(Utterance),
    Cancel,
}

pub struct RecordingSpeech {
    pub available: bool,
    pub voices: Vec<Voice>,
    pub fail_speak: Cell<bool>,
    pub calls: RefCell<Vec<SpeechCall>>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self {
            available: true,
            voices: Vec::new(),
            fail_speak: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::new()
        }
    }

    /// Texts of every utterance spoken so far, in order
    pub fn spoken(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SpeechCall::Speak(utterance) => Some(utterance.text.clone()),
                SpeechCall::Cancel => None,
            })
            .collect()
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SpeechCall::Speak(utterance) => Some(utterance.clone()),
                SpeechCall::Cancel => None,
            })
            .collect()
    }

    pub fn cancels(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, SpeechCall::Cancel))
            .count()
    }
}

impl SpeechBackend for RecordingSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Result<Vec<Voice>, BackendError> {
        Ok(self.voices.clone())
    }

    fn speak(&self, utterance: &Utterance) -> Result<(), BackendError> {
        if self.fail_speak.get() {
            return Err(BackendError::Synthesis("device busy".to_string()));
        }
        self.calls
            .borrow_mut()
            .push(SpeechCall::Speak(utterance.clone()));
        Ok(())
    }

    fn cancel(&self) -> Result<(), BackendError> {
        self.calls.borrow_mut().push(SpeechCall::Cancel);
        Ok(())
    }
}

/// Scheduler that ignores cancellation, so only in-task guards can keep a
/// superseded task from acting.
pub struct LeakyScheduler {
    pub clock: VirtualClock,
}

impl LeakyScheduler {
    pub fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
        }
    }

    pub fn advance(&self, by: Duration) -> usize {
        self.clock.advance(by)
    }
}

impl Scheduler for LeakyScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        self.clock.schedule(delay, task)
    }

    fn cancel(&self, _handle: TaskHandle) {}
}

/// Shared clock plus the same clock as a trait object.
pub fn virtual_clock() -> (Rc<VirtualClock>, Rc<dyn Scheduler>) {
    let clock = Rc::new(VirtualClock::new());
    let scheduler: Rc<dyn Scheduler> = clock.clone();
    (clock, scheduler)
}
