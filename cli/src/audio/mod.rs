//! Sound effects through rodio
//!
//! Each sound plays on its own short-lived thread with its own output
//! stream, so the game loop never blocks on audio. Any failure to open the
//! device just means no sound.

pub mod tones;

use rodio::{OutputStream, Sink, Source};
use tickbomb_core::AudioBackend;
use tickbomb_types::AudioSettings;
use tracing::debug;

pub struct RodioAudio {
    volume: f32,
}

impl RodioAudio {
    pub fn new(settings: &AudioSettings) -> Self {
        Self {
            volume: f32::from(settings.volume.min(100)) / 100.0,
        }
    }

    /// Play `sources` back to back.
    fn play<S, I>(&self, sources: I)
    where
        S: Source<Item = f32> + Send + 'static,
        I: IntoIterator<Item = S> + Send + 'static,
    {
        let volume = self.volume;
        std::thread::spawn(move || {
            let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
                debug!("no audio output device");
                return;
            };
            let Ok(sink) = Sink::try_new(&stream_handle) else {
                return;
            };

            sink.set_volume(volume);
            for source in sources {
                sink.append(source);
            }
            sink.sleep_until_end();
        });
    }
}

impl AudioBackend for RodioAudio {
    fn play_heartbeat(&self, urgency: f64) {
        let (lub, dub) = tones::heartbeat(urgency);
        self.play([lub.mix(dub)]);
    }

    fn play_explosion(&self) {
        let (rumble, sub) = tones::explosion();
        self.play([rumble.mix(sub)]);
    }

    fn play_success(&self) {
        self.play(tones::success());
    }
}
