//! Punctuation-aware segmentation and pause timing
//!
//! A prompt like `問題です。次は？答えろ！` is spoken as three utterances with a
//! pause after each, so the synthesizer gets natural breathing room instead
//! of one flat sentence.

use std::time::Duration;

use tickbomb_types::ModePreset;

/// Marks that may terminate a segment
pub const PUNCTUATION: [char; 9] = ['。', '、', '！', '？', '!', '?', ',', '，', '.'];

/// Pause after a sentence end (`。` or `.`)
pub const SENTENCE_PAUSE_MS: u32 = 500;
/// Pause after a comma (`、`, `,`, `，`)
pub const COMMA_PAUSE_MS: u32 = 350;
/// Pause after a question mark
pub const QUESTION_PAUSE_MS: u32 = 450;
/// Pause after an exclamation mark
pub const EXCLAMATION_PAUSE_MS: u32 = 400;
/// Pause after a segment with no trailing mark
pub const DEFAULT_PAUSE_MS: u32 = 100;

pub fn is_punctuation(ch: char) -> bool {
    PUNCTUATION.contains(&ch)
}

/// Split `text` into trimmed, non-empty segments.
///
/// A segment is a run of non-punctuation characters plus at most one
/// trailing mark. Marks that do not close a run (leading marks, the second
/// `！` of `！！`) are dropped. Text with no non-punctuation character at all
/// is kept whole.
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut raw = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if is_punctuation(ch) {
            if let Some(start) = run_start.take() {
                raw.push(&text[start..idx + ch.len_utf8()]);
            }
        } else if run_start.is_none() {
            run_start = Some(idx);
        }
    }
    if let Some(start) = run_start {
        raw.push(&text[start..]);
    }
    if raw.is_empty() {
        raw.push(text);
    }

    raw.into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Base pause for a segment's last character, before the mode multiplier.
pub fn base_pause_ms(last: Option<char>) -> u32 {
    match last {
        Some('。' | '.') => SENTENCE_PAUSE_MS,
        Some('、' | ',' | '，') => COMMA_PAUSE_MS,
        Some('？' | '?') => QUESTION_PAUSE_MS,
        Some('！' | '!') => EXCLAMATION_PAUSE_MS,
        _ => DEFAULT_PAUSE_MS,
    }
}

/// Pause for a segment's last character, scaled by the mode and rounded.
pub fn pause_ms(last: Option<char>, preset: &ModePreset) -> u32 {
    (base_pause_ms(last) as f64 * preset.pause_multiplier).round() as u32
}

/// Estimated speaking time: `chars * ms_per_char / rate`
pub fn estimated_speak_ms(segment: &str, ms_per_char: u32, rate: f64) -> f64 {
    segment.chars().count() as f64 * ms_per_char as f64 / rate
}

/// One scheduled chunk of a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    /// Pause inserted after this segment
    pub pause_ms: u32,
    /// Estimated time spent speaking this segment
    pub speak_ms: f64,
    /// Delay from the start of the sequence until this segment is spoken
    pub offset_ms: f64,
}

impl Segment {
    pub fn trailing(&self) -> Option<char> {
        self.text.chars().last()
    }

    pub fn offset(&self) -> Duration {
        Duration::from_micros((self.offset_ms * 1000.0).round() as u64)
    }
}

/// Segment `text` and compute each segment's cumulative start offset.
///
/// Offsets start at zero and never decrease.
pub fn plan(text: &str, preset: &ModePreset, ms_per_char: u32) -> Vec<Segment> {
    let mut offset_ms = 0.0;
    split_segments(text)
        .into_iter()
        .map(|chunk| {
            let pause_ms = pause_ms(chunk.chars().last(), preset);
            let speak_ms = estimated_speak_ms(chunk, ms_per_char, preset.rate);
            let segment = Segment {
                text: chunk.to_string(),
                pause_ms,
                speak_ms,
                offset_ms,
            };
            offset_ms += speak_ms + pause_ms as f64;
            segment
        })
        .collect()
}
