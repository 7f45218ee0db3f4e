//! Text-to-speech announcer with voice-name matching.

use std::sync::Arc;

use crate::ports::outbound::{DisplayPort, SpeechEnginePort, Utterance, Voice};

pub const UNSUPPORTED_NOTICE: &str = "TTS not supported";

/// Wraps a speech engine. Ordering of concurrent requests is left to the
/// engine's own queue.
pub struct SpeechAnnouncer {
    engine: Arc<dyn SpeechEnginePort>,
    unsupported_reported: bool,
}

impl SpeechAnnouncer {
    pub fn new(engine: Arc<dyn SpeechEnginePort>) -> Self {
        Self {
            engine,
            unsupported_reported: false,
        }
    }

    pub fn speak(&mut self, text: Option<&str>, voice_hint: Option<&str>, display: &dyn DisplayPort) {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return;
        };

        if !self.engine.is_available() {
            if !self.unsupported_reported {
                self.unsupported_reported = true;
                display.toast(UNSUPPORTED_NOTICE);
            }
            return;
        }

        let voice = voice_hint
            .filter(|h| !h.is_empty())
            .and_then(|hint| match_voice(&self.engine.voices(), hint));

        let utterance = Utterance {
            text: text.to_string(),
            voice,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        };

        if let Err(e) = self.engine.speak(utterance) {
            tracing::warn!(error = %e, "failed to enqueue utterance");
        }
    }
}

/// First voice whose name contains `hint`, ignoring case.
pub fn match_voice(voices: &[Voice], hint: &str) -> Option<Voice> {
    let hint = hint.to_lowercase();
    voices
        .iter()
        .find(|v| v.name.to_lowercase().contains(&hint))
        .cloned()
}
