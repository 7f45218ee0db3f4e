//! Text-to-speech engine port.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Human-readable name, matched against voice hints
    pub name: String,
    /// Engine-specific identifier used to select the voice
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// `None` selects the engine default
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech engine unavailable")]
    Unavailable,

    #[error("speech queue closed")]
    QueueClosed,

    #[error("speech engine failed: {0}")]
    Engine(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait SpeechEnginePort: Send + Sync {
    fn is_available(&self) -> bool;

    /// Voices known to the engine, in engine order.
    fn voices(&self) -> Vec<Voice>;

    /// Enqueue an utterance. Returns once queued, not once spoken.
    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;
}
