//! Audio asset playback port.

use thiserror::Error;
use tokio::sync::watch;

/// Opaque identifier for an audio asset created by an [`AudioPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(u64);

impl AssetHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Completion signal for an asset load. Flips to `true` once the asset can
/// play through; never flips if the load fails or the asset is released.
pub type ReadySignal = watch::Receiver<bool>;

/// A freshly constructed asset whose load is running in the background.
#[derive(Debug)]
pub struct LoadedAsset {
    pub handle: AssetHandle,
    pub ready: ReadySignal,
}

/// A synthesized tone, used when there is no sound to play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub duration_ms: u64,
    pub frequency_hz: f32,
    pub gain: f32,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("cannot construct audio asset from {url:?}: {reason}")]
    InvalidSource { url: String, reason: String },

    #[error("audio asset {0:?} is not loaded yet")]
    NotReady(AssetHandle),

    #[error("unknown audio asset {0:?}")]
    UnknownAsset(AssetHandle),

    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Platform audio: asset construction, volume, transport and tones.
///
/// Methods are synchronous and must not block; loading happens in the
/// background and is reported through [`LoadedAsset::ready`].
pub trait AudioPort: Send + Sync {
    /// Construct an asset from `url` and start loading it.
    fn create(&self, url: &str) -> Result<LoadedAsset, AudioError>;

    /// Set the playback volume (0..=1) of an asset.
    fn set_volume(&self, handle: AssetHandle, volume: f32);

    /// Seek an asset back to its start.
    fn rewind(&self, handle: AssetHandle) -> Result<(), AudioError>;

    /// Start playing an asset from its current position.
    fn play(&self, handle: AssetHandle) -> Result<(), AudioError>;

    /// Drop the adapter's reference to an asset. Sound that is already
    /// playing is left alone.
    fn release(&self, handle: AssetHandle);

    /// Emit a synthesized tone. Failures are the adapter's to swallow.
    fn tone(&self, tone: Tone);
}
