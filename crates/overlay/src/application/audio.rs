//! Ability sound cache and playback scheduler.
//!
//! One entry per ability id. Repeat fires of the same sound reuse the loaded
//! asset; a changed URL replaces the entry so catalog reloads hot-swap sounds.
//! Playback is always attempted optimistically: an asset that is still loading
//! simply fails to play and the failure is swallowed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::outbound::{AssetHandle, AudioPort, ReadySignal, Tone};

/// Volume used when neither the event nor the cache supplies one.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Square-wave beep played when an ability has no usable sound.
pub const FALLBACK_TONE: Tone = Tone {
    duration_ms: 200,
    frequency_hz: 880.0,
    gain: 0.2,
};

/// Clamp a wire volume into 0..=1; non-finite or absent yields `None`.
pub fn clamp_volume(volume: Option<f64>) -> Option<f32> {
    volume
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0) as f32)
}

#[derive(Debug)]
pub struct AudioEntry {
    handle: AssetHandle,
    ready: ReadySignal,
    source_url: String,
    volume: f32,
}

impl AudioEntry {
    pub fn handle(&self) -> AssetHandle {
        self.handle
    }

    /// Whether the asset has signalled it can play through.
    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

pub struct AudioScheduler {
    backend: Arc<dyn AudioPort>,
    entries: HashMap<String, AudioEntry>,
}

impl AudioScheduler {
    pub fn new(backend: Arc<dyn AudioPort>) -> Self {
        Self {
            backend,
            entries: HashMap::new(),
        }
    }

    pub fn entry(&self, ability_id: &str) -> Option<&AudioEntry> {
        self.entries.get(ability_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Play the sound for `ability_id`, creating or replacing its cache entry
    /// as needed.
    pub fn play(&mut self, ability_id: &str, url: &str, volume: Option<f64>) {
        let requested = clamp_volume(volume);

        let previous_volume = match self.entries.get(ability_id) {
            Some(entry) if entry.source_url == url => {
                let volume = requested.unwrap_or(entry.volume);
                self.replay(entry.handle, volume);
                return;
            }
            Some(entry) => Some(entry.volume),
            None => None,
        };

        if previous_volume.is_some() {
            tracing::debug!(ability_id, url, "ability sound changed, replacing cached asset");
            self.evict(ability_id);
        }

        let volume = requested.or(previous_volume).unwrap_or(DEFAULT_VOLUME);
        match self.insert(ability_id, url, volume) {
            Some(handle) => {
                if let Err(e) = self.backend.rewind(handle) {
                    tracing::trace!(ability_id, error = %e, "rewind before first play failed");
                }
                if let Err(e) = self.backend.play(handle) {
                    tracing::debug!(ability_id, error = %e, "optimistic first play failed");
                }
            }
            None => self.beep(),
        }
    }

    /// Populate the cache for `ability_id` without playing anything.
    ///
    /// A catalog volume of 0 means "unset" and gets the default.
    pub fn preload(&mut self, ability_id: &str, url: &str, volume: Option<f64>) -> bool {
        let volume = clamp_volume(volume)
            .filter(|v| *v != 0.0)
            .unwrap_or(DEFAULT_VOLUME);
        self.evict(ability_id);
        self.insert(ability_id, url, volume).is_some()
    }

    /// Emit the fallback tone.
    pub fn beep(&self) {
        self.backend.tone(FALLBACK_TONE);
    }

    fn replay(&self, handle: AssetHandle, volume: f32) {
        self.backend.set_volume(handle, volume);
        let result = self
            .backend
            .rewind(handle)
            .and_then(|()| self.backend.play(handle));
        if let Err(e) = result {
            tracing::debug!(?handle, error = %e, "replay of cached asset failed");
        }
    }

    fn insert(&mut self, ability_id: &str, url: &str, volume: f32) -> Option<AssetHandle> {
        let asset = match self.backend.create(url) {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(ability_id, url, error = %e, "failed to construct audio asset");
                return None;
            }
        };

        self.backend.set_volume(asset.handle, volume);
        let handle = asset.handle;
        self.entries.insert(
            ability_id.to_string(),
            AudioEntry {
                handle,
                ready: asset.ready,
                source_url: url.to_string(),
                volume,
            },
        );
        Some(handle)
    }

    fn evict(&mut self, ability_id: &str) {
        if let Some(old) = self.entries.remove(ability_id) {
            self.backend.release(old.handle);
        }
    }
}
