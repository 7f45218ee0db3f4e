use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;

use crate::ports::outbound::{AssetHandle, AudioError, AudioPort, LoadedAsset, Tone};

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Create(String, AssetHandle),
    SetVolume(AssetHandle, f32),
    Rewind(AssetHandle),
    Play(AssetHandle),
    Release(AssetHandle),
    Tone(Tone),
}

/// Audio backend that records calls instead of making sound.
///
/// Assets never become ready on their own; call [`RecordingAudio::mark_ready`].
#[derive(Debug, Default)]
pub struct RecordingAudio {
    next_handle: AtomicU64,
    fail_plays: AtomicBool,
    failing_urls: Mutex<HashSet<String>>,
    ready: Mutex<HashMap<AssetHandle, watch::Sender<bool>>>,
    calls: Mutex<Vec<AudioCall>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` fail for `url`.
    pub fn fail_url(&self, url: &str) {
        if let Ok(mut urls) = self.failing_urls.lock() {
            urls.insert(url.to_string());
        }
    }

    /// Make every subsequent `play` fail.
    pub fn fail_plays(&self, fail: bool) {
        self.fail_plays.store(fail, Ordering::SeqCst);
    }

    /// Fire the readiness signal of `handle`.
    pub fn mark_ready(&self, handle: AssetHandle) {
        if let Ok(ready) = self.ready.lock() {
            if let Some(tx) = ready.get(&handle) {
                let _ = tx.send(true);
            }
        }
    }

    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AudioCall::Create(url, _) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn play_count(&self, handle: AssetHandle) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == AudioCall::Play(handle))
            .count()
    }

    /// Last volume set on `handle`.
    pub fn current_volume(&self, handle: AssetHandle) -> Option<f32> {
        self.calls().into_iter().rev().find_map(|c| match c {
            AudioCall::SetVolume(h, v) if h == handle => Some(v),
            _ => None,
        })
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AudioCall::Tone(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: AudioCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl AudioPort for RecordingAudio {
    fn create(&self, url: &str) -> Result<LoadedAsset, AudioError> {
        let failing = self
            .failing_urls
            .lock()
            .map(|urls| urls.contains(url))
            .unwrap_or(false);
        if failing {
            return Err(AudioError::InvalidSource {
                url: url.to_string(),
                reason: "rejected by test".to_string(),
            });
        }

        let handle = AssetHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        let (tx, rx) = watch::channel(false);
        if let Ok(mut ready) = self.ready.lock() {
            ready.insert(handle, tx);
        }
        self.record(AudioCall::Create(url.to_string(), handle));
        Ok(LoadedAsset { handle, ready: rx })
    }

    fn set_volume(&self, handle: AssetHandle, volume: f32) {
        self.record(AudioCall::SetVolume(handle, volume));
    }

    fn rewind(&self, handle: AssetHandle) -> Result<(), AudioError> {
        self.record(AudioCall::Rewind(handle));
        Ok(())
    }

    fn play(&self, handle: AssetHandle) -> Result<(), AudioError> {
        self.record(AudioCall::Play(handle));
        if self.fail_plays.load(Ordering::SeqCst) {
            return Err(AudioError::NotReady(handle));
        }
        Ok(())
    }

    fn release(&self, handle: AssetHandle) {
        if let Ok(mut ready) = self.ready.lock() {
            ready.remove(&handle);
        }
        self.record(AudioCall::Release(handle));
    }

    fn tone(&self, tone: Tone) {
        self.record(AudioCall::Tone(tone));
    }
}
