//! Rodio-backed audio output.
//!
//! Assets are fetched (file or HTTP) on the tokio runtime and decoded once to
//! validate them before their ready signal flips. Playback happens on a
//! dedicated audio thread, since rodio's output stream is not `Send`.

use std::{
    collections::HashMap,
    io::Cursor,
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Sender},
        Arc, Mutex, PoisonError,
    },
    thread,
    time::Duration,
};

use reqwest::Client;
use rodio::{buffer::SamplesBuffer, Decoder, OutputStream, Sink};
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, warn};
use url::Url;

use crate::ports::outbound::{AssetHandle, AudioError, AudioPort, LoadedAsset, Tone};

const SAMPLE_RATE: u32 = 44_100;
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

type Bytes = Arc<[u8]>;

struct AssetSlot {
    bytes: Option<Bytes>,
    volume: f32,
    ready: watch::Sender<bool>,
}

type AssetTable = Arc<Mutex<HashMap<AssetHandle, AssetSlot>>>;

enum AudioCommand {
    Play {
        handle: AssetHandle,
        bytes: Bytes,
        volume: f32,
    },
    SetVolume {
        handle: AssetHandle,
        volume: f32,
    },
    Tone(Tone),
}

pub struct RodioAudio {
    base: Option<Url>,
    client: Client,
    runtime: Handle,
    next_id: AtomicU64,
    assets: AssetTable,
    tx: Sender<AudioCommand>,
}

impl RodioAudio {
    /// `base` resolves relative sound URLs; `runtime` runs asset fetches.
    pub fn new(base: Option<Url>, runtime: Handle) -> Self {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base,
            client,
            runtime,
            next_id: AtomicU64::new(1),
            assets: Arc::new(Mutex::new(HashMap::new())),
            tx: spawn_audio_thread(),
        }
    }

    fn with_slot<T>(
        &self,
        handle: AssetHandle,
        f: impl FnOnce(&mut AssetSlot) -> T,
    ) -> Result<T, AudioError> {
        let mut assets = self.assets.lock().unwrap_or_else(PoisonError::into_inner);
        assets
            .get_mut(&handle)
            .map(f)
            .ok_or(AudioError::UnknownAsset(handle))
    }

    fn send(&self, command: AudioCommand) -> Result<(), AudioError> {
        self.tx
            .send(command)
            .map_err(|_| AudioError::Output("audio thread stopped".into()))
    }
}

impl AudioPort for RodioAudio {
    fn create(&self, url: &str) -> Result<LoadedAsset, AudioError> {
        let source = resolve_source(self.base.as_ref(), url)?;
        let handle = AssetHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (ready_tx, ready) = watch::channel(false);

        self.assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                handle,
                AssetSlot {
                    bytes: None,
                    volume: 1.0,
                    ready: ready_tx,
                },
            );

        let client = self.client.clone();
        let assets = Arc::clone(&self.assets);
        self.runtime.spawn(async move {
            let bytes = match fetch(&client, &source).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!(url = %source, error = %e, "sound fetch failed");
                    return;
                }
            };
            if let Err(e) = Decoder::new(Cursor::new(Arc::clone(&bytes))) {
                debug!(url = %source, error = %e, "sound is not decodable");
                return;
            }

            let mut assets = assets.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = assets.get_mut(&handle) {
                slot.bytes = Some(bytes);
                slot.ready.send_replace(true);
            }
        });

        Ok(LoadedAsset { handle, ready })
    }

    fn set_volume(&self, handle: AssetHandle, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if self.with_slot(handle, |slot| slot.volume = volume).is_ok() {
            if let Err(e) = self.send(AudioCommand::SetVolume { handle, volume }) {
                debug!(?handle, error = %e, "dropping volume change");
            }
        }
    }

    // Every play decodes from the first sample, so a rewind only has to
    // confirm the asset exists.
    fn rewind(&self, handle: AssetHandle) -> Result<(), AudioError> {
        self.with_slot(handle, |_| ())
    }

    fn play(&self, handle: AssetHandle) -> Result<(), AudioError> {
        let (bytes, volume) = self.with_slot(handle, |slot| (slot.bytes.clone(), slot.volume))?;
        let bytes = bytes.ok_or(AudioError::NotReady(handle))?;
        self.send(AudioCommand::Play {
            handle,
            bytes,
            volume,
        })
    }

    fn release(&self, handle: AssetHandle) {
        self.assets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
    }

    fn tone(&self, tone: Tone) {
        if self.send(AudioCommand::Tone(tone)).is_err() {
            debug!("dropping tone, audio thread stopped");
        }
    }
}

/// Resolve a sound reference to a fetchable URL.
///
/// Absolute `file`, `http` and `https` URLs are taken as-is; anything
/// relative is joined onto `base`.
pub fn resolve_source(base: Option<&Url>, raw: &str) -> Result<Url, AudioError> {
    let invalid = |reason: String| AudioError::InvalidSource {
        url: raw.to_string(),
        reason,
    };

    let raw_trimmed = raw.trim();
    if raw_trimmed.is_empty() {
        return Err(invalid("empty URL".into()));
    }

    let url = match Url::parse(raw_trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw_trimmed).map_err(|e| invalid(e.to_string()))?,
            None => return Err(invalid("relative URL without a base".into())),
        },
        Err(e) => return Err(invalid(e.to_string())),
    };

    match url.scheme() {
        "file" | "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

async fn fetch(client: &Client, source: &Url) -> Result<Bytes, String> {
    if source.scheme() == "file" {
        let path = source
            .to_file_path()
            .map_err(|()| format!("not a local path: {source}"))?;
        return tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| e.to_string());
    }

    let response = client
        .get(source.clone())
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(Bytes::from(body.as_ref()))
}

/// Mono square wave for `tone`, alternating between `+gain` and `-gain`.
pub fn square_wave(tone: Tone) -> SamplesBuffer<f32> {
    let total = (u64::from(SAMPLE_RATE) * tone.duration_ms / 1_000) as usize;
    let period = SAMPLE_RATE as f32 / tone.frequency_hz.max(1.0);
    let samples = (0..total)
        .map(|i| {
            let phase = (i as f32 % period) / period;
            if phase < 0.5 {
                tone.gain
            } else {
                -tone.gain
            }
        })
        .collect::<Vec<_>>();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

fn spawn_audio_thread() -> Sender<AudioCommand> {
    let (tx, rx) = mpsc::channel::<AudioCommand>();
    thread::spawn(move || {
        let mut output = OutputStream::try_default().ok();
        if output.is_none() {
            warn!("audio output unavailable; sounds disabled until a device appears");
        }
        let mut asset_sinks: HashMap<AssetHandle, Sink> = HashMap::new();
        let mut tone_sinks: Vec<Sink> = Vec::new();

        while let Ok(command) = rx.recv() {
            asset_sinks.retain(|_, sink| !sink.empty());
            tone_sinks.retain(|sink| !sink.empty());

            if let AudioCommand::SetVolume { handle, volume } = &command {
                if let Some(sink) = asset_sinks.get(handle) {
                    sink.set_volume(*volume);
                }
                continue;
            }

            if output.is_none() {
                output = OutputStream::try_default().ok();
                if output.is_none() {
                    continue;
                }
            }
            let Some((_, stream)) = output.as_ref() else {
                continue;
            };

            let sink = match Sink::try_new(stream) {
                Ok(sink) => sink,
                Err(err) => {
                    warn!(?err, "failed to create audio sink");
                    output = None;
                    continue;
                }
            };

            match command {
                AudioCommand::Play {
                    handle,
                    bytes,
                    volume,
                } => match Decoder::new(Cursor::new(bytes)) {
                    Ok(decoder) => {
                        sink.set_volume(volume);
                        sink.append(decoder);
                        // restarting an asset cuts off its previous playback
                        if let Some(previous) = asset_sinks.insert(handle, sink) {
                            previous.stop();
                        }
                    }
                    Err(err) => debug!(?err, ?handle, "failed decoding sound"),
                },
                AudioCommand::Tone(tone) => {
                    sink.append(square_wave(tone));
                    tone_sinks.push(sink);
                }
                AudioCommand::SetVolume { .. } => {}
            }
        }
    });
    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::Source;

    fn base() -> Url {
        Url::parse("http://localhost:8080/overlay.html").expect("base url")
    }

    #[test]
    fn relative_sources_join_the_base() {
        let url = resolve_source(Some(&base()), "/sfx/roar.mp3").expect("resolves");
        assert_eq!(url.as_str(), "http://localhost:8080/sfx/roar.mp3");

        let url = resolve_source(Some(&base()), "sfx/roar.mp3").expect("resolves");
        assert_eq!(url.as_str(), "http://localhost:8080/sfx/roar.mp3");
    }

    #[test]
    fn absolute_sources_are_kept() {
        let url = resolve_source(None, "https://cdn.example/roar.ogg").expect("resolves");
        assert_eq!(url.as_str(), "https://cdn.example/roar.ogg");
        assert!(resolve_source(None, "file:///tmp/roar.wav").is_ok());
    }

    #[test]
    fn unusable_sources_are_rejected() {
        assert!(matches!(
            resolve_source(Some(&base()), "   "),
            Err(AudioError::InvalidSource { .. })
        ));
        assert!(matches!(
            resolve_source(None, "/sfx/roar.mp3"),
            Err(AudioError::InvalidSource { .. })
        ));
        assert!(matches!(
            resolve_source(Some(&base()), "data:audio/wav;base64,AAAA"),
            Err(AudioError::InvalidSource { .. })
        ));
    }

    #[test]
    fn square_wave_matches_tone() {
        let tone = Tone {
            duration_ms: 200,
            frequency_hz: 880.0,
            gain: 0.2,
        };
        let wave = square_wave(tone);
        assert_eq!(wave.channels(), 1);
        assert_eq!(wave.sample_rate(), SAMPLE_RATE);

        let samples: Vec<f32> = wave.collect();
        assert_eq!(samples.len(), 8_820);
        assert!(samples.iter().all(|s| (s.abs() - 0.2).abs() < f32::EPSILON));
        assert!(samples.iter().any(|s| *s < 0.0));
    }

    #[tokio::test]
    async fn unloaded_assets_refuse_to_play() {
        let audio = RodioAudio::new(Some(base()), Handle::current());
        let asset = audio
            .create("file:///nonexistent/overlay/roar.wav")
            .expect("construction succeeds");

        assert!(audio.rewind(asset.handle).is_ok());
        assert!(matches!(
            audio.play(asset.handle),
            Err(AudioError::NotReady(h)) if h == asset.handle
        ));
        assert!(!*asset.ready.borrow());

        audio.release(asset.handle);
        assert!(matches!(
            audio.play(asset.handle),
            Err(AudioError::UnknownAsset(_))
        ));
    }

    #[tokio::test]
    async fn volume_changes_ignore_released_assets() {
        let audio = RodioAudio::new(Some(base()), Handle::current());
        let asset = audio.create("/sfx/roar.mp3").expect("construction succeeds");

        audio.set_volume(asset.handle, 1.7);
        assert_eq!(audio.with_slot(asset.handle, |slot| slot.volume).ok(), Some(1.0));
        audio.set_volume(asset.handle, 0.25);
        assert_eq!(audio.with_slot(asset.handle, |slot| slot.volume).ok(), Some(0.25));

        audio.release(asset.handle);
        audio.set_volume(asset.handle, 0.5);
        assert!(matches!(
            audio.with_slot(asset.handle, |slot| slot.volume),
            Err(AudioError::UnknownAsset(_))
        ));
    }
}
