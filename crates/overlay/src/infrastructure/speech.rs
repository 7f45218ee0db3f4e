//! eSpeak NG speech engine.
//!
//! Utterances are queued on an unbounded channel and spoken one at a time by
//! a worker task that pipes each text into `espeak-ng --stdin`.

use std::process::Stdio;

use tokio::{io::AsyncWriteExt, process::Command, sync::mpsc};
use tracing::{debug, info, warn};

use crate::ports::outbound::{SpeechEnginePort, SpeechError, Utterance, Voice};

const DEFAULT_WPM: f32 = 175.0;
const DEFAULT_PITCH: f32 = 50.0;
const DEFAULT_AMPLITUDE: f32 = 100.0;

pub struct EspeakSpeech {
    voices: Vec<Voice>,
    queue: Option<mpsc::UnboundedSender<Utterance>>,
}

impl EspeakSpeech {
    /// Ask `bin` for its voice list and start the speaking worker.
    ///
    /// A binary that cannot be run yields an unavailable engine rather than
    /// an error.
    pub async fn launch(bin: &str) -> Self {
        let output = match Command::new(bin).arg("--voices").output().await {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                warn!(bin, status = %output.status, "speech engine voice listing failed, TTS disabled");
                return Self::unavailable();
            }
            Err(e) => {
                warn!(bin, error = %e, "speech engine not found, TTS disabled");
                return Self::unavailable();
            }
        };

        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        info!(bin, voices = voices.len(), "speech engine ready");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(speak_worker(bin.to_string(), rx));

        Self {
            voices,
            queue: Some(tx),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            voices: Vec::new(),
            queue: None,
        }
    }
}

impl SpeechEnginePort for EspeakSpeech {
    fn is_available(&self) -> bool {
        self.queue.is_some()
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        let queue = self.queue.as_ref().ok_or(SpeechError::Unavailable)?;
        queue.send(utterance).map_err(|_| SpeechError::QueueClosed)
    }
}

async fn speak_worker(bin: String, mut rx: mpsc::UnboundedReceiver<Utterance>) {
    while let Some(utterance) = rx.recv().await {
        if let Err(e) = speak_one(&bin, &utterance).await {
            debug!(error = %e, "utterance failed");
        }
    }
}

async fn speak_one(bin: &str, utterance: &Utterance) -> Result<(), SpeechError> {
    let mut child = Command::new(bin)
        .args(espeak_args(utterance))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SpeechError::Engine(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(utterance.text.as_bytes())
            .await
            .map_err(|e| SpeechError::Engine(e.to_string()))?;
        // closing stdin ends the input
        drop(stdin);
    }

    let status = child
        .wait()
        .await
        .map_err(|e| SpeechError::Engine(e.to_string()))?;
    if !status.success() {
        return Err(SpeechError::Engine(format!("exited with {status}")));
    }
    Ok(())
}

/// Command-line arguments for one utterance. Rate, pitch and volume are
/// multipliers over eSpeak's defaults.
pub fn espeak_args(utterance: &Utterance) -> Vec<String> {
    let scaled = |factor: f32, base: f32, max: f32| {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        ((factor * base).round().min(max) as u32).to_string()
    };

    let mut args = vec![
        "--stdin".to_string(),
        "-s".to_string(),
        scaled(utterance.rate, DEFAULT_WPM, 500.0),
        "-p".to_string(),
        scaled(utterance.pitch, DEFAULT_PITCH, 99.0),
        "-a".to_string(),
        scaled(utterance.volume, DEFAULT_AMPLITUDE, 200.0),
    ];
    if let Some(voice) = &utterance.voice {
        args.push("-v".to_string());
        args.push(voice.id.clone());
    }
    args
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  af              --/M      Afrikaans          gmw/af
/// ```
pub fn parse_voice_list(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            match cols.as_slice() {
                [_, language, _, name, ..] => Some(Voice {
                    name: (*name).to_string(),
                    id: (*language).to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
