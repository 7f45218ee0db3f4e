//! Outbound ports - everything the core asks the platform to do.
//!
//! The core never touches a socket, a sound device, a speech engine or a
//! terminal directly; adapters in `infrastructure` implement these traits and
//! tests substitute fakes or mocks.

pub mod audio_port;
pub mod catalog_port;
pub mod clock_port;
pub mod display_port;
pub mod speech_port;

pub use audio_port::{AssetHandle, AudioError, AudioPort, LoadedAsset, ReadySignal, Tone};
pub use catalog_port::{CatalogError, CatalogPort};
pub use clock_port::ClockPort;
pub use display_port::{DisplayPort, ElementStyle, RenderedElement, ViewList};
pub use speech_port::{SpeechEnginePort, SpeechError, Utterance, Voice};

#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use speech_port::MockSpeechEnginePort;
